// Build with `--emit asm` to inspect what a dispatch folds down to.
//
// `CONST_SWITCH_CASE` picks the input at compile time:
// * 0x1, 0x4, 0x6 or 0x10 are declared cases and return twice their value.
// * Any other number is an unknown case and returns 23.
// * `argc`, or leaving it unset, uses the number of arguments instead, which keeps the
//   optimizer from removing the dispatch.

use const_switch::const_switch;

struct MinCase;

#[const_switch(cases = [0x1, 0x4, 0x6, 0x10])]
impl MinCase {
    #[inline]
    fn when<const V: i32>() -> i32 {
        V * 2
    }

    #[inline]
    fn otherwise(_: i32) -> i32 {
        23
    }
}

const CASE: Option<i32> = match option_env!("CONST_SWITCH_CASE") {
    Some(s) => parse_case(s.as_bytes()),
    None => None,
};

/// Parses a decimal or `0x` hexadecimal literal. Anything else selects `argc`.
const fn parse_case(s: &[u8]) -> Option<i32> {
    let (radix, mut i) = match s {
        [b'0', b'x' | b'X', ..] => (16, 2),
        _ => (10, 0),
    };
    if i == s.len() {
        return None;
    }
    let mut value: i32 = 0;
    while i < s.len() {
        let digit = match s[i] {
            c @ b'0'..=b'9' => (c - b'0') as i32,
            c @ b'a'..=b'f' if radix == 16 => (c - b'a') as i32 + 10,
            c @ b'A'..=b'F' if radix == 16 => (c - b'A') as i32 + 10,
            _ => return None,
        };
        value = match value.checked_mul(radix) {
            Some(v) => match v.checked_add(digit) {
                Some(v) => v,
                None => return None,
            },
            None => return None,
        };
        i += 1;
    }
    Some(value)
}

fn main() {
    let case = match CASE {
        Some(case) => case,
        None => std::env::args().count() as i32,
    };
    std::process::exit(MinCase::dispatch(case));
}
