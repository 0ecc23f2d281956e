use std::any::type_name;
use std::num::ParseIntError;
use std::sync::atomic::{AtomicUsize, Ordering};

use const_switch::{const_switch, UnknownCase};
use rstest::rstest;

struct MinCase;

#[const_switch(cases = [1, 4, 6, 10])]
impl MinCase {
    fn when<const V: i32>() -> i32 {
        V * 2
    }
}

#[rstest]
#[case::one(1, 2)]
#[case::four(4, 8)]
#[case::six(6, 12)]
#[case::ten(10, 20)]
fn test_minimum(#[case] value: i32, #[case] expected: i32) {
    assert_eq!(MinCase::dispatch(value), Ok(expected));
}

#[test]
fn test_minimum_unknown_case() {
    let err = MinCase::dispatch(-2).unwrap_err();
    assert_eq!(err, UnknownCase::new(type_name::<MinCase>()));
    assert!(err.to_string().contains("MinCase"));
}

#[test]
fn test_cases_in_declaration_order() {
    assert_eq!(MinCase::CASES, &[1, 4, 6, 10]);
}

#[test]
fn test_repeated_calls_are_deterministic() {
    for _ in 0..3 {
        assert_eq!(MinCase::dispatch(6), Ok(12));
        assert!(MinCase::dispatch(7).is_err());
    }
}

#[test]
fn test_concurrent_calls() {
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| s.spawn(move || MinCase::dispatch(i).ok()))
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            results,
            vec![None, Some(2), None, None, Some(8), None, Some(12), None]
        );
    });
}

struct Bump;

#[const_switch(cases = [9000, 10000])]
impl Bump {
    fn when<const V: i32>() -> i32 {
        V + 1
    }

    fn otherwise(value: i32) -> i32 {
        value - 1
    }
}

#[test]
fn test_otherwise() {
    assert_eq!(Bump::dispatch(9000), 9001);
    assert_eq!(Bump::dispatch(10000), 10001);
    assert_eq!(Bump::dispatch(8000), 7999);
}

struct Extra;

#[const_switch(cases = [20, 30])]
impl Extra {
    fn when<const V: i32>(extra: i32) -> i32 {
        1000 + extra + V
    }
}

#[test]
fn test_extra_parameters() {
    assert_eq!(Extra::dispatch(20, 40), Ok(1060));
    assert_eq!(Extra::dispatch(30, 0), Ok(1030));
    assert!(Extra::dispatch(42, 10).is_err());
}

struct Sum;

#[const_switch(cases = [20, 30], variadic)]
impl Sum {
    fn when<const V: i32>(args: &[i32]) -> i32 {
        V + args.iter().sum::<i32>()
    }
}

#[test]
fn test_variadic() {
    assert_eq!(Sum::dispatch(20, &[]), Ok(20));
    assert_eq!(Sum::dispatch(30, &[50, 20]), Ok(100));
    assert_eq!(Sum::dispatch(30, &[50, 20, 0, 0, 0, 1]), Ok(101));
    assert!(Sum::dispatch(10, &[1, 2, 3]).is_err());
}

struct SumPack;

#[const_switch(cases = [20, 30], arity = variadic)]
impl SumPack {
    fn when<const V: i32, A: IntoIterator<Item = i32>>(args: A) -> i32 {
        V + args.into_iter().sum::<i32>()
    }

    fn otherwise<A: IntoIterator<Item = i32>>(value: i32, args: A) -> i32 {
        -value - args.into_iter().count() as i32
    }
}

#[test]
fn test_variadic_generic_pack() {
    assert_eq!(SumPack::dispatch(20, Vec::<i32>::new()), 20);
    assert_eq!(SumPack::dispatch(30, [50, 20]), 100);
    assert_eq!(SumPack::dispatch(30, std::iter::repeat(1).take(71)), 101);
    assert_eq!(SumPack::dispatch(5, [1, 2, 3]), -8);
}

struct Scale;

#[const_switch(cases = [2u8, 3u8])]
impl Scale {
    fn when<const V: u8, T: Into<u64>>(x: T) -> u64 {
        u64::from(V) * x.into()
    }
}

#[test]
fn test_generic_handler() {
    assert_eq!(Scale::dispatch(2, 21u8), Ok(42));
    assert_eq!(Scale::dispatch(3, 1_000_000u32), Ok(3_000_000));
    assert_eq!(Scale::dispatch(3, true), Ok(3));
    assert!(Scale::dispatch(4, 1u16).is_err());
}

struct Pick;

#[const_switch(cases = [0, 1])]
impl Pick {
    fn when<'a, const V: usize>(words: &'a [&'a str]) -> Option<&'a str> {
        words.get(V).copied()
    }

    fn otherwise<'a>(_index: usize, words: &'a [&'a str]) -> Option<&'a str> {
        words.last().copied()
    }
}

#[test]
fn test_with_lifetimes() {
    let words = ["walnut", "tree", "forest"];
    assert_eq!(Pick::dispatch(0, &words), Some("walnut"));
    assert_eq!(Pick::dispatch(1, &words), Some("tree"));
    assert_eq!(Pick::dispatch(7, &words), Some("forest"));
    assert_eq!(Pick::dispatch(1, &["only"]), None);
}

struct Letter;

#[const_switch(cases = ['a', 'b'])]
impl Letter {
    fn when<const C: char>() -> u32 {
        C as u32 - 'a' as u32
    }

    fn otherwise(_: char) -> u32 {
        u32::MAX
    }

    fn compare(case: &char, value: &char) -> bool {
        case.eq_ignore_ascii_case(value)
    }
}

#[test]
fn test_custom_compare() {
    assert_eq!(Letter::dispatch('a'), 0);
    assert_eq!(Letter::dispatch('B'), 1);
    assert_eq!(Letter::dispatch('c'), u32::MAX);
}

struct Flag;

#[const_switch(cases = [true])]
impl Flag {
    fn when<const B: bool>() -> &'static str {
        if B {
            "on"
        } else {
            "off"
        }
    }
}

#[test]
fn test_bool_cases() {
    assert_eq!(Flag::dispatch(true), Ok("on"));
    assert!(Flag::dispatch(false).is_err());
}

struct Radix;

#[const_switch(cases = [2, 8, 10, 16])]
impl Radix {
    fn when<const V: u32>(input: &str) -> Result<u32, ParseIntError> {
        u32::from_str_radix(input, V)
    }
}

#[test]
fn test_handler_errors_pass_through() {
    assert_eq!(Radix::dispatch(16, "ff"), Ok(Ok(255)));
    assert_eq!(Radix::dispatch(2, "101"), Ok(Ok(5)));
    assert!(matches!(Radix::dispatch(10, "zz"), Ok(Err(_))));
    assert!(Radix::dispatch(3, "1").is_err());
}

const LOW: i64 = -100;
const HIGH: i64 = 100;

struct Clamp;

#[const_switch(cases = [LOW, HIGH, 0])]
impl Clamp {
    fn when<const V: i64>() -> i64 {
        V.signum()
    }
}

#[test]
fn test_const_item_cases() {
    assert_eq!(Clamp::dispatch(-100), Ok(-1));
    assert_eq!(Clamp::dispatch(100), Ok(1));
    assert_eq!(Clamp::dispatch(0), Ok(0));
    assert_eq!(Clamp::CASES, &[-100, 100, 0]);
}

struct Forward;

#[const_switch(cases = [1, 2, 3, 5, 8])]
impl Forward {
    fn when<const V: i32>() -> i32 {
        V * 10
    }

    fn otherwise(value: i32) -> i32 {
        -value
    }
}

struct Backward;

#[const_switch(cases = [8, 5, 3, 2, 1])]
impl Backward {
    fn when<const V: i32>() -> i32 {
        V * 10
    }

    fn otherwise(value: i32) -> i32 {
        -value
    }
}

#[test]
fn test_case_order_does_not_change_outcome() {
    for value in -5..15 {
        assert_eq!(Forward::dispatch(value), Backward::dispatch(value));
    }
}

static MATCHED: AtomicUsize = AtomicUsize::new(0);
static FELL_BACK: AtomicUsize = AtomicUsize::new(0);

struct Counting;

#[const_switch(cases = [1, 2])]
impl Counting {
    fn when<const V: i32>() {
        MATCHED.fetch_add(1, Ordering::SeqCst);
    }

    fn otherwise(_: i32) {
        FELL_BACK.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_exactly_one_handler_runs() {
    Counting::dispatch(1);
    Counting::dispatch(2);
    Counting::dispatch(3);
    assert_eq!(MATCHED.load(Ordering::SeqCst), 2);
    assert_eq!(FELL_BACK.load(Ordering::SeqCst), 1);
}

struct Scaled<T>(std::marker::PhantomData<T>);

#[const_switch(cases = [2, 4])]
impl<T: From<u8> + std::ops::Mul<Output = T>> Scaled<T> {
    fn when<const V: u8>(x: T) -> T {
        x * T::from(V)
    }
}

#[test]
fn test_generic_dispatcher_type() {
    assert_eq!(Scaled::<u32>::dispatch(4, 10), Ok(40));
    assert_eq!(Scaled::<f64>::dispatch(2, 1.5), Ok(3.0));

    let err = Scaled::<u32>::dispatch(3, 1).unwrap_err();
    assert_eq!(err.dispatcher(), type_name::<Scaled<u32>>());
}
