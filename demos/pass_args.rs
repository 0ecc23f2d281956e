use const_switch::{const_switch, UnknownCase};

struct Greeting;

#[const_switch(cases = [1, 2, 3])]
impl Greeting {
    fn when<const V: usize>(name: &str, punct: char) -> String {
        let mut out = String::from("hello");
        for _ in 1..V {
            out.push_str(", hello");
        }
        format!("{} {}{}", out, name, punct)
    }
}

fn main() -> Result<(), UnknownCase> {
    assert_eq!(Greeting::dispatch(1, "walnut", '!')?, "hello walnut!");
    assert_eq!(Greeting::dispatch(3, "tree", '.')?, "hello, hello, hello tree.");

    let err = Greeting::dispatch(4, "forest", '?').unwrap_err();
    println!("{}", err);
    println!("Done!");
    Ok(())
}
