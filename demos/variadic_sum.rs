use const_switch::const_switch;

/// Adds the matched case to every forwarded argument, however many there are.
struct Sum;

#[const_switch(cases = [20, 30], variadic)]
impl Sum {
    fn when<const V: i32>(args: &[i32]) -> i32 {
        V + args.iter().sum::<i32>()
    }

    fn otherwise(_: i32, _: &[i32]) -> i32 {
        0
    }
}

fn main() {
    assert_eq!(Sum::dispatch(20, &[]), 20);
    assert_eq!(Sum::dispatch(30, &[50, 20]), 100);
    assert_eq!(Sum::dispatch(30, &[50, 20, 0, 0, 0, 1]), 101);
    assert_eq!(Sum::dispatch(40, &[1]), 0);
    println!("Done!");
}
