use const_switch::const_switch;

#[derive(Debug, PartialEq)]
enum Token {
    Plus,
    Minus,
    Star,
    Ident(char),
}

struct Lexer;

#[const_switch(cases = ['+', '-', '*'])]
impl Lexer {
    fn when<const C: char>() -> Token {
        match C {
            '+' => Token::Plus,
            '-' => Token::Minus,
            _ => Token::Star,
        }
    }

    fn otherwise(c: char) -> Token {
        Token::Ident(c.to_ascii_lowercase())
    }

    // Treats `x` as multiplication too.
    fn compare(case: &char, value: &char) -> bool {
        case == value || (*case == '*' && value.eq_ignore_ascii_case(&'x'))
    }
}

fn main() {
    let tokens: Vec<_> = "a+B-cXd*".chars().map(Lexer::dispatch).collect();
    assert_eq!(
        tokens,
        vec![
            Token::Ident('a'),
            Token::Plus,
            Token::Ident('b'),
            Token::Minus,
            Token::Ident('c'),
            Token::Star,
            Token::Ident('d'),
            Token::Star,
        ]
    );
    println!("{:?}", tokens);
}
