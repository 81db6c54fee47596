use num_complex::Complex64;
use rpn::Evaluator;

fn show<T>(cx: &Evaluator<T>, expr: &str)
where
    T: std::fmt::Display + std::str::FromStr,
{
    match cx.eval(expr) {
        Ok(result) => println!("{} = {}", expr, result),
        Err(e) => println!("{} : {}", expr, e),
    }
}

fn main() {
    if std::env::args().len() > 1 {
        let input = std::env::args().skip(1).collect::<Vec<String>>().join(" ");
        show(&Evaluator::<f64>::new(), &input[..]);
        return;
    }

    // default operators over f64
    let basic = Evaluator::<f64>::new();
    show(&basic, "4 2 5 * + 1 3 2 * + /");

    // defaults extended with a custom operator
    let extended = Evaluator::<f64>::builder()
        .binary_op("@", |a, b| a + a - b)
        .build();
    show(&extended, "-4 2 @");

    // complex values with a conjugation operator
    let complex = Evaluator::<Complex64>::builder()
        .unary_op("C", |a: Complex64| a.conj())
        .build();
    show(&complex, "2+2i 0+4i *");
    show(&complex, "2+2i C");
    show(&complex, "2+2i 0+4i * C");

    // failures are reported, not fatal
    show(&basic, "4 +");
}
