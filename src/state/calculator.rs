/// Calculator: an expression buffer fed by keypad presses
///
/// Evaluation goes through a small recursive-descent parser that only knows
/// decimal literals, unary signs and `+ - * /`. No general-purpose evaluator
/// ever sees the buffer.
use crate::error::{LauncherError, Result};

/// Key that empties the buffer
pub const CLEAR: &str = "C";

/// Buffer contents after a failed evaluation
pub const ERROR_MARKER: &str = "Error";

/// Keypad layout, row by row
pub const KEYPAD: [[&str; 4]; 4] = [
    ["7", "8", "9", "/"],
    ["4", "5", "6", "*"],
    ["1", "2", "3", "-"],
    [".", "0", CLEAR, "+"],
];

/// Accumulated calculator input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calculator {
    buffer: String,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown on the display
    pub fn display(&self) -> &str {
        &self.buffer
    }

    /// Handle one key. `C` clears, anything else is appended unchecked.
    pub fn press(&mut self, token: &str) {
        if token == CLEAR {
            self.buffer.clear();
        } else {
            self.buffer.push_str(token);
        }
    }

    /// Replace the buffer with its value, or with `Error`
    pub fn evaluate(&mut self) -> &str {
        self.buffer = match evaluate(&self.buffer) {
            Ok(value) => value.to_string(),
            Err(e) => {
                tracing::debug!("{}", e);
                ERROR_MARKER.to_string()
            }
        };
        &self.buffer
    }
}

/// A computed value. Integers stay exact until a division or a decimal
/// literal turns the result into a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    fn combine(
        self,
        other: Number,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match int_op(a, b) {
                Some(v) => Number::Int(v),
                // Overflow falls back to float arithmetic
                None => Number::Float(float_op(a as f64, b as f64)),
            },
            (a, b) => Number::Float(float_op(a.as_f64(), b.as_f64())),
        }
    }

    fn negate(self) -> Number {
        match self {
            Number::Int(i) => i
                .checked_neg()
                .map(Number::Int)
                .unwrap_or(Number::Float(-(i as f64))),
            Number::Float(f) => Number::Float(-f),
        }
    }

    fn divide(self, other: Number) -> Result<Number> {
        if other.is_zero() {
            return Err(LauncherError::Evaluation("division by zero".to_string()));
        }
        Ok(Number::Float(self.as_f64() / other.as_f64()))
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// Shortest round-trip form, always showing a fraction or an exponent
/// (`2.0`, `0.30000000000000004`, `1e+16`, `1.5e-05`)
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = x.abs();
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        let scientific = format!("{:e}", x);
        let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let plain = format!("{}", x);
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    Slash,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Exponent suffix, as printed for very large or small results
                if let Some(&(i, 'e' | 'E')) = chars.peek() {
                    chars.next();
                    end = i + 1;
                    if let Some(&(i, '+' | '-')) = chars.peek() {
                        chars.next();
                        end = i + 1;
                    }
                    while let Some(&(i, d)) = chars.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        end = i + 1;
                        chars.next();
                    }
                }
                tokens.push(Token::Num(parse_literal(&input[start..end])?));
            }
            other => {
                return Err(LauncherError::Evaluation(format!(
                    "unexpected character '{}'",
                    other
                )))
            }
        }
    }

    Ok(tokens)
}

fn parse_literal(literal: &str) -> Result<Number> {
    let bad = || LauncherError::Evaluation(format!("invalid number '{}'", literal));

    let (mantissa, exponent) = match literal.find(['e', 'E']) {
        Some(at) => (&literal[..at], Some(&literal[at + 1..])),
        None => (literal, None),
    };

    let dots = mantissa.matches('.').count();
    if dots > 1 || !mantissa.bytes().any(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    if let Some(exponent) = exponent {
        let digits = exponent.trim_start_matches(['+', '-']);
        if digits.is_empty() || exponent.len() - digits.len() > 1 {
            return Err(bad());
        }
    }
    if dots == 1 || exponent.is_some() {
        return literal.parse::<f64>().map(Number::Float).map_err(|_| bad());
    }
    // `0` and `000` are fine, `07` is not
    if mantissa.len() > 1 && mantissa.starts_with('0') && mantissa.bytes().any(|b| b != b'0') {
        return Err(bad());
    }
    match literal.parse::<i64>() {
        Ok(i) => Ok(Number::Int(i)),
        // Too large for i64
        Err(_) => literal.parse::<f64>().map(Number::Float).map_err(|_| bad()),
    }
}

/// expr  := term (('+' | '-') term)*
/// term  := unary (('*' | '/') unary)*
/// unary := ('+' | '-') unary | number
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<Number> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value = value.combine(self.term()?, i64::checked_add, |a, b| a + b);
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value = value.combine(self.term()?, i64::checked_sub, |a, b| a - b);
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Number> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value = value.combine(self.unary()?, i64::checked_mul, |a, b| a * b);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    value = value.divide(self.unary()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<Number> {
        match self.next() {
            Some(Token::Plus) => self.unary(),
            Some(Token::Minus) => Ok(self.unary()?.negate()),
            Some(Token::Num(n)) => Ok(n),
            Some(other) => Err(LauncherError::Evaluation(format!(
                "unexpected operator {:?}",
                other
            ))),
            None => Err(LauncherError::Evaluation(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(input: &str) -> Result<Number> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(LauncherError::Evaluation("empty expression".to_string()));
    }

    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(LauncherError::Evaluation("trailing input".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> String {
        let mut calc = Calculator::new();
        calc.press(input);
        calc.evaluate().to_string()
    }

    #[test]
    fn test_presses_concatenate() {
        let mut calc = Calculator::new();
        let tokens = ["1", "2", "+", "+", ".", "7", "/", "*"];
        for token in tokens {
            calc.press(token);
        }
        assert_eq!(calc.display(), tokens.concat());
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut calc = Calculator::new();
        calc.press("9");
        calc.press("*");
        calc.press(CLEAR);
        assert_eq!(calc.display(), "");
        calc.press("3");
        assert_eq!(calc.display(), "3");
    }

    #[test]
    fn test_basic_results() {
        assert_eq!(eval("2+2"), "4");
        assert_eq!(eval("5/0"), ERROR_MARKER);
        assert_eq!(eval(""), ERROR_MARKER);
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval("2+3*4"), "14");
        assert_eq!(eval("10-4-3"), "3");
        assert_eq!(eval("8/4/2"), "1.0");
        assert_eq!(eval("7-2*3+1"), "2");
    }

    #[test]
    fn test_division_gives_float() {
        assert_eq!(eval("7/2"), "3.5");
        assert_eq!(eval("4/2"), "2.0");
        assert_eq!(eval("1/3"), "0.3333333333333333");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(eval(".1+.2"), "0.30000000000000004");
        assert_eq!(eval("5.+1"), "6.0");
        assert_eq!(eval("1.5*2"), "3.0");
        assert_eq!(eval("0.5"), "0.5");
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(eval("-3+5"), "2");
        assert_eq!(eval("2*-3"), "-6");
        assert_eq!(eval("--4"), "4");
        assert_eq!(eval("+-+2"), "-2");
    }

    #[test]
    fn test_malformed_input() {
        for input in ["1.2.3", "2+", "*2", "2**3", "8//3", ".", "3/-0", "2..", "1/0.0"] {
            assert_eq!(eval(input), ERROR_MARKER, "{} should fail", input);
        }
    }

    #[test]
    fn test_rejects_non_arithmetic_text() {
        assert!(evaluate("__import__('os')").is_err());
        assert!(evaluate("2+(3)").is_err());
        assert!(evaluate("e3").is_err());
    }

    #[test]
    fn test_exponent_literals() {
        assert_eq!(eval("1e3"), "1000.0");
        assert_eq!(eval("2.5E-1*4"), "1.0");
        for input in ["1e", "1e+", "1e+-2", "1.e.2"] {
            assert_eq!(eval(input), ERROR_MARKER, "{} should fail", input);
        }
    }

    #[test]
    fn test_leading_zero_integers_rejected() {
        assert_eq!(eval("07+1"), ERROR_MARKER);
        assert_eq!(eval("1+007"), ERROR_MARKER);
        assert_eq!(eval("0+1"), "1");
        assert_eq!(eval("00+1"), "1");
        assert_eq!(eval("07.5+1"), "8.5");
        assert_eq!(eval("10-0"), "10");
    }

    #[test]
    fn test_overflow_promotes_to_float() {
        assert_eq!(eval("9223372036854775807+1"), "9.223372036854776e+18");
        assert_eq!(eval("99999999999999999999"), "1e+20");
    }

    #[test]
    fn test_small_float_uses_exponent() {
        assert_eq!(eval("1/100000"), "1e-05");
        assert_eq!(eval("3/20000"), "0.00015");
    }

    #[test]
    fn test_error_sticks_until_cleared() {
        let mut calc = Calculator::new();
        calc.press("5");
        calc.press("/");
        calc.press("0");
        assert_eq!(calc.evaluate(), ERROR_MARKER);

        calc.press("1");
        assert_eq!(calc.evaluate(), ERROR_MARKER);

        calc.press(CLEAR);
        calc.press("6");
        calc.press("*");
        calc.press("7");
        assert_eq!(calc.evaluate(), "42");
    }

    #[test]
    fn test_result_can_be_extended() {
        let mut calc = Calculator::new();
        calc.press("2");
        calc.press("+");
        calc.press("2");
        calc.evaluate();
        calc.press("*");
        calc.press("3");
        assert_eq!(calc.evaluate(), "12");
    }

    #[test]
    fn test_exponent_result_can_be_extended() {
        let mut calc = Calculator::new();
        calc.press("1/100000");
        assert_eq!(calc.evaluate(), "1e-05");
        calc.press("+");
        calc.press("1");
        assert_eq!(calc.evaluate(), "1.00001");

        calc.press(CLEAR);
        calc.press("99999999999999999999");
        assert_eq!(calc.evaluate(), "1e+20");
        calc.press("+");
        calc.press("1");
        assert_eq!(calc.evaluate(), "1e+20");
    }

    #[test]
    fn test_keypad_contains_clear() {
        assert!(KEYPAD.iter().flatten().any(|key| *key == CLEAR));
    }
}
