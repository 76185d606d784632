//! Infix arithmetic evaluation.
//!
//! Parsing and evaluation are delegated to `evalexpr`. Numeric literals are
//! rewritten as float literals first, so `7 / 2` is `3.5` rather than integer
//! division. Any identifier left over after substitution is a syntax error.

use crate::error::ScoutError;

/// Evaluate an arithmetic expression to a finite number.
pub fn evaluate(expression: &str) -> Result<f64, ScoutError> {
    let source = float_literals(expression);
    let value = evalexpr::eval_number(&source).map_err(|e| ScoutError::ExpressionSyntaxError {
        expression: expression.to_string(),
        message: e.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ScoutError::NonFiniteResult(expression.to_string()));
    }
    Ok(value)
}

/// Rewrite every numeric literal in plain decimal form with a fractional
/// part: `5` becomes `5.0`, `.5` becomes `0.5`, `1e-2` becomes `0.01`.
fn float_literals(expression: &str) -> String {
    let bytes = expression.as_bytes();
    let mut out = String::with_capacity(expression.len() + 8);
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        match literal_at(bytes, i) {
            Token::Number(end) => {
                let text = &expression[i..end];
                if let Ok(value) = text.parse::<f64>() {
                    let mut literal = value.to_string();
                    if !literal.contains('.') && value.is_finite() {
                        literal.push_str(".0");
                    }
                    out.push_str(&expression[last..i]);
                    out.push_str(&literal);
                    last = end;
                }
                i = end;
            }
            Token::Word(end) => i = end,
            Token::Other => i += 1,
        }
    }
    out.push_str(&expression[last..]);
    out
}

/// What starts at a byte offset, as far as literal and identifier scanning
/// is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    /// A numeric literal ending at the given offset.
    Number(usize),
    /// An identifier-like word ending at the given offset.
    Word(usize),
    Other,
}

/// Classify the token starting at `start`.
///
/// A word run that starts with a digit is a number only when the number scan
/// covers the whole run, so `1e5` and `2.5` are literals while `2nd_gear` is
/// a word. A signed exponent (`1e-5`) extends the literal past the run.
pub(crate) fn literal_at(bytes: &[u8], start: usize) -> Token {
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let b = bytes[start];

    if b == b'.' {
        return if bytes.get(start + 1).is_some_and(u8::is_ascii_digit) {
            Token::Number(scan_number(bytes, start))
        } else {
            Token::Other
        };
    }
    if !is_word(b) {
        return Token::Other;
    }

    let mut word_end = start;
    while word_end < bytes.len() && is_word(bytes[word_end]) {
        word_end += 1;
    }
    if b.is_ascii_digit() {
        let number_end = scan_number(bytes, start);
        if number_end >= word_end {
            return Token::Number(number_end);
        }
    }
    Token::Word(word_end)
}

/// Returns the index one past the end of the number starting at `i`.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    // Only consume an exponent when digits follow it.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(s: &str) -> f64 {
        evaluate(s).unwrap()
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval("12 + 1*5"), 17.0);
        assert_eq!(eval("2 + 3 * 4 - 1"), 13.0);
        assert_eq!(eval("(2 + 3) * 4"), 20.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("64 / 4 / 2"), 8.0);
    }

    #[test]
    fn division_is_not_truncated() {
        assert_eq!(eval("7 / 2"), 3.5);
        assert_eq!(eval("1 / (2 + 2)"), 0.25);
    }

    #[test]
    fn negatives_and_decimals() {
        assert_eq!(eval("-3 + 5"), 2.0);
        assert_eq!(eval("2 * (-1.5)"), -3.0);
        assert_eq!(eval(".5 + 1.25"), 1.75);
        assert_eq!(eval("1e2 + 2.5E-1"), 100.25);
    }

    #[test]
    fn literals_become_floats() {
        assert_eq!(float_literals("12 + 1*5"), "12.0 + 1.0*5.0");
        assert_eq!(float_literals(".5 + 1e-2"), "0.5 + 0.01");
        assert_eq!(float_literals("(-4) * x2"), "(-4.0) * x2");
        assert_eq!(float_literals("2nd_gear + 3"), "2nd_gear + 3.0");
    }

    #[test]
    fn literal_scan_rules() {
        assert_eq!(literal_at(b"1e-5+x", 0), Token::Number(4));
        assert_eq!(literal_at(b"2e-x", 0), Token::Word(2));
        assert_eq!(literal_at(b"gears2e-1", 0), Token::Word(7));
        assert_eq!(literal_at(b"2.5", 0), Token::Number(3));
        assert_eq!(literal_at(b"+", 0), Token::Other);
    }

    #[test]
    fn malformed_input_is_syntax_error() {
        for bad in ["12 +", "(1 + 2", "1 + 2)", "", "slider_speed * 2"] {
            assert!(
                matches!(evaluate(bad), Err(ScoutError::ExpressionSyntaxError { .. })),
                "{bad:?} should not evaluate"
            );
        }
    }

    #[test]
    fn division_by_zero_is_not_finite() {
        assert_eq!(
            evaluate("1 / 0"),
            Err(ScoutError::NonFiniteResult("1 / 0".into()))
        );
    }
}
