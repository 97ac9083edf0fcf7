//! Conditional expression evaluator
//!
//! Evaluates the integer expressions of `#if`/`#elif` directives:
//! `defined(NAME)`, decimal/hex literals, unary `! - + ~`, arithmetic,
//! shifts, comparisons, bitwise and logical operators, parentheses.
//! C truthiness applies throughout (nonzero = true). Identifiers are
//! resolved through the macro table; an identifier that is undefined, or
//! defined with empty replacement, evaluates to 0 as a C preprocessor
//! does.
//!
//! Errors are plain messages; the engine attaches the source line number.

use crate::macros::MacroTable;

/// Substitution depth bound for macros whose replacement is itself an
/// expression referencing other macros
const MAX_SUBST_DEPTH: usize = 16;

/// Evaluate a conditional expression to its C truth value
pub fn eval_condition(expr: &str, macros: &MacroTable) -> Result<bool, String> {
    Ok(eval(expr, macros)? != 0)
}

/// Evaluate a conditional expression to an integer
pub fn eval(expr: &str, macros: &MacroTable) -> Result<i64, String> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        macros,
        depth: 0,
    };
    let value = parser.expression(0)?;
    match parser.peek() {
        None => Ok(value),
        Some(tok) => Err(format!("unexpected trailing token {tok}")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Int(i64),
    Ident(String),
    Op(&'static str),
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{n}"),
            Token::Ident(name) => write!(f, "{name:?}"),
            Token::Op(op) => write!(f, "{op:?}"),
            Token::LParen => write!(f, "\"(\""),
            Token::RParen => write!(f, "\")\""),
        }
    }
}

fn tokenize(expr: &str) -> Result<Vec<Token>, String> {
    let bytes = expr.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' => {
                let start = i;
                let hex = expr[i..].starts_with("0x") || expr[i..].starts_with("0X");
                if hex {
                    i += 2;
                }
                while i < bytes.len() && (bytes[i] as char).is_ascii_alphanumeric() {
                    i += 1;
                }
                let raw = &expr[start..i];
                // Strip integer suffixes (1U, 0x10L, ...)
                let digits = raw.trim_end_matches(['u', 'U', 'l', 'L']);
                let value = if hex {
                    i64::from_str_radix(&digits[2..], 16)
                } else {
                    digits.parse()
                };
                match value {
                    Ok(n) => tokens.push(Token::Int(n)),
                    Err(_) => return Err(format!("malformed integer literal {raw:?}")),
                }
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start = i;
                while i < bytes.len()
                    && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push(Token::Ident(expr[start..i].to_string()));
            }
            _ => {
                // Longest-match operator scan
                let op: &'static str = match expr.get(i..i + 2) {
                    Some("&&") => "&&",
                    Some("||") => "||",
                    Some("==") => "==",
                    Some("!=") => "!=",
                    Some("<=") => "<=",
                    Some(">=") => ">=",
                    Some("<<") => "<<",
                    Some(">>") => ">>",
                    _ => match c {
                        '!' => "!",
                        '~' => "~",
                        '<' => "<",
                        '>' => ">",
                        '&' => "&",
                        '|' => "|",
                        '^' => "^",
                        '+' => "+",
                        '-' => "-",
                        '*' => "*",
                        '/' => "/",
                        '%' => "%",
                        _ => return Err(format!("unexpected character {c:?}")),
                    },
                };
                i += op.len();
                tokens.push(Token::Op(op));
            }
        }
    }

    Ok(tokens)
}

/// Binding power of a binary operator, C precedence order
fn precedence(op: &str) -> Option<u8> {
    match op {
        "*" | "/" | "%" => Some(10),
        "+" | "-" => Some(9),
        "<<" | ">>" => Some(8),
        "<" | "<=" | ">" | ">=" => Some(7),
        "==" | "!=" => Some(6),
        "&" => Some(5),
        "^" => Some(4),
        "|" => Some(3),
        "&&" => Some(2),
        "||" => Some(1),
        _ => None,
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    macros: &'a MacroTable,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect_rparen(&mut self) -> Result<(), String> {
        match self.next() {
            Some(Token::RParen) => Ok(()),
            Some(tok) => Err(format!("expected \")\", found {tok}")),
            None => Err("expected \")\"".to_string()),
        }
    }

    /// Precedence-climbing expression parser
    fn expression(&mut self, min_prec: u8) -> Result<i64, String> {
        let mut lhs = self.primary()?;

        while let Some(Token::Op(op)) = self.peek() {
            let op = *op;
            let prec = match precedence(op) {
                Some(p) if p >= min_prec => p,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.expression(prec + 1)?;
            lhs = apply(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn primary(&mut self) -> Result<i64, String> {
        match self.next() {
            Some(Token::Int(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expression(0)?;
                self.expect_rparen()?;
                Ok(value)
            }
            Some(Token::Op("!")) => Ok((self.primary()? == 0) as i64),
            Some(Token::Op("~")) => Ok(!self.primary()?),
            Some(Token::Op("-")) => Ok(self.primary()?.wrapping_neg()),
            Some(Token::Op("+")) => self.primary(),
            Some(Token::Ident(name)) if name == "defined" => {
                let defined = match self.next() {
                    Some(Token::LParen) => {
                        let inner = match self.next() {
                            Some(Token::Ident(inner)) => inner,
                            other => {
                                return Err(format!(
                                    "defined() requires a macro name, found {}",
                                    display_opt(other)
                                ))
                            }
                        };
                        self.expect_rparen()?;
                        inner
                    }
                    Some(Token::Ident(inner)) => inner,
                    other => {
                        return Err(format!(
                            "defined requires a macro name, found {}",
                            display_opt(other)
                        ))
                    }
                };
                Ok(self.macros.is_defined(&defined) as i64)
            }
            Some(Token::Ident(name)) => self.identifier(&name),
            Some(tok) => Err(format!("unexpected token {tok}")),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    /// Resolve an identifier operand through the macro table
    ///
    /// The replacement text may itself be an expression over further
    /// macros (e.g. `GLFW_VERSION_COMBINED`), so it is evaluated
    /// recursively under a depth bound. Undefined and empty-valued
    /// identifiers evaluate to 0.
    fn identifier(&mut self, name: &str) -> Result<i64, String> {
        match self.macros.get(name) {
            Some(Some(replacement)) => {
                if self.depth >= MAX_SUBST_DEPTH {
                    return Err(format!("macro substitution too deep at {name:?}"));
                }
                let tokens = tokenize(replacement)?;
                if tokens.is_empty() {
                    return Ok(0);
                }
                let mut inner = Parser {
                    tokens,
                    pos: 0,
                    macros: self.macros,
                    depth: self.depth + 1,
                };
                let value = inner.expression(0)?;
                match inner.peek() {
                    None => Ok(value),
                    Some(tok) => Err(format!(
                        "unexpected trailing token {tok} in replacement of {name:?}"
                    )),
                }
            }
            Some(None) | None => Ok(0),
        }
    }
}

fn display_opt(tok: Option<Token>) -> String {
    match tok {
        Some(tok) => tok.to_string(),
        None => "end of expression".to_string(),
    }
}

fn apply(op: &str, lhs: i64, rhs: i64) -> Result<i64, String> {
    let value = match op {
        "*" => lhs.wrapping_mul(rhs),
        "/" => {
            if rhs == 0 {
                return Err("division by zero".to_string());
            }
            lhs.wrapping_div(rhs)
        }
        "%" => {
            if rhs == 0 {
                return Err("division by zero".to_string());
            }
            lhs.wrapping_rem(rhs)
        }
        "+" => lhs.wrapping_add(rhs),
        "-" => lhs.wrapping_sub(rhs),
        "<<" => lhs.wrapping_shl(rhs as u32),
        ">>" => lhs.wrapping_shr(rhs as u32),
        "<" => (lhs < rhs) as i64,
        "<=" => (lhs <= rhs) as i64,
        ">" => (lhs > rhs) as i64,
        ">=" => (lhs >= rhs) as i64,
        "==" => (lhs == rhs) as i64,
        "!=" => (lhs != rhs) as i64,
        "&" => lhs & rhs,
        "^" => lhs ^ rhs,
        "|" => lhs | rhs,
        "&&" => ((lhs != 0) && (rhs != 0)) as i64,
        "||" => ((lhs != 0) || (rhs != 0)) as i64,
        _ => return Err(format!("unknown operator {op:?}")),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(defs: &[(&str, Option<&str>)]) -> MacroTable {
        let mut table = MacroTable::new();
        for (name, value) in defs {
            table.define(name, *value).unwrap();
        }
        table
    }

    #[test]
    fn test_integer_literals() {
        let m = MacroTable::new();
        assert_eq!(eval("42", &m).unwrap(), 42);
        assert_eq!(eval("0x10", &m).unwrap(), 16);
        assert_eq!(eval("1U", &m).unwrap(), 1);
        assert_eq!(eval("0", &m).unwrap(), 0);
    }

    #[test]
    fn test_defined_operator() {
        let m = table(&[("FOO", None), ("BAR", Some("7"))]);
        assert_eq!(eval("defined(FOO)", &m).unwrap(), 1);
        assert_eq!(eval("defined FOO", &m).unwrap(), 1);
        assert_eq!(eval("defined(BAZ)", &m).unwrap(), 0);
        assert_eq!(eval("defined(FOO) && defined(BAR)", &m).unwrap(), 1);
        assert_eq!(eval("!defined(BAZ)", &m).unwrap(), 1);
    }

    #[test]
    fn test_identifier_substitution() {
        let m = table(&[
            ("MAJOR", Some("3")),
            ("MINOR", Some("3")),
            ("COMBINED", Some("MAJOR * 100 + MINOR")),
            ("EMPTY", None),
        ]);
        assert_eq!(eval("MAJOR", &m).unwrap(), 3);
        assert_eq!(eval("COMBINED", &m).unwrap(), 303);
        assert_eq!(eval("COMBINED >= 303", &m).unwrap(), 1);
        // Undefined and empty identifiers behave like 0
        assert_eq!(eval("EMPTY", &m).unwrap(), 0);
        assert_eq!(eval("NOT_DEFINED", &m).unwrap(), 0);
    }

    #[test]
    fn test_precedence_and_grouping() {
        let m = MacroTable::new();
        assert_eq!(eval("2 + 3 * 4", &m).unwrap(), 14);
        assert_eq!(eval("(2 + 3) * 4", &m).unwrap(), 20);
        assert_eq!(eval("1 << 4 | 1", &m).unwrap(), 17);
        assert_eq!(eval("1 + 1 == 2 && 3 > 2", &m).unwrap(), 1);
        assert_eq!(eval("0 || 1 && 0", &m).unwrap(), 0);
        assert_eq!(eval("-3 + 5", &m).unwrap(), 2);
        assert_eq!(eval("!0", &m).unwrap(), 1);
    }

    #[test]
    fn test_self_referential_macro_is_bounded() {
        let m = table(&[("LOOP", Some("LOOP + 1"))]);
        assert!(eval("LOOP", &m).is_err());
    }

    #[test]
    fn test_malformed_expressions() {
        let m = MacroTable::new();
        assert!(eval("", &m).is_err());
        assert!(eval("1 +", &m).is_err());
        assert!(eval("(1", &m).is_err());
        assert!(eval("1 2", &m).is_err());
        assert!(eval("defined()", &m).is_err());
        assert!(eval("1 / 0", &m).is_err());
        assert!(eval("@", &m).is_err());
    }
}
