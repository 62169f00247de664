use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::token::TokenType;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Symbol(String),
}

impl Literal {
    /// Converts the text of a literal token into its value. The message of the
    /// error is meant for a syntax diagnostic.
    pub fn from_token(ty: TokenType, text: &str) -> Result<Literal, String> {
        let number = |suffix_len: usize| -> String {
            text[..text.len() - suffix_len]
                .chars()
                .filter(|c| *c != '_')
                .collect()
        };

        Ok(match ty {
            TokenType::True => Literal::Boolean(true),
            TokenType::False => Literal::Boolean(false),
            TokenType::IntLiteral => number(0)
                .parse::<i32>()
                .map(Literal::Int)
                .map_err(|_| format!("integer literal `{}` is out of range", text))?,
            TokenType::LongLiteral => number(1)
                .parse::<i64>()
                .map(Literal::Long)
                .map_err(|_| format!("long literal `{}` is out of range", text))?,
            TokenType::FloatLiteral => {
                let value = number(1)
                    .parse::<f32>()
                    .map_err(|e| format!("invalid float literal `{}`: {}", text, e))?;
                if value.is_infinite() {
                    return Err(format!("float literal `{}` is out of range", text));
                }
                Literal::Float(value)
            }
            TokenType::DoubleLiteral => {
                let value = number(0)
                    .parse::<f64>()
                    .map_err(|e| format!("invalid double literal `{}`: {}", text, e))?;
                if value.is_infinite() {
                    return Err(format!("double literal `{}` is out of range", text));
                }
                Literal::Double(value)
            }
            TokenType::SymbolLiteral => Literal::Symbol(text.trim_start_matches('\'').to_string()),
            _ => return Err(format!("{} is not a literal", ty)),
        })
    }
}

/// The character an escape sequence inside a string literal stands for.
pub fn decode_escape(text: &str) -> Option<char> {
    let rest = text.strip_prefix('\\')?;
    if let Some(hex) = rest.strip_prefix('u') {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }

    Some(match rest {
        "n" => '\n',
        "t" => '\t',
        "r" => '\r',
        "0" => '\0',
        "\\" => '\\',
        "\"" => '"',
        "'" => '\'',
        _ => return None,
    })
}

/// Writes `s` as the body of a string literal, escaping what has to be.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if c.is_control() && (c as u32) <= 0xFFFF => {
                out.push_str(&format!("\\u{:04x}", c as u32))
            }
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Long(l) => write!(f, "{}L", l),
            Literal::Float(x) => write!(f, "{:?}f", x),
            Literal::Double(x) => write!(f, "{:?}", x),
            Literal::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Literal::Symbol(s) => write!(f, "'{}", s),
        }
    }
}
