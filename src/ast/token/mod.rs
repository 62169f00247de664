mod stream;

pub use stream::TokenStream;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

bitflags::bitflags! {
    /// Capability tags attached to every [`TokenType`].
    ///
    /// The parser never asks "which variant is this" when it only needs to
    /// know what a token can do: precedence lookup, identifier-like positions
    /// and the synchronization points of error recovery are all expressed as
    /// membership tests against these bits.
    pub struct Category: u16 {
        const SEPARATOR       = 1 << 0;
        const ASSIGNMENT      = 1 << 1;
        const OPERATOR        = 1 << 2;
        const LITERAL         = 1 << 3;
        /// Part of a string literal (start, content, escapes, templates, end).
        const STRING          = 1 << 4;
        /// Can stand where a name is expected.
        const IDENTIFIER_LIKE = 1 << 5;
        const KEYWORD         = 1 << 6;
        /// Keywords that are only special in some positions.
        const SOFT_KEYWORD    = 1 << 7;
        /// Can start a top-level construct.
        const TOP_LEVEL_START = 1 << 8;
        /// Can start a statement inside a block.
        const BLOCK_START     = 1 << 9;
        /// Recovery stops here while inside a string literal.
        const STRING_SYNC     = 1 << 10;
        /// Produced by the lexer for input it could not recognize.
        const ERROR           = 1 << 11;
        const END             = 1 << 12;
    }
}

impl Category {
    pub fn desc(&self) -> String {
        let names = [
            (Category::IDENTIFIER_LIKE, "identifier"),
            (Category::LITERAL, "literal"),
            (Category::ASSIGNMENT, "assignment operator"),
            (Category::OPERATOR, "operator"),
            (Category::SEPARATOR, "separator"),
            (Category::STRING, "string"),
            (Category::KEYWORD, "keyword"),
            (Category::SOFT_KEYWORD, "soft keyword"),
            (Category::TOP_LEVEL_START, "declaration"),
            (Category::BLOCK_START, "statement"),
            (Category::STRING_SYNC, "end of string part"),
            (Category::ERROR, "invalid input"),
            (Category::END, "end of file"),
        ];

        let found = names
            .iter()
            .filter(|(c, _)| self.intersects(*c))
            .map(|(_, n)| *n)
            .collect::<Vec<_>>();
        if found.is_empty() {
            str!("nothing")
        } else {
            found.join(" or ")
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenType {
    // separators
    /// (
    LeftParen,
    /// )
    RightParen,
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// :
    Colon,
    /// .
    Dot,

    // assignment
    /// =
    Assign,
    /// +=
    PlusAssign,
    /// -=
    MinusAssign,
    /// *=
    TimesAssign,
    /// /=
    DivideAssign,
    /// %=
    RemainderAssign,

    // arithmetic
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Times,
    /// /
    Divide,
    /// %
    Remainder,

    // equality and comparison
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// <
    Less,
    /// <=
    LessEqual,
    /// >
    Greater,
    /// >=
    GreaterEqual,

    // logical
    /// &&
    And,
    /// ||
    Or,
    /// !
    Not,

    // literals
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    SymbolLiteral,
    /// true
    True,
    /// false
    False,

    // strings
    StringStart,
    StringContent,
    StringEscape,
    TemplateStart,
    TemplateEnd,
    StringEnd,

    Identifier,

    // keywords
    /// import
    Import,
    /// fun
    Fun,
    /// val
    Val,
    /// var
    Var,
    /// if
    If,
    /// else
    Else,
    /// return
    Return,

    // soft keywords
    /// as
    As,
    /// infix
    Infix,

    UnexpectedCharacter,
    EndOfFile,
}

impl TokenType {
    pub fn categories(self) -> Category {
        use TokenType::*;
        match self {
            LeftBrace => Category::SEPARATOR,
            LeftParen | RightParen | RightBrace | Comma | Colon | Dot => Category::SEPARATOR,
            Semicolon => Category::SEPARATOR,
            Assign | PlusAssign | MinusAssign | TimesAssign | DivideAssign | RemainderAssign => {
                Category::ASSIGNMENT | Category::OPERATOR
            }
            Plus | Minus | Times | Divide | Remainder | Equal | NotEqual | Less | LessEqual
            | Greater | GreaterEqual | And | Or | Not => Category::OPERATOR,
            IntLiteral | LongLiteral | FloatLiteral | DoubleLiteral | SymbolLiteral => {
                Category::LITERAL
            }
            True | False => Category::LITERAL | Category::KEYWORD,
            StringStart | StringContent | StringEscape | TemplateStart => Category::STRING,
            TemplateEnd | StringEnd => Category::STRING | Category::STRING_SYNC,
            Identifier => Category::IDENTIFIER_LIKE,
            Import | Fun => Category::KEYWORD | Category::TOP_LEVEL_START,
            Val | Var | Return | If => Category::KEYWORD | Category::BLOCK_START,
            Else => Category::KEYWORD,
            As => Category::SOFT_KEYWORD | Category::IDENTIFIER_LIKE,
            Infix => {
                Category::SOFT_KEYWORD | Category::IDENTIFIER_LIKE | Category::TOP_LEVEL_START
            }
            UnexpectedCharacter => Category::ERROR,
            EndOfFile => Category::END,
        }
    }

    pub fn is(self, category: Category) -> bool {
        self.categories().intersects(category)
    }

    /// Keywords and soft keywords spelled `text`, if any.
    pub fn keyword(text: &str) -> Option<TokenType> {
        Some(match text {
            "import" => TokenType::Import,
            "fun" => TokenType::Fun,
            "val" => TokenType::Val,
            "var" => TokenType::Var,
            "if" => TokenType::If,
            "else" => TokenType::Else,
            "return" => TokenType::Return,
            "true" => TokenType::True,
            "false" => TokenType::False,
            "as" => TokenType::As,
            "infix" => TokenType::Infix,
            _ => return None,
        })
    }

    /// How the token type is named in diagnostics.
    pub fn desc(self) -> &'static str {
        use TokenType::*;
        match self {
            LeftParen => "`(`",
            RightParen => "`)`",
            LeftBrace => "`{`",
            RightBrace => "`}`",
            Comma => "`,`",
            Semicolon => "`;`",
            Colon => "`:`",
            Dot => "`.`",
            Assign => "`=`",
            PlusAssign => "`+=`",
            MinusAssign => "`-=`",
            TimesAssign => "`*=`",
            DivideAssign => "`/=`",
            RemainderAssign => "`%=`",
            Plus => "`+`",
            Minus => "`-`",
            Times => "`*`",
            Divide => "`/`",
            Remainder => "`%`",
            Equal => "`==`",
            NotEqual => "`!=`",
            Less => "`<`",
            LessEqual => "`<=`",
            Greater => "`>`",
            GreaterEqual => "`>=`",
            And => "`&&`",
            Or => "`||`",
            Not => "`!`",
            IntLiteral => "integer",
            LongLiteral => "long integer",
            FloatLiteral => "float",
            DoubleLiteral => "double",
            SymbolLiteral => "symbol",
            True => "`true`",
            False => "`false`",
            StringStart => "`\"`",
            StringContent => "string content",
            StringEscape => "escape sequence",
            TemplateStart => "`\\{`",
            TemplateEnd => "`}`",
            StringEnd => "`\"`",
            Identifier => "identifier",
            Import => "`import`",
            Fun => "`fun`",
            Val => "`val`",
            Var => "`var`",
            If => "`if`",
            Else => "`else`",
            Return => "`return`",
            As => "`as`",
            Infix => "`infix`",
            UnexpectedCharacter => "unexpected character",
            EndOfFile => "end of file",
        }
    }

    /// Message for a token of an error type that showed up where something
    /// else was expected. `None` for types outside [`Category::ERROR`].
    pub fn unexpected_message(self, text: &str) -> Option<String> {
        match self {
            TokenType::UnexpectedCharacter => {
                let ch = text.chars().next().unwrap_or('\0');
                Some(format!(
                    "unexpected character `{}` ({})",
                    ch.escape_default(),
                    char_name(ch)
                ))
            }
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.desc())
    }
}

fn char_name(ch: char) -> String {
    let name = match ch {
        '!' => "EXCLAMATION MARK",
        '"' => "QUOTATION MARK",
        '#' => "NUMBER SIGN",
        '$' => "DOLLAR SIGN",
        '&' => "AMPERSAND",
        '\'' => "APOSTROPHE",
        '?' => "QUESTION MARK",
        '@' => "COMMERCIAL AT",
        '[' => "LEFT SQUARE BRACKET",
        '\\' => "REVERSE SOLIDUS",
        ']' => "RIGHT SQUARE BRACKET",
        '^' => "CIRCUMFLEX ACCENT",
        '`' => "GRAVE ACCENT",
        '|' => "VERTICAL LINE",
        '~' => "TILDE",
        '\t' => "CHARACTER TABULATION",
        '\0' => "NULL",
        _ => "",
    };

    let code = format!("U+{:04X}", ch as u32);
    if name.is_empty() {
        code
    } else {
        format!("{} {}", code, name)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub ty: TokenType,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(ty: TokenType, text: impl Into<String>, span: Span) -> Token {
        Token {
            ty,
            text: text.into(),
            span,
        }
    }

    pub fn is(&self, category: Category) -> bool {
        self.ty.is(category)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.ty {
            TokenType::EndOfFile => write!(f, "end of file"),
            _ => write!(f, "{}", self.text),
        }
    }
}

#[cfg(test)]
mod token_tests {
    use super::{Category, TokenType};

    #[test]
    fn keywords_and_soft_keywords() {
        assert_eq!(TokenType::keyword("fun"), Some(TokenType::Fun));
        assert_eq!(TokenType::keyword("as"), Some(TokenType::As));
        assert_eq!(TokenType::keyword("funny"), None);

        assert!(TokenType::As.is(Category::IDENTIFIER_LIKE));
        assert!(TokenType::As.is(Category::SOFT_KEYWORD));
        assert!(!TokenType::Fun.is(Category::IDENTIFIER_LIKE));
    }

    #[test]
    fn synchronization_categories() {
        assert!(TokenType::Fun.is(Category::TOP_LEVEL_START));
        assert!(TokenType::Import.is(Category::TOP_LEVEL_START));
        assert!(TokenType::Val.is(Category::BLOCK_START));
        assert!(TokenType::Return.is(Category::BLOCK_START));
        assert!(TokenType::StringEnd.is(Category::STRING_SYNC));
        assert!(TokenType::TemplateEnd.is(Category::STRING_SYNC));
        assert!(!TokenType::StringContent.is(Category::STRING_SYNC));
    }

    #[test]
    fn error_tokens_format_their_own_message() {
        let msg = TokenType::UnexpectedCharacter
            .unexpected_message("#")
            .unwrap();
        assert_eq!(msg, "unexpected character `#` (U+0023 NUMBER SIGN)");
        assert_eq!(TokenType::Plus.unexpected_message("+"), None);
    }

    #[test]
    fn category_description() {
        assert_eq!(Category::IDENTIFIER_LIKE.desc(), "identifier");
        assert_eq!(Category::empty().desc(), "nothing");
    }
}
