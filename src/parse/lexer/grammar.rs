use super::fragment::{alternative, composite, literal, optional, regex, sequence, Fragment};
use super::{emit, pop, push, skip, Grammar, GrammarBuilder, Lexer, StateStack};
use crate::ast::token::{Token, TokenType};

lazy_static! {
    /// The grammar of the language: code, string bodies, interpolation
    /// placeholders and braces nested inside placeholders.
    pub static ref REFERENCE: Grammar = reference_grammar();
}

/// Tokenizes `src` with the reference grammar.
pub fn tokenize(src: &str) -> Vec<Token> {
    Lexer::new(src, &REFERENCE).collect()
}

const OPERATORS: &[(&str, TokenType)] = &[
    ("==", TokenType::Equal),
    ("!=", TokenType::NotEqual),
    ("<=", TokenType::LessEqual),
    (">=", TokenType::GreaterEqual),
    ("&&", TokenType::And),
    ("||", TokenType::Or),
    ("+=", TokenType::PlusAssign),
    ("-=", TokenType::MinusAssign),
    ("*=", TokenType::TimesAssign),
    ("/=", TokenType::DivideAssign),
    ("%=", TokenType::RemainderAssign),
    ("=", TokenType::Assign),
    ("<", TokenType::Less),
    (">", TokenType::Greater),
    ("+", TokenType::Plus),
    ("-", TokenType::Minus),
    ("*", TokenType::Times),
    ("/", TokenType::Divide),
    ("%", TokenType::Remainder),
    ("!", TokenType::Not),
    ("(", TokenType::LeftParen),
    (")", TokenType::RightParen),
    ("{", TokenType::LeftBrace),
    ("}", TokenType::RightBrace),
    (",", TokenType::Comma),
    (";", TokenType::Semicolon),
    (":", TokenType::Colon),
    (".", TokenType::Dot),
];

/// Every fixed spelling of the reference grammar and the token type it
/// produces, keywords included.
pub fn fixed_tokens() -> Vec<(&'static str, TokenType)> {
    let keywords = [
        "import", "fun", "val", "var", "if", "else", "return", "true", "false", "as", "infix",
    ];
    let mut all = OPERATORS.to_vec();
    for kw in keywords.iter() {
        if let Some(ty) = TokenType::keyword(kw) {
            all.push((*kw, ty));
        }
    }
    all
}

fn digits() -> Fragment {
    regex("[0-9][0-9_]*")
}

fn fraction() -> Fragment {
    composite(literal("."), digits())
}

fn exponent() -> Fragment {
    composite(regex("[eE][+-]?"), digits())
}

fn identifier() -> Fragment {
    regex("[A-Za-z_][A-Za-z0-9_]*")
}

fn any_char() -> Fragment {
    regex("(?s).")
}

fn float_literal() -> Fragment {
    let mantissa = alternative(
        sequence(vec![digits(), fraction(), optional(exponent())]),
        composite(digits(), optional(exponent())),
    );
    composite(mantissa, regex("[fF]"))
}

fn double_literal() -> Fragment {
    alternative(
        sequence(vec![digits(), fraction(), optional(exponent())]),
        composite(digits(), exponent()),
    )
}

fn reference_grammar() -> Grammar {
    let mut g = GrammarBuilder::new();
    let code = g.declare("code");
    let string = g.declare("string");
    let template = g.declare("template");
    let brace = g.declare("brace");

    g.rule(code, regex(r"[ \t\r\n]+"), skip())
        .rule(code, regex(r"//[^\n]*"), skip())
        .rule(code, regex(r"/\*(?s:.)*?\*/"), skip())
        .rule(code, literal("\""), push(TokenType::StringStart, string))
        .rule(code, float_literal(), emit(TokenType::FloatLiteral))
        .rule(code, double_literal(), emit(TokenType::DoubleLiteral))
        .rule(code, composite(digits(), regex("[lL]")), emit(TokenType::LongLiteral))
        .rule(code, digits(), emit(TokenType::IntLiteral))
        .rule(
            code,
            composite(literal("'"), identifier()),
            emit(TokenType::SymbolLiteral),
        )
        .rule(
            code,
            identifier(),
            Box::new(|text: &str, _: &mut StateStack| {
                Some(TokenType::keyword(text).unwrap_or(TokenType::Identifier))
            }),
        );
    for (text, ty) in OPERATORS.iter() {
        g.rule(code, literal(*text), emit(*ty));
    }
    g.rule(code, any_char(), emit(TokenType::UnexpectedCharacter));

    g.rule(string, literal("\\{"), push(TokenType::TemplateStart, template))
        .rule(string, regex(r"\\u[0-9a-fA-F]{4}"), emit(TokenType::StringEscape))
        .rule(string, regex(r#"\\[ntr0\\"']"#), emit(TokenType::StringEscape))
        .rule(string, regex(r#"[^"\\]+"#), emit(TokenType::StringContent))
        .rule(string, literal("\""), pop(TokenType::StringEnd))
        .rule(string, any_char(), emit(TokenType::UnexpectedCharacter));

    // braces inside a placeholder have to balance before `}` can close it
    g.rule(template, literal("}"), pop(TokenType::TemplateEnd))
        .rule(template, literal("{"), push(TokenType::LeftBrace, brace))
        .extend(template, code);

    g.rule(brace, literal("}"), pop(TokenType::RightBrace))
        .rule(brace, literal("{"), push(TokenType::LeftBrace, brace))
        .extend(brace, code);

    g.build(code)
}
