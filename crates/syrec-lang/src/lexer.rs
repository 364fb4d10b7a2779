//! Lexer for SyReC.

use logos::Logos;

/// Tokens for SyReC.
///
/// Semicolons are optional statement separators and are skipped like
/// whitespace.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n;]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("module")]
    Module,

    #[token("in")]
    In,

    #[token("out")]
    Out,

    #[token("inout")]
    Inout,

    #[token("wire")]
    Wire,

    #[token("state")]
    State,

    #[token("if")]
    If,

    #[token("then")]
    Then,

    #[token("else")]
    Else,

    #[token("fi")]
    Fi,

    #[token("for")]
    For,

    #[token("to")]
    To,

    #[token("step")]
    Step,

    #[token("do")]
    Do,

    #[token("rof")]
    Rof,

    #[token("call")]
    Call,

    #[token("uncall")]
    Uncall,

    #[token("skip")]
    Skip,

    // Literals
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("<=>")]
    SwapOp,

    #[token("~")]
    Tilde,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("^")]
    Caret,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("&&")]
    And,

    #[token("||")]
    Or,

    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("=")]
    Eq,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<<")]
    LShift,

    #[token(">>")]
    RShift,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token("#")]
    Hash,

    #[token("$")]
    Dollar,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Module => write!(f, "module"),
            Token::In => write!(f, "in"),
            Token::Out => write!(f, "out"),
            Token::Inout => write!(f, "inout"),
            Token::Wire => write!(f, "wire"),
            Token::State => write!(f, "state"),
            Token::If => write!(f, "if"),
            Token::Then => write!(f, "then"),
            Token::Else => write!(f, "else"),
            Token::Fi => write!(f, "fi"),
            Token::For => write!(f, "for"),
            Token::To => write!(f, "to"),
            Token::Step => write!(f, "step"),
            Token::Do => write!(f, "do"),
            Token::Rof => write!(f, "rof"),
            Token::Call => write!(f, "call"),
            Token::Uncall => write!(f, "uncall"),
            Token::Skip => write!(f, "skip"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::SwapOp => write!(f, "<=>"),
            Token::Tilde => write!(f, "~"),
            Token::PlusPlus => write!(f, "++"),
            Token::MinusMinus => write!(f, "--"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Caret => write!(f, "^"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::And => write!(f, "&&"),
            Token::Or => write!(f, "||"),
            Token::Ampersand => write!(f, "&"),
            Token::Pipe => write!(f, "|"),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::Eq => write!(f, "="),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::LShift => write!(f, "<<"),
            Token::RShift => write!(f, ">>"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Colon => write!(f, ":"),
            Token::Hash => write!(f, "#"),
            Token::Dollar => write!(f, "$"),
        }
    }
}

/// A token with its span and source line.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    #[allow(dead_code)]
    pub span: std::ops::Range<usize>,
    pub line: usize,
}

/// A lexer failure: source line and message.
pub type LexError = (usize, String);

/// Tokenize a SyReC source string.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, LexError>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut counted = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        line += source[counted..span.start].matches('\n').count();
        counted = span.start;

        if let Ok(token) = result {
            tokens.push(Ok(SpannedToken { token, span, line }));
        } else {
            let slice = &source[span.clone()];
            tokens.push(Err((line, format!("Invalid token: '{slice}'"))));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<SpannedToken> {
        tokenize(source).into_iter().filter_map(Result::ok).collect()
    }

    #[test]
    fn test_module_header() {
        let tokens = tokens("module main(in a(4), out b[2](8))");

        assert_eq!(tokens[0].token, Token::Module);
        assert!(matches!(tokens[1].token, Token::Identifier(ref s) if s == "main"));
        assert_eq!(tokens[2].token, Token::LParen);
        assert_eq!(tokens[3].token, Token::In);
        assert!(matches!(tokens[6].token, Token::IntLiteral(4)));
        assert_eq!(tokens[9].token, Token::Out);
        assert_eq!(tokens[11].token, Token::LBracket);
    }

    #[test]
    fn test_operators() {
        let tokens = tokens("a <=> b ++= c (d <= e) (f << 2) x += (y == z)");
        let kinds: Vec<_> = tokens.iter().map(|t| t.token.clone()).collect();

        assert!(kinds.contains(&Token::SwapOp));
        assert!(kinds.contains(&Token::PlusPlus));
        assert!(kinds.contains(&Token::LtEq));
        assert!(kinds.contains(&Token::LShift));
        assert!(kinds.contains(&Token::EqEq));
        assert!(!kinds.contains(&Token::Lt));
    }

    #[test]
    fn test_comments_and_semicolons_skipped() {
        let tokens = tokens("skip; // trailing\n/* block\ncomment */ skip");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.token == Token::Skip));
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokens("module m()\n\n  skip\n// note\nskip");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[4].line, 3);
        assert_eq!(tokens[5].line, 5);
    }

    #[test]
    fn test_invalid_token() {
        let results = tokenize("a += @");
        assert!(matches!(results.last(), Some(Err((1, _)))));
    }
}
