//! Parser for SyReC.
//!
//! A recursive-descent parser over the token stream that also performs the
//! semantic checks needed to hand a well-formed AST to synthesis: declared
//! names, index counts, constant ranges, bit-widths and call signatures.

mod expression;
mod statement;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ast::{Module, Program, Variable, VariableType};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Settings for reading SyReC source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadSettings {
    /// Bit-width of variables declared without `(n)`.
    pub default_bitwidth: u32,
}

impl Default for ReadSettings {
    fn default() -> Self {
        Self {
            default_bitwidth: 32,
        }
    }
}

impl ReadSettings {
    /// Create default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default bit-width.
    #[must_use]
    pub fn with_default_bitwidth(mut self, bitwidth: u32) -> Self {
        self.default_bitwidth = bitwidth;
        self
    }
}

/// Parse a SyReC source string with default settings.
pub fn parse(source: &str) -> ParseResult<Program> {
    parse_with_settings(source, &ReadSettings::default())
}

/// Parse a SyReC source string.
pub fn parse_with_settings(source: &str, settings: &ReadSettings) -> ParseResult<Program> {
    let mut parser = Parser::new(source, settings.clone())?;
    parser.parse_program()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) line: usize,
    pub(super) settings: ReadSettings,
    /// Modules parsed so far; calls may only target these.
    pub(super) modules: Vec<Module>,
    /// Parameters and locals of the module being parsed.
    pub(super) scope: FxHashMap<String, Variable>,
    /// Loop variables of the enclosing `for` statements.
    pub(super) loop_variables: Vec<String>,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str, settings: ReadSettings) -> ParseResult<Self> {
        let mut tokens = Vec::new();

        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((line, message)) => {
                    return Err(ParseError::LexerError { line, message });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            line: 1,
            settings,
            modules: vec![],
            scope: FxHashMap::default(),
            loop_variables: vec![],
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.peek_at(0)
    }

    /// Peek `offset` tokens ahead.
    pub(super) fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let spanned = self.tokens.get(self.pos)?;
        self.line = spanned.line;
        self.pos += 1;
        Some(spanned.token.clone())
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(expected.to_string()))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(self.unexpected(&expected.to_string(), &found));
        }
        Ok(())
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Build an unexpected-token error at the current line.
    pub(super) fn unexpected(&self, expected: &str, found: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            line: self.line,
            expected: expected.into(),
            found: found.to_string(),
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<Program> {
        if self.is_eof() {
            return Err(ParseError::UnexpectedEof("module".into()));
        }

        while !self.is_eof() {
            let module = self.parse_module()?;
            self.modules.push(module);
        }

        Ok(Program {
            modules: std::mem::take(&mut self.modules),
        })
    }

    /// Parse a module declaration.
    fn parse_module(&mut self) -> ParseResult<Module> {
        self.expect(Token::Module)?;
        let name = self.parse_identifier()?;
        if self.modules.iter().any(|m| m.name == name) {
            return Err(ParseError::DuplicateDeclaration {
                line: self.line,
                name,
            });
        }

        self.scope.clear();
        self.loop_variables.clear();
        let mut module = Module::new(name);

        self.expect(Token::LParen)?;
        if !self.check(&Token::RParen) {
            loop {
                let parameter = self.parse_parameter()?;
                self.declare(&parameter)?;
                module.parameters.push(parameter);
                if !self.consume(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RParen)?;

        while let Some(ty) = self.peek().and_then(local_type) {
            self.advance();
            loop {
                let variable = self.parse_declaration(ty)?;
                self.declare(&variable)?;
                module.variables.push(variable);
                if !self.consume(&Token::Comma) {
                    break;
                }
            }
        }

        module.statements = self.parse_statements()?;
        Ok(module)
    }

    /// Parse a module parameter: `in|out|inout decl`.
    fn parse_parameter(&mut self) -> ParseResult<Variable> {
        let ty = match self.advance() {
            Some(Token::In) => VariableType::In,
            Some(Token::Out) => VariableType::Out,
            Some(Token::Inout) => VariableType::Inout,
            Some(other) => return Err(self.unexpected("parameter type", &other)),
            None => return Err(ParseError::UnexpectedEof("parameter".into())),
        };
        self.parse_declaration(ty)
    }

    /// Parse `name ([n])* [(bitwidth)]`.
    fn parse_declaration(&mut self, ty: VariableType) -> ParseResult<Variable> {
        let name = self.parse_identifier()?;

        let mut dimensions = vec![];
        while self.consume(&Token::LBracket) {
            dimensions.push(self.parse_u32("array dimension")?);
            self.expect(Token::RBracket)?;
        }

        let bitwidth = if self.consume(&Token::LParen) {
            let bitwidth = self.parse_u32("bit-width")?;
            self.expect(Token::RParen)?;
            bitwidth
        } else {
            self.settings.default_bitwidth
        };

        Ok(Variable::new(name, ty, bitwidth).with_dimensions(dimensions))
    }

    /// Add a variable to the module scope.
    fn declare(&mut self, variable: &Variable) -> ParseResult<()> {
        if self.scope.contains_key(&variable.name) {
            return Err(ParseError::DuplicateDeclaration {
                line: self.line,
                name: variable.name.clone(),
            });
        }
        self.scope.insert(variable.name.clone(), variable.clone());
        Ok(())
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            Some(other) => Err(self.unexpected("identifier", &other)),
            None => Err(ParseError::UnexpectedEof("identifier".into())),
        }
    }

    /// Parse a positive integer that fits in `u32`.
    fn parse_u32(&mut self, what: &str) -> ParseResult<u32> {
        let value = match self.advance() {
            Some(Token::IntLiteral(v)) => v,
            Some(other) => return Err(self.unexpected(what, &other)),
            None => return Err(ParseError::UnexpectedEof(what.into())),
        };
        match u32::try_from(value) {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(ParseError::InvalidNumber {
                line: self.line,
                message: format!("{what} must be between 1 and {}, got {value}", u32::MAX),
            }),
        }
    }
}

fn local_type(token: &Token) -> Option<VariableType> {
    match token {
        Token::Wire => Some(VariableType::Wire),
        Token::State => Some(VariableType::State),
        _ => None,
    }
}
