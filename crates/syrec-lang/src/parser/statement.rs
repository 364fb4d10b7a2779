//! Statement parsing for SyReC.

use super::Parser;
use crate::ast::{AssignOp, Expression, Number, Statement, UnaryOp, VariableAccess};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Whether the current token can start a statement.
    fn starts_statement(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Identifier(_)
                    | Token::Tilde
                    | Token::PlusPlus
                    | Token::MinusMinus
                    | Token::If
                    | Token::For
                    | Token::Call
                    | Token::Uncall
                    | Token::Skip
            )
        )
    }

    /// Parse one or more statements.
    pub(super) fn parse_statements(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = vec![self.parse_statement()?];
        while self.starts_statement() {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Tilde | Token::PlusPlus | Token::MinusMinus => self.parse_unary(),
            Token::If => self.parse_if(),
            Token::For => self.parse_for(),
            Token::Call | Token::Uncall => self.parse_call(),
            Token::Skip => {
                self.advance();
                Ok(Statement::Skip)
            }
            Token::Identifier(_) => self.parse_swap_or_assign(),
            _ => {
                self.advance();
                Err(self.unexpected("statement", &token))
            }
        }
    }

    /// Parse `~= var`, `++= var` or `--= var`.
    fn parse_unary(&mut self) -> ParseResult<Statement> {
        let op = match self.advance() {
            Some(Token::Tilde) => UnaryOp::Invert,
            Some(Token::PlusPlus) => UnaryOp::Increment,
            Some(Token::MinusMinus) => UnaryOp::Decrement,
            Some(other) => return Err(self.unexpected("unary operator", &other)),
            None => return Err(ParseError::UnexpectedEof("unary operator".into())),
        };
        self.expect(Token::Eq)?;
        let var = self.parse_variable_access()?;
        Ok(Statement::Unary { op, var })
    }

    /// Parse `a <=> b` or `a op= expr`.
    fn parse_swap_or_assign(&mut self) -> ParseResult<Statement> {
        let lhs = self.parse_variable_access()?;

        if self.consume(&Token::SwapOp) {
            let rhs = self.parse_variable_access()?;
            if lhs.has_static_bitwidth()
                && rhs.has_static_bitwidth()
                && lhs.bitwidth() != rhs.bitwidth()
            {
                return Err(ParseError::WidthMismatch {
                    line: self.line,
                    lhs: lhs.bitwidth(),
                    rhs: rhs.bitwidth(),
                });
            }
            return Ok(Statement::Swap { lhs, rhs });
        }

        let op = match self.advance() {
            Some(Token::Plus) => AssignOp::Add,
            Some(Token::Minus) => AssignOp::Subtract,
            Some(Token::Caret) => AssignOp::Exor,
            Some(other) => return Err(self.unexpected("'<=>', '+=', '-=' or '^='", &other)),
            None => return Err(ParseError::UnexpectedEof("assignment operator".into())),
        };
        self.expect(Token::Eq)?;

        let rhs = self.parse_expression(lhs.bitwidth())?;

        if lhs.has_static_bitwidth() {
            if let Some(width) = static_bitwidth(&rhs) {
                if width != lhs.bitwidth() {
                    return Err(ParseError::WidthMismatch {
                        line: self.line,
                        lhs: lhs.bitwidth(),
                        rhs: width,
                    });
                }
            }
        }

        let mut self_reference = false;
        rhs.for_each_access(&mut |access| {
            self_reference |= overlaps(&lhs, access);
        });
        if self_reference {
            return Err(ParseError::SelfReference {
                line: self.line,
                name: lhs.var.name.clone(),
            });
        }

        Ok(Statement::Assign { lhs, op, rhs })
    }

    /// Parse `if cond then ... else ... fi cond`.
    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.expect(Token::If)?;
        let condition = self.parse_condition()?;
        self.expect(Token::Then)?;
        let then_statements = self.parse_statements()?;
        self.expect(Token::Else)?;
        let else_statements = self.parse_statements()?;
        self.expect(Token::Fi)?;
        let fi_condition = self.parse_condition()?;

        Ok(Statement::If {
            condition,
            then_statements,
            else_statements,
            fi_condition,
        })
    }

    /// Parse a 1-bit condition expression.
    fn parse_condition(&mut self) -> ParseResult<Expression> {
        let condition = self.parse_expression(1)?;
        match static_bitwidth(&condition) {
            Some(width) if width != 1 => Err(ParseError::WidthMismatch {
                line: self.line,
                lhs: 1,
                rhs: width,
            }),
            _ => Ok(condition),
        }
    }

    /// Parse `for [[$i =] from to] to [step [-] n] do ... rof`.
    fn parse_for(&mut self) -> ParseResult<Statement> {
        self.expect(Token::For)?;

        let loop_variable = if self.check(&Token::Dollar)
            && matches!(self.peek_at(1), Some(Token::Identifier(_)))
            && matches!(self.peek_at(2), Some(Token::Eq))
        {
            self.advance();
            let name = self.parse_identifier()?;
            self.expect(Token::Eq)?;
            if self.loop_variables.contains(&name) {
                return Err(ParseError::DuplicateDeclaration {
                    line: self.line,
                    name,
                });
            }
            Some(name)
        } else {
            None
        };

        let first = self.parse_number()?;
        let (from, to) = if self.consume(&Token::To) {
            (Some(first), self.parse_number()?)
        } else if loop_variable.is_some() {
            let found = self.peek().cloned();
            return Err(match found {
                Some(token) => self.unexpected("'to'", &token),
                None => ParseError::UnexpectedEof("'to'".into()),
            });
        } else {
            (None, first)
        };

        let (step, negative_step) = if self.consume(&Token::Step) {
            let negative = self.consume(&Token::Minus);
            (self.parse_number()?, negative)
        } else {
            (Number::Constant(1), false)
        };

        self.expect(Token::Do)?;

        if let Some(name) = &loop_variable {
            self.loop_variables.push(name.clone());
        }
        let body = self.parse_statements();
        if loop_variable.is_some() {
            self.loop_variables.pop();
        }
        let statements = body?;

        self.expect(Token::Rof)?;

        Ok(Statement::For {
            loop_variable,
            from,
            to,
            step,
            negative_step,
            statements,
        })
    }

    /// Parse `call m(a, b)` or `uncall m(a, b)`.
    fn parse_call(&mut self) -> ParseResult<Statement> {
        let is_call = matches!(self.advance(), Some(Token::Call));
        let target = self.parse_identifier()?;

        let mut parameters = vec![];
        if self.consume(&Token::LParen) {
            if !self.check(&Token::RParen) {
                parameters.push(self.parse_identifier()?);
                while self.consume(&Token::Comma) {
                    parameters.push(self.parse_identifier()?);
                }
            }
            self.expect(Token::RParen)?;
        }

        self.check_call(&target, &parameters)?;

        Ok(if is_call {
            Statement::Call { target, parameters }
        } else {
            Statement::Uncall { target, parameters }
        })
    }

    /// Check a call's arguments against the target's parameters.
    fn check_call(&self, target: &str, parameters: &[String]) -> ParseResult<()> {
        let module = self
            .modules
            .iter()
            .find(|m| m.name == target)
            .ok_or_else(|| ParseError::UnknownModule {
                line: self.line,
                name: target.to_string(),
            })?;

        let mismatch = |message: String| ParseError::ArgumentMismatch {
            line: self.line,
            module: target.to_string(),
            message,
        };

        if module.parameters.len() != parameters.len() {
            return Err(mismatch(format!(
                "expected {} arguments, got {}",
                module.parameters.len(),
                parameters.len()
            )));
        }

        for (i, (name, parameter)) in parameters.iter().zip(&module.parameters).enumerate() {
            let argument = self
                .scope
                .get(name)
                .ok_or_else(|| ParseError::UndefinedIdentifier {
                    line: self.line,
                    name: name.clone(),
                })?;

            if parameters[..i].contains(name) {
                return Err(mismatch(format!("argument '{name}' is passed twice")));
            }
            if argument.bitwidth != parameter.bitwidth {
                return Err(mismatch(format!(
                    "argument '{name}' has {} bits, parameter '{}' has {}",
                    argument.bitwidth, parameter.name, parameter.bitwidth
                )));
            }
            if argument.dimensions != parameter.dimensions {
                return Err(mismatch(format!(
                    "argument '{name}' has dimensions {:?}, parameter '{}' has {:?}",
                    argument.dimensions, parameter.name, parameter.dimensions
                )));
            }
        }

        Ok(())
    }
}

/// Bit-width of an expression if it does not depend on loop variables.
pub(super) fn static_bitwidth(expression: &Expression) -> Option<u32> {
    match expression {
        Expression::Numeric { bitwidth, .. } => Some(*bitwidth),
        Expression::Variable(access) => access
            .has_static_bitwidth()
            .then(|| access.bitwidth()),
        Expression::Binary { lhs, op, .. } => {
            if op.is_boolean() {
                Some(1)
            } else {
                static_bitwidth(lhs)
            }
        }
        Expression::Shift { lhs, .. } => static_bitwidth(lhs),
    }
}

/// Whether two accesses provably refer to a common line.
///
/// Accesses overlap when their index expressions are identical and their
/// bit ranges intersect. Accesses whose relation depends on loop variables
/// are left to synthesis.
fn overlaps(a: &VariableAccess, b: &VariableAccess) -> bool {
    if a.var.name != b.var.name || a.indexes != b.indexes {
        return false;
    }

    let constant_bits = |access: &VariableAccess| -> Option<(u64, u64)> {
        match &access.range {
            Some((first, second)) => {
                let (f, s) = (first.constant_value()?, second.constant_value()?);
                Some((f.min(s), f.max(s)))
            }
            None => Some((0, u64::from(access.var.bitwidth) - 1)),
        }
    };

    match (constant_bits(a), constant_bits(b)) {
        (Some((a0, a1)), Some((b0, b1))) => a0 <= b1 && b0 <= a1,
        _ => a.range == b.range,
    }
}
