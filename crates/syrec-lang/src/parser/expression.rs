//! Expression, variable access and number parsing for SyReC.

use super::Parser;
use super::statement::static_bitwidth;
use crate::ast::{BinaryOp, Expression, Number, NumericOp, ShiftOp, VariableAccess};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse an expression. Numbers take the bit-width `bitwidth` of their
    /// context.
    pub(super) fn parse_expression(&mut self, bitwidth: u32) -> ParseResult<Expression> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(_) | Token::Hash | Token::Dollar => Ok(Expression::Numeric {
                value: self.parse_number()?,
                bitwidth,
            }),
            Token::Identifier(_) => Ok(Expression::Variable(self.parse_variable_access()?)),
            Token::LParen => {
                self.advance();
                let lhs = self.parse_expression(bitwidth)?;

                if let Some(op) = self.peek().and_then(shift_op) {
                    self.advance();
                    let amount = self.parse_number()?;
                    self.expect(Token::RParen)?;
                    return Ok(Expression::Shift {
                        lhs: Box::new(lhs),
                        op,
                        amount,
                    });
                }

                let op = match self.advance() {
                    Some(token) => {
                        binary_op(&token).ok_or_else(|| self.unexpected("operator", &token))?
                    }
                    None => return Err(ParseError::UnexpectedEof("operator".into())),
                };
                let rhs = self.parse_expression(lhs.bitwidth())?;
                self.expect(Token::RParen)?;

                self.combine(lhs, op, rhs, bitwidth)
            }
            _ => {
                self.advance();
                Err(self.unexpected("expression", &token))
            }
        }
    }

    /// Build `(lhs op rhs)`, folding number operands into a number.
    fn combine(
        &self,
        lhs: Expression,
        op: BinaryOp,
        rhs: Expression,
        bitwidth: u32,
    ) -> ParseResult<Expression> {
        if let (
            Expression::Numeric { value: a, .. },
            Expression::Numeric { value: b, .. },
            Some(numeric_op),
        ) = (&lhs, &rhs, op.as_numeric_op())
        {
            let value = self.fold(a.clone(), numeric_op, b.clone())?;
            return Ok(Expression::Numeric { value, bitwidth });
        }

        if let (Some(l), Some(r)) = (static_bitwidth(&lhs), static_bitwidth(&rhs)) {
            if l != r {
                return Err(ParseError::WidthMismatch {
                    line: self.line,
                    lhs: l,
                    rhs: r,
                });
            }
        }

        Ok(Expression::binary(lhs, op, rhs))
    }

    /// Parse a variable access: `name ([expr])* [.n[:m]]`.
    pub(super) fn parse_variable_access(&mut self) -> ParseResult<VariableAccess> {
        let name = self.parse_identifier()?;
        let var = self
            .scope
            .get(&name)
            .cloned()
            .ok_or_else(|| ParseError::UndefinedIdentifier {
                line: self.line,
                name: name.clone(),
            })?;

        let mut indexes = vec![];
        while self.consume(&Token::LBracket) {
            let index = self.parse_expression(self.settings.default_bitwidth)?;
            self.expect(Token::RBracket)?;

            if let (Some(dimension), Expression::Numeric { value, .. }) =
                (var.dimensions.get(indexes.len()), &index)
            {
                if let Some(i) = value.constant_value() {
                    if i >= u64::from(*dimension) {
                        return Err(ParseError::OutOfRange {
                            line: self.line,
                            name,
                            message: format!("index {i} for dimension of size {dimension}"),
                        });
                    }
                }
            }
            indexes.push(index);
        }

        if indexes.len() != var.dimensions.len() {
            return Err(ParseError::IndexCount {
                line: self.line,
                name,
                expected: var.dimensions.len(),
                got: indexes.len(),
            });
        }

        let range = if self.consume(&Token::Dot) {
            let first = self.parse_number()?;
            let second = if self.consume(&Token::Colon) {
                self.parse_number()?
            } else {
                first.clone()
            };

            for bound in [&first, &second] {
                if let Some(bit) = bound.constant_value() {
                    if bit >= u64::from(var.bitwidth) {
                        return Err(ParseError::OutOfRange {
                            line: self.line,
                            name,
                            message: format!("bit {bit} of a {}-bit variable", var.bitwidth),
                        });
                    }
                }
            }
            Some((first, second))
        } else {
            None
        };

        Ok(VariableAccess {
            var,
            indexes,
            range,
        })
    }

    /// Parse a number: `n`, `#var`, `$loop` or `(number op number)`.
    pub(super) fn parse_number(&mut self) -> ParseResult<Number> {
        match self.advance() {
            Some(Token::IntLiteral(value)) => Ok(Number::Constant(value)),
            Some(Token::Hash) => {
                let name = self.parse_identifier()?;
                let var = self
                    .scope
                    .get(&name)
                    .ok_or_else(|| ParseError::UndefinedIdentifier {
                        line: self.line,
                        name: name.clone(),
                    })?;
                Ok(Number::Constant(u64::from(var.bitwidth)))
            }
            Some(Token::Dollar) => {
                let name = self.parse_identifier()?;
                if !self.loop_variables.contains(&name) {
                    return Err(ParseError::UndefinedIdentifier {
                        line: self.line,
                        name,
                    });
                }
                Ok(Number::LoopVariable(name))
            }
            Some(Token::LParen) => {
                let lhs = self.parse_number()?;
                let op = match self.advance() {
                    Some(token) => {
                        numeric_op(&token).ok_or_else(|| self.unexpected("operator", &token))?
                    }
                    None => return Err(ParseError::UnexpectedEof("operator".into())),
                };
                let rhs = self.parse_number()?;
                self.expect(Token::RParen)?;
                self.fold(lhs, op, rhs)
            }
            Some(other) => Err(self.unexpected("number", &other)),
            None => Err(ParseError::UnexpectedEof("number".into())),
        }
    }

    /// Combine two numbers, evaluating constant operands immediately.
    fn fold(&self, lhs: Number, op: NumericOp, rhs: Number) -> ParseResult<Number> {
        match (lhs.constant_value(), rhs.constant_value()) {
            (Some(a), Some(b)) => {
                op.apply(a, b)
                    .map(Number::Constant)
                    .ok_or_else(|| ParseError::InvalidNumber {
                        line: self.line,
                        message: format!("cannot evaluate ({a} {} {b})", op.symbol()),
                    })
            }
            _ => Ok(Number::Expression {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            }),
        }
    }
}

fn shift_op(token: &Token) -> Option<ShiftOp> {
    match token {
        Token::LShift => Some(ShiftOp::Left),
        Token::RShift => Some(ShiftOp::Right),
        _ => None,
    }
}

fn binary_op(token: &Token) -> Option<BinaryOp> {
    Some(match token {
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Subtract,
        Token::Caret => BinaryOp::Exor,
        Token::Star => BinaryOp::Multiply,
        Token::Slash => BinaryOp::Divide,
        Token::Percent => BinaryOp::Modulo,
        Token::And => BinaryOp::LogicalAnd,
        Token::Or => BinaryOp::LogicalOr,
        Token::Ampersand => BinaryOp::BitwiseAnd,
        Token::Pipe => BinaryOp::BitwiseOr,
        Token::Lt => BinaryOp::LessThan,
        Token::Gt => BinaryOp::GreaterThan,
        Token::Eq | Token::EqEq => BinaryOp::Equals,
        Token::NotEq => BinaryOp::NotEquals,
        Token::LtEq => BinaryOp::LessEquals,
        Token::GtEq => BinaryOp::GreaterEquals,
        _ => return None,
    })
}

fn numeric_op(token: &Token) -> Option<NumericOp> {
    binary_op(token).and_then(BinaryOp::as_numeric_op)
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Expression, Number, NumericOp, ShiftOp, Statement};
    use crate::error::ParseError;
    use crate::parser::parse;

    fn rhs(source: &str) -> Expression {
        match parse(source).unwrap().modules.remove(0).statements.remove(0) {
            Statement::Assign { rhs, .. } => rhs,
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_constant_folding() {
        let expr = rhs("module m(inout a(8)) a += ((2 * 3) + #a)");
        assert_eq!(
            expr,
            Expression::Numeric {
                value: Number::Constant(14),
                bitwidth: 8
            }
        );

        let err = parse("module m(inout a(8)) a += (1 / 0)").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn test_loop_variable_number() {
        let source = "module m(inout a[4](2)) for $i = 0 to 2 do a[($i + 1)] ^= a[$i] rof";
        let program = parse(source).unwrap();
        let Statement::For { statements, .. } = &program.modules[0].statements[0] else {
            panic!("expected for statement");
        };
        let Statement::Assign { lhs, .. } = &statements[0] else {
            panic!("expected assignment");
        };
        assert_eq!(
            lhs.indexes[0],
            Expression::Numeric {
                value: Number::Expression {
                    lhs: Box::new(Number::LoopVariable("i".into())),
                    op: NumericOp::Add,
                    rhs: Box::new(Number::Constant(1)),
                },
                bitwidth: 32
            }
        );
    }

    #[test]
    fn test_shift_and_comparison() {
        let expr = rhs("module m(inout a(4), in b(4)) a ^= (b << 2)");
        assert!(matches!(expr, Expression::Shift { op: ShiftOp::Left, amount: Number::Constant(2), .. }));

        let expr = rhs("module m(inout c(1), in a(4), in b(4)) c ^= ((a < b) && (a = 3))");
        let Expression::Binary { lhs, op, rhs } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::LogicalAnd);
        assert!(matches!(*lhs, Expression::Binary { op: BinaryOp::LessThan, .. }));
        assert!(matches!(*rhs, Expression::Binary { op: BinaryOp::Equals, .. }));
    }

    #[test]
    fn test_access_checks() {
        let err = parse("module m(inout a[2](4)) ++= a").unwrap_err();
        assert!(matches!(err, ParseError::IndexCount { expected: 1, got: 0, .. }));

        let err = parse("module m(inout a[2](4)) ++= a[2]").unwrap_err();
        assert!(matches!(err, ParseError::OutOfRange { .. }));

        let err = parse("module m(inout a(4)) ++= a.1:4").unwrap_err();
        assert!(matches!(err, ParseError::OutOfRange { .. }));
    }

    #[test]
    fn test_operand_width_mismatch() {
        let err = parse("module m(inout c(4), in a(4), in b(2)) c += (a + b)").unwrap_err();
        assert!(matches!(err, ParseError::WidthMismatch { lhs: 4, rhs: 2, .. }));
    }
}
