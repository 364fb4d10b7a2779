//! Abstract Syntax Tree for SyReC.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Values of loop variables during unrolling, by name (without `$`).
pub type LoopMap = FxHashMap<String, u64>;

/// A complete SyReC program: an ordered list of modules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Modules in declaration order.
    pub modules: Vec<Module>,
}

impl Program {
    /// Look up a module by name.
    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }
}

/// A module: typed parameters, local variables and a statement list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Parameters in declaration order (`in`, `out`, `inout`).
    pub parameters: Vec<Variable>,
    /// Local variables (`wire`, `state`).
    pub variables: Vec<Variable>,
    /// Module body.
    pub statements: Vec<Statement>,
}

impl Module {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: vec![],
            variables: vec![],
            statements: vec![],
        }
    }

    /// Look up a parameter or local variable by name.
    pub fn find_parameter_or_variable(&self, name: &str) -> Option<&Variable> {
        self.parameters
            .iter()
            .chain(self.variables.iter())
            .find(|v| v.name == name)
    }
}

// =============================================================================
// Variables
// =============================================================================

/// Declared role of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    /// Input parameter.
    In,
    /// Output parameter, starts at 0.
    Out,
    /// Input and output parameter.
    Inout,
    /// Local scratch variable, starts at 0.
    Wire,
    /// Local state variable.
    State,
}

impl VariableType {
    /// Source keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            VariableType::In => "in",
            VariableType::Out => "out",
            VariableType::Inout => "inout",
            VariableType::Wire => "wire",
            VariableType::State => "state",
        }
    }

    /// Whether this type is only valid for module parameters.
    pub fn is_parameter(self) -> bool {
        matches!(self, VariableType::In | VariableType::Out | VariableType::Inout)
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A declared variable, optionally an array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name.
    pub name: String,
    /// Declared role.
    pub ty: VariableType,
    /// Array dimensions, outermost first. Empty for scalars.
    pub dimensions: Vec<u32>,
    /// Bit-width of each element.
    pub bitwidth: u32,
}

impl Variable {
    /// Create a scalar variable.
    pub fn new(name: impl Into<String>, ty: VariableType, bitwidth: u32) -> Self {
        Self {
            name: name.into(),
            ty,
            dimensions: vec![],
            bitwidth,
        }
    }

    /// Set array dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Vec<u32>) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Number of array elements (1 for scalars).
    pub fn num_elements(&self) -> u64 {
        self.dimensions.iter().map(|&d| u64::from(d)).product()
    }

    /// Number of circuit lines needed for the whole variable.
    pub fn num_lines(&self) -> u64 {
        self.num_elements() * u64::from(self.bitwidth)
    }
}

// =============================================================================
// Numbers
// =============================================================================

/// Operators allowed between synthesis-time numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    LessThan,
    GreaterThan,
    Equals,
    NotEquals,
    LessEquals,
    GreaterEquals,
}

impl NumericOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            NumericOp::Add => "+",
            NumericOp::Subtract => "-",
            NumericOp::Multiply => "*",
            NumericOp::Divide => "/",
            NumericOp::Modulo => "%",
            NumericOp::LogicalAnd => "&&",
            NumericOp::LogicalOr => "||",
            NumericOp::BitwiseAnd => "&",
            NumericOp::BitwiseOr => "|",
            NumericOp::LessThan => "<",
            NumericOp::GreaterThan => ">",
            NumericOp::Equals => "==",
            NumericOp::NotEquals => "!=",
            NumericOp::LessEquals => "<=",
            NumericOp::GreaterEquals => ">=",
        }
    }

    /// Apply the operator. Returns `None` on overflow, underflow or
    /// division by zero.
    pub fn apply(self, lhs: u64, rhs: u64) -> Option<u64> {
        let b = |v: bool| u64::from(v);
        match self {
            NumericOp::Add => lhs.checked_add(rhs),
            NumericOp::Subtract => lhs.checked_sub(rhs),
            NumericOp::Multiply => lhs.checked_mul(rhs),
            NumericOp::Divide => lhs.checked_div(rhs),
            NumericOp::Modulo => lhs.checked_rem(rhs),
            NumericOp::LogicalAnd => Some(b(lhs != 0 && rhs != 0)),
            NumericOp::LogicalOr => Some(b(lhs != 0 || rhs != 0)),
            NumericOp::BitwiseAnd => Some(lhs & rhs),
            NumericOp::BitwiseOr => Some(lhs | rhs),
            NumericOp::LessThan => Some(b(lhs < rhs)),
            NumericOp::GreaterThan => Some(b(lhs > rhs)),
            NumericOp::Equals => Some(b(lhs == rhs)),
            NumericOp::NotEquals => Some(b(lhs != rhs)),
            NumericOp::LessEquals => Some(b(lhs <= rhs)),
            NumericOp::GreaterEquals => Some(b(lhs >= rhs)),
        }
    }
}

/// A number known at synthesis time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    /// Literal value. `#x` is resolved to a literal while parsing.
    Constant(u64),
    /// Loop variable `$name`, bound while a `for` loop is unrolled.
    LoopVariable(String),
    /// `(lhs op rhs)` with at least one non-constant operand.
    Expression {
        lhs: Box<Number>,
        op: NumericOp,
        rhs: Box<Number>,
    },
}

impl Number {
    /// Evaluate under the given loop variable values.
    ///
    /// Returns `None` for an unbound loop variable or a failing operator.
    pub fn evaluate(&self, loop_map: &LoopMap) -> Option<u64> {
        match self {
            Number::Constant(value) => Some(*value),
            Number::LoopVariable(name) => loop_map.get(name).copied(),
            Number::Expression { lhs, op, rhs } => {
                op.apply(lhs.evaluate(loop_map)?, rhs.evaluate(loop_map)?)
            }
        }
    }

    /// The value of a number without loop variables.
    pub fn constant_value(&self) -> Option<u64> {
        self.evaluate(&LoopMap::default())
    }

    /// Whether this number is a loop variable reference.
    pub fn is_loop_variable(&self) -> bool {
        matches!(self, Number::LoopVariable(_))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::Constant(value)
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// Access to (part of) a variable: `name[i][j].first:second`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableAccess {
    /// The accessed variable's declaration.
    pub var: Variable,
    /// One index expression per array dimension (or none).
    pub indexes: Vec<Expression>,
    /// Optional bit range `(first, second)`; `.n` is `(n, n)`.
    pub range: Option<(Number, Number)>,
}

impl VariableAccess {
    /// Access the whole variable.
    pub fn new(var: Variable) -> Self {
        Self {
            var,
            indexes: vec![],
            range: None,
        }
    }

    /// Bit-width of the access as far as it is known before unrolling.
    ///
    /// A range over loop variables is only known when both ends are the same
    /// variable; otherwise the declared width is reported.
    pub fn bitwidth(&self) -> u32 {
        match &self.range {
            Some((first, second)) => {
                if let (Some(a), Some(b)) = (first.constant_value(), second.constant_value()) {
                    u32::try_from(a.abs_diff(b) + 1).unwrap_or(self.var.bitwidth)
                } else if first.is_loop_variable() && first == second {
                    1
                } else {
                    self.var.bitwidth
                }
            }
            None => self.var.bitwidth,
        }
    }

    /// Whether the bit-width is fully determined before unrolling.
    pub fn has_static_bitwidth(&self) -> bool {
        match &self.range {
            Some((first, second)) => {
                (first.constant_value().is_some() && second.constant_value().is_some())
                    || (first.is_loop_variable() && first == second)
            }
            None => true,
        }
    }
}

/// Binary expression operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Exor,
    Multiply,
    Divide,
    Modulo,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    LessThan,
    GreaterThan,
    Equals,
    NotEquals,
    LessEquals,
    GreaterEquals,
}

impl BinaryOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Exor => "^",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::BitwiseAnd => "&",
            BinaryOp::BitwiseOr => "|",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::Equals => "=",
            BinaryOp::NotEquals => "!=",
            BinaryOp::LessEquals => "<=",
            BinaryOp::GreaterEquals => ">=",
        }
    }

    /// Whether the result is a single bit.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            BinaryOp::LogicalAnd
                | BinaryOp::LogicalOr
                | BinaryOp::LessThan
                | BinaryOp::GreaterThan
                | BinaryOp::Equals
                | BinaryOp::NotEquals
                | BinaryOp::LessEquals
                | BinaryOp::GreaterEquals
        )
    }

    /// The assignment operator with the same elementary action, if any.
    pub fn as_assign_op(self) -> Option<AssignOp> {
        match self {
            BinaryOp::Add => Some(AssignOp::Add),
            BinaryOp::Subtract => Some(AssignOp::Subtract),
            BinaryOp::Exor => Some(AssignOp::Exor),
            _ => None,
        }
    }

    /// The numeric operator for constant folding, if any.
    pub fn as_numeric_op(self) -> Option<NumericOp> {
        Some(match self {
            BinaryOp::Add => NumericOp::Add,
            BinaryOp::Subtract => NumericOp::Subtract,
            BinaryOp::Multiply => NumericOp::Multiply,
            BinaryOp::Divide => NumericOp::Divide,
            BinaryOp::Modulo => NumericOp::Modulo,
            BinaryOp::LogicalAnd => NumericOp::LogicalAnd,
            BinaryOp::LogicalOr => NumericOp::LogicalOr,
            BinaryOp::BitwiseAnd => NumericOp::BitwiseAnd,
            BinaryOp::BitwiseOr => NumericOp::BitwiseOr,
            BinaryOp::LessThan => NumericOp::LessThan,
            BinaryOp::GreaterThan => NumericOp::GreaterThan,
            BinaryOp::Equals => NumericOp::Equals,
            BinaryOp::NotEquals => NumericOp::NotEquals,
            BinaryOp::LessEquals => NumericOp::LessEquals,
            BinaryOp::GreaterEquals => NumericOp::GreaterEquals,
            BinaryOp::Exor => return None,
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Shift operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftOp {
    Left,
    Right,
}

impl ShiftOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            ShiftOp::Left => "<<",
            ShiftOp::Right => ">>",
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    /// A number materialized with the bit-width of its context.
    Numeric { value: Number, bitwidth: u32 },
    /// A variable access.
    Variable(VariableAccess),
    /// `(lhs op rhs)`.
    Binary {
        lhs: Box<Expression>,
        op: BinaryOp,
        rhs: Box<Expression>,
    },
    /// `(lhs << amount)` or `(lhs >> amount)`.
    Shift {
        lhs: Box<Expression>,
        op: ShiftOp,
        amount: Number,
    },
}

impl Expression {
    /// Create a binary expression.
    pub fn binary(lhs: Expression, op: BinaryOp, rhs: Expression) -> Self {
        Expression::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Bit-width of the expression's value.
    pub fn bitwidth(&self) -> u32 {
        match self {
            Expression::Numeric { bitwidth, .. } => *bitwidth,
            Expression::Variable(access) => access.bitwidth(),
            Expression::Binary { lhs, op, .. } => {
                if op.is_boolean() {
                    1
                } else {
                    lhs.bitwidth()
                }
            }
            Expression::Shift { lhs, .. } => lhs.bitwidth(),
        }
    }

    /// Visit every variable access in this expression, index expressions
    /// included.
    pub fn for_each_access<'a>(&'a self, f: &mut impl FnMut(&'a VariableAccess)) {
        match self {
            Expression::Numeric { .. } => {}
            Expression::Variable(access) => {
                f(access);
                for index in &access.indexes {
                    index.for_each_access(f);
                }
            }
            Expression::Binary { lhs, rhs, .. } => {
                lhs.for_each_access(f);
                rhs.for_each_access(f);
            }
            Expression::Shift { lhs, .. } => lhs.for_each_access(f),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

/// Unary statement operators: `~=`, `++=`, `--=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Invert,
    Increment,
    Decrement,
}

impl UnaryOp {
    /// Source symbol (without the trailing `=`).
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Invert => "~",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        }
    }
}

/// Assignment operators: `+=`, `-=`, `^=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignOp {
    Add,
    Subtract,
    Exor,
}

impl AssignOp {
    /// Source symbol (without the trailing `=`).
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Add => "+",
            AssignOp::Subtract => "-",
            AssignOp::Exor => "^",
        }
    }

    /// The operator undoing this one.
    pub fn inverse(self) -> Self {
        match self {
            AssignOp::Add => AssignOp::Subtract,
            AssignOp::Subtract => AssignOp::Add,
            AssignOp::Exor => AssignOp::Exor,
        }
    }

    /// The binary operator with the same elementary action.
    pub fn as_binary_op(self) -> BinaryOp {
        match self {
            AssignOp::Add => BinaryOp::Add,
            AssignOp::Subtract => BinaryOp::Subtract,
            AssignOp::Exor => BinaryOp::Exor,
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.symbol())
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    /// `lhs <=> rhs`
    Swap {
        lhs: VariableAccess,
        rhs: VariableAccess,
    },
    /// `~= var`, `++= var`, `--= var`
    Unary { op: UnaryOp, var: VariableAccess },
    /// `lhs += rhs`, `lhs -= rhs`, `lhs ^= rhs`
    Assign {
        lhs: VariableAccess,
        op: AssignOp,
        rhs: Expression,
    },
    /// `if condition then ... else ... fi fi_condition`
    If {
        condition: Expression,
        then_statements: Vec<Statement>,
        else_statements: Vec<Statement>,
        fi_condition: Expression,
    },
    /// `for [$var =] [from to] to [step [-] step] do ... rof`
    For {
        loop_variable: Option<String>,
        from: Option<Number>,
        to: Number,
        step: Number,
        negative_step: bool,
        statements: Vec<Statement>,
    },
    /// `call target(parameters)`
    Call {
        target: String,
        parameters: Vec<String>,
    },
    /// `uncall target(parameters)`
    Uncall {
        target: String,
        parameters: Vec<String>,
    },
    /// `skip`
    Skip,
}

impl Statement {
    /// Short name of the statement kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Swap { .. } => "swap",
            Statement::Unary { .. } => "unary",
            Statement::Assign { .. } => "assign",
            Statement::If { .. } => "if",
            Statement::For { .. } => "for",
            Statement::Call { .. } => "call",
            Statement::Uncall { .. } => "uncall",
            Statement::Skip => "skip",
        }
    }
}
