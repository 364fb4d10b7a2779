//! SyReC emitter for rendering programs back to source.

use crate::ast::{Expression, Module, Number, Program, Statement, Variable, VariableAccess};

/// Emit a program as SyReC source code.
pub fn emit(program: &Program) -> String {
    let mut emitter = Emitter::new();
    for (i, module) in program.modules.iter().enumerate() {
        if i > 0 {
            emitter.writeln("");
        }
        emitter.emit_module(module);
    }
    emitter.output
}

/// Emit a single module as SyReC source code.
pub fn emit_module(module: &Module) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_module(module);
    emitter.output
}

/// SyReC emitter.
struct Emitter {
    output: String,
    indent: usize,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    fn writeln(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str("  ");
            }
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn emit_module(&mut self, module: &Module) {
        let parameters: Vec<String> = module
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.ty, declaration(p)))
            .collect();
        self.writeln(&format!("module {}({})", module.name, parameters.join(", ")));

        self.indent += 1;
        for variable in &module.variables {
            self.writeln(&format!("{} {}", variable.ty, declaration(variable)));
        }
        self.emit_statements(&module.statements);
        self.indent -= 1;
    }

    fn emit_statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.emit_statement(statement);
        }
    }

    fn emit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Swap { lhs, rhs } => {
                self.writeln(&format!("{} <=> {}", access(lhs), access(rhs)));
            }
            Statement::Unary { op, var } => {
                self.writeln(&format!("{}= {}", op.symbol(), access(var)));
            }
            Statement::Assign { lhs, op, rhs } => {
                self.writeln(&format!("{} {op} {}", access(lhs), expression(rhs)));
            }
            Statement::If {
                condition,
                then_statements,
                else_statements,
                fi_condition,
            } => {
                self.writeln(&format!("if {} then", expression(condition)));
                self.indent += 1;
                self.emit_statements(then_statements);
                self.indent -= 1;
                self.writeln("else");
                self.indent += 1;
                self.emit_statements(else_statements);
                self.indent -= 1;
                self.writeln(&format!("fi {}", expression(fi_condition)));
            }
            Statement::For {
                loop_variable,
                from,
                to,
                step,
                negative_step,
                statements,
            } => {
                let mut header = String::from("for ");
                match (loop_variable, from) {
                    (Some(var), from) => {
                        let from = from.clone().unwrap_or(Number::Constant(1));
                        header.push_str(&format!("${var} = {} to ", number(&from)));
                    }
                    (None, Some(from)) => header.push_str(&format!("{} to ", number(from))),
                    (None, None) => {}
                }
                header.push_str(&number(to));
                if *negative_step || *step != Number::Constant(1) {
                    let sign = if *negative_step { "- " } else { "" };
                    header.push_str(&format!(" step {sign}{}", number(step)));
                }
                header.push_str(" do");

                self.writeln(&header);
                self.indent += 1;
                self.emit_statements(statements);
                self.indent -= 1;
                self.writeln("rof");
            }
            Statement::Call { target, parameters } => {
                self.writeln(&format!("call {target}({})", parameters.join(", ")));
            }
            Statement::Uncall { target, parameters } => {
                self.writeln(&format!("uncall {target}({})", parameters.join(", ")));
            }
            Statement::Skip => self.writeln("skip"),
        }
    }
}

fn declaration(variable: &Variable) -> String {
    let dimensions: String = variable
        .dimensions
        .iter()
        .map(|d| format!("[{d}]"))
        .collect();
    format!("{}{dimensions}({})", variable.name, variable.bitwidth)
}

fn access(access: &VariableAccess) -> String {
    let mut out = access.var.name.clone();
    for index in &access.indexes {
        out.push_str(&format!("[{}]", expression(index)));
    }
    if let Some((first, second)) = &access.range {
        out.push_str(&format!(".{}", number(first)));
        if first != second {
            out.push_str(&format!(":{}", number(second)));
        }
    }
    out
}

fn expression(expression: &Expression) -> String {
    match expression {
        Expression::Numeric { value, .. } => number(value),
        Expression::Variable(var) => access(var),
        Expression::Binary { lhs, op, rhs } => {
            format!("({} {op} {})", self::expression(lhs), self::expression(rhs))
        }
        Expression::Shift { lhs, op, amount } => {
            format!("({} {} {})", self::expression(lhs), op.symbol(), number(amount))
        }
    }
}

fn number(number: &Number) -> String {
    match number {
        Number::Constant(value) => value.to_string(),
        Number::LoopVariable(name) => format!("${name}"),
        Number::Expression { lhs, op, rhs } => {
            format!("({} {} {})", self::number(lhs), op.symbol(), self::number(rhs))
        }
    }
}
