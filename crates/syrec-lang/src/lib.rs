//! SyReC Parser, Emitter and Reversal
//!
//! This crate reads SyReC, a hardware description language for reversible
//! circuits, into a checked syntax tree that the synthesizer consumes. It can
//! also write a program back to source and compute the inverse of any
//! statement.
//!
//! # Supported Features
//!
//! | Feature | Example |
//! |---------|---------|
//! | Modules and parameters | `module adder(in a(4), in b(4), out c(4))` |
//! | Local signals | `wire t(4)`, `state s[2](8)` |
//! | Arrays and bit ranges | `v[1][$i].0:3` |
//! | Reversible assignments | `c += a`, `c ^= (a & b)` |
//! | Unary statements | `~= a`, `++= a`, `--= a` |
//! | Swap | `a <=> b` |
//! | Conditionals | `if c then ... else ... fi c` |
//! | Loops | `for $i = 0 to 3 step 1 do ... rof` |
//! | Module calls | `call adder(x, y, s)`, `uncall adder(x, y, s)` |
//! | Numbers | `42`, `#a`, `$i`, `($i + 1)` |
//! | Comments | `// line`, `/* block */` |
//!
//! # Example: Parsing SyReC
//!
//! ```rust
//! use syrec_lang::parse;
//!
//! let source = r"
//!     module adder(in a(4), in b(4), out c(4))
//!         c += (a + b)
//! ";
//!
//! let program = parse(source).unwrap();
//! let adder = program.find_module("adder").unwrap();
//! assert_eq!(adder.parameters.len(), 3);
//! assert_eq!(adder.statements.len(), 1);
//! ```
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use syrec_lang::{emit, parse};
//!
//! let program = parse("module m(inout a(4), in b(4)) a ^= b ++= a").unwrap();
//! let reparsed = parse(&emit(&program)).unwrap();
//! assert_eq!(program, reparsed);
//! ```
//!
//! # Example: Reversal
//!
//! ```rust
//! use syrec_lang::parse;
//! use syrec_lang::syntax::{AssignOp, Statement};
//!
//! let program = parse("module m(inout a(4), in b(4)) a += b").unwrap();
//! let reversed = program.modules[0].reversed();
//! assert!(matches!(
//!     reversed.statements[0],
//!     Statement::Assign { op: AssignOp::Subtract, .. }
//! ));
//! ```

mod ast;
mod emitter;
mod error;
mod lexer;
mod parser;
mod reverse;

pub use ast::{Module, Program, Statement};
pub use emitter::{emit, emit_module};
pub use error::{ParseError, ParseResult};
pub use parser::{ReadSettings, parse, parse_with_settings};
pub use reverse::reverse_statements;

// Re-export AST types for the synthesizer and other consumers
pub mod syntax {
    pub use crate::ast::*;
}
