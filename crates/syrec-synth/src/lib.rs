//! SyReC Synthesis
//!
//! This crate turns a parsed SyReC [`Program`](syrec_lang::Program) into a
//! reversible [`Circuit`](syrec_ir::Circuit). Synthesis is hierarchical:
//! every statement maps onto a fixed gate pattern over the lines of the
//! variables it touches, and nesting (`if` branches, loop bodies, called
//! modules) maps onto control lines added to the nested gates.
//!
//! # Architecture
//!
//! ```text
//! Program (AST)
//!       │
//!       ▼
//! ┌─────────────┐
//! │ Synthesizer │ ◄── SynthesisSettings (strategy, main module)
//! └─────────────┘
//!       │
//!       ├── Binding:    variable accesses → line vectors
//!       ├── Statements: swap, unary, assign, if, for, call, uncall
//!       ├── Strategy:   additional lines / no additional lines
//!       └── CallTree:   scoped gate emission with control lines
//!       │
//!       ▼
//! Circuit + Statistics
//! ```
//!
//! # Example: Synthesizing an Adder
//!
//! ```rust
//! use syrec_synth::{Statistics, Strategy, SynthesisSettings, synthesize};
//!
//! let source = r"
//!     module adder(in a(4), in b(4), out c(4))
//!         c += a;
//!         c += b
//! ";
//! let program = syrec_lang::parse(source).unwrap();
//!
//! let settings = SynthesisSettings::new().with_strategy(Strategy::NoAdditionalLines);
//! let mut statistics = Statistics::new();
//! let circuit = synthesize(&program, &settings, &mut statistics).unwrap();
//!
//! assert_eq!(circuit.name(), "adder");
//! assert_eq!(circuit.num_lines(), 12);
//! assert_eq!(statistics.num_gates, circuit.num_gates());
//! ```
//!
//! # Strategies
//!
//! | Strategy | `+ - ^` sub-expressions | Helper lines |
//! |----------|-------------------------|--------------|
//! | [`Strategy::AdditionalLines`] | computed into fresh lines | one vector per operator |
//! | [`Strategy::NoAdditionalLines`] | folded into the target, or computed in place and uncomputed | only for other operators |
//!
//! Both strategies produce circuits with the same behavior on the
//! variables' lines.

pub mod binding;
pub mod call_tree;
pub mod error;
mod expression;
mod primitives;
pub mod settings;
mod statement;
mod synthesizer;

pub use binding::{Binding, Bound};
pub use call_tree::CallTree;
pub use error::{SynthError, SynthResult};
pub use settings::{AssignCounts, Statistics, Strategy, SynthesisSettings};
pub use synthesizer::synthesize;
