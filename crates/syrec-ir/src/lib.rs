//! SyReC Reversible Circuit Representation
//!
//! This crate provides the circuit data structures that SyReC synthesis
//! produces: indexed lines with their interface metadata, the reversible
//! gate vocabulary, and an ordered gate cascade.
//!
//! # Core Components
//!
//! - **Lines**: [`LineId`] addresses a wire; [`Line`] carries its input and
//!   output names, an optional constant input value and a garbage flag
//! - **Gates**: [`Gate`] with a [`GateKind`] (multiple-controlled Toffoli or
//!   Fredkin), an ordered control set and its targets
//! - **Circuit**: [`Circuit`] with a validating builder API
//! - **Simulation**: [`simulate()`] evaluates a circuit on one input pattern
//! - **Costs**: [`quantum_cost`] and [`transistor_cost`]
//! - **Writers**: [`to_real`] renders RevLib `.real`, [`Circuit::to_json`]
//!   renders JSON
//!
//! # Example: A One-Bit Full Adder Stage
//!
//! ```rust
//! use syrec_ir::{Circuit, LineId, simulate};
//!
//! let mut circuit = Circuit::with_lines("half_adder", 3).unwrap();
//! let (a, b, carry) = (LineId(0), LineId(1), LineId(2));
//!
//! circuit.toffoli(a, b, carry).unwrap();
//! circuit.cnot(a, b).unwrap();
//!
//! let out = simulate(&circuit, &[true, true, false]).unwrap();
//! assert_eq!(out, vec![true, false, true]);
//! ```
//!
//! # Gate Vocabulary
//!
//! | Gate | Targets | `.real` | Description |
//! |------|---------|---------|-------------|
//! | NOT | 1 | `t1` | Toffoli without controls |
//! | CNOT | 1 | `t2` | Toffoli with one control |
//! | Toffoli | 1 | `tN` | Flips the target when all controls are 1 |
//! | Fredkin | 2 | `fN` | Swaps the targets when all controls are 1 |

pub mod circuit;
pub mod cost;
pub mod error;
pub mod gate;
pub mod line;
pub mod real;
pub mod simulate;

pub use circuit::Circuit;
pub use cost::{gate_quantum_cost, gate_transistor_cost, quantum_cost, transistor_cost};
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind};
pub use line::{Line, LineId};
pub use real::to_real;
pub use simulate::{apply_gate, constant_pattern, decode, encode, simulate};
