//! CLI command implementations.

pub mod check;
pub mod common;
pub mod reverse;
pub mod simulate;
pub mod synth;
pub mod version;
