//! Synthesis settings and statistics.
//!
//! [`SynthesisSettings`] selects the expression strategy and the top-level
//! module. [`Statistics`] reports what a synthesis run produced and carries
//! arbitrary typed extras, such as the per-strategy [`AssignCounts`].
//!
//! # Example
//!
//! ```
//! use syrec_synth::{Statistics, Strategy, SynthesisSettings};
//!
//! let settings = SynthesisSettings::new()
//!     .with_strategy(Strategy::NoAdditionalLines)
//!     .with_main_module("adder");
//! assert_eq!(settings.main_module.as_deref(), Some("adder"));
//!
//! #[derive(Debug, PartialEq)]
//! struct Note(&'static str);
//!
//! let mut statistics = Statistics::new();
//! statistics.insert(Note("first run"));
//! assert_eq!(statistics.get::<Note>(), Some(&Note("first run")));
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// How assignment right-hand sides are turned into lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Every sub-expression is computed into fresh lines.
    #[default]
    AdditionalLines,
    /// Sub-expressions are folded into the target or computed in place on
    /// their operands and uncomputed afterwards, where that is safe.
    NoAdditionalLines,
}

impl Strategy {
    /// Short name, as accepted by [`Strategy::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Strategy::AdditionalLines => "additional",
            Strategy::NoAdditionalLines => "no-additional",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "additional" | "additional-lines" => Ok(Strategy::AdditionalLines),
            "no-additional" | "no-additional-lines" => Ok(Strategy::NoAdditionalLines),
            other => Err(format!(
                "unknown strategy '{other}', expected 'additional' or 'no-additional'"
            )),
        }
    }
}

/// Settings for one synthesis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisSettings {
    /// Expression strategy.
    pub strategy: Strategy,
    /// Name of the top-level module. When absent, the module named `main`
    /// is used, or else the first module.
    pub main_module: Option<String>,
}

impl SynthesisSettings {
    /// Create default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expression strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the top-level module.
    #[must_use]
    pub fn with_main_module(mut self, name: impl Into<String>) -> Self {
        self.main_module = Some(name.into());
        self
    }
}

/// How the assignments of a run were encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignCounts {
    /// Assignments whose right-hand side was folded into the target.
    pub folded: usize,
    /// Assignments computed in place on their operands.
    pub in_place: usize,
    /// Assignments computed into fresh lines.
    pub additional_lines: usize,
}

/// Results of a synthesis run.
#[derive(Debug, Default)]
pub struct Statistics {
    /// Wall-clock time spent in synthesis.
    pub runtime: Duration,
    /// Number of gates in the produced circuit.
    pub num_gates: usize,
    /// Number of lines in the produced circuit.
    pub num_lines: usize,

    /// Custom entries (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Statistics {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a custom entry, replacing any entry of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom entry.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom entry.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom entry.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}
