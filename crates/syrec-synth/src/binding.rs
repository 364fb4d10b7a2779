//! Binding of SyReC variables to circuit lines.
//!
//! Every module activation gets a frame mapping variable names to the first
//! line of the variable's contiguous line block. Elements of arrays are laid
//! out row-major, each element occupying `bitwidth` lines.

use rustc_hash::FxHashMap;
use syrec_ir::{Circuit, LineId};
use syrec_lang::syntax::{Expression, LoopMap, Number, Variable, VariableAccess, VariableType};
use tracing::trace;

use crate::error::{SynthError, SynthResult};

/// A variable bound to its first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    /// First line of the variable's block.
    pub first: LineId,
    /// The declaration used to interpret accesses.
    pub var: Variable,
}

/// Stack of binding frames, one per active module.
#[derive(Debug, Default)]
pub struct Binding {
    frames: Vec<FxHashMap<String, Bound>>,
}

impl Binding {
    /// Create an empty binding stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a frame for a module activation.
    pub fn push_frame(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Close the innermost frame.
    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind `name` in the innermost frame.
    pub fn bind(&mut self, name: impl Into<String>, bound: Bound) -> SynthResult<()> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| SynthError::ScopeImbalance("no binding frame is open".into()))?;
        frame.insert(name.into(), bound);
        Ok(())
    }

    /// Look up `name` in the innermost frame.
    pub fn lookup(&self, name: &str) -> SynthResult<&Bound> {
        self.frames
            .last()
            .and_then(|frame| frame.get(name))
            .ok_or_else(|| SynthError::UnresolvedVariable {
                name: name.into(),
                reason: "not bound in the current module".into(),
            })
    }

    /// Allocate fresh lines for `variables` and bind them in the innermost
    /// frame.
    pub fn add_variables(
        &mut self,
        circuit: &mut Circuit,
        variables: &[Variable],
    ) -> SynthResult<()> {
        for var in variables {
            let first = add_variable_lines(circuit, var)?;
            trace!("Bound '{}' to lines starting at {}", var.name, first);
            self.bind(
                var.name.clone(),
                Bound {
                    first,
                    var: var.clone(),
                },
            )?;
        }
        Ok(())
    }

    /// Resolve an access to the lines it denotes, bit 0 first.
    ///
    /// Index expressions and range bounds must evaluate to constants under
    /// `loop_map`.
    pub fn resolve(
        &self,
        access: &VariableAccess,
        loop_map: &LoopMap,
    ) -> SynthResult<Vec<LineId>> {
        let name = &access.var.name;
        let bound = self.lookup(name)?;
        let var = &bound.var;
        let unresolved = |reason: String| SynthError::UnresolvedVariable {
            name: name.clone(),
            reason,
        };

        if access.indexes.len() != var.dimensions.len() {
            return Err(unresolved(format!(
                "expected {} indexes, got {}",
                var.dimensions.len(),
                access.indexes.len()
            )));
        }

        let bitwidth = u64::from(var.bitwidth);
        let mut offset = u64::from(bound.first.0);
        for (i, index) in access.indexes.iter().enumerate() {
            let Expression::Numeric { value, .. } = index else {
                return Err(unresolved("index is not a constant".into()));
            };
            let value = value
                .evaluate(loop_map)
                .ok_or_else(|| unresolved("index cannot be evaluated".into()))?;
            let dimension = u64::from(var.dimensions[i]);
            if value >= dimension {
                return Err(unresolved(format!(
                    "index {value} out of range for dimension of size {dimension}"
                )));
            }
            let stride: u64 = var.dimensions[i + 1..]
                .iter()
                .map(|&d| u64::from(d))
                .product::<u64>()
                * bitwidth;
            offset += value * stride;
        }

        let bits: Vec<u64> = match &access.range {
            None => (0..bitwidth).collect(),
            Some((first, second)) => {
                let evaluate = |n: &Number| {
                    let bit = n
                        .evaluate(loop_map)
                        .ok_or_else(|| unresolved("bit range cannot be evaluated".into()))?;
                    if bit >= bitwidth {
                        return Err(unresolved(format!(
                            "bit {bit} out of range for a {bitwidth}-bit variable"
                        )));
                    }
                    Ok(bit)
                };
                let (first, second) = (evaluate(first)?, evaluate(second)?);
                if first <= second {
                    (first..=second).collect()
                } else {
                    (second..=first).rev().collect()
                }
            }
        };

        bits.into_iter()
            .map(|bit| {
                u32::try_from(offset + bit)
                    .map(LineId)
                    .map_err(|_| unresolved("line index overflows".into()))
            })
            .collect()
    }
}

/// Constant input value and garbage flag of a variable's lines.
fn line_kind(ty: VariableType) -> (Option<bool>, bool) {
    match ty {
        VariableType::In => (None, true),
        VariableType::Out => (Some(false), false),
        VariableType::Inout | VariableType::State => (None, false),
        VariableType::Wire => (Some(false), true),
    }
}

/// Append the lines of `var` to `circuit` and return the first one.
///
/// Lines are named `name[i]...[k].bit`.
fn add_variable_lines(circuit: &mut Circuit, var: &Variable) -> SynthResult<LineId> {
    let (constant, garbage) = line_kind(var.ty);
    let first = LineId(
        u32::try_from(circuit.num_lines()).map_err(|_| syrec_ir::IrError::TooManyLines)?,
    );

    for element in 0..var.num_elements() {
        let mut suffix = String::new();
        let mut rest = element;
        let mut indexes = Vec::with_capacity(var.dimensions.len());
        for &dimension in var.dimensions.iter().rev() {
            indexes.push(rest % u64::from(dimension));
            rest /= u64::from(dimension);
        }
        for index in indexes.iter().rev() {
            suffix.push_str(&format!("[{index}]"));
        }

        for bit in 0..var.bitwidth {
            let name = format!("{}{suffix}.{bit}", var.name);
            circuit.add_line(name.clone(), name, constant, garbage)?;
        }
    }
    Ok(first)
}

/// Allocate one constant helper line holding `value`.
pub fn constant_line(circuit: &mut Circuit, value: bool) -> SynthResult<LineId> {
    let input = if value { "const_1" } else { "const_0" };
    Ok(circuit.add_line(input, "garbage", Some(value), true)?)
}

/// Allocate `width` constant helper lines holding `value`, bit 0 first.
pub fn constant_lines(circuit: &mut Circuit, width: u32, value: u64) -> SynthResult<Vec<LineId>> {
    (0..width)
        .map(|i| constant_line(circuit, i < 64 && (value >> i) & 1 == 1))
        .collect()
}
