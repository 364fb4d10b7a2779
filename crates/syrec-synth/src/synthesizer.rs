//! Top-level synthesis driver.

use std::time::Instant;

use syrec_ir::{Circuit, LineId};
use syrec_lang::syntax::{LoopMap, Module, Number, Program, Statement, VariableAccess};
use tracing::{info, instrument};

use crate::binding::{Binding, constant_line, constant_lines};
use crate::call_tree::CallTree;
use crate::error::{SynthError, SynthResult};
use crate::expression::{AssignStrategy, strategy_for};
use crate::settings::{AssignCounts, Statistics, SynthesisSettings};

/// Synthesize `program` into a reversible circuit.
///
/// The top-level module is chosen by [`SynthesisSettings::main_module`]; its
/// parameters and locals become the circuit's lines, followed by lines for
/// the locals of called modules and helper lines. On error no circuit is
/// returned.
///
/// # Example
///
/// ```
/// use syrec_ir::{constant_pattern, decode, encode, simulate};
/// use syrec_synth::{Statistics, SynthesisSettings, synthesize};
///
/// let program = syrec_lang::parse("module main(inout a(4), in b(4)) a += b").unwrap();
/// let mut statistics = Statistics::new();
/// let circuit = synthesize(&program, &SynthesisSettings::default(), &mut statistics).unwrap();
/// assert_eq!(statistics.num_lines, 8);
///
/// let (a, b): (Vec<_>, Vec<_>) = circuit.lines().iter().map(|l| l.id).partition(|id| id.0 < 4);
/// let mut input = constant_pattern(&circuit);
/// encode(&mut input, &a, 5);
/// encode(&mut input, &b, 7);
/// let output = simulate(&circuit, &input).unwrap();
/// assert_eq!(decode(&output, &a), 12);
/// ```
#[instrument(skip(program, settings, statistics))]
pub fn synthesize(
    program: &Program,
    settings: &SynthesisSettings,
    statistics: &mut Statistics,
) -> SynthResult<Circuit> {
    let start = Instant::now();
    let main = select_main(program, settings)?;
    info!(
        "Synthesizing module '{}' with {} strategy",
        main.name, settings.strategy
    );

    let mut synth = Synthesizer::new(program, strategy_for(settings.strategy), &main.name);
    synth.binding.push_frame();
    synth.binding.add_variables(&mut synth.circuit, &main.parameters)?;
    synth.binding.add_variables(&mut synth.circuit, &main.variables)?;
    synth.module_statements(&main.name, &main.statements)?;

    let Synthesizer {
        mut circuit,
        tree,
        counts,
        ..
    } = synth;
    for gate in tree.finish()? {
        circuit.append(gate)?;
    }

    statistics.runtime = start.elapsed();
    statistics.num_gates = circuit.num_gates();
    statistics.num_lines = circuit.num_lines();
    statistics.insert(counts);

    info!(
        "Synthesis completed: {} lines, {} gates in {:?}",
        circuit.num_lines(),
        circuit.num_gates(),
        statistics.runtime
    );
    Ok(circuit)
}

/// The explicitly named module, else `main`, else the first module.
fn select_main<'p>(program: &'p Program, settings: &SynthesisSettings) -> SynthResult<&'p Module> {
    match &settings.main_module {
        Some(name) => program
            .find_module(name)
            .ok_or_else(|| SynthError::UnknownModule(name.clone())),
        None => program
            .find_module("main")
            .or_else(|| program.modules.first())
            .ok_or_else(|| SynthError::UnknownModule("main".into())),
    }
}

/// State of one synthesis run.
pub(crate) struct Synthesizer<'a> {
    pub(crate) program: &'a Program,
    pub(crate) strategy: &'static dyn AssignStrategy,
    pub(crate) circuit: Circuit,
    pub(crate) tree: CallTree,
    pub(crate) binding: Binding,
    pub(crate) loop_map: LoopMap,
    pub(crate) counts: AssignCounts,
}

impl<'a> Synthesizer<'a> {
    fn new(program: &'a Program, strategy: &'static dyn AssignStrategy, name: &str) -> Self {
        Self {
            program,
            strategy,
            circuit: Circuit::new(name),
            tree: CallTree::new(),
            binding: Binding::new(),
            loop_map: LoopMap::default(),
            counts: AssignCounts::default(),
        }
    }

    /// Synthesize the body of a module, tagging errors with their position.
    pub(crate) fn module_statements(
        &mut self,
        module: &str,
        statements: &[Statement],
    ) -> SynthResult<()> {
        for (index, statement) in statements.iter().enumerate() {
            self.statement(statement)
                .map_err(|source| SynthError::InStatement {
                    module: module.to_string(),
                    index,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    /// Run `f` inside a call-tree scope controlled by `control`.
    pub(crate) fn scoped<T>(
        &mut self,
        control: Option<LineId>,
        f: impl FnOnce(&mut Self) -> SynthResult<T>,
    ) -> SynthResult<T> {
        self.tree.enter(control);
        let result = f(self);
        self.tree.leave()?;
        result
    }

    pub(crate) fn resolve(&self, access: &VariableAccess) -> SynthResult<Vec<LineId>> {
        self.binding.resolve(access, &self.loop_map)
    }

    /// Evaluate a number under the current loop variables.
    pub(crate) fn evaluate(&self, number: &Number) -> SynthResult<u64> {
        number
            .evaluate(&self.loop_map)
            .ok_or_else(|| SynthError::UnresolvedVariable {
                name: describe(number),
                reason: "number cannot be evaluated".into(),
            })
    }

    pub(crate) fn constant_lines(&mut self, width: u32, value: u64) -> SynthResult<Vec<LineId>> {
        constant_lines(&mut self.circuit, width, value)
    }

    /// Fresh helper lines initialized to 0.
    pub(crate) fn zero_lines(&mut self, width: usize) -> SynthResult<Vec<LineId>> {
        (0..width)
            .map(|_| constant_line(&mut self.circuit, false))
            .collect()
    }
}

fn describe(number: &Number) -> String {
    match number {
        Number::Constant(value) => value.to_string(),
        Number::LoopVariable(name) => format!("${name}"),
        Number::Expression { lhs, op, rhs } => {
            format!("({} {} {})", describe(lhs), op.symbol(), describe(rhs))
        }
    }
}
