//! Scoped gate emission.
//!
//! Synthesis emits gates into the current node of a call tree. Entering a
//! scope adds a child node, optionally with a control line. Leaving it
//! splices the child's gates into its parent with that control added, so a
//! gate nested `n` scopes deep ends up controlled by every enclosing
//! control line.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use syrec_ir::{Gate, LineId};
use tracing::trace;

use crate::error::{SynthError, SynthResult};

/// A scope in the call tree.
#[derive(Debug, Default)]
struct Scope {
    /// Control added to every gate when the scope is left.
    control: Option<LineId>,
    /// Gates emitted in this scope, in order.
    gates: Vec<Gate>,
}

/// Tree of open scopes with the gates emitted into each.
#[derive(Debug)]
pub struct CallTree {
    tree: DiGraph<Scope, ()>,
    root: NodeIndex,
    current: NodeIndex,
}

impl Default for CallTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CallTree {
    /// Create a tree with only the root scope open.
    pub fn new() -> Self {
        let mut tree = DiGraph::new();
        let root = tree.add_node(Scope::default());
        Self {
            tree,
            root,
            current: root,
        }
    }

    /// Number of scopes entered and not yet left.
    pub fn depth(&self) -> usize {
        self.tree.node_count() - 1
    }

    /// Control lines of all open scopes, outermost first.
    pub fn controls(&self) -> Vec<LineId> {
        let mut controls = vec![];
        let mut node = self.current;
        while let Some(parent) = self.parent(node) {
            if let Some(control) = self.tree[node].control {
                controls.push(control);
            }
            node = parent;
        }
        controls.reverse();
        controls
    }

    /// Emit a gate into the current scope.
    pub fn emit(&mut self, gate: Gate) {
        self.tree[self.current].gates.push(gate);
    }

    /// Open a child scope of the current one. A `None` control opens a
    /// plain scope, as used for module calls.
    pub fn enter(&mut self, control: Option<LineId>) {
        let child = self.tree.add_node(Scope {
            control,
            gates: vec![],
        });
        self.tree.add_edge(self.current, child, ());
        self.current = child;
        trace!("Entered scope {} with control {:?}", child.index(), control);
    }

    /// Close the current scope, moving its gates into the parent.
    pub fn leave(&mut self) -> SynthResult<()> {
        let child = self.current;
        let parent = self
            .parent(child)
            .ok_or_else(|| SynthError::ScopeImbalance("leave at the root scope".into()))?;

        // Scopes close in LIFO order, so `child` is always the last node and
        // removing it does not move any other index.
        let scope = self
            .tree
            .remove_node(child)
            .ok_or_else(|| SynthError::ScopeImbalance("scope vanished".into()))?;
        let gates = scope
            .gates
            .into_iter()
            .map(|gate| match scope.control {
                Some(control) => gate.with_controls([control]),
                None => gate,
            });
        self.tree[parent].gates.extend(gates);
        self.current = parent;
        trace!("Left scope {} into {}", child.index(), parent.index());
        Ok(())
    }

    /// Run `f` inside a child scope. The scope is left even when `f` fails.
    pub fn scoped<T>(
        &mut self,
        control: Option<LineId>,
        f: impl FnOnce(&mut Self) -> SynthResult<T>,
    ) -> SynthResult<T> {
        self.enter(control);
        let result = f(self);
        self.leave()?;
        result
    }

    /// Consume the tree and return the root's gates.
    pub fn finish(self) -> SynthResult<Vec<Gate>> {
        if self.current != self.root {
            return Err(SynthError::ScopeImbalance(format!(
                "{} scopes still open",
                self.depth()
            )));
        }
        let mut tree = self.tree;
        Ok(std::mem::take(&mut tree[self.root].gates))
    }

    fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.tree.neighbors_directed(node, Direction::Incoming).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_nested_controls() {
        let mut tree = CallTree::new();
        tree.emit(Gate::not(LineId(0)));
        tree.enter(Some(LineId(1)));
        tree.enter(None);
        tree.enter(Some(LineId(2)));
        assert_eq!(tree.controls(), vec![LineId(1), LineId(2)]);
        assert_eq!(tree.depth(), 3);
        tree.emit(Gate::cnot(LineId(3), LineId(0)));
        tree.leave().unwrap();
        tree.leave().unwrap();
        tree.emit(Gate::not(LineId(4)));
        tree.leave().unwrap();

        let gates = tree.finish().unwrap();
        assert_eq!(gates.len(), 3);
        assert!(gates[0].controls.is_empty());
        assert_eq!(
            gates[1].controls,
            BTreeSet::from([LineId(1), LineId(2), LineId(3)])
        );
        assert_eq!(gates[2].controls, BTreeSet::from([LineId(1)]));
    }

    #[test]
    fn test_scope_imbalance() {
        let mut tree = CallTree::new();
        assert!(matches!(tree.leave(), Err(SynthError::ScopeImbalance(_))));

        tree.enter(Some(LineId(0)));
        assert!(matches!(tree.finish(), Err(SynthError::ScopeImbalance(_))));
    }

    #[test]
    fn test_scoped_leaves_on_error() {
        let mut tree = CallTree::new();
        let result: SynthResult<()> = tree.scoped(Some(LineId(0)), |t| {
            t.emit(Gate::not(LineId(1)));
            Err(SynthError::RepeatCheckFailed)
        });
        assert!(result.is_err());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.finish().unwrap().len(), 1);
    }
}
