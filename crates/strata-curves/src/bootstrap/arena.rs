//! Node storage for sequential bootstrapping.
//!
//! Nodes are appended in time order. At most one node is `Solving` at a
//! time and it is always the last; every earlier node is `Frozen` and
//! never written again.

use strata_core::types::Date;

use crate::error::{CurveError, CurveResult};

/// Lifecycle of a curve node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Solved; the value is final.
    Frozen,
    /// Under solution; only this node may change.
    Solving,
}

/// A curve node and the asset that calibrates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node date.
    pub date: Date,
    /// Curve time of the node.
    pub time: f64,
    /// Discount factor or index level.
    pub value: f64,
    /// Calibrating asset identifier.
    pub instrument: String,
    /// Lifecycle state.
    pub state: NodeState,
}

/// Append-only node arena.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a `Solving` node after the last frozen one.
    pub fn begin(&mut self, date: Date, time: f64, seed: f64, instrument: &str) -> CurveResult<()> {
        if let Some(open) = self.solving() {
            return Err(CurveError::invalid_curve(format!(
                "node for {} is still being solved",
                open.instrument
            )));
        }
        if let Some(last) = self.nodes.last() {
            if last.date == date {
                return Err(CurveError::DuplicateNode {
                    date: date.to_string(),
                    first: last.instrument.clone(),
                    second: instrument.to_string(),
                });
            }
            if time <= last.time {
                return Err(CurveError::invalid_curve(format!(
                    "node for {instrument} at t={time:.6} does not follow t={:.6}",
                    last.time
                )));
            }
        }
        if time <= 0.0 {
            return Err(CurveError::invalid_curve(format!(
                "node for {instrument} is not after the base date"
            )));
        }
        self.nodes.push(Node {
            date,
            time,
            value: seed,
            instrument: instrument.to_string(),
            state: NodeState::Solving,
        });
        Ok(())
    }

    /// Writes the value of the `Solving` node.
    pub fn set_solving(&mut self, value: f64) -> CurveResult<()> {
        match self.nodes.last_mut() {
            Some(node) if node.state == NodeState::Solving => {
                node.value = value;
                Ok(())
            }
            _ => Err(CurveError::invalid_curve("no node is being solved")),
        }
    }

    /// Freezes the `Solving` node and returns its value.
    pub fn freeze(&mut self) -> CurveResult<f64> {
        match self.nodes.last_mut() {
            Some(node) if node.state == NodeState::Solving => {
                node.state = NodeState::Frozen;
                Ok(node.value)
            }
            _ => Err(CurveError::invalid_curve("no node is being solved")),
        }
    }

    /// The `Solving` node, if any.
    #[must_use]
    pub fn solving(&self) -> Option<&Node> {
        self.nodes.last().filter(|n| n.state == NodeState::Solving)
    }

    /// The last frozen node.
    #[must_use]
    pub fn last_frozen(&self) -> Option<&Node> {
        self.nodes.iter().rev().find(|n| n.state == NodeState::Frozen)
    }

    /// `(time, value)` pairs with the `Solving` node set to `trial`.
    #[must_use]
    pub fn pairs_with_trial(&self, trial: f64) -> Vec<(f64, f64)> {
        self.nodes
            .iter()
            .map(|n| match n.state {
                NodeState::Frozen => (n.time, n.value),
                NodeState::Solving => (n.time, trial),
            })
            .collect()
    }

    /// `(time, value)` pairs of every node.
    #[must_use]
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.nodes.iter().map(|n| (n.time, n.value)).collect()
    }

    /// All nodes in time order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_solve_and_freeze() {
        let mut arena = NodeArena::new();
        arena.begin(date(2025, 4, 15), 0.25, 0.99, "AUD-Deposit-3M").unwrap();
        assert!(arena.solving().is_some());
        arena.set_solving(0.989).unwrap();
        assert_eq!(arena.freeze().unwrap(), 0.989);
        assert!(arena.solving().is_none());
        assert_eq!(arena.last_frozen().unwrap().value, 0.989);
    }

    #[test]
    fn test_frozen_nodes_are_not_writable() {
        let mut arena = NodeArena::new();
        arena.begin(date(2025, 4, 15), 0.25, 0.99, "AUD-Deposit-3M").unwrap();
        arena.freeze().unwrap();
        assert!(arena.set_solving(0.5).is_err());
        assert!(arena.freeze().is_err());
        assert_eq!(arena.nodes()[0].value, 0.99);
    }

    #[test]
    fn test_single_solving_node() {
        let mut arena = NodeArena::new();
        arena.begin(date(2025, 4, 15), 0.25, 0.99, "AUD-Deposit-3M").unwrap();
        assert!(arena.begin(date(2025, 7, 15), 0.5, 0.98, "AUD-Deposit-6M").is_err());
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let mut arena = NodeArena::new();
        arena.begin(date(2025, 4, 15), 0.25, 0.99, "AUD-Deposit-3M").unwrap();
        arena.freeze().unwrap();
        let err = arena
            .begin(date(2025, 4, 15), 0.25, 0.99, "AUD-Fra-0M-3M")
            .unwrap_err();
        assert!(matches!(err, CurveError::DuplicateNode { .. }));
    }

    #[test]
    fn test_trial_pairs() {
        let mut arena = NodeArena::new();
        arena.begin(date(2025, 4, 15), 0.25, 0.99, "AUD-Deposit-3M").unwrap();
        arena.freeze().unwrap();
        arena.begin(date(2025, 7, 15), 0.5, 0.98, "AUD-Deposit-6M").unwrap();
        assert_eq!(arena.pairs_with_trial(0.97), vec![(0.25, 0.99), (0.5, 0.97)]);
        assert_eq!(arena.pairs(), vec![(0.25, 0.99), (0.5, 0.98)]);
    }
}
