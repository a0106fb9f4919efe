//! Per-run bookkeeping for the A* loop: score tables, predecessor map and the open set. A fresh
//! [SearchContext] is built for every search and dropped afterwards, so nothing leaks between runs.
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::Position;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

struct SmallestCostHolder {
    estimated_cost: f64,
    sequence: f64,
    position: Position,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest estimate first; equal estimates go to the
        // entry pushed earliest.
        other
            .estimated_cost
            .total_cmp(&self.estimated_cost)
            .then_with(|| other.sequence.total_cmp(&self.sequence))
            .then_with(|| other.position.cmp(&self.position))
    }
}

pub(crate) struct SearchContext {
    g_score: FxIndexMap<Position, f64>,
    f_score: FxIndexMap<Position, f64>,
    came_from: FxIndexMap<Position, Position>,
    open_set: BinaryHeap<SmallestCostHolder>,
    open_membership: FxHashSet<Position>,
    closed: FxHashSet<Position>,
    sequence: f64,
    step_cost: f64,
}

impl SearchContext {
    /// The insertion sequence advances by `step_cost` rather than by one per push, which keeps
    /// tie-breaks on the same scale as the costs.
    pub fn new(step_cost: f64) -> SearchContext {
        SearchContext {
            g_score: FxIndexMap::default(),
            f_score: FxIndexMap::default(),
            came_from: FxIndexMap::default(),
            open_set: BinaryHeap::new(),
            open_membership: FxHashSet::default(),
            closed: FxHashSet::default(),
            sequence: 0.0,
            step_cost,
        }
    }

    /// Seeds the open set with the start position at sequence 0.
    pub fn open_start(&mut self, start: Position, estimate: f64) {
        self.g_score.insert(start, 0.0);
        self.f_score.insert(start, estimate);
        self.open_set.push(SmallestCostHolder {
            estimated_cost: estimate,
            sequence: self.sequence,
            position: start,
        });
        self.open_membership.insert(start);
    }

    pub fn g_score(&self, position: &Position) -> f64 {
        self.g_score.get(position).copied().unwrap_or(f64::INFINITY)
    }

    pub fn f_score(&self, position: &Position) -> f64 {
        self.f_score.get(position).copied().unwrap_or(f64::INFINITY)
    }

    /// Pops the open position with the lowest estimate, oldest first on ties.
    pub fn pop(&mut self) -> Option<Position> {
        let SmallestCostHolder { position, .. } = self.open_set.pop()?;
        self.open_membership.remove(&position);
        Some(position)
    }

    pub fn is_open(&self, position: &Position) -> bool {
        self.open_membership.contains(position)
    }

    pub fn close(&mut self, position: Position) {
        self.closed.insert(position);
    }

    pub fn is_closed(&self, position: &Position) -> bool {
        self.closed.contains(position)
    }

    /// Records `parent` as the predecessor of `position` if `tentative_g` improves on the best
    /// known cost. Scores only ever decrease.
    pub fn relax(
        &mut self,
        parent: Position,
        position: Position,
        tentative_g: f64,
        estimate: f64,
    ) -> bool {
        if tentative_g < self.g_score(&position) {
            self.came_from.insert(position, parent);
            self.g_score.insert(position, tentative_g);
            self.f_score.insert(position, tentative_g + estimate);
            true
        } else {
            false
        }
    }

    /// Adds a position to the open set using its current f-score.
    pub fn push(&mut self, position: Position) {
        self.sequence += self.step_cost;
        self.open_set.push(SmallestCostHolder {
            estimated_cost: self.f_score(&position),
            sequence: self.sequence,
            position,
        });
        self.open_membership.insert(position);
    }

    /// Walks the predecessor map back from `goal` and returns the positions in start to goal
    /// order.
    pub fn reconstruct_path(&self, goal: Position) -> Vec<Position> {
        let mut path: Vec<Position> =
            std::iter::successors(Some(goal), |p| self.came_from.get(p).copied()).collect();
        path.reverse();
        path
    }
}
