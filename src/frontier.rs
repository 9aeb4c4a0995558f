use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::State;

/// A heap entry: an explicit priority key plus the node it points at.
#[derive(Debug, Clone)]
struct Entry {
    /// Total path cost of the node
    total_cost: u64,
    /// Insertion sequence for stable tie-breaking
    seq: u64,
    node: usize,
    state: State,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.total_cost == other.total_cost && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: cheapest first, then earliest inserted
        other
            .total_cost
            .cmp(&self.total_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Cost-ordered set of nodes waiting to be expanded.
///
/// At most one node per state is live at a time. Replaced, evicted and
/// purged nodes stay in the heap and are skipped when popped.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
    live: HashMap<State, usize>,
    next_seq: u64,
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues `node`, replacing any node already queued for the same state.
    pub(crate) fn push(&mut self, node: usize, state: &State, total_cost: u64) {
        self.live.insert(state.clone(), node);
        self.heap.push(Entry {
            total_cost,
            seq: self.next_seq,
            node,
            state: state.clone(),
        });
        self.next_seq += 1;
    }

    /// Removes and returns the cheapest live node.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        while let Some(entry) = self.heap.pop() {
            if self.live.get(&entry.state) == Some(&entry.node) {
                self.live.remove(&entry.state);
                return Some(entry.node);
            }
        }
        None
    }

    /// Drops the queued node for `state`, if any.
    pub(crate) fn evict(&mut self, state: &State) -> bool {
        self.live.remove(state).is_some()
    }

    /// Drops every queued node whose state fails `keep`; returns how many were dropped.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&State) -> bool) -> usize {
        let before = self.live.len();
        self.live.retain(|state, _| keep(state));
        before - self.live.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ItemId, Vocabulary};

    fn states(n: usize) -> (Vec<State>, ItemId) {
        let vocabulary = Vocabulary::new(["plank"]).unwrap();
        let plank = vocabulary.id("plank").unwrap();
        let states = (0..n)
            .map(|i| {
                let mut state = vocabulary.empty_state();
                state.set(plank, i as u32);
                state
            })
            .collect();
        (states, plank)
    }

    #[test]
    fn test_pops_cheapest_first() {
        let (states, _) = states(3);
        let mut frontier = Frontier::new();
        frontier.push(0, &states[0], 5);
        frontier.push(1, &states[1], 1);
        frontier.push(2, &states[2], 3);

        assert_eq!(frontier.pop(), Some(1));
        assert_eq!(frontier.pop(), Some(2));
        assert_eq!(frontier.pop(), Some(0));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let (states, _) = states(3);
        let mut frontier = Frontier::new();
        frontier.push(7, &states[0], 2);
        frontier.push(3, &states[1], 2);
        frontier.push(5, &states[2], 2);

        assert_eq!(frontier.pop(), Some(7));
        assert_eq!(frontier.pop(), Some(3));
        assert_eq!(frontier.pop(), Some(5));
    }

    #[test]
    fn test_push_replaces_node_for_same_state() {
        let (states, _) = states(1);
        let mut frontier = Frontier::new();
        frontier.push(0, &states[0], 9);
        frontier.push(1, &states[0], 4);

        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.pop(), Some(1));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_evict() {
        let (states, _) = states(2);
        let mut frontier = Frontier::new();
        frontier.push(0, &states[0], 1);
        frontier.push(1, &states[1], 2);

        assert!(frontier.evict(&states[0]));
        assert!(!frontier.evict(&states[0]));
        assert_eq!(frontier.pop(), Some(1));
        assert_eq!(frontier.len(), 0);
    }

    #[test]
    fn test_retain_purges_matching_states() {
        let (states, plank) = states(4);
        let mut frontier = Frontier::new();
        for (node, state) in states.iter().enumerate() {
            frontier.push(node, state, node as u64);
        }

        let purged = frontier.retain(|state| state.get(plank) >= 2);
        assert_eq!(purged, 2);
        assert_eq!(frontier.pop(), Some(2));
        assert_eq!(frontier.pop(), Some(3));
        assert_eq!(frontier.pop(), None);
    }
}
