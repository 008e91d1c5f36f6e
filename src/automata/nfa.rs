//! NFA contract for subset construction.
//!
//! The nondeterministic automaton itself is produced by an external
//! Thompson-style builder; this module defines the model it populates
//! (states with char-labeled and epsilon transitions, one designated
//! accept state) and the two set operations subset construction needs:
//! `move_set` and `epsilon_closure`. Both return sorted, deduplicated
//! state vectors so they can serve directly as canonical state keys.

use super::StateId;

/// NFA state with labeled and epsilon transitions.
#[derive(Debug, Clone, Default)]
pub struct NfaState {
    /// Labeled transitions: (symbol, target state).
    pub transitions: Vec<(char, StateId)>,
    /// Epsilon transitions: targets reachable without consuming input.
    pub epsilon: Vec<StateId>,
}

impl NfaState {
    /// Create a state with no transitions.
    pub fn new() -> Self {
        NfaState::default()
    }
}

/// A complete NFA: an arena of states with designated start and accept
/// states. A deterministic state derived from this NFA accepts iff its
/// identity set contains `accept`.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<NfaState>,
    pub start: StateId,
    pub accept: StateId,
}

impl Nfa {
    /// Create an NFA with a start state and a separate accept state.
    pub fn new() -> Self {
        Nfa { states: vec![NfaState::new(), NfaState::new()], start: 0, accept: 1 }
    }

    /// Add a state and return its id.
    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(NfaState::new());
        id
    }

    /// Add an epsilon transition from `from` to `to`.
    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from as usize].epsilon.push(to);
    }

    /// Add a labeled transition from `from` to `to` on `symbol`.
    pub fn add_transition(&mut self, from: StateId, to: StateId, symbol: char) {
        self.states[from as usize].transitions.push((symbol, to));
    }
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

/// States reachable from `states` by consuming exactly `symbol`.
///
/// Sorted and deduplicated; epsilon transitions are not followed here.
pub fn move_set(nfa: &Nfa, states: &[StateId], symbol: char) -> Vec<StateId> {
    let mut result: Vec<StateId> = Vec::new();
    for &state in states {
        for &(label, target) in &nfa.states[state as usize].transitions {
            if label == symbol {
                result.push(target);
            }
        }
    }
    result.sort_unstable();
    result.dedup();
    result
}

/// States reachable from `states` via zero or more epsilon transitions.
pub fn epsilon_closure(nfa: &Nfa, states: &[StateId]) -> Vec<StateId> {
    let mut closure: Vec<StateId> = states.to_vec();
    let mut stack: Vec<StateId> = states.to_vec();
    let mut visited = vec![false; nfa.states.len()];

    for &s in states {
        visited[s as usize] = true;
    }

    while let Some(state) = stack.pop() {
        for &target in &nfa.states[state as usize].epsilon {
            if !visited[target as usize] {
                visited[target as usize] = true;
                closure.push(target);
                stack.push(target);
            }
        }
    }

    closure.sort_unstable();
    closure.dedup();
    closure
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_closure_chain() {
        let mut nfa = Nfa::new();
        let s1 = nfa.add_state();
        let s2 = nfa.add_state();
        nfa.add_epsilon(nfa.start, s1);
        nfa.add_epsilon(s1, s2);

        let closure = epsilon_closure(&nfa, &[nfa.start]);
        assert_eq!(closure, vec![nfa.start, s1, s2]);
    }

    #[test]
    fn test_epsilon_closure_handles_cycles() {
        let mut nfa = Nfa::new();
        let s1 = nfa.add_state();
        nfa.add_epsilon(nfa.start, s1);
        nfa.add_epsilon(s1, nfa.start);

        let closure = epsilon_closure(&nfa, &[nfa.start]);
        assert_eq!(closure, vec![nfa.start, s1]);
    }

    #[test]
    fn test_move_set_collects_labeled_targets() {
        let mut nfa = Nfa::new();
        let s1 = nfa.add_state();
        let s2 = nfa.add_state();
        nfa.add_transition(nfa.start, s1, 'a');
        nfa.add_transition(nfa.start, s2, 'a');
        nfa.add_transition(nfa.start, s2, 'b');

        let mut on_a = move_set(&nfa, &[nfa.start], 'a');
        on_a.sort_unstable();
        assert_eq!(on_a, vec![s1, s2]);
        assert_eq!(move_set(&nfa, &[nfa.start], 'b'), vec![s2]);
        assert!(move_set(&nfa, &[nfa.start], 'c').is_empty());
    }
}
