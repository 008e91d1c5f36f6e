//! Subset construction: NFA -> DFA conversion.
//!
//! Standard powerset construction: the start identity is the
//! epsilon-closure of the NFA start state, and each successor identity is
//! the epsilon-closure of a `move_set` result. Epsilon transitions are
//! eliminated by construction. Same worklist-and-dedup shape as the direct
//! constructor; only the identity computation differs.

use super::nfa::{epsilon_closure, move_set, Nfa};
use super::{Accept, Alphabet, Dfa, DfaState, KeyInterner, StateId, StateKey};
use crate::RuleId;

/// Convert an NFA to a raw DFA.
///
/// A deterministic state accepts iff its identity contains the NFA's
/// designated accept state; accepting states carry `rule` as their action
/// identity (the NFA covers one rule's expression).
pub fn subset_construction(alphabet: &Alphabet, nfa: &Nfa, rule: RuleId) -> Dfa {
    let num_symbols = alphabet.len();
    let mut dfa = Dfa::new(num_symbols);
    let mut interner = KeyInterner::new();
    let mut worklist: Vec<StateId> = Vec::new();

    let start_key: StateKey = epsilon_closure(nfa, &[nfa.start]);
    let mut start = DfaState::new(start_key.clone(), num_symbols);
    start.accept = accept_of(nfa, rule, &start.key);
    let start_id = dfa.add_state(start);
    interner.insert(start_key, start_id);
    worklist.push(start_id);

    while let Some(current) = worklist.pop() {
        for (symbol_index, &symbol) in alphabet.symbols().iter().enumerate() {
            let moved = move_set(nfa, &dfa.states[current as usize].key, symbol);
            if moved.is_empty() {
                continue; // no transition on this symbol
            }
            let target_key = epsilon_closure(nfa, &moved);

            let target = if let Some(existing) = interner.get(&target_key) {
                existing
            } else {
                let mut state = DfaState::new(target_key.clone(), num_symbols);
                state.accept = accept_of(nfa, rule, &state.key);
                let id = dfa.add_state(state);
                interner.insert(target_key, id);
                worklist.push(id);
                id
            };

            dfa.set_transition(current, symbol_index, target);
        }
    }

    dfa
}

/// Acceptance test for a subset identity: contains the NFA accept state.
fn accept_of(nfa: &Nfa, rule: RuleId, key: &[StateId]) -> Option<Accept> {
    key.binary_search(&nfa.accept)
        .ok()
        .map(|_| Accept { position: nfa.accept, rule })
}
