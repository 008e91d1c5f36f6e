//! Action-preserving DFA minimization by partition refinement.
//!
//! Refines a partition of the state set until states in the same block
//! agree, symbol by symbol, on which block they transition into. One
//! representative state per final block yields the smallest automaton with
//! the same language.
//!
//! The initial partition groups states by `(is_accepting, rule)` — not by
//! the accept flag alone. Two rules can accept the same residual language
//! while carrying different semantic actions; splitting them up front
//! keeps minimization from merging their accepting states and silently
//! discarding one action.
//!
//! Minimization never mutates its input: it allocates a fresh automaton
//! and drops the old-block-to-new-state map once transitions are rewired.

use std::collections::BTreeMap;

use itertools::Itertools;

use super::{Dfa, DfaState, StateId, DEAD_STATE};
use crate::RuleId;

/// Per-state refinement signature: for each symbol, the current block of
/// the transition target, or `None` for a dead transition.
type Signature = Vec<Option<usize>>;

/// Minimize a DFA, preserving language and per-rule action identity.
pub fn minimize(dfa: &Dfa) -> Dfa {
    let n = dfa.states.len();
    if n <= 1 {
        return dfa.clone();
    }
    let num_symbols = dfa.num_symbols;

    // Step 1: initial partition by accept rule (None = non-accepting).
    let mut groups: BTreeMap<Option<RuleId>, Vec<StateId>> = BTreeMap::new();
    for (i, state) in dfa.states.iter().enumerate() {
        groups
            .entry(state.accept.map(|a| a.rule))
            .or_default()
            .push(i as StateId);
    }

    let mut blocks: Vec<Vec<StateId>> = Vec::with_capacity(groups.len());
    let mut block_of: Vec<usize> = vec![0; n];
    for (_rule, members) in groups {
        let idx = blocks.len();
        for &s in &members {
            block_of[s as usize] = idx;
        }
        blocks.push(members);
    }

    // Step 2: refine to fixpoint. Partitions only refine, so the block
    // count is strictly increasing until the partition is stable.
    loop {
        let mut next_blocks: Vec<Vec<StateId>> = Vec::with_capacity(blocks.len());
        for members in &blocks {
            let mut by_signature: BTreeMap<Signature, Vec<StateId>> = BTreeMap::new();
            for &state in members {
                let signature: Signature = (0..num_symbols)
                    .map(|symbol| {
                        let target = dfa.transition(state, symbol);
                        if target == DEAD_STATE {
                            None
                        } else {
                            Some(block_of[target as usize])
                        }
                    })
                    .collect_vec();
                by_signature.entry(signature).or_default().push(state);
            }
            next_blocks.extend(by_signature.into_values());
        }

        if next_blocks.len() == blocks.len() {
            break;
        }
        for (idx, members) in next_blocks.iter().enumerate() {
            for &s in members {
                block_of[s as usize] = idx;
            }
        }
        blocks = next_blocks;
    }

    // Step 3: one representative per block. A block is accepting iff any
    // member accepts; all accepting members share a rule (the initial
    // partition split by rule), and the smallest accept position is kept
    // for a deterministic representative.
    let mut minimized = Dfa::new(num_symbols);
    let mut block_to_new: Vec<StateId> = Vec::with_capacity(blocks.len());
    for members in &blocks {
        // Members are in ascending id order throughout refinement, so the
        // block itself is the canonical set identity of the new state.
        let mut state = DfaState::new(members.clone(), num_symbols);
        state.accept = members
            .iter()
            .filter_map(|&s| dfa.accept_of(s))
            .min_by_key(|a| a.position);
        block_to_new.push(minimized.add_state(state));
    }
    minimized.start = block_to_new[block_of[dfa.start as usize]];

    // Step 4: rewire transitions through the representative map.
    for (block_idx, members) in blocks.iter().enumerate() {
        let new_state = block_to_new[block_idx];
        let representative = members[0];
        for symbol in 0..num_symbols {
            let target = dfa.transition(representative, symbol);
            if target != DEAD_STATE {
                let new_target = block_to_new[block_of[target as usize]];
                minimized.set_transition(new_state, symbol, new_target);
            }
        }
    }

    minimized
}
