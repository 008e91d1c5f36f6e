//! Direct DFA construction from annotated expression-tree position sets.
//!
//! Builds a deterministic automaton straight from firstpos/followpos tables
//! without an intermediate nondeterministic stage: state identities are
//! position sets, the start state is the root's firstpos, and the successor
//! of a state on a symbol is the union of followpos over the state's
//! positions belonging to that symbol.
//!
//! The tables themselves come from an external expression-tree builder;
//! this module only defines the contract object and consumes it.

use std::collections::{BTreeMap, BTreeSet};

use super::{Accept, Alphabet, Dfa, DfaState, KeyInterner, PositionId, StateId, StateKey, TERMINATOR};
use crate::RuleId;

/// Position contract from the expression-tree builder, for one combined
/// expression `(r1 ■ | r2 ■ | ...)` covering every rule of the scanner.
///
/// - `positions_of(symbol)` for every alphabet symbol plus the reserved
///   [`TERMINATOR`] marker;
/// - `follow_pos(position)`;
/// - the root firstpos set;
/// - which rule each terminator position belongs to.
///
/// A position missing from the followpos table is a contract inconsistency
/// handled non-fatally: its followpos is the empty set, so it simply
/// contributes no transition.
#[derive(Debug, Clone, Default)]
pub struct PositionTables {
    positions: BTreeMap<char, BTreeSet<PositionId>>,
    follow: BTreeMap<PositionId, BTreeSet<PositionId>>,
    first: BTreeSet<PositionId>,
    rules: BTreeMap<PositionId, RuleId>,
}

impl PositionTables {
    /// Create empty tables.
    pub fn new() -> Self {
        PositionTables::default()
    }

    /// Record that `position` is a leaf occurrence of `symbol`.
    pub fn insert_position(&mut self, symbol: char, position: PositionId) {
        self.positions.entry(symbol).or_default().insert(position);
    }

    /// Record the followpos set of `position`.
    pub fn insert_follow(&mut self, position: PositionId, follow: impl IntoIterator<Item = PositionId>) {
        self.follow.entry(position).or_default().extend(follow);
    }

    /// Record a rule-terminator marker position and the rule it ends.
    ///
    /// Terminator positions must be assigned in rule-declaration order by
    /// the tree builder; the smallest position wins acceptance ties.
    pub fn mark_terminator(&mut self, position: PositionId, rule: RuleId) {
        self.positions.entry(TERMINATOR).or_default().insert(position);
        self.rules.insert(position, rule);
    }

    /// Set the root firstpos set.
    pub fn set_first(&mut self, first: impl IntoIterator<Item = PositionId>) {
        self.first = first.into_iter().collect();
    }

    /// Positions at which `symbol` occurs (empty if none recorded).
    pub fn positions_of(&self, symbol: char) -> impl Iterator<Item = PositionId> + '_ {
        self.positions.get(&symbol).into_iter().flatten().copied()
    }

    /// Whether `position` is an occurrence of `symbol`.
    fn position_has_symbol(&self, symbol: char, position: PositionId) -> bool {
        self.positions.get(&symbol).is_some_and(|set| set.contains(&position))
    }

    /// Followpos of `position`; a missing entry is the empty set.
    pub fn follow_pos(&self, position: PositionId) -> impl Iterator<Item = PositionId> + '_ {
        self.follow.get(&position).into_iter().flatten().copied()
    }

    /// Root firstpos set.
    pub fn first_pos(&self) -> impl Iterator<Item = PositionId> + '_ {
        self.first.iter().copied()
    }

    /// Acceptance test for a state identity: the smallest terminator
    /// position contained in it, with its rule.
    fn accept_of(&self, key: &[PositionId]) -> Option<Accept> {
        let terminators = self.positions.get(&TERMINATOR)?;
        // Both sides are sorted; the first hit is the smallest.
        let position = key.iter().copied().find(|p| terminators.contains(p))?;
        let rule = self.rules.get(&position).copied()?;
        Some(Accept { position, rule })
    }
}

/// Build a raw DFA from position tables by the direct method.
///
/// Seeds one state from the root firstpos set, then runs a worklist to
/// fixpoint: for each unprocessed state and each alphabet symbol, the
/// target identity is the union of followpos over the state's positions
/// that occur at that symbol. Empty target sets record no transition;
/// identities already seen reuse the existing state.
pub fn direct_construction(alphabet: &Alphabet, tables: &PositionTables) -> Dfa {
    let num_symbols = alphabet.len();
    let mut dfa = Dfa::new(num_symbols);
    let mut interner = KeyInterner::new();
    let mut worklist: Vec<StateId> = Vec::new();

    let start_key: StateKey = tables.first_pos().collect();
    let mut start = DfaState::new(start_key.clone(), num_symbols);
    start.accept = tables.accept_of(&start.key);
    let start_id = dfa.add_state(start);
    interner.insert(start_key, start_id);
    worklist.push(start_id);

    while let Some(current) = worklist.pop() {
        for (symbol_index, &symbol) in alphabet.symbols().iter().enumerate() {
            // Union of followpos over this state's positions of `symbol`
            let mut target_key: BTreeSet<PositionId> = BTreeSet::new();
            for &pos in &dfa.states[current as usize].key {
                if tables.position_has_symbol(symbol, pos) {
                    target_key.extend(tables.follow_pos(pos));
                }
            }

            if target_key.is_empty() {
                continue; // no transition on this symbol
            }
            let target_key: StateKey = target_key.into_iter().collect();

            let target = if let Some(existing) = interner.get(&target_key) {
                existing
            } else {
                let mut state = DfaState::new(target_key.clone(), num_symbols);
                state.accept = tables.accept_of(&state.key);
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
