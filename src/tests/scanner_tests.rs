//! End-to-end scanner tests: maximal munch, declaration-order tie-breaks,
//! action preservation through minimization, and error recovery.

use crate::action::{ActionPayload, HandlerTable};
use crate::automata::direct::{direct_construction, PositionTables};
use crate::automata::Alphabet;
use crate::compile_tables;
use crate::scanner::scan;
use crate::RuleSet;

#[test]
fn test_maximal_munch_prefers_longer_rule() {
    // rule 0: "a", rule 1: "ab" — input "ab" is one token, not "a" + junk.
    let mut t = PositionTables::new();
    t.insert_position('a', 1);
    t.mark_terminator(2, 0);
    t.insert_position('a', 3);
    t.insert_position('b', 4);
    t.mark_terminator(5, 1);
    t.insert_follow(1, [2]);
    t.insert_follow(3, [4]);
    t.insert_follow(4, [5]);
    t.set_first([1, 3]);

    let alphabet = Alphabet::new(['a', 'b']);
    let (dfa, _) = compile_tables(&alphabet, &t);

    let mut rules = RuleSet::new();
    rules.push("A", ActionPayload::None);
    rules.push("AB", ActionPayload::None);

    let mut evaluator = HandlerTable::new();
    let report = scan(&dfa, &alphabet, &rules, "ab", &mut evaluator);

    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.tokens[0].text, "ab");
    assert_eq!(report.tokens[0].rule, 1);
    assert!(report.is_clean());
}

/// Keyword "if" (rule 0, declared first) vs identifier `[if]+` (rule 1).
fn keyword_vs_ident() -> (Alphabet, PositionTables) {
    let mut t = PositionTables::new();
    // "if": i(1) f(2), terminator 3
    t.insert_position('i', 1);
    t.insert_position('f', 2);
    t.mark_terminator(3, 0);
    t.insert_follow(1, [2]);
    t.insert_follow(2, [3]);
    // [if]+: one class position (4) occurring at both symbols, terminator 5
    t.insert_position('i', 4);
    t.insert_position('f', 4);
    t.mark_terminator(5, 1);
    t.insert_follow(4, [4, 5]);
    t.set_first([1, 4]);
    (Alphabet::new(['i', 'f']), t)
}

#[test]
fn test_tie_break_earlier_declared_rule_wins() {
    let (alphabet, t) = keyword_vs_ident();
    let (dfa, _) = compile_tables(&alphabet, &t);

    let mut rules = RuleSet::new();
    rules.push("KW_IF", ActionPayload::None);
    rules.push("IDENT", ActionPayload::None);

    let mut evaluator = HandlerTable::new();

    // "if" matches both rules at the same length: the keyword wins.
    let report = scan(&dfa, &alphabet, &rules, "if", &mut evaluator);
    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.tokens[0].rule_name, "KW_IF");

    // Texts only the identifier rule matches keep its action.
    let report = scan(&dfa, &alphabet, &rules, "fi", &mut evaluator);
    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.tokens[0].rule_name, "IDENT");

    // "iff" extends past the keyword: maximal munch hands it to the
    // identifier rule as one token.
    let report = scan(&dfa, &alphabet, &rules, "iff", &mut evaluator);
    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.tokens[0].rule_name, "IDENT");
    assert_eq!(report.tokens[0].text, "iff");
}

#[test]
fn test_action_preservation_through_minimization() {
    // rule 0: x+ (action A), rule 1: y+ (action B). Their accepting
    // states have identical transition behavior shape; minimization must
    // keep them apart so each language keeps its own action.
    let mut t = PositionTables::new();
    t.insert_position('x', 1);
    t.mark_terminator(2, 0);
    t.insert_position('y', 3);
    t.mark_terminator(4, 1);
    t.insert_follow(1, [1, 2]);
    t.insert_follow(3, [3, 4]);
    t.set_first([1, 3]);

    let alphabet = Alphabet::new(['x', 'y']);
    let (dfa, _) = compile_tables(&alphabet, &t);

    let mut rules = RuleSet::new();
    let mut evaluator = HandlerTable::new();
    let a = evaluator.register(|_, _| Ok(Some("A".into())));
    let b = evaluator.register(|_, _| Ok(Some("B".into())));
    rules.push("XS", ActionPayload::Registered(a));
    rules.push("YS", ActionPayload::Registered(b));

    // One x-run token then one y-run token.
    let report = scan(&dfa, &alphabet, &rules, "xxxyyy", &mut evaluator);
    assert_eq!(report.tokens.len(), 2);
    assert_eq!(report.tokens[0].output.as_deref(), Some("A"));
    assert_eq!(report.tokens[1].output.as_deref(), Some("B"));
}

#[test]
fn test_error_recovery_skips_one_character() {
    // Rules only for "a" and "b"; input "a#b" yields both tokens plus one
    // lexical error at the offset of '#', resuming right after it.
    let mut t = PositionTables::new();
    t.insert_position('a', 1);
    t.mark_terminator(2, 0);
    t.insert_position('b', 3);
    t.mark_terminator(4, 1);
    t.insert_follow(1, [2]);
    t.insert_follow(3, [4]);
    t.set_first([1, 3]);

    let alphabet = Alphabet::new(['a', 'b']);
    let (dfa, _) = compile_tables(&alphabet, &t);

    let mut rules = RuleSet::new();
    rules.push("A", ActionPayload::None);
    rules.push("B", ActionPayload::None);

    let mut evaluator = HandlerTable::new();
    let report = scan(&dfa, &alphabet, &rules, "a#b", &mut evaluator);

    assert_eq!(report.tokens.len(), 2);
    assert_eq!(report.tokens[0].text, "a");
    assert_eq!(report.tokens[1].text, "b");
    assert_eq!(report.tokens[1].start, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].offset, 1);
    assert_eq!(report.errors[0].character, '#');
}

#[test]
fn test_end_to_end_longest_match_over_rules() {
    // rule 0: a*b (action "A"), rule 1: b (action "B"); input "aab" is a
    // single token "aab" with action "A" — the longest match beats rule
    // 1's one-character match and the scan ends exactly at input length.
    let mut t = PositionTables::new();
    // a*b: a(1) under star, b(2), terminator 3
    t.insert_position('a', 1);
    t.insert_position('b', 2);
    t.mark_terminator(3, 0);
    t.insert_follow(1, [1, 2]);
    t.insert_follow(2, [3]);
    // b: b(4), terminator 5
    t.insert_position('b', 4);
    t.mark_terminator(5, 1);
    t.insert_follow(4, [5]);
    t.set_first([1, 2, 4]);

    let alphabet = Alphabet::new(['a', 'b']);
    let (dfa, stats) = compile_tables(&alphabet, &t);
    assert!(stats.num_minimized_states <= stats.num_raw_states);

    let mut rules = RuleSet::new();
    let mut evaluator = HandlerTable::new();
    let a = evaluator.register(|_, _| Ok(Some("A".into())));
    let b = evaluator.register(|_, _| Ok(Some("B".into())));
    rules.push("AB_STAR", ActionPayload::Registered(a));
    rules.push("B", ActionPayload::Registered(b));

    let report = scan(&dfa, &alphabet, &rules, "aab", &mut evaluator);

    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.tokens[0].text, "aab");
    assert_eq!(report.tokens[0].end, 3);
    assert_eq!(report.tokens[0].output.as_deref(), Some("A"));
    assert!(report.is_clean());

    // A bare "b" still matches: both rules tie at length one and the
    // earlier-declared a*b rule takes it.
    let report = scan(&dfa, &alphabet, &rules, "b", &mut evaluator);
    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.tokens[0].output.as_deref(), Some("A"));
}

#[test]
fn test_direct_construction_matches_scan_expectations() {
    // Raw (unminimized) automata drive the scanner identically; the
    // recognizer contract does not depend on minimization having run.
    let mut t = PositionTables::new();
    t.insert_position('a', 1);
    t.mark_terminator(2, 0);
    t.insert_follow(1, [1, 2]);
    t.set_first([1]);

    let alphabet = Alphabet::new(['a']);
    let raw = direct_construction(&alphabet, &t);

    let mut rules = RuleSet::new();
    rules.push("AS", ActionPayload::None);

    let mut evaluator = HandlerTable::new();
    let report = scan(&raw, &alphabet, &rules, "aaaa", &mut evaluator);
    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.tokens[0].text, "aaaa");
}
