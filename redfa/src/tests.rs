use crate::dfa::{Dfa, DfaState, UnknownSymbolError};
use crate::format::{dot, FormatError, Record};
use crate::nfa::Nfa;
use crate::parser::{self, InvalidRegexError};
use crate::regex::{MalformedPostfixError, Regex, Token};
use ::regex::Regex as LibRegex;
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;
use std::rc::Rc;

fn build(pattern: &str) -> (Nfa, Dfa, Dfa) {
    let regex = parser::regex(pattern).unwrap();
    let nfa = regex.to_nfa().unwrap();
    let dfa = nfa.to_dfa();
    let minimal = dfa.minimized();
    (nfa, dfa, minimal)
}

fn postfix_of(pattern: &str) -> String {
    parser::regex(pattern).unwrap().to_string()
}

fn path_names(run: &crate::dfa::Run) -> Vec<&str> {
    run.path.iter().map(|s| s.as_ref()).collect()
}

#[test]
fn postfix_golden() {
    assert_eq!(postfix_of("a"), "a");
    assert_eq!(postfix_of("ab"), "ab.");
    assert_eq!(postfix_of("a|b"), "ab|");
    assert_eq!(postfix_of("ab|c"), "ab.c|");
    assert_eq!(postfix_of("a*"), "a*");
    assert_eq!(postfix_of("a+"), "a+");
    assert_eq!(postfix_of("a?b"), "a?b.");
    assert_eq!(postfix_of("(ab)+c"), "ab.+c.");
    assert_eq!(postfix_of("(a|b)*abb"), "ab|*a.b.b.");
    assert_eq!(postfix_of("0*1(0|ε)"), "0*1.0ε|.");
}

#[test]
fn epsilon_aliases() {
    assert_eq!(postfix_of("e"), "ε");
    assert_eq!(postfix_of("ε"), "ε");
    assert_eq!(postfix_of("a|e"), "aε|");
}

#[test]
fn bracket_classes_expand_sorted() {
    assert_eq!(postfix_of("[abc]"), "ab|c|");
    assert_eq!(postfix_of("[cba]"), "ab|c|");
    assert_eq!(postfix_of("[a-c]"), "ab|c|");
    assert_eq!(postfix_of("[a-c]{2}"), "ab|c|ab|c|.");
    assert_eq!(postfix_of("[a-a]"), "a");
}

#[test]
fn bracket_class_symbols_stay_literal() {
    // Class expansion must escape nothing and alias nothing: 'e' from a range is a
    // real symbol, not ε
    let nfa = parser::regex("[d-f]").unwrap().to_nfa().unwrap();
    assert!(nfa.accepts_graphemes("e"));
    assert!(!nfa.accepts_graphemes(""));

    // Metacharacters listed in a class come out as literals
    let regex = parser::regex("[.*]").unwrap();
    assert_eq!(
        regex.postfix,
        vec![
            Token::Literal("*".into()),
            Token::Literal(".".into()),
            Token::Alt,
        ]
    );
}

#[test]
fn quantifiers_unroll() {
    assert_eq!(postfix_of("a{3}"), "aa.a.");
    assert_eq!(postfix_of("a{1,3}"), "aa?.a?.");
    assert_eq!(postfix_of("a{0,2}"), "a?a?.");
    assert_eq!(postfix_of("(ab){2}"), "ab.ab..");
}

#[test]
fn quantified_group_spans_whole_group() {
    let (_, _, minimal) = build("(ab){2}");
    assert!(minimal.accepts_graphemes("abab"));
    assert!(!minimal.accepts_graphemes("ab"));
    assert!(!minimal.accepts_graphemes("abb"));
}

#[test]
fn wildcard_expands_to_ascii_alternation() {
    let regex = parser::regex(".").unwrap();
    // 62 alternatives joined by 61 alternation operators
    assert_eq!(regex.postfix.len(), 123);
    // The wildcard matches a literal 'e' even though a bare 'e' denotes ε
    assert!(regex.postfix.contains(&Token::Literal("e".into())));
    let nfa = regex.to_nfa().unwrap();
    assert!(nfa.accepts_graphemes("e"));
    assert!(nfa.accepts_graphemes("Q"));
    assert!(nfa.accepts_graphemes("7"));
    assert!(!nfa.accepts_graphemes("!"));
}

#[test]
fn escapes_resolve_to_literals() {
    assert_eq!(postfix_of("\\n"), "\n");
    let regex = parser::regex("\\*a").unwrap();
    assert_eq!(
        regex.postfix,
        vec![
            Token::Literal("*".into()),
            Token::Literal("a".into()),
            Token::Concat,
        ]
    );
    let nfa = regex.to_nfa().unwrap();
    assert!(nfa.accepts_graphemes("*a"));
    assert!(!nfa.accepts_graphemes("a"));
}

#[test]
fn validation_rejects_bad_expressions() {
    use InvalidRegexError::*;
    assert_eq!(parser::regex(""), Err(Empty));
    assert_eq!(parser::regex(&"a".repeat(1001)), Err(TooLong));
    assert_eq!(parser::regex("(a"), Err(UnmatchedOpen('(')));
    assert_eq!(parser::regex("a)"), Err(UnmatchedClose(')')));
    assert_eq!(parser::regex("[a"), Err(UnmatchedOpen('[')));
    assert_eq!(parser::regex("a]"), Err(UnmatchedClose(']')));
    assert_eq!(parser::regex("a{2"), Err(UnmatchedOpen('{')));
    assert_eq!(parser::regex("a}"), Err(UnmatchedClose('}')));
    assert_eq!(parser::regex("a\\"), Err(TrailingBackslash));
    assert_eq!(parser::regex("\\q"), Err(InvalidEscape('q')));
    assert_eq!(parser::regex("*a"), Err(LeadingOperator('*')));
    assert_eq!(
        parser::regex("(*a)"),
        Err(OperatorAfter { op: '*', prev: '(' })
    );
    assert_eq!(
        parser::regex("a|+b"),
        Err(OperatorAfter { op: '+', prev: '|' })
    );
    assert_eq!(
        parser::regex("a**"),
        Err(ConsecutiveOperators {
            first: '*',
            second: '*'
        })
    );
    assert_eq!(parser::regex("|a"), Err(MisplacedAlternation));
    assert_eq!(parser::regex("a|"), Err(MisplacedAlternation));
    assert_eq!(parser::regex("a||b"), Err(MisplacedAlternation));
    assert_eq!(parser::regex("(|a)"), Err(MisplacedAlternation));
    assert_eq!(parser::regex("a-b"), Err(InvalidCharacter('-')));
}

#[test]
fn validation_rejects_bad_classes_and_quantifiers() {
    use InvalidRegexError::*;
    assert_eq!(parser::regex("[]"), Err(EmptyClass));
    assert_eq!(
        parser::regex("[z-a]"),
        Err(DescendingRange {
            start: 'z',
            end: 'a'
        })
    );
    assert_eq!(parser::regex("a{21}"), Err(QuantifierTooLarge { max: 21 }));
    assert_eq!(
        parser::regex("a{3,2}"),
        Err(QuantifierBounds { min: 3, max: 2 })
    );
    assert_eq!(parser::regex("a{x}"), Err(BadQuantifier("x".to_string())));
    assert_eq!(parser::regex("a{}"), Err(BadQuantifier(String::new())));
    assert_eq!(parser::regex("{2}a"), Err(QuantifierWithoutAtom));
    assert_eq!(parser::regex("a{0}"), Err(ExpandsToNothing));
    assert_eq!(parser::regex("a()b"), Err(EmptyGroup));
    // A zero-repeat can erase an operand of an enclosing operator
    assert_eq!(parser::regex("a|b{0}"), Err(DanglingOperator));
}

#[test]
fn escaped_operators_stay_out_of_operator_validation() {
    // "\*\*" is two literal stars, not consecutive operators
    let regex = parser::regex("\\*\\*").unwrap();
    let nfa = regex.to_nfa().unwrap();
    assert!(nfa.accepts_graphemes("**"));
}

#[test]
fn thompson_literal_shape() {
    let nfa = parser::regex("a").unwrap().to_nfa().unwrap();
    assert_eq!(nfa.states().len(), 2);
    assert_eq!(nfa.states()[0].name(), "s0");
    assert_eq!(nfa.states()[1].name(), "s1");
    assert!(nfa.states()[0].is_initial());
    assert!(nfa.states()[1].is_accepting());
    assert_eq!(nfa.states()[0].transitions()[0], vec![1]);
}

#[test]
fn thompson_single_accepting_state() {
    for pattern in ["a", "a|b", "a*", "a+", "(a|b)*abb", "a?b", "[a-d]{1,3}"] {
        let nfa = parser::regex(pattern).unwrap().to_nfa().unwrap();
        let accepting = nfa.states().iter().filter(|s| s.is_accepting()).count();
        assert_eq!(accepting, 1, "pattern {pattern}");
        let initial = nfa.states().iter().filter(|s| s.is_initial()).count();
        assert_eq!(initial, 1, "pattern {pattern}");
    }
}

#[test]
fn epsilon_closure() {
    let nfa = parser::regex("a*").unwrap().to_nfa().unwrap();
    let closure = nfa.closure(nfa.initial_state_index()).unwrap();
    // The loop entry and the accepting state are one ε-hop from the start
    assert!(closure.contains(&nfa.initial_state_index()));
    assert_eq!(closure.len(), 3);
    assert!(nfa.closure(nfa.states().len()).is_none());
}

#[test]
fn automaton_introspection() {
    let (nfa, dfa, _) = build("a|b");
    assert!(nfa.has_epsilon_moves());
    assert!(nfa.graphemes_only());
    assert!(dfa.graphemes_only());
    assert_eq!(dfa.initial_state_index(), 0);
    assert!(nfa.initial_state().is_initial());

    let mut eval = nfa.evaluator();
    assert!(!eval.current_states().is_empty());
    eval.step("a");
    assert!(eval.current_states().iter().any(|s| s.is_accepting()));
    assert!(!eval.current_states_idx().is_empty());

    let mut eval = dfa.evaluator();
    assert_eq!(eval.current_state_idx(), Some(0));
    assert!(eval.step("a").is_some());
    assert!(eval.current_state().map_or(false, |s| s.is_accepting()));
}

#[test]
fn plus_requires_at_least_one_pass() {
    let nfa = parser::regex("a+").unwrap().to_nfa().unwrap();
    assert!(!nfa.accepts_graphemes(""));
    assert!(nfa.accepts_graphemes("a"));
    assert!(nfa.accepts_graphemes("aaa"));

    let star = parser::regex("a*").unwrap().to_nfa().unwrap();
    assert!(star.accepts_graphemes(""));
}

#[test]
fn malformed_postfix_is_rejected() {
    let underflow = Regex {
        postfix: vec![Token::Concat],
    };
    assert_eq!(
        underflow.to_nfa(),
        Err(MalformedPostfixError::StackUnderflow(Token::Concat))
    );

    let leftover = Regex {
        postfix: vec![Token::Literal("a".into()), Token::Literal("b".into())],
    };
    assert_eq!(
        leftover.to_nfa(),
        Err(MalformedPostfixError::LeftoverFragments(2))
    );

    let empty = Regex { postfix: vec![] };
    assert_eq!(
        empty.to_nfa(),
        Err(MalformedPostfixError::LeftoverFragments(0))
    );
}

#[test]
fn subset_construction_names_by_discovery() {
    let (_, dfa, _) = build("a|b");
    let names: Vec<&str> = dfa.states().iter().map(|s| s.name()).collect();
    assert_eq!(names, ["q0", "q1", "q2"]);
    assert_eq!(dfa.initial_state().name(), "q0");
    // Sorted symbol order: 'a' discovers q1, 'b' discovers q2
    assert_eq!(dfa.states()[0].transitions(), [Some(1), Some(2)]);
    assert!(dfa.states()[1].is_accepting());
    assert!(dfa.states()[2].is_accepting());
}

#[test]
fn subset_construction_leaves_dead_moves_out() {
    let (_, dfa, _) = build("ab");
    // alphabet is [a, b]; q0 moves only on 'a'
    assert_eq!(dfa.states()[0].transitions(), [Some(1), None]);
}

#[test]
fn determinization_is_deterministic_and_idempotent() {
    let (nfa, dfa, _) = build("(a|b)*abb");
    assert_eq!(nfa.to_dfa(), dfa);

    // Determinizing an already deterministic automaton changes nothing but names
    let again = dfa.clone().to_nfa().to_dfa();
    assert_eq!(again.states().len(), dfa.states().len());
    assert!(again.equivalent_to(&dfa));
}

#[test]
fn minimization_gate_four_states() {
    let (_, dfa, minimal) = build("(a|b)*abb");
    assert_eq!(minimal.states().len(), 4);
    assert!(minimal.states().len() <= dfa.states().len());
    assert!(minimal.equivalent_to(&dfa));
    assert!(dfa.equivalent_to(&minimal));
}

#[test]
fn minimization_block_naming() {
    // q1 and q2 of a|b are merged into m0; the untouched block keeps its name
    let (_, _, minimal) = build("a|b");
    let names: Vec<&str> = minimal.states().iter().map(|s| s.name()).collect();
    assert_eq!(names, ["m0", "q0"]);
    assert_eq!(minimal.initial_state().name(), "q0");
    assert!(minimal.states()[0].is_accepting());

    // Minimizing a minimal DFA is the identity here: every block is a singleton
    assert_eq!(minimal.minimized(), minimal);
}

#[test]
fn minimization_drops_unreachable_states() {
    let alphabet: Rc<[Rc<str>]> = vec![Rc::<str>::from("a")].into();
    let dfa = Dfa {
        alphabet,
        states: vec![
            DfaState {
                name: Rc::from("q0"),
                initial: true,
                accepting: true,
                transitions: vec![Some(0)],
            },
            DfaState {
                name: Rc::from("q1"),
                initial: false,
                accepting: false,
                transitions: vec![Some(0)],
            },
        ],
        initial_state: 0,
    };
    assert_eq!(dfa.unreachable_states().len(), 1);
    let minimal = dfa.minimized();
    assert_eq!(minimal.states().len(), 1);
    assert_eq!(minimal.states()[0].name(), "q0");
    assert_eq!(minimal.states()[0].transitions(), [Some(0)]);
}

#[test]
fn minimization_of_empty_language() {
    let alphabet: Rc<[Rc<str>]> = vec![Rc::<str>::from("a")].into();
    let dfa = Dfa {
        alphabet,
        states: vec![
            DfaState {
                name: Rc::from("q0"),
                initial: true,
                accepting: false,
                transitions: vec![Some(1)],
            },
            DfaState {
                name: Rc::from("q1"),
                initial: false,
                accepting: false,
                transitions: vec![Some(0)],
            },
        ],
        initial_state: 0,
    };
    let minimal = dfa.minimized();
    assert_eq!(minimal.states().len(), 1);
    assert_eq!(minimal.states()[0].name(), "m0");
    assert!(!minimal.states()[0].is_accepting());
    // The dead state has no outgoing transitions at all
    assert_eq!(minimal.states()[0].transitions(), [None]);
}

#[test]
fn minimization_of_all_accepting() {
    let alphabet: Rc<[Rc<str>]> = vec![Rc::<str>::from("a")].into();
    let dfa = Dfa {
        alphabet,
        states: vec![
            DfaState {
                name: Rc::from("q0"),
                initial: true,
                accepting: true,
                transitions: vec![Some(1)],
            },
            DfaState {
                name: Rc::from("q1"),
                initial: false,
                accepting: true,
                transitions: vec![Some(0)],
            },
        ],
        initial_state: 0,
    };
    let minimal = dfa.minimized();
    assert_eq!(minimal.states().len(), 1);
    assert_eq!(minimal.states()[0].name(), "m0");
    assert!(minimal.states()[0].is_accepting());
    assert_eq!(minimal.states()[0].transitions(), [Some(0)]);
}

#[test]
fn simulation_paths() {
    let (_, _, minimal) = build("a");
    let run = minimal.simulate_graphemes("a");
    assert!(run.accepted);
    assert_eq!(path_names(&run), ["q0", "q1"]);

    let run = minimal.simulate_graphemes("");
    assert!(!run.accepted);
    assert_eq!(path_names(&run), ["q0"]);

    // 'b' is outside the alphabet: the walk stops where it stands
    let run = minimal.simulate_graphemes("b");
    assert!(!run.accepted);
    assert_eq!(path_names(&run), ["q0"]);

    // "aa" runs off the defined transitions after the first 'a'
    let run = minimal.simulate_graphemes("aa");
    assert!(!run.accepted);
    assert_eq!(path_names(&run), ["q0", "q1"]);
}

#[test]
fn strict_symbol_splitting() {
    let (_, _, minimal) = build("a");
    assert_eq!(minimal.symbols_of("aa"), Ok(vec!["a", "a"]));
    assert_eq!(
        minimal.symbols_of("ab"),
        Err(UnknownSymbolError {
            symbol: "b".to_string()
        })
    );
}

#[test]
fn evaluator_steps() {
    let (_, _, minimal) = build("ab");
    let mut eval = minimal.evaluator();
    assert!(!eval.is_accepting());
    assert!(eval.step("a").is_some());
    assert!(eval.step("b").is_some());
    assert!(eval.is_accepting());
    // Stuck evaluators stay stuck
    assert!(eval.step("a").is_none());
    assert!(eval.step("b").is_none());
    assert!(!eval.is_accepting());
}

#[test]
fn nfa_evaluator_strands_on_unknown_symbols() {
    let nfa = parser::regex("a*").unwrap().to_nfa().unwrap();
    let mut eval = nfa.evaluator();
    assert!(eval.is_accepting());
    assert!(eval.step("a").is_some());
    assert!(eval.is_accepting());
    assert!(eval.step("b").is_none());
    assert!(!eval.is_accepting());
}

#[test]
fn end_to_end_scenarios() {
    let scenarios: [(&str, &[&str], &[&str]); 6] = [
        ("a", &["a"], &["", "b", "aa"]),
        ("a|b", &["a", "b"], &["", "ab", "c"]),
        ("a*", &["", "a", "aa", "aaaa"], &["b", "ab"]),
        ("a+", &["a", "aa", "aaa"], &["", "b"]),
        (
            "(a|b)*abb",
            &["abb", "aabb", "babb", "ababb", "bbabb"],
            &["", "ab", "ba", "abba"],
        ),
        ("a?b", &["b", "ab"], &["", "aab", "aa"]),
    ];

    for (pattern, accepted, rejected) in scenarios {
        let (nfa, dfa, minimal) = build(pattern);
        for input in accepted {
            assert!(nfa.accepts_graphemes(input), "{pattern} ⊬ {input}");
            assert!(dfa.accepts_graphemes(input), "{pattern} ⊬ {input}");
            assert!(minimal.accepts_graphemes(input), "{pattern} ⊬ {input}");
            assert!(minimal.simulate_graphemes(input).accepted);
        }
        for input in rejected {
            assert!(!nfa.accepts_graphemes(input), "{pattern} ⊢ {input}");
            assert!(!dfa.accepts_graphemes(input), "{pattern} ⊢ {input}");
            assert!(!minimal.accepts_graphemes(input), "{pattern} ⊢ {input}");
            assert!(!minimal.simulate_graphemes(input).accepted);
        }
    }
}

#[test]
fn syntactic_rewrites_agree() {
    for (left, right) in [("a+", "aa*"), ("a?", "(a|ε)"), ("a?", "(a|e)")] {
        let (_, _, m1) = build(left);
        let (_, _, m2) = build(right);
        assert!(m1.equivalent_to(&m2), "{left} ≢ {right}");
        assert!(m2.equivalent_to(&m1), "{left} ≢ {right}");
    }
}

#[test]
fn record_golden() {
    let (_, _, minimal) = build("a|b");
    let record = Record::from_dfa(&minimal);
    assert_eq!(
        record,
        Record {
            states: vec![0, 1],
            symbols: vec!["a".to_string(), "b".to_string()],
            initial: vec![0],
            accepting: vec![1],
            transitions: vec![(0, "a".to_string(), 1), (0, "b".to_string(), 1)],
        }
    );

    let json = record.to_json().unwrap();
    // Stable key order on the wire
    let positions: Vec<usize> = ["ESTADOS", "SIMBOLOS", "INICIO", "ACEPTACION", "TRANSICIONES"]
        .iter()
        .map(|key| json.find(key).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(Record::from_json(&json).unwrap(), record);
}

#[test]
fn record_round_trips_through_automata() {
    let (nfa, _, minimal) = build("a|b");

    let record = Record::from_nfa(&nfa);
    let read_back = record.to_nfa().unwrap();
    assert_eq!(Record::from_nfa(&read_back), record);

    let record = Record::from_dfa(&minimal);
    let read_back = record.to_dfa().unwrap();
    assert_eq!(Record::from_dfa(&read_back), record);
    assert!(read_back.equivalent_to(&minimal));
}

#[test]
fn record_readers_check_invariants() {
    let template = Record {
        states: vec![0, 1],
        symbols: vec!["a".to_string()],
        initial: vec![0],
        accepting: vec![1],
        transitions: vec![(0, "a".to_string(), 1)],
    };
    assert!(template.to_dfa().is_ok());
    assert!(template.to_nfa().is_ok());

    let mut record = template.clone();
    record.initial.clear();
    assert!(matches!(record.to_dfa(), Err(FormatError::NoInitialState)));
    assert!(matches!(record.to_nfa(), Err(FormatError::NoInitialState)));

    let mut record = template.clone();
    record.initial = vec![0, 1];
    assert!(matches!(
        record.to_dfa(),
        Err(FormatError::MultipleInitialStates)
    ));

    // An ε-move disqualifies a DFA but is fine in an NFA
    let mut record = template.clone();
    record.transitions.push((1, String::new(), 0));
    assert!(matches!(record.to_dfa(), Err(FormatError::NotADfa)));
    assert!(record.to_nfa().is_ok());

    // Two targets for one (state, symbol) pair disqualify a DFA
    let mut record = template.clone();
    record.transitions.push((0, "a".to_string(), 0));
    assert!(matches!(record.to_dfa(), Err(FormatError::NotADfa)));

    let mut record = template.clone();
    record.transitions = vec![(0, "a".to_string(), 7)];
    assert!(matches!(record.to_dfa(), Err(FormatError::UnknownState(7))));

    let mut record = template.clone();
    record.transitions = vec![(0, "z".to_string(), 1)];
    assert!(matches!(
        record.to_dfa(),
        Err(FormatError::UndeclaredSymbol(_))
    ));

    let mut record = template.clone();
    record.symbols.push("a".to_string());
    assert!(matches!(record.to_dfa(), Err(FormatError::DuplicateSymbol(_))));

    let mut record = template;
    record.symbols = vec!["ε".to_string()];
    assert!(matches!(
        record.to_nfa(),
        Err(FormatError::EpsilonInAlphabet)
    ));
}

#[test]
fn dot_output() {
    let (_, _, minimal) = build("a");
    assert_eq!(
        dot::dfa_to_dot(&minimal),
        "digraph Automaton {\n\
         rankdir=LR;\n\
         __start__ [shape=point];\n\
         \"q0\" [shape=circle];\n\
         \"q1\" [shape=doublecircle];\n\
         __start__ -> \"q0\";\n\
         \"q0\" -> \"q1\" [label=\"a\"];\n\
         }\n"
    );

    // Parallel edges collapse into one sorted, comma-separated label
    let (_, _, minimal) = build("a|b");
    let rendered = dot::dfa_to_dot(&minimal);
    assert!(rendered.contains("\"q0\" -> \"m0\" [label=\"a, b\"];"));

    let nfa = parser::regex("a*").unwrap().to_nfa().unwrap();
    assert!(dot::nfa_to_dot(&nfa).contains("label=\"ε\""));
}

#[test]
fn stages_agree_on_random_strings() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let (nfa, dfa, minimal) = build("(a|b)*abb");
    for _ in 0..200 {
        let len = rng.gen_range(0..12);
        let string: String = (0..len)
            .map(|_| if rng.gen_bool(0.5) { 'a' } else { 'b' })
            .collect();
        let expected = string.ends_with("abb");
        assert_eq!(nfa.accepts_graphemes(&string), expected, "on {string:?}");
        assert_eq!(dfa.accepts_graphemes(&string), expected, "on {string:?}");
        assert_eq!(
            minimal.accepts_graphemes(&string),
            expected,
            "on {string:?}"
        );
    }
}

proptest! {
    /// The whole pipeline agrees with the `regex` crate on anchored matching, at every stage
    #[test]
    fn pipeline_agrees_with_oracle(
        pattern in random_regex(),
        tests in prop::collection::vec("[a-d]*", 20)
    ) {
        let regex = parser::regex(&pattern).unwrap();
        let nfa = regex.to_nfa().unwrap();
        let dfa = nfa.to_dfa();
        let minimal = dfa.minimized();
        let oracle = LibRegex::new(&format!("^({pattern})$")).unwrap();
        for test in &tests {
            let expected = oracle.is_match(test);
            prop_assert_eq!(nfa.accepts_graphemes(test), expected, "{} on {:?}", pattern, test);
            prop_assert_eq!(dfa.accepts_graphemes(test), expected, "{} on {:?}", pattern, test);
            prop_assert_eq!(minimal.accepts_graphemes(test), expected, "{} on {:?}", pattern, test);
        }
    }

    /// Minimization never grows an automaton, never changes its language, and is idempotent
    #[test]
    fn minimization_properties(pattern in random_regex()) {
        let (_, dfa, minimal) = build(&pattern);
        prop_assert!(minimal.states().len() <= dfa.states().len());
        prop_assert!(minimal.equivalent_to(&dfa));
        prop_assert!(dfa.equivalent_to(&minimal));
        let twice = minimal.minimized();
        prop_assert_eq!(twice.states().len(), minimal.states().len());
        prop_assert!(twice.equivalent_to(&minimal));
    }

    /// JSON encoding decodes to the same record, and a decoded automaton keeps the language
    #[test]
    fn serialization_round_trips(pattern in random_regex()) {
        let (_, _, minimal) = build(&pattern);
        let record = Record::from_dfa(&minimal);
        let json = record.to_json().unwrap();
        prop_assert_eq!(&Record::from_json(&json).unwrap(), &record);
        let read_back = record.to_dfa().unwrap();
        prop_assert!(read_back.equivalent_to(&minimal));
    }

    /// A simulation path starts at the initial state and covers the whole input iff accepted
    #[test]
    fn simulation_path_shape(
        pattern in random_regex(),
        tests in prop::collection::vec("[a-d]*", 10)
    ) {
        let (_, _, minimal) = build(&pattern);
        for test in &tests {
            let symbols = test.chars().count();
            let run = minimal.simulate_graphemes(test);
            prop_assert_eq!(run.path[0].as_ref(), minimal.initial_state().name());
            prop_assert!(run.path.len() <= symbols + 1);
            prop_assert_eq!(run.accepted, minimal.accepts_graphemes(test));
            if run.accepted {
                prop_assert_eq!(run.path.len(), symbols + 1);
            }
        }
    }
}

fn random_regex() -> impl Strategy<Value = String> {
    // 'e' is left out of the leaves: a bare e denotes ε
    "[a-d]"
        .prop_recursive(8, 48, 6, |inner| {
            prop_oneof![
                10 => prop::collection::vec(inner.clone(), 1..6)
                    .prop_map(|vec| format!("({})", vec.join(""))),
                10 => prop::collection::vec(inner.clone(), 1..6).prop_map(|vec| vec.join("|")),
                3 => inner.clone().prop_map(|r| format!("({r})*")),
                3 => inner.clone().prop_map(|r| format!("({r})+")),
                3 => inner.clone().prop_map(|r| format!("({r})?")),
            ]
        })
        .prop_filter("expression must fit the length cap", |s| s.len() <= 1000)
}
