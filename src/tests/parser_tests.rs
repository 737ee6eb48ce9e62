use crate::ast::{AstNode, GroupKind, Repetition, Terminal, TerminalKind};
use crate::error::{ParseError, TokenizeError};
use crate::parser::parse_pattern;

fn terminal(node: &AstNode) -> &Terminal {
    match node {
        AstNode::Terminal(t) => t,
        other => panic!("expected a terminal, got {:?}", other),
    }
}

fn literal_value(node: &AstNode) -> &str {
    match &terminal(node).kind {
        TerminalKind::Literal { value } => value,
        other => panic!("expected a literal, got {:?}", other),
    }
}

fn parts(node: &AstNode) -> &[AstNode] {
    match node {
        AstNode::Sequence { parts } => parts,
        other => panic!("expected a sequence, got {:?}", other),
    }
}

fn assert_collapsed(node: &AstNode) {
    match node {
        AstNode::Sequence { parts } => {
            assert_ne!(parts.len(), 1, "singleton sequence in {:?}", node);
            parts.iter().for_each(assert_collapsed);
        }
        AstNode::Choice { options } => {
            assert_ne!(options.len(), 1, "singleton choice in {:?}", node);
            options.iter().for_each(assert_collapsed);
        }
        AstNode::Quantifier { content, .. } | AstNode::Group { content, .. } => assert_collapsed(content),
        AstNode::Terminal(_) => {}
    }
}

#[test]
fn test_parse_literal() {
    let ast = parse_pattern("abc").unwrap();
    assert_eq!(literal_value(&ast), "abc");
    assert_eq!(terminal(&ast).label, "abc");
    assert_eq!(terminal(&ast).raw, "abc");
}

#[test]
fn test_parse_groups_with_quantifiers() {
    let ast = parse_pattern("(\\d+)aa(\\d+)bb").unwrap();
    let parts = parts(&ast);
    assert_eq!(parts.len(), 4);

    for (part, expected_index) in [(&parts[0], 1), (&parts[2], 2)] {
        let AstNode::Group { kind, index, label, content } = part else {
            panic!("expected a group, got {:?}", part);
        };
        assert_eq!(*kind, GroupKind::Capturing);
        assert_eq!(*index, Some(expected_index));
        assert_eq!(*label, format!("Capturing group #{}", expected_index));
        let AstNode::Quantifier { kind, greedy, content } = content.as_ref() else {
            panic!("expected a quantifier, got {:?}", content);
        };
        assert_eq!(*kind, Repetition::OneOrMore);
        assert!(*greedy);
        assert_eq!(terminal(content).kind, TerminalKind::CharClass);
        assert_eq!(terminal(content).raw, "\\d");
    }
    assert_eq!(literal_value(&parts[1]), "aa");
    assert_eq!(literal_value(&parts[3]), "bb");
}

#[test]
fn test_parse_alternation() {
    let ast = parse_pattern("cat|dog").unwrap();
    let AstNode::Choice { options } = &ast else {
        panic!("expected a choice, got {:?}", ast);
    };
    assert_eq!(options.len(), 2);
    assert_eq!(literal_value(&options[0]), "cat");
    assert_eq!(literal_value(&options[1]), "dog");
}

#[test]
fn test_parse_lazy_quantifier() {
    let ast = parse_pattern("a*?").unwrap();
    let AstNode::Quantifier { kind, greedy, content } = &ast else {
        panic!("expected a quantifier, got {:?}", ast);
    };
    assert_eq!(*kind, Repetition::ZeroOrMore);
    assert!(!greedy);
    assert_eq!(literal_value(content), "a");
}

#[test]
fn test_quantifier_binds_to_last_character() {
    let ast = parse_pattern("abc+").unwrap();
    let parts = parts(&ast);
    assert_eq!(literal_value(&parts[0]), "ab");
    let AstNode::Quantifier { content, .. } = &parts[1] else {
        panic!("expected a quantifier, got {:?}", parts[1]);
    };
    assert_eq!(literal_value(content), "c");
}

#[test]
fn test_parse_repetition_ranges() {
    let repetition = |pattern: &str| match parse_pattern(pattern).unwrap() {
        AstNode::Quantifier { kind, .. } => kind,
        other => panic!("expected a quantifier, got {:?}", other),
    };
    assert_eq!(repetition("a{3}"), Repetition::Exactly(3));
    assert_eq!(repetition("a{3,}"), Repetition::AtLeast(3));
    assert_eq!(repetition("a{3,7}"), Repetition::Between(3, 7));
    assert_eq!(repetition("[ab]?"), Repetition::ZeroOrOne);
}

#[test]
fn test_nested_groups_numbered_by_opening_parenthesis() {
    let ast = parse_pattern("((a)b)(c)").unwrap();
    assert_eq!(ast.capture_indices(), vec![1, 2, 3]);

    let AstNode::Group { index, content, .. } = &parts(&ast)[0] else {
        panic!("expected outer group");
    };
    assert_eq!(*index, Some(1));
    let AstNode::Group { index, label, .. } = &parts(content)[0] else {
        panic!("expected inner group");
    };
    assert_eq!(*index, Some(2));
    assert_eq!(label, "Capturing group #2");
}

#[test]
fn test_non_capturing_groups_have_no_index() {
    let cases = [
        ("(?:a)", GroupKind::NonCapturing, "Non-capturing group"),
        ("(?=a)", GroupKind::LookAhead, "Positive lookahead"),
        ("(?!a)", GroupKind::NegativeLookAhead, "Negative lookahead"),
        ("(?<=a)", GroupKind::LookBehind, "Positive lookbehind"),
        ("(?<!a)", GroupKind::NegativeLookBehind, "Negative lookbehind"),
        ("(?>a)", GroupKind::Atomic, "Atomic group"),
        ("(?i:a)", GroupKind::Flagged("i".to_string()), "Non-capturing group (flags: i)"),
    ];
    for (pattern, expected_kind, expected_label) in cases {
        let ast = parse_pattern(pattern).unwrap();
        let AstNode::Group { kind, index, label, .. } = &ast else {
            panic!("expected a group for {:?}", pattern);
        };
        assert_eq!(*kind, expected_kind);
        assert_eq!(*index, None);
        assert_eq!(label, expected_label);
    }
}

#[test]
fn test_named_groups_share_numbering() {
    let ast = parse_pattern("(a)(?<word>b)(?:c)(d)").unwrap();
    assert_eq!(ast.capture_indices(), vec![1, 2, 3]);
    let AstNode::Group { kind, label, .. } = &parts(&ast)[1] else {
        panic!("expected a group");
    };
    assert_eq!(*kind, GroupKind::Named("word".to_string()));
    assert_eq!(label, "Capturing group #2 <word>");
}

#[test]
fn test_parse_backreference() {
    let ast = parse_pattern("(a)\\1").unwrap();
    let t = terminal(&parts(&ast)[1]);
    assert_eq!(t.kind, TerminalKind::Backreference { group: 1 });
    assert!(t.description.contains("#1"));
    assert!(t.label.contains('1'));
}

#[test]
fn test_parse_named_backreference() {
    let ast = parse_pattern("(x)(?<w>a)\\k<w>").unwrap();
    let t = terminal(&parts(&ast)[2]);
    assert_eq!(t.kind, TerminalKind::Backreference { group: 2 });
    assert!(t.description.contains("#2"));

    let unknown = parse_pattern("\\k<missing>").unwrap();
    assert_eq!(terminal(&unknown).kind, TerminalKind::Unknown);
}

#[test]
fn test_parse_escape_table() {
    let check = |pattern: &str, kind: TerminalKind, label: &str| {
        let ast = parse_pattern(pattern).unwrap();
        assert_eq!(terminal(&ast).kind, kind, "pattern {:?}", pattern);
        assert_eq!(terminal(&ast).label, label, "pattern {:?}", pattern);
    };
    check("\\d", TerminalKind::CharClass, "digit");
    check("\\W", TerminalKind::CharClass, "non-word character");
    check(".", TerminalKind::CharClass, "any character");
    check("^", TerminalKind::Anchor, "start");
    check("$", TerminalKind::Anchor, "end");
    check("\\b", TerminalKind::Anchor, "word boundary");
    check("\\t", TerminalKind::ControlChar, "tab");
    check("\\p{Greek}", TerminalKind::CharClass, "Greek");
    check("\\P{Greek}", TerminalKind::CharClass, "not Greek");
}

#[test]
fn test_parse_python_backreference() {
    let ast = parse_pattern("(?P<n>a)(?P=n)").unwrap();
    let t = terminal(&parts(&ast)[1]);
    assert_eq!(t.kind, TerminalKind::Backreference { group: 1 });
    assert_eq!(t.label, "back-reference #1 <n>");
    assert_eq!(ast.capture_indices(), vec![1]);
}

#[test]
fn test_parse_conditional() {
    let ast = parse_pattern("(a)?(?(1)b|c)(d)").unwrap();
    assert_eq!(ast.capture_indices(), vec![1, 2]);
    let AstNode::Group { kind, index, label, content } = &parts(&ast)[1] else {
        panic!("expected a conditional group");
    };
    assert_eq!(*kind, GroupKind::Conditional("1".to_string()));
    assert_eq!(*index, None);
    assert_eq!(label, "Conditional (if group #1 matched)");
    let AstNode::Choice { options } = content.as_ref() else {
        panic!("expected both branches");
    };
    assert_eq!(literal_value(&options[0]), "b");
    assert_eq!(literal_value(&options[1]), "c");

    let label = |pattern: &str| match parse_pattern(pattern).unwrap() {
        AstNode::Group { label, .. } => label,
        other => panic!("expected a group, got {:?}", other),
    };
    assert_eq!(label("(?(<n>)x|y)"), "Conditional (if group <n> matched)");
    assert_eq!(label("(?(?=a)ab|c)"), "Conditional (if (?=a) matches)");
}

#[test]
fn test_parse_engine_escapes() {
    let check = |pattern: &str, kind: TerminalKind, label: &str| {
        let ast = parse_pattern(pattern).unwrap();
        assert_eq!(terminal(&ast).kind, kind, "{}", pattern);
        assert_eq!(terminal(&ast).label, label, "{}", pattern);
    };
    check("\\h", TerminalKind::CharClass, "hex digit");
    check("\\H", TerminalKind::CharClass, "non-hex digit");
    check("\\G", TerminalKind::Anchor, "end of previous match");
    check("\\<", TerminalKind::Anchor, "start of word");
    check("\\>", TerminalKind::Anchor, "end of word");
    check("\\e", TerminalKind::ControlChar, "escape");
    check("\\a", TerminalKind::ControlChar, "bell");
    check("\\K", TerminalKind::Unknown, "keep out");
    check("\\U0001F600", TerminalKind::Literal { value: "😀".to_string() }, "😀");

    let ast = parse_pattern("\\h+").unwrap();
    let AstNode::Quantifier { content, .. } = &ast else {
        panic!("expected a quantifier");
    };
    assert_eq!(terminal(content).label, "hex digit");
}

#[test]
fn test_parse_quoted_named_backreference() {
    let ast = parse_pattern("(?<n>x)\\k'n'").unwrap();
    assert_eq!(terminal(&parts(&ast)[1]).kind, TerminalKind::Backreference { group: 1 });
}

#[test]
fn test_possessive_quantifier_is_atomic() {
    let ast = parse_pattern("a*+").unwrap();
    let AstNode::Group { kind, index, label, content } = &ast else {
        panic!("expected an atomic group, got {:?}", ast);
    };
    assert_eq!(*kind, GroupKind::Atomic);
    assert_eq!(*index, None);
    assert_eq!(label, "Atomic group (possessive)");
    assert!(matches!(content.as_ref(), AstNode::Quantifier { kind: Repetition::ZeroOrMore, greedy: true, .. }));
    assert_eq!(parse_pattern("a*+*"), Err(ParseError::RepeatedQuantifier("*".to_string())));
}

#[test]
fn test_parse_extended_mode() {
    let ast = parse_pattern("(?x) a b # note\n").unwrap();
    let items = parts(&ast);
    assert_eq!(items.len(), 3);
    assert_eq!(terminal(&items[0]).kind, TerminalKind::Modifier);
    assert_eq!(literal_value(&items[1]), "a");
    assert_eq!(literal_value(&items[2]), "b");

    let ast = parse_pattern("(?x)ab +").unwrap();
    let AstNode::Quantifier { content, .. } = &parts(&ast)[2] else {
        panic!("expected the quantifier to bind to b");
    };
    assert_eq!(literal_value(content), "b");
}

#[test]
fn test_parse_escaped_literals() {
    assert_eq!(literal_value(&parse_pattern("\\.").unwrap()), ".");
    assert_eq!(literal_value(&parse_pattern("\\x41").unwrap()), "A");
    assert_eq!(literal_value(&parse_pattern("\\u{e9}").unwrap()), "é");
    assert_eq!(terminal(&parse_pattern("\\.").unwrap()).raw, "\\.");
}

#[test]
fn test_parse_bracket_expressions() {
    let t = parse_pattern("[a-z]").unwrap();
    assert_eq!(terminal(&t).label, "lowercase letter");
    assert_eq!(terminal(&t).detail, None);

    let t = parse_pattern("[^0-9]").unwrap();
    assert_eq!(terminal(&t).label, "not: digit");

    let t = parse_pattern("[xyz]").unwrap();
    assert_eq!(terminal(&t).label, "one of");
    assert_eq!(terminal(&t).description, "Matches one of: xyz");
    assert_eq!(terminal(&t).detail.as_deref(), Some("xyz"));

    let t = parse_pattern("[^xyz]").unwrap();
    assert_eq!(terminal(&t).description, "Matches none of: xyz");

    let t = parse_pattern("[^\\r\\n]").unwrap();
    assert_eq!(terminal(&t).label, "non-line-break");
}

#[test]
fn test_parse_inline_flags() {
    let ast = parse_pattern("(?i)abc").unwrap();
    let parts = parts(&ast);
    assert_eq!(terminal(&parts[0]).kind, TerminalKind::Modifier);
    assert_eq!(terminal(&parts[0]).label, "flags: i");
    assert_eq!(literal_value(&parts[1]), "abc");
}

#[test]
fn test_parse_empty_alternative() {
    let ast = parse_pattern("a|").unwrap();
    assert_eq!(
        ast,
        AstNode::Choice { options: vec![parse_pattern("a").unwrap(), AstNode::Sequence { parts: vec![] }] }
    );
}

#[test]
fn test_parse_lookbehind_sample() {
    let ast = parse_pattern("((?<!库存)\\b\\d{4,5})").unwrap();
    let AstNode::Group { index, content, .. } = &ast else {
        panic!("expected a group");
    };
    assert_eq!(*index, Some(1));
    let inner = parts(content);
    assert_eq!(inner.len(), 3);
    assert!(matches!(&inner[0], AstNode::Group { kind: GroupKind::NegativeLookBehind, .. }));
    assert_eq!(terminal(&inner[1]).kind, TerminalKind::Anchor);
    assert!(matches!(&inner[2], AstNode::Quantifier { kind: Repetition::Between(4, 5), .. }));
}

#[test]
fn test_collapse_invariant() {
    let patterns = [
        "a",
        "(a)",
        "(a|b)c",
        "((a))",
        "(?:x(y|z)+)*w",
        "^(?:[01]\\d|2[0-3]):[0-5]\\d$",
        "\\w+([-+.]\\w+)*@\\w+",
    ];
    for pattern in patterns {
        assert_collapsed(&parse_pattern(pattern).unwrap());
    }
}

#[test]
fn test_parse_is_deterministic() {
    let pattern = "(\\d+)-(?<w>\\w+)|(?:x{2,3}?)\\1";
    assert_eq!(parse_pattern(pattern).unwrap(), parse_pattern(pattern).unwrap());
}

#[test]
fn test_parse_errors() {
    assert_eq!(parse_pattern("(abc"), Err(ParseError::UnbalancedParentheses));
    assert_eq!(parse_pattern("a(b(c)"), Err(ParseError::UnbalancedParentheses));
    assert_eq!(parse_pattern("abc)"), Err(ParseError::UnexpectedToken(")".to_string())));
    assert_eq!(parse_pattern("*a"), Err(ParseError::NothingToRepeat("*".to_string())));
    assert_eq!(parse_pattern("a|+"), Err(ParseError::NothingToRepeat("+".to_string())));
    assert_eq!(parse_pattern("a**"), Err(ParseError::RepeatedQuantifier("*".to_string())));
    assert_eq!(parse_pattern("a{2}{3}"), Err(ParseError::RepeatedQuantifier("{3}".to_string())));
    assert_eq!(parse_pattern("^*"), Err(ParseError::QuantifiedAssertion("*".to_string())));
    assert_eq!(parse_pattern("(?=a)+"), Err(ParseError::QuantifiedAssertion("+".to_string())));
    assert_eq!(parse_pattern("(?i)?"), Err(ParseError::QuantifiedAssertion("?".to_string())));
    assert_eq!(
        parse_pattern("[abc"),
        Err(ParseError::Tokenize(TokenizeError::UnterminatedClass { offset: 0 }))
    );
    assert!(parse_pattern("\\").is_err());
}

#[test]
fn test_parse_error_messages() {
    assert_eq!(ParseError::UnbalancedParentheses.to_string(), "unbalanced parentheses");
    assert_eq!(ParseError::UnexpectedToken(")".to_string()).to_string(), "unexpected token: )");
}
