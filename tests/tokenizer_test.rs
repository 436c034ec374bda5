use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use kotoba::matcher::RegexInfixMatcher;
use kotoba::rules::RuleSet;
use kotoba::{Document, Span, SubToken, Tokenizer, TokenizerError};

fn texts(doc: &Document) -> Vec<&str> {
    doc.iter().map(|t| t.text.as_str()).collect()
}

/// Rebuilds the source text from a document's tokens by reinserting the
/// whitespace runs removed during splitting.
fn reconstruct(doc: &Document) -> String {
    let source = doc.text();
    let mut out = String::new();

    // leading whitespace
    let first_non_ws = source
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(source.len());
    out.push_str(&source[..first_non_ws]);
    let mut cursor = first_non_ws;

    for token in doc.iter() {
        out.push_str(&token.text);
        cursor += token.text.len();
        if token.whitespace {
            let run_end = source[cursor..]
                .char_indices()
                .find(|(_, c)| !c.is_whitespace())
                .map(|(i, _)| cursor + i)
                .unwrap_or(source.len());
            out.push_str(&source[cursor..run_end]);
            cursor = run_end;
        }
    }
    out
}

#[test]
fn it_tokenizes_the_contraction_example() {
    // suffix strips trailing "!", infix splits out the "'t" contraction,
    // no prefix or exception rules
    let tokenizer = Tokenizer::builder()
        .rules(RuleSet {
            suffixes: vec!["!".to_string()],
            infixes: vec!["'[a-z]+".to_string()],
            ..RuleSet::default()
        })
        .build()
        .unwrap();

    let doc = tokenizer.tokenize("don't! ").unwrap();
    assert_eq!(texts(&doc), vec!["don", "'t", "!"]);

    // only "!" carries the trailing-whitespace flag
    let flags: Vec<bool> = doc.iter().map(|t| t.whitespace).collect();
    assert_eq!(flags, vec![false, false, true]);
}

#[test]
fn it_gives_special_cases_precedence_over_infix_rules() {
    let tokenizer = Tokenizer::builder()
        .rules(RuleSet {
            // an infix rule that would split at the apostrophe differently
            infixes: vec!["'".to_string()],
            ..RuleSet::default()
        })
        .build()
        .unwrap();

    tokenizer
        .add_special_case("can't", vec![SubToken::new("ca"), SubToken::new("n't")])
        .unwrap();

    let doc = tokenizer.tokenize("can't").unwrap();
    assert_eq!(texts(&doc), vec!["ca", "n't"]);

    // a different chunk still goes through the infix rule
    let doc = tokenizer.tokenize("won't").unwrap();
    assert_eq!(texts(&doc), vec!["won", "'", "t"]);
}

#[test]
fn it_rejects_mismatched_special_cases() {
    let tokenizer = Tokenizer::default();
    let err = tokenizer
        .add_special_case("x", vec![SubToken::new("y")])
        .unwrap_err();
    assert!(matches!(err, TokenizerError::Configuration { .. }));

    // the table is unchanged: "x" still tokenizes as itself
    let doc = tokenizer.tokenize("x").unwrap();
    assert_eq!(texts(&doc), vec!["x"]);
}

#[test]
fn it_is_idempotent_across_cache_hits() {
    let tokenizer = Tokenizer::default();
    let first = tokenizer.tokenize("well-made (really)").unwrap();
    let second = tokenizer.tokenize("well-made (really)").unwrap();
    assert_eq!(texts(&first), texts(&second));
    assert_eq!(texts(&first), vec!["well", "-", "made", "(", "really", ")"]);
}

#[test]
fn it_builds_from_a_rule_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "suffixes": ["!"],
            "special_cases": {{
                "gonna": [{{"text": "gon"}}, {{"text": "na", "norm": "to"}}]
            }}
        }}"#
    )
    .unwrap();

    let rules = RuleSet::from_file(file.path().to_str().unwrap()).unwrap();
    let tokenizer = Tokenizer::builder().rules(rules).build().unwrap();

    let doc = tokenizer.tokenize("gonna win!").unwrap();
    assert_eq!(texts(&doc), vec!["gon", "na", "win", "!"]);
    assert_eq!(doc[1].norm, "to");
}

#[test]
fn it_supports_custom_matchers() {
    let tokenizer = Tokenizer::builder()
        .infix_matcher(Arc::new(RegexInfixMatcher::new(["\\d+"]).unwrap()))
        .build()
        .unwrap();

    let doc = tokenizer.tokenize("abc123def").unwrap();
    assert_eq!(texts(&doc), vec!["abc", "123", "def"]);
    assert_eq!(tokenizer.find_infixes("a1b"), vec![Span::new(1, 2)]);
}

#[test]
fn it_propagates_matcher_protocol_violations() {
    let hostile = |c: &str| Some(c.len() + 10);
    let tokenizer = Tokenizer::builder()
        .prefix_matcher(Arc::new(hostile))
        .build()
        .unwrap();

    let err = tokenizer.tokenize("anything").unwrap_err();
    assert!(matches!(err, TokenizerError::MatcherProtocol { .. }));
}

#[test]
fn it_reconstructs_mixed_whitespace_exactly() {
    let tokenizer = Tokenizer::default();
    let input = "  (hello)\tworld!  don't\n\nstop ";
    let doc = tokenizer.tokenize(input).unwrap();
    assert_eq!(reconstruct(&doc), input);
}

proptest! {
    // Concatenation invariant: rejoining token texts with the removed
    // whitespace runs reproduces the input for arbitrary text.
    #[test]
    fn prop_concatenation_invariant(input in "[ \\ta-zA-Z0-9()!?',./-]{0,60}") {
        let tokenizer = Tokenizer::default();
        let doc = tokenizer.tokenize(&input).unwrap();
        prop_assert_eq!(reconstruct(&doc), input);
    }

    // Tokenizing twice (cache hit vs recomputation) yields identical output.
    #[test]
    fn prop_cache_idempotence(input in "[a-z()!,'-]{1,20}") {
        let tokenizer = Tokenizer::default();
        let first = tokenizer.tokenize(&input).unwrap();
        let second = tokenizer.tokenize(&input).unwrap();
        prop_assert_eq!(texts(&first), texts(&second));
    }
}
