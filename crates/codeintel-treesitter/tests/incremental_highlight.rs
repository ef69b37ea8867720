use codeintel_core::{Category, TextRange, Token};
use codeintel_highlight_simple::LanguageHighlighters;
use codeintel_treesitter::{
    HighlightError, HighlightRequest, NodeMapping, ParseEntry, ParseKey, TreeSitterHighlighter,
    UpdateMode, bootstrap_mapping, for_each_leaf, make_unrefined_mapping, node_to_tokens,
};
use pretty_assertions::assert_eq;
use tree_sitter::{Language, Parser, Tree};

fn rust() -> Language {
    tree_sitter_rust::LANGUAGE.into()
}

fn parse_fresh(text: &str) -> Tree {
    let mut parser = Parser::new();
    parser.set_language(&rust()).unwrap();
    parser.parse(text, None).unwrap()
}

fn leaves(tree: &Tree) -> Vec<(&'static str, usize, usize, (usize, usize), (usize, usize))> {
    let mut out = Vec::new();
    for_each_leaf(tree.root_node(), |node| {
        let start = node.start_position();
        let end = node.end_position();
        out.push((
            node.kind(),
            node.start_byte(),
            node.end_byte(),
            (start.row, start.column),
            (end.row, end.column),
        ));
    });
    out
}

fn rust_mapping() -> NodeMapping {
    NodeMapping::from([
        ("fn", Category::Keyword),
        ("let", Category::Keyword),
        ("identifier", Category::Name),
        ("string_content", Category::String),
        ("line_comment", Category::Comment),
        ("integer_literal", Category::Number),
    ])
}

#[test]
fn test_incremental_reparse_matches_fresh_parse() {
    let base = include_str!("fixtures/sample.rs");
    let edits = [
        // Insert a line at the top.
        format!("// header\n{base}"),
        // Modify a line in the middle.
        base.replace("let mut counts", "let mut tally"),
        // Delete the trailing lines.
        base.lines().take(11).collect::<Vec<_>>().join("\n"),
        // Append without a final newline.
        format!("{base}fn extra() {{}}"),
        // Two disjoint edits collapse into one region.
        base.replace("Counts words.", "Tallies words.")
            .replace("distinct words", "unique words"),
        String::new(),
    ];

    for new in edits {
        let mut entry = ParseEntry::new(&rust(), base).unwrap();
        assert_eq!(entry.last_update_mode(), UpdateMode::Initial);

        let mode = entry.update(&new).unwrap();
        assert_eq!(mode, UpdateMode::Incremental);
        assert_eq!(entry.source(), new);
        assert_eq!(leaves(entry.tree()), leaves(&parse_fresh(&new)));
    }
}

#[test]
fn test_unchanged_text_reuses_tree() {
    let base = include_str!("fixtures/sample.rs");
    let mut entry = ParseEntry::new(&rust(), base).unwrap();
    assert_eq!(entry.update(base).unwrap(), UpdateMode::Unchanged);
    assert_eq!(entry.last_update_mode(), UpdateMode::Unchanged);
}

#[test]
fn test_multi_line_string_leaf_is_split_per_line() {
    let text = "fn main() {\n    let s = \"alpha\n\n    beta\";\n}\n";
    let tree = parse_fresh(text);
    let mapping = NodeMapping::from([("string_content", Category::String)]);

    let tokens = node_to_tokens(tree.root_node(), text, &mapping);
    assert_eq!(
        tokens,
        vec![
            Token::new(2, 13, 5, Category::String),
            Token::new(4, 4, 4, Category::String),
        ]
    );
}

#[test]
fn test_highlight_with_mapping_filters_range_and_skips_unmapped() {
    let text = include_str!("fixtures/sample.rs");
    let mapping = rust_mapping();
    let grammar = rust();
    let mut highlighter = TreeSitterHighlighter::new(LanguageHighlighters::new());

    let request = HighlightRequest::new(text, "rust")
        .with_mapping(&mapping)
        .with_grammar(&grammar)
        .with_range(TextRange::new(14, 14));
    let tokens = highlighter.highlight(request).unwrap();

    assert!(tokens.iter().all(|t| t.line() == 14));
    // `    let banner = "see https://example.com for docs";`
    assert!(tokens.contains(&Token::new(14, 4, 3, Category::Keyword)));
    assert!(tokens.contains(&Token::new(14, 8, 6, Category::Name)));
    assert!(tokens.contains(&Token::new(14, 18, 32, Category::String)));
    assert!(tokens.contains(&Token::new(14, 22, 19, Category::Link)));
    // `=` and `;` are not mapped.
    assert!(!tokens.iter().any(|t| t.category() == Category::Operator));
    assert_eq!(tokens.len(), 4);
}

#[test]
fn test_highlight_reuses_cached_tree_across_requests() {
    let text = include_str!("fixtures/sample.rs");
    let mapping = rust_mapping();
    let grammar = rust();
    let mut highlighter = TreeSitterHighlighter::new(LanguageHighlighters::new());

    highlighter
        .highlight(
            HighlightRequest::new(text, "rust")
                .with_mapping(&mapping)
                .with_grammar(&grammar),
        )
        .unwrap();

    // The grammar is no longer needed once a tree is cached.
    let edited = text.replace("count_words(banner)", "count_words(\"x\")");
    let tokens = highlighter
        .highlight(HighlightRequest::new(&edited, "rust").with_mapping(&mapping))
        .unwrap();

    let entry = highlighter.cache().get(&ParseKey::language("rust")).unwrap();
    assert_eq!(entry.last_update_mode(), UpdateMode::Incremental);
    assert_eq!(entry.source(), edited);
    assert!(tokens.contains(&Token::new(15, 30, 1, Category::String)));
}

#[test]
fn test_files_can_have_separate_trees() {
    let mapping = rust_mapping();
    let grammar = rust();
    let mut highlighter = TreeSitterHighlighter::new(LanguageHighlighters::new());

    for (file, text) in [("a.rs", "fn a() {}\n"), ("b.rs", "fn b() {}\n")] {
        highlighter
            .highlight(
                HighlightRequest::new(text, "rust")
                    .for_file(file)
                    .with_mapping(&mapping)
                    .with_grammar(&grammar),
            )
            .unwrap();
    }

    assert_eq!(highlighter.cache().len(), 2);
    let a = highlighter.cache().get(&ParseKey::for_file("rust", "a.rs")).unwrap();
    assert_eq!(a.source(), "fn a() {}\n");
}

#[test]
fn test_mapping_without_grammar_or_cache_is_an_error() {
    let mapping = rust_mapping();
    let mut highlighter = TreeSitterHighlighter::new(LanguageHighlighters::new());

    let err = highlighter
        .highlight(HighlightRequest::new("fn a() {}", "rust").with_mapping(&mapping))
        .unwrap_err();
    assert!(matches!(err, HighlightError::MissingLanguage(language) if language == "rust"));
}

#[test]
fn test_fallback_uses_reference_and_warms_cache() {
    let text = "fn a() {}\n";
    let grammar = rust();
    let reference = |_: &str, language: &str, _: TextRange| {
        assert_eq!(language, "rust");
        vec![Token::new(1, 0, 2, Category::Keyword)]
    };
    let mut highlighter = TreeSitterHighlighter::new(reference);

    let tokens = highlighter
        .highlight(HighlightRequest::new(text, "rust").with_grammar(&grammar))
        .unwrap();
    assert_eq!(tokens, vec![Token::new(1, 0, 2, Category::Keyword)]);
    assert!(highlighter.cache().contains(&ParseKey::language("rust")));

    // No grammar and nothing cached: the reference result is returned and nothing is parsed.
    highlighter
        .highlight(HighlightRequest::new(text, "rust").for_file("other.rs"))
        .unwrap();
    assert_eq!(highlighter.cache().len(), 1);
}

#[test]
fn test_bootstrap_exact_matches_and_unmapped_types() {
    let text = "fn add() {}\n";
    let tree = parse_fresh(text);
    let reference = [
        Token::new(1, 0, 2, Category::Keyword),
        Token::new(1, 3, 3, Category::Definition),
    ];

    let mapping = make_unrefined_mapping(tree.root_node(), text, &reference, &[]);
    assert_eq!(
        mapping,
        NodeMapping::from([("fn", Category::Keyword), ("identifier", Category::Definition)])
    );

    let mapping = make_unrefined_mapping(tree.root_node(), text, &reference, &["identifier"]);
    assert_eq!(mapping, NodeMapping::from([("fn", Category::Keyword)]));
}

#[test]
fn test_bootstrap_from_regex_reference() {
    let text = "fn add(a: i32) -> i32 {\n    a + 1\n}\n";
    let reference = LanguageHighlighters::with_defaults().unwrap();

    let mapping = bootstrap_mapping(&rust(), "rust", text, &reference, &[]).unwrap();
    assert_eq!(mapping.get("fn"), Some(Category::Keyword));
    assert_eq!(mapping.get("identifier"), Some(Category::Name));
    assert_eq!(mapping.get("integer_literal"), Some(Category::Number));
    assert_eq!(mapping.get("("), Some(Category::Punctuation));
    assert_eq!(mapping.get("+"), Some(Category::Operator));
}
