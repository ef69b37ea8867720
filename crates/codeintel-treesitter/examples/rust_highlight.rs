//! Bootstrap a mapping for Rust from the regex highlighter, then highlight a few edits.
//!
//! Run with `RUST_LOG=codeintel_treesitter=debug` to see how each edit is parsed.

use codeintel_highlight_simple::LanguageHighlighters;
use codeintel_treesitter::{HighlightRequest, ParseKey, TreeSitterHighlighter, bootstrap_mapping};
use tracing_subscriber::EnvFilter;
use tree_sitter::Language;

const SOURCE: &str = r#"// comment
fn add(a: i32, b: i32) -> i32 {
    let s = "see https://example.com";
    a + b
}
"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let grammar: Language = tree_sitter_rust::LANGUAGE.into();
    let reference = LanguageHighlighters::with_defaults().expect("default highlighter rules");

    let mapping = bootstrap_mapping(&grammar, "rust", SOURCE, &reference, &[])
        .expect("bootstrap mapping");
    println!("bootstrapped mapping:\n{}", mapping.to_json_pretty().expect("serialize mapping"));

    let mut highlighter = TreeSitterHighlighter::new(reference);
    let edits = [
        SOURCE.to_string(),
        SOURCE.replace("a + b", "a * b + 1"),
        SOURCE.replace("// comment", "/* block\n   comment */"),
    ];

    for text in &edits {
        let tokens = highlighter
            .highlight(
                HighlightRequest::new(text, "rust")
                    .with_mapping(&mapping)
                    .with_grammar(&grammar),
            )
            .expect("highlight");

        let mode = highlighter
            .cache()
            .get(&ParseKey::language("rust"))
            .map(|entry| entry.last_update_mode());
        println!("{} tokens ({mode:?})", tokens.len());
        for token in tokens {
            println!(
                "  {}:{} +{} {}",
                token.line(),
                token.column(),
                token.length(),
                token.category()
            );
        }
    }
}
