// Sample used by the highlighting tests.
use std::collections::HashMap;

/// Counts words.
fn count_words(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }
    counts
}

fn main() {
    let banner = "see https://example.com for docs";
    let counts = count_words(banner);
    println!("{} distinct words", counts.len());
}
