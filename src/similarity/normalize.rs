/// Canonicalize a mark or goods/services string for comparison.
///
/// Lower-cases, drops parenthetical notations such as `(stylized)`, strips every
/// character that is neither alphanumeric nor whitespace, and collapses runs of
/// whitespace to single spaces. Empty input gives empty output. Idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_notes = strip_parentheticals(&lowered);

    let cleaned: String = without_notes
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text with the spaces removed, for substring-style comparisons.
pub fn compact(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Remove each `(...)` group, shortest match first. An unclosed `(` is left for
/// the punctuation pass to drop.
fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push(' ');
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}
