use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical display form: trim, collapse internal whitespace, title-case
/// each word. This is what gets stored and shown.
pub fn canonical_display(raw: &str) -> String {
    raw.split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized identity key: strip diacritics (NFKD, drop combining marks),
/// lowercase, collapse every non-alphanumeric run to a single space, trim.
/// Rows with equal keys are the same entity.
pub fn identity_key(raw: &str) -> String {
    let folded: String = raw.nfkd().filter(|c| !is_combining_mark(*c)).collect();

    let mut key = String::with_capacity(folded.len());
    let mut pending_space = false;
    for c in folded.chars() {
        if c.is_alphanumeric() {
            if pending_space && !key.is_empty() {
                key.push(' ');
            }
            pending_space = false;
            key.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    key
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}
