//! Canonical text form of an operator query.

/// Normalize raw query text.
///
/// Lowercases, drops line breaks, puts single spaces around parentheses and
/// `&&`/`||`, and rewrites the words `and`/`or` to `&&`/`||`.
pub fn normalize(raw: &str) -> String {
    let folded = raw.to_lowercase().replace(['\n', '\r'], " ");

    let spaced = collapse_whitespace(&folded)
        .replace('(', " ( ")
        .replace(')', " ) ")
        .replace("&&", " && ")
        .replace("||", " || ");

    spaced
        .split_whitespace()
        .map(|word| match word {
            "and" => "&&",
            "or" => "||",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
