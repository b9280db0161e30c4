//! Name matching and address prefix handling.

/// Characters allowed directly after the bot name.
const NAME_TERMINATORS: [char; 6] = [' ', ':', ',', '.', '!', '?'];

/// Returns true when `body` mentions `name` as a standalone token.
///
/// The name must start the body or follow whitespace, optionally behind an
/// `@` sigil, and must be followed by the end of the body or one of
/// `' '`, `':'`, `','`, `'.'`, `'!'`, `'?'`. Comparison ignores case.
#[must_use]
pub fn name_matches(body: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    body.char_indices().any(|(start, _)| {
        token_start(&body[..start])
            && match_ignore_case(&body[start..], name)
                .is_some_and(|len| token_end(&body[start + len..]))
    })
}

/// Remove the first literal `prefix` (e.g. `"Aria: "`) from `body`.
#[must_use]
pub fn strip_address_prefix(body: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return body.to_string();
    }
    body.replacen(prefix, "", 1)
}

fn token_start(before: &str) -> bool {
    match before.chars().next_back() {
        None => true,
        Some('@') => {
            let before_sigil = &before[..before.len() - 1];
            before_sigil
                .chars()
                .next_back()
                .is_none_or(char::is_whitespace)
        }
        Some(c) => c.is_whitespace(),
    }
}

fn token_end(after: &str) -> bool {
    after
        .chars()
        .next()
        .is_none_or(|c| NAME_TERMINATORS.contains(&c))
}

/// Byte length of the prefix of `haystack` equal to `needle` ignoring case.
fn match_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let mut chars = haystack.char_indices();
    for expected in needle.chars() {
        let (_, actual) = chars.next()?;
        if actual != expected && !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map_or(haystack.len(), |(idx, _)| idx))
}
