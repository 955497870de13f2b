//! Mention tokenizer: finds the live `@query` under the cursor.
//!
//! Pure text scanning. The member list is always supplied by the caller;
//! nothing here knows about a user directory.

#[cfg(test)]
#[path = "mention_test.rs"]
mod mention_test;

use crate::comment::UserId;

/// A person who can be mentioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: UserId,
    pub display_name: String,
}

/// Byte offset of the `@` that opens the mention the cursor sits in.
///
/// Scans back from `cursor` until whitespace or the start of the text. The
/// `@` only counts when it starts the text or follows whitespace, so an
/// address like `me@host` never triggers. `None` if `cursor` is past the end
/// or not on a char boundary.
#[must_use]
pub fn mention_trigger(text: &str, cursor: usize) -> Option<usize> {
    let before = text.get(..cursor)?;
    for (idx, ch) in before.char_indices().rev() {
        if ch == '@' {
            let opens = before[..idx].chars().next_back().is_none_or(char::is_whitespace);
            return opens.then_some(idx);
        }
        if ch.is_whitespace() {
            return None;
        }
    }
    None
}

/// The text typed after the active `@`, up to the cursor.
///
/// `"hey @ann"` with the cursor at the end yields `Some("ann")`; a bare
/// `"@"` yields `Some("")`.
#[must_use]
pub fn active_mention_query(text: &str, cursor: usize) -> Option<&str> {
    let at = mention_trigger(text, cursor)?;
    text.get(at + 1..cursor)
}

/// Members whose display name contains `query`, case-insensitively, in the
/// order supplied.
#[must_use]
pub fn filter_members<'a>(members: &'a [Member], query: &str) -> Vec<&'a Member> {
    let needle = query.to_lowercase();
    members
        .iter()
        .filter(|m| m.display_name.to_lowercase().contains(&needle))
        .collect()
}
