//! Exit resolution: which exit did the player mean?
//!
//! A typed fragment matches every exit whose direction starts with it,
//! case-sensitively. `"n"` matches `north` and `northeast`; `"north"`
//! matches both too, which is reported as ambiguous.

use wayfarer_world::Room;

/// Outcome of matching a fragment against a room's exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitMatch {
    /// Nothing matched. The input is probably not a direction at all.
    None,
    /// Exactly one exit matched; holds its index in `room.exits`.
    One(usize),
    /// Several exits matched; holds all their indices in exit order.
    Ambiguous(Vec<usize>),
}

/// Returns the indices of every exit whose direction starts with `fragment`.
///
/// A fragment that can't be a direction prefix (empty, or containing
/// whitespace or control characters) matches nothing.
pub fn matching_exits(room: &Room, fragment: &str) -> Vec<usize> {
    if !is_valid_fragment(fragment) {
        tracing::debug!(
            location = %room.location,
            fragment,
            "bogus exit fragment"
        );
        return Vec::new();
    }

    room.exits
        .iter()
        .enumerate()
        .filter(|(_, exit)| exit.direction.starts_with(fragment))
        .map(|(index, _)| index)
        .collect()
}

pub fn resolve_exit(room: &Room, fragment: &str) -> ExitMatch {
    let mut matches = matching_exits(room, fragment);
    match matches.len() {
        0 => ExitMatch::None,
        1 => ExitMatch::One(matches.remove(0)),
        _ => ExitMatch::Ambiguous(matches),
    }
}

fn is_valid_fragment(fragment: &str) -> bool {
    !fragment.is_empty()
        && !fragment
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
}
