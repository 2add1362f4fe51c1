//! Location tokenizer: split a free-form location string into the fixed
//! slots of the label's location grid.

use serde::Serialize;

/// Fixed-length slot contents for one record's location grid.
///
/// Never mutated after creation. Unused trailing slots hold `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationSlots {
    slots: Vec<String>,
    dropped: usize,
}

impl LocationSlots {
    /// Slot contents, left to right.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Number of slots (always the requested slot count).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` when the grid has zero slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Tokens that did not fit and were discarded.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

fn is_separator(c: char) -> bool {
    c == '_' || c.is_whitespace()
}

/// Split `raw` into `slot_count` slots.
///
/// Tokens are maximal runs of characters that are neither whitespace nor
/// underscore. `None` and blank input give all-empty slots; tokens past
/// the last slot are discarded and counted in [`LocationSlots::dropped`].
pub fn tokenize_location(raw: Option<&str>, slot_count: usize) -> LocationSlots {
    let mut slots = vec![String::new(); slot_count];
    let mut dropped = 0;

    let tokens = raw
        .unwrap_or_default()
        .split(is_separator)
        .filter(|t| !t.is_empty());
    for (i, token) in tokens.enumerate() {
        match slots.get_mut(i) {
            Some(slot) => slot.push_str(token),
            None => dropped += 1,
        }
    }

    LocationSlots { slots, dropped }
}
