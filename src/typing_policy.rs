//! How a raw input buffer change is interpreted and scored.

/// The kinds of buffer edits the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDelta {
    /// Buffer is now shorter than the settled prefix
    Backspace,
    /// Buffer ends with a space: the current word is submitted
    Commit,
    /// Buffer grew past the settled prefix
    Append,
    /// Anything else (same length rewrite, shrink that keeps the prefix)
    Unchanged,
}

/// Decide what a new buffer snapshot means given how much of it was settled.
pub fn classify(letter_index: usize, buffer: &str) -> InputDelta {
    let len = buffer.chars().count();
    if len < letter_index {
        InputDelta::Backspace
    } else if buffer.ends_with(' ') {
        InputDelta::Commit
    } else if len > letter_index {
        InputDelta::Append
    } else {
        InputDelta::Unchanged
    }
}

/// Counter contributions of one submitted word
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordScore {
    /// Typed characters plus the submitting space
    pub typed_chars: u64,
    pub correct_chars: u64,
    /// 1.0 for an exact match, otherwise matched positions over target length
    pub credit: f64,
    pub exact: bool,
}

/// Score `typed` (already trimmed) against `target`.
pub fn score_word(typed: &str, target: &str) -> WordScore {
    let target_len = target.chars().count();
    let typed_len = typed.chars().count();

    // positions past the end of the target can never match, so this is also
    // the positional match count over min(typed, target)
    let matches = typed
        .chars()
        .zip(target.chars())
        .filter(|(t, e)| t == e)
        .count() as u64;

    let exact = typed == target;
    let credit = if exact {
        1.0
    } else if typed_len > 0 && target_len > 0 {
        matches as f64 / target_len as f64
    } else {
        0.0
    };

    WordScore {
        typed_chars: typed_len as u64 + 1,
        correct_chars: matches,
        credit,
        exact,
    }
}

/// Whether `c` typed at `position` matches the target word there.
pub fn is_correct_at(c: char, position: usize, target: &str) -> bool {
    target.chars().nth(position) == Some(c)
}
