use log::{debug, warn};

use crate::session::SessionConfig;
use crate::typing_policy::{classify, is_correct_at, score_word, InputDelta, WordScore};
use crate::word_source::WordSource;

/// Append-only list of prompt words plus the index of the word being typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordStream {
    words: Vec<String>,
    index: usize,
}

impl WordStream {
    pub fn new(words: Vec<String>) -> Self {
        Self { words, index: 0 }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The word under the cursor, empty only if the stream ran dry
    pub fn current(&self) -> &str {
        self.words.get(self.index).map_or("", String::as_str)
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.words.len()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn extend(&mut self, more: Vec<String>) {
        self.words.extend(more);
    }
}

/// Position inside the stream: which word, and how many of its letters are settled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypingCursor {
    pub word_index: usize,
    pub letter_index: usize,
}

/// Session-lifetime counters; they only ever grow
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAccumulator {
    pub correct_characters: u64,
    pub total_typed_characters: u64,
    pub total_words: f64,
}

impl ScoreAccumulator {
    fn add_keystroke(&mut self, correct: bool) {
        self.total_typed_characters += 1;
        if correct {
            self.correct_characters += 1;
        }
    }

    fn add_word(&mut self, score: &WordScore) {
        self.total_typed_characters += score.typed_chars;
        self.correct_characters += score.correct_chars;
        self.total_words += score.credit;
    }
}

/// What a single buffer change did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// One settled letter was undone
    Backspace,
    /// The buffer held a finished word; the input surface must be cleared
    Committed {
        typed: String,
        target: String,
        score: WordScore,
    },
    /// A new character was scored
    Typed { ch: char, correct: bool },
    /// Nothing recognizable changed
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputChange {
    /// This change was the first non-empty keystroke of the session
    pub started: bool,
    pub outcome: InputOutcome,
}

impl InputChange {
    /// Whether the input surface should be reset to empty
    pub fn clears_input(&self) -> bool {
        matches!(self.outcome, InputOutcome::Committed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterStatus {
    Correct,
    Incorrect,
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderWord {
    pub text: String,
    pub letters: Vec<LetterStatus>,
    /// Characters typed past the end of the word (current word only)
    pub overflow: String,
}

/// Read-only projection of the stream for display
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub words: Vec<RenderWord>,
    pub current_word_index: usize,
}

/// Word stream, cursor and counters for one typing session
#[derive(Debug)]
pub struct TypingSession<S: WordSource> {
    source: S,
    batch_size: usize,
    stream: WordStream,
    cursor: TypingCursor,
    score: ScoreAccumulator,
    input: String,
    started: bool,
}

impl<S: WordSource> TypingSession<S> {
    pub fn new(config: &SessionConfig, mut source: S) -> Self {
        let stream = WordStream::new(source.next(config.batch_size));
        Self {
            source,
            batch_size: config.batch_size,
            stream,
            cursor: TypingCursor::default(),
            score: ScoreAccumulator::default(),
            input: String::new(),
            started: false,
        }
    }

    /// Throw away all progress and draw a fresh stream from the same source.
    pub fn reset(&mut self, config: &SessionConfig) {
        self.batch_size = config.batch_size;
        self.stream = WordStream::new(self.source.next(self.batch_size));
        self.cursor = TypingCursor::default();
        self.score = ScoreAccumulator::default();
        self.input.clear();
        self.started = false;
    }

    pub fn current_word(&self) -> &str {
        self.stream.current()
    }

    pub fn cursor(&self) -> TypingCursor {
        self.cursor
    }

    pub fn score(&self) -> &ScoreAccumulator {
        &self.score
    }

    pub fn stream(&self) -> &WordStream {
        &self.stream
    }

    /// Last buffer snapshot seen (empty right after a commit)
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Reconcile a new snapshot of the raw input buffer.
    ///
    /// `previous_len` is the buffer length (in chars) before the edit; it is
    /// only used to notice edits that are not plain keystrokes.
    pub fn apply_input_change(&mut self, previous_len: usize, buffer: &str) -> InputChange {
        let len = buffer.chars().count();
        let delta = classify(self.cursor.letter_index, buffer);

        if delta == InputDelta::Backspace {
            self.cursor.letter_index -= 1;
            if self.cursor.letter_index > len {
                warn!(
                    "buffer shrank from {previous_len} to {len} chars at once, clamping cursor"
                );
                self.cursor.letter_index = len;
            }
            self.input = buffer.to_string();
            return InputChange {
                started: false,
                outcome: InputOutcome::Backspace,
            };
        }

        let started = !self.started && len > 0;
        if started {
            self.started = true;
        }

        let outcome = match delta {
            InputDelta::Commit => self.commit(buffer),
            InputDelta::Append => self.append(buffer, len),
            InputDelta::Unchanged | InputDelta::Backspace => {
                if len != previous_len {
                    warn!("ignoring unrecognized edit ({previous_len} -> {len} chars)");
                }
                self.input = buffer.to_string();
                InputOutcome::Ignored
            }
        };

        InputChange { started, outcome }
    }

    fn commit(&mut self, buffer: &str) -> InputOutcome {
        let typed = buffer.trim().to_string();
        let target = self.stream.current().to_string();
        let score = score_word(&typed, &target);

        self.score.add_word(&score);
        debug!(
            "committed {typed:?} for {target:?}: +{:.3} words, {}/{} chars",
            score.credit, score.correct_chars, score.typed_chars
        );

        self.stream.advance();
        self.cursor = TypingCursor {
            word_index: self.stream.index(),
            letter_index: 0,
        };
        self.input.clear();

        if self.stream.is_exhausted() {
            self.stream.extend(self.source.next(self.batch_size));
            debug!("word stream extended to {} words", self.stream.len());
        }

        InputOutcome::Committed {
            typed,
            target,
            score,
        }
    }

    fn append(&mut self, buffer: &str, len: usize) -> InputOutcome {
        let position = len - 1;
        let ch = buffer.chars().last().unwrap_or_default();
        let correct = is_correct_at(ch, position, self.stream.current());

        self.score.add_keystroke(correct);
        self.cursor.letter_index = len;
        self.input = buffer.to_string();

        InputOutcome::Typed { ch, correct }
    }

    pub fn render_model(&self) -> RenderModel {
        let current = self.stream.index();
        let typed: Vec<char> = self.input.chars().collect();
        let settled = self.cursor.letter_index.min(typed.len());

        let words = self
            .stream
            .words()
            .iter()
            .enumerate()
            .map(|(idx, word)| {
                let letters = word
                    .chars()
                    .enumerate()
                    .map(|(i, expected)| {
                        if idx != current || i >= settled {
                            LetterStatus::Pending
                        } else if typed[i] == expected {
                            LetterStatus::Correct
                        } else {
                            LetterStatus::Incorrect
                        }
                    })
                    .collect();

                let overflow = if idx == current {
                    typed[..settled].iter().skip(word.chars().count()).collect()
                } else {
                    String::new()
                };

                RenderWord {
                    text: word.clone(),
                    letters,
                    overflow,
                }
            })
            .collect();

        RenderModel {
            words,
            current_word_index: current,
        }
    }
}
