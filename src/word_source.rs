use crate::{error::ConfigurationError, language::Corpus};
use rand::{rngs::ThreadRng, seq::SliceRandom, Rng};

/// Supplies the words a session asks the typist to type
pub trait WordSource {
    /// Return `count` words in presentation order.
    fn next(&mut self, count: usize) -> Vec<String>;
}

impl<S: WordSource + ?Sized> WordSource for Box<S> {
    fn next(&mut self, count: usize) -> Vec<String> {
        (**self).next(count)
    }
}

/// Draws words uniformly, with replacement, from a corpus
#[derive(Debug, Clone)]
pub struct RandomWordSource<R: Rng = ThreadRng> {
    corpus: Corpus,
    rng: R,
}

impl RandomWordSource<ThreadRng> {
    pub fn new(corpus: Corpus) -> Result<Self, ConfigurationError> {
        Self::with_rng(corpus, rand::thread_rng())
    }
}

impl<R: Rng> RandomWordSource<R> {
    pub fn with_rng(corpus: Corpus, rng: R) -> Result<Self, ConfigurationError> {
        if corpus.words.is_empty() {
            return Err(ConfigurationError::EmptyCorpus);
        }
        Ok(Self { corpus, rng })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }
}

impl<R: Rng> WordSource for RandomWordSource<R> {
    fn next(&mut self, count: usize) -> Vec<String> {
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(word) = self.corpus.words.choose(&mut self.rng) {
                words.push(word.clone());
            }
        }
        words
    }
}

/// Repeats a fixed prompt word by word, wrapping around at the end
#[derive(Debug, Clone)]
pub struct PromptWordSource {
    words: Vec<String>,
    position: usize,
}

impl PromptWordSource {
    pub fn new(prompt: &str) -> Result<Self, ConfigurationError> {
        let words: Vec<String> = prompt.split_whitespace().map(String::from).collect();
        if words.is_empty() {
            return Err(ConfigurationError::EmptyCorpus);
        }
        Ok(Self { words, position: 0 })
    }
}

impl WordSource for PromptWordSource {
    fn next(&mut self, count: usize) -> Vec<String> {
        let words = self
            .words
            .iter()
            .cycle()
            .skip(self.position)
            .take(count)
            .cloned()
            .collect();
        self.position = (self.position + count) % self.words.len();
        words
    }
}
