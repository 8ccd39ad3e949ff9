use include_dir::{include_dir, Dir};
use log::debug;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::ConfigurationError;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Name of the corpus used when nothing else is configured
pub const DEFAULT_CORPUS: &str = "common";

/// A named, non-empty list of words to draw prompts from
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Corpus {
    pub name: String,
    #[serde(default)]
    pub size: u32,
    pub words: Vec<String>,
}

impl Corpus {
    /// Build a corpus from words already in memory.
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Result<Self, ConfigurationError> {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(ConfigurationError::EmptyCorpus);
        }

        Ok(Self {
            name: name.into(),
            size: words.len() as u32,
            words,
        })
    }

    /// Load one of the corpora compiled into the binary.
    pub fn builtin(name: &str) -> Result<Self, ConfigurationError> {
        let file = LANG_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| ConfigurationError::UnknownCorpus(name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| ConfigurationError::UnknownCorpus(name.to_string()))?;

        Self::from_json(contents)
    }

    /// Names of the corpora compiled into the binary, sorted.
    pub fn builtin_names() -> Vec<String> {
        let mut names: Vec<String> = LANG_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|f| f.path().file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let parsed: Corpus = serde_json::from_str(json)?;
        Self::new(parsed.name, parsed.words)
    }

    /// Load a user word list. JSON files use the built-in schema, anything
    /// else is read as whitespace separated words.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigurationError::WordList {
                path: path.to_path_buf(),
                source,
            })?;

        let corpus = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&contents)?
        } else {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "custom".to_string());
            Self::new(name, contents.split_whitespace().map(String::from).collect())?
        };

        debug!(
            "loaded corpus `{}` with {} words from {}",
            corpus.name,
            corpus.words.len(),
            path.display()
        );
        Ok(corpus)
    }
}
