pub mod corpus;

pub use corpus::{Corpus, DEFAULT_CORPUS};
