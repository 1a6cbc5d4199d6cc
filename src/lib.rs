//! Dictionary backed spell checking.
//!
//! [`WordSet`] is a hash table of words loaded once from a word list and
//! queried case-insensitively. [`Dictionary`] shares one between threads,
//! and [`pipeline::Pipeline`] runs text from the [`lexer::Lexer`] against it.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod lexer;
pub mod pipeline;
pub mod word_set;

pub use config::Config;
pub use dictionary::Dictionary;
pub use error::{ConfigError, DictionaryError};
pub use word_set::WordSet;
