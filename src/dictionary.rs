use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::Result;
use crate::word_set::WordSet;

/// Shared handle to a [`WordSet`].
///
/// Loading and unloading take the write lock, queries share the read lock.
#[derive(Clone, Debug, Default)]
pub struct Dictionary(Arc<RwLock<WordSet>>);

impl Dictionary {
    pub fn new(words: WordSet) -> Self {
        Self(Arc::new(RwLock::new(words)))
    }

    /// Swaps in a fresh set, dropping whatever was loaded.
    pub fn reset(&self, words: WordSet) {
        *self.0.write() = words;
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.0.write().load(path)
    }

    pub fn load_from<R: BufRead>(&self, reader: R) -> Result<()> {
        self.0.write().load_from(reader)
    }

    pub fn unload(&self) -> Result<()> {
        self.0.write().unload()
    }

    pub fn check(&self, word: &str) -> bool {
        self.0.read().check(word)
    }

    pub fn size(&self) -> usize {
        self.0.read().size()
    }

    pub fn is_loaded(&self) -> bool {
        self.0.read().is_loaded()
    }

    /// Holds the read lock for a batch of queries.
    pub fn read(&self) -> RwLockReadGuard<'_, WordSet> {
        self.0.read()
    }
}
