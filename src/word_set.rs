//! Hash table of words with chained buckets.
//!
//! A [`WordSet`] is filled once from a word list, answers case-insensitive
//! membership queries, and is emptied again with [`WordSet::unload`].
//! Entries keep the casing they had in the source; hashing and comparison
//! fold ASCII letters to lowercase.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::{DictionaryError, Result};

/// Number of buckets used by [`WordSet::new`].
pub const DEFAULT_BUCKETS: usize = 65536;

/// Longest word accepted from a word list.
pub const MAX_WORD_LENGTH: usize = 45;

/// DJB2 rolling hash over the ASCII-lowercased bytes of `word`.
pub fn djb2(word: &str) -> u64 {
    word.bytes().fold(5381u64, |hash, byte| {
        hash.wrapping_mul(33)
            .wrapping_add(u64::from(byte.to_ascii_lowercase()))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Empty,
    Loaded,
}

type Bucket = Vec<Box<str>>;

#[derive(Debug)]
pub struct WordSet {
    // Allocated by `load_from`, empty while unloaded. Each bucket is pushed
    // at the back, so the newest entry is last.
    buckets: Vec<Bucket>,
    bucket_count: usize,
    count: usize,
    state: State,
    max_word_length: usize,
}

impl Default for WordSet {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSet {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Creates an empty set with `buckets` chains. Zero is treated as one.
    ///
    /// Nothing is allocated until the set is loaded.
    pub fn with_buckets(buckets: usize) -> Self {
        Self {
            buckets: Vec::new(),
            bucket_count: buckets.max(1),
            count: 0,
            state: State::Empty,
            max_word_length: MAX_WORD_LENGTH,
        }
    }

    pub fn with_max_word_length(mut self, max_word_length: usize) -> Self {
        self.max_word_length = max_word_length;
        self
    }

    /// Bucket index of `word`, in `0..bucket_count()`.
    pub fn hash(&self, word: &str) -> usize {
        (djb2(word) % self.bucket_count as u64) as usize
    }

    /// Loads every whitespace separated word of the file at `path`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if self.is_loaded() {
            return Err(DictionaryError::AlreadyLoaded);
        }
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DictionaryError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loading dictionary from {:?}", path);
        self.load_from(BufReader::new(file))
    }

    /// Loads every whitespace separated word read from `reader`.
    ///
    /// Words are inserted into a staging table that replaces the current
    /// one only once the whole source has been consumed. On any error,
    /// including a failed allocation of the table itself, the set is left
    /// empty.
    pub fn load_from<R: BufRead>(&mut self, mut reader: R) -> Result<()> {
        if self.is_loaded() {
            return Err(DictionaryError::AlreadyLoaded);
        }

        let mut table: Vec<Bucket> = Vec::new();
        table.try_reserve_exact(self.bucket_count)?;
        table.resize_with(self.bucket_count, Bucket::new);

        let mut count = 0;
        let mut line = String::new();
        let mut line_number = 0;

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            line_number += 1;

            for word in line.split_whitespace() {
                let word_length = word.chars().count();
                if word_length > self.max_word_length {
                    return Err(DictionaryError::MalformedWord {
                        line: line_number,
                        word_length,
                        max: self.max_word_length,
                    });
                }

                let mut entry = String::new();
                entry.try_reserve_exact(word.len())?;
                entry.push_str(word);

                let bucket = &mut table[self.hash(word)];
                bucket.try_reserve(1)?;
                bucket.push(entry.into_boxed_str());
                count += 1;
            }
        }

        self.buckets = table;
        self.count = count;
        self.state = State::Loaded;
        debug!(
            "loaded {} words, longest chain {}",
            self.count,
            self.longest_chain()
        );
        Ok(())
    }

    /// Returns true if `word` was loaded, ignoring ASCII case.
    pub fn check(&self, word: &str) -> bool {
        self.buckets.get(self.hash(word)).is_some_and(|bucket| {
            bucket
                .iter()
                .rev()
                .any(|entry| entry.eq_ignore_ascii_case(word))
        })
    }

    /// Number of entries loaded, duplicates included.
    pub fn size(&self) -> usize {
        self.count
    }

    /// Drops every entry. Unloading an empty set does nothing.
    pub fn unload(&mut self) -> Result<()> {
        if !self.is_loaded() {
            return Ok(());
        }
        self.buckets = Vec::new();
        self.count = 0;
        self.state = State::Empty;
        debug!("dictionary unloaded");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.state == State::Loaded
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    pub fn max_word_length(&self) -> usize {
        self.max_word_length
    }

    /// Length of the fullest bucket.
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Entries bucket by bucket, most recently inserted first within each.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().rev().map(|entry| &**entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn loaded(words: &str) -> WordSet {
        let mut set = WordSet::with_buckets(64);
        set.load_from(Cursor::new(words)).unwrap();
        set
    }

    #[test]
    fn finds_words_in_any_case() {
        let mut set = loaded("apple\nBanana\ncherry\n");
        assert_eq!(set.size(), 3);
        assert!(set.check("APPLE"));
        assert!(set.check("banana"));
        assert!(set.check("Cherry"));
        assert!(!set.check("grape"));

        set.unload().unwrap();
        assert!(!set.check("apple"));
        assert_eq!(set.size(), 0);
    }

    #[test]
    fn duplicates_count_separately() {
        let set = loaded("dog\ndog\n");
        assert_eq!(set.size(), 2);
        assert!(set.check("dog"));
    }

    #[test]
    fn empty_source_loads() {
        let set = loaded("");
        assert!(set.is_loaded());
        assert_eq!(set.size(), 0);
        assert!(!set.check("anything"));
        assert!(!set.check(""));
    }

    #[test]
    fn unloaded_set_answers_nothing() {
        let set = WordSet::with_buckets(8);
        assert!(!set.is_loaded());
        assert_eq!(set.size(), 0);
        assert!(!set.check("word"));
    }

    #[test]
    fn words_split_on_any_whitespace() {
        let set = loaded("  one two\tthree\r\n\nfour  ");
        assert_eq!(set.size(), 4);
        for word in ["one", "two", "three", "four"] {
            assert!(set.check(word), "{word} missing");
        }
    }

    #[test]
    fn apostrophes_are_part_of_words() {
        let set = loaded("don't\ncat's\n");
        assert!(set.check("DON'T"));
        assert!(!set.check("dont"));
        assert!(!set.check("cat"));
    }

    #[test]
    fn odd_queries_do_not_panic() {
        let set = loaded("apple\n");
        assert!(!set.check(""));
        assert!(!set.check("123"));
        assert!(!set.check("äpple"));
        assert!(!set.check(&"a".repeat(1000)));
    }

    #[test]
    fn second_load_is_rejected() {
        let mut set = loaded("apple\n");
        let err = set.load_from(Cursor::new("grape\n")).unwrap_err();
        assert!(matches!(err, DictionaryError::AlreadyLoaded));
        assert_eq!(set.size(), 1);
        assert!(set.check("apple"));
        assert!(!set.check("grape"));
    }

    #[test]
    fn unload_twice_is_a_no_op() {
        let mut set = loaded("apple\n");
        set.unload().unwrap();
        set.unload().unwrap();
        assert_eq!(set.size(), 0);
    }

    #[test]
    fn reload_after_unload_behaves_like_fresh_set() {
        let mut set = loaded("apple\nbanana\n");
        set.unload().unwrap();
        set.load_from(Cursor::new("cherry\n")).unwrap();

        let fresh = loaded("cherry\n");
        assert_eq!(set.size(), fresh.size());
        for word in ["apple", "banana", "cherry", "CHERRY"] {
            assert_eq!(set.check(word), fresh.check(word), "{word}");
        }
    }

    #[test]
    fn over_long_word_fails_whole_load() {
        let mut set = WordSet::with_buckets(16).with_max_word_length(5);
        let err = set
            .load_from(Cursor::new("short\nfine\ntoolong\n"))
            .unwrap_err();
        match err {
            DictionaryError::MalformedWord {
                line,
                word_length,
                max,
            } => {
                assert_eq!(line, 3);
                assert_eq!(word_length, 7);
                assert_eq!(max, 5);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!set.is_loaded());
        assert_eq!(set.size(), 0);
        assert!(!set.check("short"));

        // A failed load leaves the set ready for another attempt.
        set.load_from(Cursor::new("short\n")).unwrap();
        assert!(set.check("short"));
    }

    #[test]
    fn word_at_maximum_length_is_accepted() {
        let word = "a".repeat(MAX_WORD_LENGTH);
        let set = loaded(&word);
        assert!(set.check(&word.to_uppercase()));
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let mut set = WordSet::with_buckets(8);
        let err = set.load("/nonexistent/speller/words").unwrap_err();
        assert!(matches!(err, DictionaryError::SourceUnavailable { .. }));
        assert!(!set.is_loaded());
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let mut set = WordSet::with_buckets(8);
        let err = set
            .load_from(Cursor::new(b"apple\n\xff\xfe\n".to_vec()))
            .unwrap_err();
        assert!(matches!(err, DictionaryError::Read(_)));
        assert_eq!(set.size(), 0);
        assert!(!set.check("apple"));
    }

    #[test]
    fn oversized_table_is_an_allocation_error() {
        let mut set = WordSet::with_buckets(usize::MAX / 4);
        assert_eq!(set.bucket_count(), usize::MAX / 4);
        assert!(!set.check("apple"));

        let err = set.load_from(Cursor::new("apple\n")).unwrap_err();
        assert!(matches!(err, DictionaryError::Allocation(_)));
        assert!(!set.is_loaded());
        assert_eq!(set.size(), 0);
        assert!(!set.check("apple"));
        assert_eq!(set.iter().count(), 0);
        set.unload().unwrap();
    }

    #[test]
    fn hash_ignores_case_and_stays_in_range() {
        let set = WordSet::with_buckets(101);
        assert_eq!(set.hash("Hello"), set.hash("hELLO"));
        for word in ["", "a", "zebra", "it's", "supercalifragilistic"] {
            assert!(set.hash(word) < set.bucket_count());
        }
        assert_eq!(djb2(""), 5381);
        assert_eq!(djb2("a"), 5381 * 33 + u64::from(b'a'));
    }

    #[test]
    fn zero_buckets_is_clamped() {
        let mut set = WordSet::with_buckets(0);
        assert_eq!(set.bucket_count(), 1);
        set.load_from(Cursor::new("one two")).unwrap();
        assert_eq!(set.longest_chain(), 2);
        assert!(set.check("TWO"));
    }

    #[test]
    fn chains_keep_newest_first_and_original_case() {
        let set = loaded_single_bucket("first\nSecond\nthird\n");
        assert_eq!(set.iter().collect::<Vec<_>>(), ["third", "Second", "first"]);
    }

    fn loaded_single_bucket(words: &str) -> WordSet {
        let mut set = WordSet::with_buckets(1);
        set.load_from(Cursor::new(words)).unwrap();
        set
    }

    #[test]
    fn size_matches_stored_entries() {
        let set = loaded("a b c a B\nc\n");
        assert_eq!(set.size(), 6);
        assert_eq!(set.iter().count(), set.size());
    }

    #[test]
    fn words_spread_across_buckets() {
        let words = (0..20_000)
            .map(|i| format!("w{}x{}", i % 173, i / 173))
            .collect::<Vec<_>>()
            .join("\n");
        let mut set = WordSet::with_buckets(4096);
        set.load_from(Cursor::new(words)).unwrap();
        assert_eq!(set.size(), 20_000);
        // About five words per bucket on average.
        assert!(set.longest_chain() < 40, "{}", set.longest_chain());
    }
}
