use crate::lexer::{Lexer, Token};
use crate::word_set::WordSet;

/// Outcome of checking one text.
#[derive(Debug, Default)]
pub struct Report {
    /// Tokens not found in the dictionary, in text order.
    pub misspelled: Vec<Token>,
    /// Every token that was looked up.
    pub words_checked: usize,
}

pub struct Pipeline<'a> {
    words: &'a WordSet,
}

impl<'a> Pipeline<'a> {
    pub fn new(words: &'a WordSet) -> Pipeline<'a> {
        Pipeline { words }
    }

    pub fn run(&self, lexer: Lexer) -> Report {
        lexer.fold(Report::default(), |mut report, token| {
            report.words_checked += 1;
            if !self.words.check(&token.lexeme) {
                report.misspelled.push(token);
            }
            report
        })
    }
}
