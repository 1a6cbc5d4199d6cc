use crate::word_set::MAX_WORD_LENGTH;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pos(pub u32, pub u32);

impl Pos {
    pub fn line(&self) -> u32 {
        self.0
    }

    pub fn column(&self) -> u32 {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub start: Pos,
    pub end: Pos,
    pub lexeme: String,
}

/// Splits free text into candidate words.
///
/// A word is a run of ASCII letters and apostrophes that starts with a
/// letter. Runs touching a digit, and runs longer than the maximum word
/// length, are skipped entirely.
#[derive(Debug)]
pub struct Lexer {
    text: Vec<char>,
    max_length: usize,
    col: u32,
    line: u32,
    offset: usize,
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl Lexer {
    pub fn new<T: AsRef<str>>(text: T) -> Lexer {
        Lexer {
            text: text.as_ref().chars().collect(),
            max_length: MAX_WORD_LENGTH,
            col: 0,
            line: 0,
            offset: 0,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Lexer {
        self.max_length = max_length;
        self
    }

    fn pos(&self) -> Pos {
        Pos(self.line, self.col)
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            match self.peek()? {
                c if c.is_ascii_alphabetic() => {
                    if let Some(token) = self.word() {
                        return Some(token);
                    }
                }
                c if c.is_ascii_digit() => self.skip_while(|c| c.is_ascii_alphanumeric()),
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.peek()?;

        // Columns count UTF-16 code units, as editors do.
        self.col += char.len_utf16() as u32;
        if char == '\n' {
            self.col = 0;
            self.line += 1;
        }
        self.offset += 1;

        Some(char)
    }

    fn peek(&self) -> Option<char> {
        self.text.get(self.offset).copied()
    }

    fn skip_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.advance();
        }
    }

    fn word(&mut self) -> Option<Token> {
        let start = self.pos();
        let mut lexeme = String::new();

        while let Some(char) = self.peek() {
            match char {
                c if c.is_ascii_alphabetic() || c == '\'' => {
                    self.advance();
                    if lexeme.len() == self.max_length {
                        self.skip_while(|c| c.is_ascii_alphabetic());
                        return None;
                    }
                    lexeme.push(c);
                }
                c if c.is_ascii_digit() => {
                    self.skip_while(|c| c.is_ascii_alphanumeric());
                    return None;
                }
                _ => break,
            }
        }

        Some(Token {
            start,
            end: self.pos(),
            lexeme,
        })
    }
}
