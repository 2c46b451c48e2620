//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Tokenization of one command string: shell quoting, backslash escapes,
//! and operator recognition. Words come out as part lists so `$NAME` and
//! `$(...)` can be expanded later without re-scanning quotes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub position: usize,
}

impl SyntaxError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        SyntaxError {
            message: message.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    Literal(String),
    /// `$NAME`, to be looked up in the environment.
    Variable(String),
    /// `$(...)`, to be executed and spliced.
    CommandSub(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    pub fn literal(text: &str) -> Self {
        Word {
            parts: vec![WordPart::Literal(text.to_string())],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Pipe,      // |
    AndIf,     // &&
    OrIf,      // ||
    Semicolon, // ;
    Great,     // >
    DGreat,    // >>
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(Word),
    Operator(Operator),
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
    current: Option<Word>,
    pending_literal: String,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
            current: None,
            pending_literal: String::new(),
        }
    }

    fn lookahead(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.lookahead();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn word(&mut self) -> &mut Word {
        self.current.get_or_insert_with(Word::default)
    }

    fn push_literal_char(&mut self, c: char) {
        self.word();
        self.pending_literal.push(c);
    }

    fn flush_pending(&mut self) {
        if !self.pending_literal.is_empty() {
            let text = std::mem::take(&mut self.pending_literal);
            self.word().parts.push(WordPart::Literal(text));
        }
    }

    fn push_part(&mut self, part: WordPart) {
        self.flush_pending();
        self.word().parts.push(part);
    }

    fn flush_word(&mut self) {
        self.flush_pending();
        if let Some(word) = self.current.take() {
            self.tokens.push(Token::Word(word));
        }
    }

    fn push_operator(&mut self, op: Operator) {
        self.flush_word();
        self.tokens.push(Token::Operator(op));
    }

    /// `$NAME` or `$(...)`; a `$` followed by neither stays literal.
    fn lex_dollar(&mut self, start: usize) -> Result<(), SyntaxError> {
        match self.lookahead() {
            Some('(') => {
                self.advance();
                let mut depth = 1usize;
                let mut inner = String::new();
                loop {
                    match self.advance() {
                        Some('(') => {
                            depth += 1;
                            inner.push('(');
                        }
                        Some(')') => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            inner.push(')');
                        }
                        Some(c) => inner.push(c),
                        None => {
                            return Err(SyntaxError::new(
                                "unterminated command substitution",
                                start,
                            ));
                        }
                    }
                }
                self.push_part(WordPart::CommandSub(inner));
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(c) = self.lookahead() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
                self.push_part(WordPart::Variable(name));
            }
            _ => self.push_literal_char('$'),
        }
        Ok(())
    }

    fn lex_single_quote(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.word();
        loop {
            match self.advance() {
                Some('\'') => return Ok(()),
                Some(c) => self.push_literal_char(c),
                None => return Err(SyntaxError::new("unterminated single quote", start)),
            }
        }
    }

    fn lex_double_quote(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.word();
        loop {
            let char_pos = self.pos;
            match self.advance() {
                Some('"') => return Ok(()),
                Some('\\') => match self.advance() {
                    Some(c @ ('"' | '$' | '\\' | '`')) => self.push_literal_char(c),
                    Some(c) => {
                        self.push_literal_char('\\');
                        self.push_literal_char(c);
                    }
                    None => return Err(SyntaxError::new("unterminated double quote", start)),
                },
                Some('$') => self.lex_dollar(char_pos)?,
                Some(c) => self.push_literal_char(c),
                None => return Err(SyntaxError::new("unterminated double quote", start)),
            }
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        while let Some(c) = self.lookahead() {
            let start = self.pos;
            self.advance();
            match c {
                ' ' | '\t' | '\n' => self.flush_word(),
                '|' => {
                    if self.lookahead() == Some('|') {
                        self.advance();
                        self.push_operator(Operator::OrIf);
                    } else {
                        self.push_operator(Operator::Pipe);
                    }
                }
                '&' => {
                    if self.lookahead() == Some('&') {
                        self.advance();
                        self.push_operator(Operator::AndIf);
                    } else {
                        return Err(SyntaxError::new("unexpected '&'", start));
                    }
                }
                ';' => self.push_operator(Operator::Semicolon),
                '>' => {
                    if self.lookahead() == Some('>') {
                        self.advance();
                        self.push_operator(Operator::DGreat);
                    } else {
                        self.push_operator(Operator::Great);
                    }
                }
                '\'' => self.lex_single_quote(start)?,
                '"' => self.lex_double_quote(start)?,
                '\\' => match self.advance() {
                    Some(escaped) => self.push_literal_char(escaped),
                    None => self.push_literal_char('\\'),
                },
                '$' => self.lex_dollar(start)?,
                '#' if self.current.is_none() && self.pending_literal.is_empty() => {
                    // comment runs to end of input
                    self.pos = self.chars.len();
                }
                other => self.push_literal_char(other),
            }
        }
        self.flush_word();
        Ok(self.tokens)
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(input).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokens: &[Token]) -> Vec<&Word> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word(w) => Some(w),
                Token::Operator(_) => None,
            })
            .collect()
    }

    #[test]
    fn lex_empty_string() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }

    #[test]
    fn lex_plain_words() {
        let tokens = tokenize("echo hello world").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word(Word::literal("echo")),
                Token::Word(Word::literal("hello")),
                Token::Word(Word::literal("world")),
            ]
        );
    }

    #[test]
    fn lex_operators_with_and_without_spaces() {
        let tokens = tokenize("a|b&&c||d;e>f>>g").unwrap();
        let ops: Vec<&Operator> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Operator(op) => Some(op),
                Token::Word(_) => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                &Operator::Pipe,
                &Operator::AndIf,
                &Operator::OrIf,
                &Operator::Semicolon,
                &Operator::Great,
                &Operator::DGreat,
            ]
        );
        assert_eq!(words(&tokens).len(), 7);
    }

    #[test]
    fn single_quotes_preserve_everything() {
        let tokens = tokenize("echo '$HOME | literal'").unwrap();
        assert_eq!(tokens[1], Token::Word(Word::literal("$HOME | literal")));
    }

    #[test]
    fn double_quotes_group_but_expand() {
        let tokens = tokenize("echo \"a $USER b\"").unwrap();
        assert_eq!(
            tokens[1],
            Token::Word(Word {
                parts: vec![
                    WordPart::Literal("a ".to_string()),
                    WordPart::Variable("USER".to_string()),
                    WordPart::Literal(" b".to_string()),
                ]
            })
        );
    }

    #[test]
    fn backslash_escapes_next_character() {
        let tokens = tokenize(r"echo a\ b \$HOME").unwrap();
        assert_eq!(tokens[1], Token::Word(Word::literal("a b")));
        assert_eq!(tokens[2], Token::Word(Word::literal("$HOME")));
    }

    #[test]
    fn command_substitution_token() {
        let tokens = tokenize("echo $(ls /tmp)").unwrap();
        assert_eq!(
            tokens[1],
            Token::Word(Word {
                parts: vec![WordPart::CommandSub("ls /tmp".to_string())]
            })
        );
    }

    #[test]
    fn nested_command_substitution() {
        let tokens = tokenize("echo $(echo $(echo x))").unwrap();
        assert_eq!(
            tokens[1],
            Token::Word(Word {
                parts: vec![WordPart::CommandSub("echo $(echo x)".to_string())]
            })
        );
    }

    #[test]
    fn adjacent_quoting_is_one_word() {
        let tokens = tokenize(r#"a"b"'c'd"#).unwrap();
        assert_eq!(tokens, vec![Token::Word(Word::literal("abcd"))]);
    }

    #[test]
    fn empty_quotes_make_an_empty_word() {
        let tokens = tokenize("x ''").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1], Token::Word(Word { parts: vec![] }));
    }

    #[test]
    fn unterminated_quotes_report_position() {
        let err = tokenize("echo 'abc").unwrap_err();
        assert_eq!(err.position, 5);
        let err = tokenize("echo \"abc").unwrap_err();
        assert_eq!(err.position, 5);
    }

    #[test]
    fn stray_ampersand_is_rejected() {
        assert!(tokenize("a & b").is_err());
    }

    #[test]
    fn dollar_without_name_stays_literal() {
        let tokens = tokenize("echo $ 5$").unwrap();
        assert_eq!(tokens[1], Token::Word(Word::literal("$")));
        assert_eq!(tokens[2], Token::Word(Word::literal("5$")));
    }

    #[test]
    fn comment_swallows_rest_of_line() {
        let tokens = tokenize("# just a note").unwrap();
        assert!(tokens.is_empty());
        let tokens = tokenize("echo a # trailing").unwrap();
        assert_eq!(tokens.len(), 2);
    }
}
