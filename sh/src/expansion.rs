//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Word expansion: `$NAME` resolves against the active environment scope
//! (empty when unset) and `$(...)` re-enters the executor, splicing its
//! output with one trailing newline trimmed.

use crate::lexer::{Token, Word, WordPart};
use crate::parser::PlanToken;
use crate::result::CommandError;
use crate::shell::Shell;

pub fn expand_word(word: &Word, shell: &mut Shell) -> Result<String, CommandError> {
    let mut out = String::new();
    for part in &word.parts {
        match part {
            WordPart::Literal(text) => out.push_str(text),
            WordPart::Variable(name) => {
                if let Some(value) = shell.env.get(name) {
                    out.push_str(value);
                }
            }
            WordPart::CommandSub(inner) => {
                let mut stdout = shell.command_substitution(inner)?;
                if stdout.ends_with('\n') {
                    stdout.pop();
                }
                out.push_str(&stdout);
            }
        }
    }
    Ok(out)
}

/// Expands every word in a lexed token stream into plan tokens.
pub fn expand_tokens(
    tokens: Vec<Token>,
    shell: &mut Shell,
) -> Result<Vec<PlanToken>, CommandError> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Word(word) => out.push(PlanToken::Word(expand_word(&word, shell)?)),
            Token::Operator(op) => out.push(PlanToken::Operator(op)),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn variables_expand_from_active_scope() {
        let mut shell = Shell::new();
        shell.env.set("GREETING", "hi").unwrap();
        let tokens = tokenize("echo $GREETING-$MISSING").unwrap();
        let expanded = expand_tokens(tokens, &mut shell).unwrap();
        assert_eq!(
            expanded[1],
            PlanToken::Word("hi-".to_string())
        );
    }

    #[test]
    fn command_substitution_splices_output() {
        let mut shell = Shell::new();
        let tokens = tokenize("echo $(echo nested)").unwrap();
        let expanded = expand_tokens(tokens, &mut shell).unwrap();
        assert_eq!(expanded[1], PlanToken::Word("nested".to_string()));
    }

    #[test]
    fn single_quotes_suppress_expansion() {
        let mut shell = Shell::new();
        shell.env.set("X", "value").unwrap();
        let tokens = tokenize("echo '$X'").unwrap();
        let expanded = expand_tokens(tokens, &mut shell).unwrap();
        assert_eq!(expanded[1], PlanToken::Word("$X".to_string()));
    }
}
