//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! The `Shell` owns every piece of session state: the VFS, the keyed
//! managers, the working directory, and the login stack. There are no
//! process globals; commands receive a mutable borrow.

use crate::result::{CommandError, ErrorKind, ExecOutcome};
use crate::session::{AliasTable, Environment, GroupDb, History, JobTable, UserDb};
use crate::{executor, expansion, lexer, parser};
use std::collections::HashMap;
use vfs::{path, Credentials, Vfs};

/// Recursion bound for `$(...)`.
pub const MAX_SUBSTITUTION_DEPTH: u32 = 32;

pub struct Shell {
    pub vfs: Vfs,
    pub env: Environment,
    pub history: History,
    pub aliases: AliasTable,
    pub users: UserDb,
    pub groups: GroupDb,
    pub jobs: JobTable,
    pub config: HashMap<String, String>,
    cwd: String,
    session_stack: Vec<String>,
    substitution_depth: u32,
}

pub fn home_dir(user: &str) -> String {
    if user == "root" {
        "/".to_string()
    } else {
        format!("/home/{user}")
    }
}

impl Shell {
    pub fn new() -> Self {
        let mut env = Environment::new();
        let _ = env.set("USER", "user");
        let _ = env.set("HOME", "/home/user");
        let _ = env.set("SHELL", "vsh");
        let mut config = HashMap::new();
        config.insert("history.max".to_string(), "50".to_string());
        Shell {
            vfs: Vfs::new(),
            env,
            history: History::default(),
            aliases: AliasTable::new(),
            users: UserDb::with_defaults(),
            groups: GroupDb::with_defaults(),
            jobs: JobTable::new(),
            config,
            cwd: "/home/user".to_string(),
            session_stack: vec!["user".to_string()],
            substitution_depth: 0,
        }
    }

    // -- identity --

    pub fn current_user(&self) -> &str {
        self.session_stack
            .last()
            .map(String::as_str)
            .unwrap_or("user")
    }

    pub fn session_stack(&self) -> &[String] {
        &self.session_stack
    }

    pub fn push_session(&mut self, user: &str) {
        self.session_stack.push(user.to_string());
        self.refresh_identity_env();
    }

    /// Pops one `su`/`login` level; the base session always remains.
    pub fn pop_session(&mut self) -> Option<String> {
        if self.session_stack.len() <= 1 {
            return None;
        }
        let popped = self.session_stack.pop();
        self.refresh_identity_env();
        popped
    }

    /// Replaces the whole stack, as `login` does.
    pub fn login_session(&mut self, user: &str) {
        self.session_stack = vec![user.to_string()];
        self.refresh_identity_env();
        self.cwd = home_dir(user);
    }

    fn refresh_identity_env(&mut self) {
        let user = self.current_user().to_string();
        let _ = self.env.set("USER", &user);
        let _ = self.env.set("HOME", &home_dir(&user));
    }

    pub fn credentials(&self) -> Credentials {
        let user = self.current_user();
        let primary = self
            .users
            .get(user)
            .map(|entry| entry.primary_group.clone())
            .unwrap_or_else(|| user.to_string());
        let groups = self.groups.effective_groups(user, &primary);
        Credentials::new(user, &primary, groups)
    }

    // -- working directory --

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn set_cwd(&mut self, target: &str) -> Result<(), CommandError> {
        let abs = path::absolute(&self.cwd, target);
        match self.vfs.get_node(&abs) {
            Some(node) if node.is_directory() => {
                self.cwd = abs;
                Ok(())
            }
            Some(_) => Err(CommandError::new(
                ErrorKind::WrongType,
                format!("{abs}: not a directory"),
            )),
            None => Err(CommandError::new(
                ErrorKind::NotFound,
                format!("{abs}: no such file or directory"),
            )),
        }
    }

    /// Joins a command argument against the working directory.
    pub fn resolve_path(&self, arg: &str) -> String {
        path::absolute(&self.cwd, arg)
    }

    // -- execution --

    pub fn execute(&mut self, input: &str) -> ExecOutcome {
        self.execute_with_input(input, None)
    }

    pub fn execute_with_input(&mut self, input: &str, stdin: Option<String>) -> ExecOutcome {
        if input.trim().is_empty() {
            return ExecOutcome::ok_empty();
        }
        if self.substitution_depth == 0 {
            self.history.add(input);
        }
        log::trace!("execute: {input}");
        let plan = match self.prepare(input) {
            Ok(plan) => plan,
            Err(err) => return ExecOutcome::from_error(err),
        };
        executor::execute_plan(self, &plan, stdin)
    }

    /// Lex, expand, alias-expand, and structure one command string.
    fn prepare(&mut self, input: &str) -> Result<parser::Plan, CommandError> {
        let tokens = lexer::tokenize(input).map_err(CommandError::from)?;
        let expanded = expansion::expand_tokens(tokens, self)?;
        let alias_snapshot: HashMap<String, String> = self
            .aliases
            .get_all()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let with_aliases = parser::expand_aliases(
            expanded,
            |name| alias_snapshot.get(name).cloned(),
            |value| {
                let tokens = lexer::tokenize(value).map_err(CommandError::from)?;
                expansion::expand_tokens(tokens, self)
            },
        )?;
        parser::build_plan(with_aliases)
    }

    /// `$(...)` re-entry, bounded so runaway nesting fails instead of
    /// recursing forever. Effects raised inside a substitution are dropped;
    /// only the text matters here.
    pub(crate) fn command_substitution(&mut self, inner: &str) -> Result<String, CommandError> {
        if self.substitution_depth >= MAX_SUBSTITUTION_DEPTH {
            return Err(CommandError::new(
                ErrorKind::SyntaxError,
                "command substitution nested too deeply",
            ));
        }
        self.substitution_depth += 1;
        let outcome = self.execute_with_input(inner, None);
        self.substitution_depth -= 1;
        match outcome.error {
            // parse failures abort the whole input; an ordinary command
            // failure substitutes whatever output there was, like sh
            Some(err) if err.kind == ErrorKind::SyntaxError => Err(err),
            _ => Ok(outcome.output),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_stack_push_and_pop() {
        let mut shell = Shell::new();
        assert_eq!(shell.current_user(), "user");
        shell.push_session("root");
        assert_eq!(shell.current_user(), "root");
        assert_eq!(shell.env.get("USER"), Some("root"));
        assert_eq!(shell.pop_session().as_deref(), Some("root"));
        assert_eq!(shell.current_user(), "user");
        // the base session cannot be popped
        assert_eq!(shell.pop_session(), None);
    }

    #[test]
    fn set_cwd_validates_target() {
        let mut shell = Shell::new();
        shell.set_cwd("/etc").unwrap();
        assert_eq!(shell.cwd(), "/etc");
        assert_eq!(
            shell.set_cwd("motd").unwrap_err().kind,
            ErrorKind::WrongType
        );
        assert_eq!(
            shell.set_cwd("/missing").unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[test]
    fn substitution_depth_is_bounded() {
        let mut shell = Shell::new();
        // build a 40-deep $(echo $(echo ...)) nest
        let mut cmd = "echo x".to_string();
        for _ in 0..40 {
            cmd = format!("echo $({cmd})");
        }
        let outcome = shell.execute(&cmd);
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::SyntaxError));
    }
}
