//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Built-in commands. Every command is a unit struct implementing
//! [`BuiltinUtility`]; the registry is a static table the executor and
//! `help` both read. Commands receive one invocation value and a mutable
//! borrow of the shell, and return the shared result envelope.

use crate::flags::{CommandSpec, Flags};
use crate::result::{CommandError, ErrorKind, ExecResult};
use crate::shell::Shell;
use vfs::{Node, Perm};

mod alias;
mod base64;
mod cat;
mod cd;
mod chmod;
mod chown;
mod cp;
mod diff;
mod du;
mod echo;
mod env;
mod find;
mod fsck;
mod grep;
mod group;
mod head;
mod help;
mod history;
mod jobs;
mod ls;
mod mkdir;
mod misc;
mod rm;
mod run;
mod sort;
mod touch;
mod tr;
mod truefalse;
mod tree;
mod users;
mod wc;

/// Everything a command receives besides the shell itself. Commands ignore
/// the fields they do not use.
pub struct Invocation {
    pub args: Vec<String>,
    pub flags: Flags,
    pub stdin: String,
    pub user: String,
}

pub trait BuiltinUtility: Sync {
    fn spec(&self) -> &'static CommandSpec;
    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult;
}

static REGISTRY: &[&dyn BuiltinUtility] = &[
    &alias::Alias,
    &alias::Unalias,
    &base64::Base64,
    &cat::Cat,
    &cd::Cd,
    &cd::Pwd,
    &chmod::Chmod,
    &chown::Chown,
    &chown::Chgrp,
    &cp::Cp,
    &cp::Mv,
    &diff::Diff,
    &du::Du,
    &echo::Echo,
    &echo::Printf,
    &env::SetVar,
    &env::Unset,
    &env::Export,
    &env::Env,
    &find::Find,
    &fsck::Fsck,
    &fsck::Sync,
    &grep::Grep,
    &group::Groupadd,
    &group::Groupdel,
    &group::Usermod,
    &head::Head,
    &head::Tail,
    &help::Help,
    &history::HistoryCmd,
    &jobs::Jobs,
    &jobs::Ps,
    &jobs::Kill,
    &jobs::Bg,
    &jobs::Fg,
    &ls::Ls,
    &mkdir::Mkdir,
    &misc::Clear,
    &misc::Date,
    &misc::Sleep,
    &misc::Reboot,
    &rm::Rm,
    &rm::Rmdir,
    &run::Run,
    &sort::Sort,
    &sort::Uniq,
    &touch::Touch,
    &tr::Tr,
    &tree::Tree,
    &truefalse::True,
    &truefalse::False,
    &users::Whoami,
    &users::Groups,
    &users::Su,
    &users::Sudo,
    &users::Login,
    &users::Logout,
    &users::Passwd,
    &users::Useradd,
    &users::RemoveUser,
    &users::Visudo,
    &wc::Wc,
];

pub fn get_builtin(name: &str) -> Option<&'static dyn BuiltinUtility> {
    REGISTRY.iter().copied().find(|b| b.spec().name == name)
}

pub fn all_builtins() -> &'static [&'static dyn BuiltinUtility] {
    REGISTRY
}

/// Closest command name within edit distance 2, for "command not found"
/// suggestions.
pub fn suggest(name: &str) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;
    for builtin in REGISTRY {
        let candidate = builtin.spec().name;
        let distance = edit_distance(name, candidate);
        if distance <= 2 && best.map(|(d, _)| distance < d).unwrap_or(true) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, candidate)| candidate.to_string())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { prev } else { prev + 1 };
            prev = row[j + 1];
            row[j + 1] = cost.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row[b.len()]
}

// -- shared helpers --

/// Resolves a path argument and reads it as a file, enforcing read
/// permission.
pub(crate) fn read_file_arg(shell: &Shell, arg: &str) -> Result<String, CommandError> {
    let abs = shell.resolve_path(arg);
    let creds = shell.credentials();
    let node = shell
        .vfs
        .get_node(&abs)
        .ok_or_else(|| CommandError::new(ErrorKind::NotFound, format!("{abs}: no such file or directory")))?;
    let file = node.as_file().ok_or_else(|| {
        CommandError::new(ErrorKind::WrongType, format!("{abs}: is a directory"))
    })?;
    if !node.allows(&creds, Perm::Read) {
        return Err(CommandError::new(
            ErrorKind::PermissionDenied,
            format!("{abs}: permission denied"),
        ));
    }
    Ok(file.content.clone())
}

/// The standard input convention for filter commands: named files
/// concatenated, or the piped-in text when no files are given.
pub(crate) fn read_inputs(
    args: &[String],
    stdin: &str,
    shell: &Shell,
) -> Result<String, CommandError> {
    if args.is_empty() {
        return Ok(stdin.to_string());
    }
    let mut combined = String::new();
    for arg in args {
        let content = read_file_arg(shell, arg)?;
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&content);
    }
    Ok(combined)
}

/// Child path of a directory entry, for walkers that render full paths.
pub(crate) fn child_path(base: &str, name: &str) -> String {
    if base == "/" {
        format!("/{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Collects every file path under a node in sorted order.
pub(crate) fn collect_files(node: &Node, base: &str, out: &mut Vec<String>) {
    match node {
        Node::File(_) => out.push(base.to_string()),
        Node::Directory(dir) => {
            for (name, child) in &dir.children {
                collect_files(child, &child_path(base, name), out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_are_unique() {
        let mut names: Vec<&str> = REGISTRY.iter().map(|b| b.spec().name).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn lookup_finds_commands() {
        assert!(get_builtin("ls").is_some());
        assert!(get_builtin("definitely-not-a-command").is_none());
    }

    #[test]
    fn suggestions_for_near_misses() {
        assert_eq!(suggest("lss").as_deref(), Some("ls"));
        assert_eq!(suggest("grpe").as_deref(), Some("grep"));
        assert_eq!(suggest("xyzzy-nothing-close"), None);
    }
}
