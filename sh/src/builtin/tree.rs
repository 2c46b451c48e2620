//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::{CommandError, ErrorKind, ExecResult};
use crate::shell::Shell;
use vfs::Node;

pub struct Tree;

static TREE_FLAGS: &[FlagSpec] = &[FlagSpec::value("level", 'L')];

static TREE_SPEC: CommandSpec = CommandSpec {
    name: "tree",
    summary: "list directory contents as a tree",
    usage: "tree [-L depth] [path]",
    flags: TREE_FLAGS,
    root_required: false,
};

struct Tally {
    directories: usize,
    files: usize,
}

fn render(
    node: &Node,
    prefix: &str,
    depth: usize,
    max_depth: Option<usize>,
    lines: &mut Vec<String>,
    tally: &mut Tally,
) {
    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }
    let dir = match node.as_directory() {
        Some(dir) => dir,
        None => return,
    };
    let count = dir.children.len();
    for (i, (name, child)) in dir.children.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{name}"));
        if child.is_directory() {
            tally.directories += 1;
            let extension = if last { "    " } else { "│   " };
            render(
                child,
                &format!("{prefix}{extension}"),
                depth + 1,
                max_depth,
                lines,
                tally,
            );
        } else {
            tally.files += 1;
        }
    }
}

impl BuiltinUtility for Tree {
    fn spec(&self) -> &'static CommandSpec {
        &TREE_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let target = inv.args.first().map(String::as_str).unwrap_or(".");
        let abs = shell.resolve_path(target);
        let max_depth = match inv.flags.value("level") {
            Some(value) => Some(value.parse::<usize>().map_err(|_| {
                CommandError::failed(format!("tree: invalid level '{value}'"))
            })?),
            None => None,
        };
        let node = shell.vfs.get_node(&abs).ok_or_else(|| {
            CommandError::new(
                ErrorKind::NotFound,
                format!("tree: {target}: no such file or directory"),
            )
        })?;
        if !node.is_directory() {
            return Err(CommandError::new(
                ErrorKind::WrongType,
                format!("tree: {target}: not a directory"),
            ));
        }
        let mut lines = vec![abs.clone()];
        let mut tally = Tally {
            directories: 0,
            files: 0,
        };
        render(node, "", 0, max_depth, &mut lines, &mut tally);
        lines.push(String::new());
        lines.push(format!(
            "{} directories, {} files",
            tally.directories, tally.files
        ));
        Ok(lines.join("\n").into())
    }
}
