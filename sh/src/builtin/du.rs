//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{child_path, BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::{CommandError, ErrorKind, ExecResult};
use crate::shell::Shell;
use vfs::Node;

pub struct Du;

static DU_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("summarize", 's'),
    FlagSpec::boolean("human", 'h'),
];

static DU_SPEC: CommandSpec = CommandSpec {
    name: "du",
    summary: "estimate file space usage",
    usage: "du [-s] [-h] [path...]",
    flags: DU_FLAGS,
    root_required: false,
};

fn format_size(bytes: u64, human: bool) -> String {
    if !human {
        return bytes.to_string();
    }
    const UNITS: &[&str] = &["B", "K", "M", "G"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}{}", UNITS[0])
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}

/// Post-order directory sizes, like du walking a tree.
fn walk(node: &Node, abs: &str, human: bool, lines: &mut Vec<String>) -> u64 {
    match node {
        Node::File(f) => f.content.len() as u64,
        Node::Directory(dir) => {
            let mut total = 0;
            for (name, child) in &dir.children {
                total += walk(child, &child_path(abs, name), human, lines);
            }
            lines.push(format!("{}\t{}", format_size(total, human), abs));
            total
        }
    }
}

impl BuiltinUtility for Du {
    fn spec(&self) -> &'static CommandSpec {
        &DU_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let targets: Vec<String> = if inv.args.is_empty() {
            vec![".".to_string()]
        } else {
            inv.args.clone()
        };
        let human = inv.flags.is_set("human");
        let mut lines = Vec::new();
        for target in &targets {
            let abs = shell.resolve_path(target);
            if shell.vfs.get_node(&abs).is_none() {
                return Err(CommandError::new(
                    ErrorKind::NotFound,
                    format!("du: {target}: no such file or directory"),
                ));
            }
            if inv.flags.is_set("summarize") {
                let size = shell.vfs.calculate_node_size(&abs);
                lines.push(format!("{}\t{}", format_size(size, human), abs));
            } else {
                let node = shell.vfs.get_node(&abs).unwrap();
                if node.is_directory() {
                    walk(node, &abs, human, &mut lines);
                } else {
                    let size = shell.vfs.calculate_node_size(&abs);
                    lines.push(format!("{}\t{}", format_size(size, human), abs));
                }
            }
        }
        Ok(lines.join("\n").into())
    }
}
