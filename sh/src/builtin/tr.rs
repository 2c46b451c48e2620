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
use crate::result::{CommandError, ExecResult};
use crate::shell::Shell;

pub struct Tr;

static TR_FLAGS: &[FlagSpec] = &[FlagSpec::boolean("delete", 'd')];

static TR_SPEC: CommandSpec = CommandSpec {
    name: "tr",
    summary: "translate or delete characters",
    usage: "tr [-d] set1 [set2]",
    flags: TR_FLAGS,
    root_required: false,
};

/// Expands `a-z` style ranges into the full character list.
fn expand_set(set: &str) -> Result<Vec<char>, CommandError> {
    let chars: Vec<char> = set.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len() && chars[i + 1] == '-' {
            let (lo, hi) = (chars[i], chars[i + 2]);
            if lo > hi {
                return Err(CommandError::failed(format!(
                    "tr: range out of order: '{lo}-{hi}'"
                )));
            }
            for c in lo..=hi {
                out.push(c);
            }
            i += 3;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out)
}

impl BuiltinUtility for Tr {
    fn spec(&self) -> &'static CommandSpec {
        &TR_SPEC
    }

    fn exec(&self, inv: Invocation, _: &mut Shell) -> ExecResult {
        let delete = inv.flags.is_set("delete");
        if delete && inv.args.len() != 1 {
            return Err(CommandError::failed("tr: -d takes exactly one set"));
        }
        if !delete && inv.args.len() != 2 {
            return Err(CommandError::failed("tr: two sets required"));
        }
        let from = expand_set(&inv.args[0])?;
        if delete {
            let out: String = inv.stdin.chars().filter(|c| !from.contains(c)).collect();
            return Ok(out.into());
        }
        let to = expand_set(&inv.args[1])?;
        if to.is_empty() {
            return Err(CommandError::failed("tr: empty replacement set"));
        }
        let out: String = inv
            .stdin
            .chars()
            .map(|c| match from.iter().position(|&f| f == c) {
                // a shorter replacement set repeats its last character
                Some(idx) => *to.get(idx).unwrap_or_else(|| to.last().unwrap()),
                None => c,
            })
            .collect();
        Ok(out.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_expand() {
        assert_eq!(expand_set("a-e").unwrap(), vec!['a', 'b', 'c', 'd', 'e']);
        assert_eq!(expand_set("x1-3").unwrap(), vec!['x', '1', '2', '3']);
        assert!(expand_set("z-a").is_err());
    }
}
