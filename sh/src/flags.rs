//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Schema-driven flag parsing. Every command declares the flags it accepts;
//! anything the schema does not recognize falls through as a positional
//! argument, so commands wanting strict parsing enforce it themselves.

use crate::result::{CommandError, ErrorKind};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    /// Canonical name commands look flags up by.
    pub name: &'static str,
    pub short: Option<char>,
    pub long: Option<&'static str>,
    pub takes_value: bool,
    /// Hidden flags are accepted but left out of help listings
    /// (e.g. the `--confirmed` re-invocation marker).
    pub hidden: bool,
}

impl FlagSpec {
    pub const fn boolean(name: &'static str, short: char) -> Self {
        FlagSpec {
            name,
            short: Some(short),
            long: Some(name),
            takes_value: false,
            hidden: false,
        }
    }

    pub const fn value(name: &'static str, short: char) -> Self {
        FlagSpec {
            name,
            short: Some(short),
            long: Some(name),
            takes_value: true,
            hidden: false,
        }
    }

    pub const fn long_only(name: &'static str) -> Self {
        FlagSpec {
            name,
            short: None,
            long: Some(name),
            takes_value: false,
            hidden: false,
        }
    }

    pub const fn hidden_marker(name: &'static str) -> Self {
        FlagSpec {
            name,
            short: None,
            long: Some(name),
            takes_value: false,
            hidden: true,
        }
    }
}

/// Per-command schema plus the metadata `help` renders.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    pub flags: &'static [FlagSpec],
    pub root_required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Set,
    Value(String),
}

#[derive(Debug, Clone, Default)]
pub struct Flags(HashMap<&'static str, FlagValue>);

impl Flags {
    pub fn is_set(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FlagValue::Value(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    fn insert(&mut self, name: &'static str, value: FlagValue) {
        self.0.insert(name, value);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedArgs {
    pub args: Vec<String>,
    pub flags: Flags,
}

fn find_short(spec: &CommandSpec, c: char) -> Option<&'static FlagSpec> {
    spec.flags.iter().find(|f| f.short == Some(c))
}

fn find_long(spec: &CommandSpec, name: &str) -> Option<&'static FlagSpec> {
    spec.flags.iter().find(|f| f.long == Some(name))
}

fn missing_argument(spec: &CommandSpec, flag: &FlagSpec) -> CommandError {
    CommandError::new(
        ErrorKind::FlagRequiresArgument,
        format!("{}: option '{}' requires an argument", spec.name, flag.name),
    )
}

/// Parses one segment's tokens against the command's schema.
pub fn parse_flags(spec: &CommandSpec, tokens: &[String]) -> Result<ParsedArgs, CommandError> {
    let mut parsed = ParsedArgs::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if let Some(long_name) = token.strip_prefix("--") {
            if let Some(flag) = find_long(spec, long_name) {
                i += 1;
                if flag.takes_value {
                    match tokens.get(i) {
                        Some(value) if !value.starts_with('-') => {
                            parsed
                                .flags
                                .insert(flag.name, FlagValue::Value(value.clone()));
                            i += 1;
                        }
                        _ => return Err(missing_argument(spec, flag)),
                    }
                } else {
                    parsed.flags.insert(flag.name, FlagValue::Set);
                }
                continue;
            }
        } else if let Some(body) = token.strip_prefix('-') {
            if body.chars().count() == 1 {
                if let Some(flag) = find_short(spec, body.chars().next().unwrap()) {
                    i += 1;
                    if flag.takes_value {
                        match tokens.get(i) {
                            Some(value) if !value.starts_with('-') => {
                                parsed
                                    .flags
                                    .insert(flag.name, FlagValue::Value(value.clone()));
                                i += 1;
                            }
                            _ => return Err(missing_argument(spec, flag)),
                        }
                    } else {
                        parsed.flags.insert(flag.name, FlagValue::Set);
                    }
                    continue;
                }
            } else if !body.is_empty() {
                // bundled short flags are accepted only when every letter is
                // a declared boolean flag; otherwise the token is positional
                let bundle: Option<Vec<&FlagSpec>> = body
                    .chars()
                    .map(|c| find_short(spec, c).filter(|f| !f.takes_value))
                    .collect();
                if let Some(bundle) = bundle {
                    for flag in bundle {
                        parsed.flags.insert(flag.name, FlagValue::Set);
                    }
                    i += 1;
                    continue;
                }
            }
        }
        parsed.args.push(token.clone());
        i += 1;
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LS_FLAGS: &[FlagSpec] = &[
        FlagSpec::boolean("long", 'l'),
        FlagSpec::boolean("all", 'a'),
        FlagSpec::value("width", 'w'),
    ];
    const LS: CommandSpec = CommandSpec {
        name: "ls",
        summary: "",
        usage: "",
        flags: LS_FLAGS,
        root_required: false,
    };

    fn toks(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_separate_short_flags() {
        let parsed = parse_flags(&LS, &toks(&["-l", "-a", "dir"])).unwrap();
        assert!(parsed.flags.is_set("long"));
        assert!(parsed.flags.is_set("all"));
        assert_eq!(parsed.args, vec!["dir"]);
    }

    #[test]
    fn parse_bundled_short_flags() {
        let parsed = parse_flags(&LS, &toks(&["-la"])).unwrap();
        assert!(parsed.flags.is_set("long"));
        assert!(parsed.flags.is_set("all"));
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn bundle_with_value_flag_is_positional() {
        // w takes a value, so -lw cannot be a bundle
        let parsed = parse_flags(&LS, &toks(&["-lw"])).unwrap();
        assert!(!parsed.flags.is_set("long"));
        assert_eq!(parsed.args, vec!["-lw"]);
    }

    #[test]
    fn long_flags_and_values() {
        let parsed = parse_flags(&LS, &toks(&["--long", "--width", "80", "x"])).unwrap();
        assert!(parsed.flags.is_set("long"));
        assert_eq!(parsed.flags.value("width"), Some("80"));
        assert_eq!(parsed.args, vec!["x"]);
    }

    #[test]
    fn value_flag_requires_argument() {
        let err = parse_flags(&LS, &toks(&["-w"])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FlagRequiresArgument);
        let err = parse_flags(&LS, &toks(&["-w", "-l"])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FlagRequiresArgument);
    }

    #[test]
    fn unknown_flags_fall_through_as_arguments() {
        let parsed = parse_flags(&LS, &toks(&["-z", "--wat", "f"])).unwrap();
        assert_eq!(parsed.args, vec!["-z", "--wat", "f"]);
    }

    #[test]
    fn lone_dash_is_an_argument() {
        let parsed = parse_flags(&LS, &toks(&["-"])).unwrap();
        assert_eq!(parsed.args, vec!["-"]);
    }
}
