//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Turns an expanded token stream into an execution plan: pipelines chained
//! by `&&`/`||`/`;`, each a list of command segments with an optional final
//! redirection. Flag parsing stays deferred; each command owns its schema.

use crate::lexer::Operator;
use crate::result::{CommandError, ErrorKind};
use std::collections::HashSet;

/// The operator *following* a pipeline (`None` for the last one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOp {
    And,
    Or,
    Seq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirMode {
    Overwrite,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub mode: RedirMode,
    pub path: String,
}

/// One command invocation within a pipeline. `tokens` holds everything
/// after the command name, unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub segments: Vec<Segment>,
    pub redirection: Option<Redirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainedPipeline {
    pub pipeline: Pipeline,
    pub operator: Option<ChainOp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    pub pipelines: Vec<ChainedPipeline>,
}

/// A token after expansion: plain text or one of the six plan operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanToken {
    Word(String),
    Operator(Operator),
}

fn syntax(message: impl Into<String>) -> CommandError {
    CommandError::new(ErrorKind::SyntaxError, message)
}

/// Expands aliases at the head of each segment, exactly once per name per
/// resolution so cycles terminate.
pub fn expand_aliases(
    tokens: Vec<PlanToken>,
    lookup: impl Fn(&str) -> Option<String>,
    mut retokenize: impl FnMut(&str) -> Result<Vec<PlanToken>, CommandError>,
) -> Result<Vec<PlanToken>, CommandError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut at_segment_start = true;
    for token in tokens {
        match token {
            PlanToken::Operator(op) => {
                at_segment_start = matches!(
                    op,
                    Operator::Pipe | Operator::AndIf | Operator::OrIf | Operator::Semicolon
                );
                out.push(PlanToken::Operator(op));
            }
            PlanToken::Word(word) => {
                if !at_segment_start {
                    out.push(PlanToken::Word(word));
                    continue;
                }
                at_segment_start = false;
                let mut expansion = vec![PlanToken::Word(word)];
                let mut seen = HashSet::new();
                loop {
                    let head = match expansion.first() {
                        Some(PlanToken::Word(head)) => head.clone(),
                        _ => break,
                    };
                    if seen.contains(&head) {
                        break;
                    }
                    let Some(value) = lookup(&head) else { break };
                    seen.insert(head);
                    let replacement = retokenize(&value)?;
                    expansion.splice(0..1, replacement);
                }
                out.extend(expansion);
            }
        }
    }
    Ok(out)
}

/// Builds the plan: operator split, redirection extraction, segment split.
pub fn build_plan(tokens: Vec<PlanToken>) -> Result<Plan, CommandError> {
    let mut plan = Plan::default();
    let mut group: Vec<PlanToken> = Vec::new();
    for token in tokens {
        match token {
            PlanToken::Operator(op @ (Operator::AndIf | Operator::OrIf | Operator::Semicolon)) => {
                let chain = match op {
                    Operator::AndIf => ChainOp::And,
                    Operator::OrIf => ChainOp::Or,
                    _ => ChainOp::Seq,
                };
                if group.is_empty() {
                    return Err(syntax("empty command before operator"));
                }
                let pipeline = build_pipeline(std::mem::take(&mut group))?;
                plan.pipelines.push(ChainedPipeline {
                    pipeline,
                    operator: Some(chain),
                });
            }
            other => group.push(other),
        }
    }
    if group.is_empty() {
        // a trailing `;` is fine, a dangling `&&`/`||` is not
        match plan.pipelines.last() {
            Some(last) if last.operator != Some(ChainOp::Seq) && last.operator.is_some() => {
                return Err(syntax("unexpected end of input after operator"));
            }
            _ => {}
        }
    } else {
        let pipeline = build_pipeline(group)?;
        plan.pipelines.push(ChainedPipeline {
            pipeline,
            operator: None,
        });
    }
    Ok(plan)
}

fn build_pipeline(tokens: Vec<PlanToken>) -> Result<Pipeline, CommandError> {
    let mut redirection: Option<Redirection> = None;
    let mut segments_tokens: Vec<Vec<String>> = vec![Vec::new()];
    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        match token {
            PlanToken::Operator(op @ (Operator::Great | Operator::DGreat)) => {
                let mode = if op == Operator::Great {
                    RedirMode::Overwrite
                } else {
                    RedirMode::Append
                };
                let path = match iter.next() {
                    Some(PlanToken::Word(path)) => path,
                    _ => return Err(syntax("missing redirection target")),
                };
                if let Some(existing) = &redirection {
                    if existing.mode != mode {
                        return Err(syntax("cannot combine '>' and '>>'"));
                    }
                }
                // several redirections of the same kind: the last one wins
                redirection = Some(Redirection { mode, path });
            }
            PlanToken::Operator(Operator::Pipe) => {
                if segments_tokens.last().unwrap().is_empty() {
                    return Err(syntax("empty pipeline segment"));
                }
                segments_tokens.push(Vec::new());
            }
            PlanToken::Word(word) => segments_tokens.last_mut().unwrap().push(word),
            PlanToken::Operator(_) => unreachable!("chain operators split before this point"),
        }
    }
    if segments_tokens.last().unwrap().is_empty() {
        return Err(syntax("empty pipeline segment"));
    }
    let segments = segments_tokens
        .into_iter()
        .map(|mut tokens| {
            let name = tokens.remove(0);
            Segment { name, tokens }
        })
        .collect();
    Ok(Pipeline {
        segments,
        redirection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(spec: &[&str]) -> Vec<PlanToken> {
        spec.iter()
            .map(|s| match *s {
                "|" => PlanToken::Operator(Operator::Pipe),
                "&&" => PlanToken::Operator(Operator::AndIf),
                "||" => PlanToken::Operator(Operator::OrIf),
                ";" => PlanToken::Operator(Operator::Semicolon),
                ">" => PlanToken::Operator(Operator::Great),
                ">>" => PlanToken::Operator(Operator::DGreat),
                word => PlanToken::Word(word.to_string()),
            })
            .collect()
    }

    #[test]
    fn single_command() {
        let plan = build_plan(toks(&["ls", "-l"])).unwrap();
        assert_eq!(plan.pipelines.len(), 1);
        let pipeline = &plan.pipelines[0].pipeline;
        assert_eq!(pipeline.segments.len(), 1);
        assert_eq!(pipeline.segments[0].name, "ls");
        assert_eq!(pipeline.segments[0].tokens, vec!["-l"]);
        assert_eq!(plan.pipelines[0].operator, None);
    }

    #[test]
    fn pipeline_split() {
        let plan = build_plan(toks(&["cat", "f", "|", "wc", "-l"])).unwrap();
        let pipeline = &plan.pipelines[0].pipeline;
        assert_eq!(pipeline.segments.len(), 2);
        assert_eq!(pipeline.segments[1].name, "wc");
    }

    #[test]
    fn chain_operators_recorded() {
        let plan = build_plan(toks(&["a", "&&", "b", "||", "c", ";", "d"])).unwrap();
        let ops: Vec<Option<ChainOp>> = plan.pipelines.iter().map(|p| p.operator).collect();
        assert_eq!(
            ops,
            vec![
                Some(ChainOp::And),
                Some(ChainOp::Or),
                Some(ChainOp::Seq),
                None
            ]
        );
    }

    #[test]
    fn trailing_semicolon_is_fine() {
        let plan = build_plan(toks(&["a", ";"])).unwrap();
        assert_eq!(plan.pipelines.len(), 1);
    }

    #[test]
    fn dangling_and_is_an_error() {
        let err = build_plan(toks(&["a", "&&"])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn redirection_is_detached() {
        let plan = build_plan(toks(&["echo", "hi", ">", "f"])).unwrap();
        let pipeline = &plan.pipelines[0].pipeline;
        assert_eq!(pipeline.segments[0].tokens, vec!["hi"]);
        assert_eq!(
            pipeline.redirection,
            Some(Redirection {
                mode: RedirMode::Overwrite,
                path: "f".to_string()
            })
        );
    }

    #[test]
    fn last_redirection_wins() {
        let plan = build_plan(toks(&["echo", "hi", ">", "a", ">", "b"])).unwrap();
        assert_eq!(
            plan.pipelines[0].pipeline.redirection.as_ref().unwrap().path,
            "b"
        );
    }

    #[test]
    fn mixed_redirection_modes_are_rejected() {
        let err = build_plan(toks(&["echo", "hi", ">", "a", ">>", "b"])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn missing_redirection_target() {
        assert!(build_plan(toks(&["echo", "hi", ">"])).is_err());
        assert!(build_plan(toks(&["echo", ">", "|", "x"])).is_err());
    }

    #[test]
    fn empty_segment_is_rejected() {
        assert!(build_plan(toks(&["a", "|", "|", "b"])).is_err());
        assert!(build_plan(toks(&["|", "a"])).is_err());
        assert!(build_plan(toks(&["a", "|"])).is_err());
    }

    #[test]
    fn alias_expansion_replaces_head_once() {
        let lookup = |name: &str| match name {
            "ll" => Some("ls -l".to_string()),
            _ => None,
        };
        let retok = |value: &str| {
            Ok(value
                .split_whitespace()
                .map(|w| PlanToken::Word(w.to_string()))
                .collect())
        };
        let out = expand_aliases(toks(&["ll", "dir"]), lookup, retok).unwrap();
        assert_eq!(out, toks(&["ls", "-l", "dir"]));
        // non-head positions stay untouched
        let out = expand_aliases(toks(&["echo", "ll"]), lookup, retok).unwrap();
        assert_eq!(out, toks(&["echo", "ll"]));
    }

    #[test]
    fn alias_cycles_terminate() {
        let lookup = |name: &str| match name {
            "a" => Some("a b".to_string()),
            "x" => Some("y".to_string()),
            "y" => Some("x".to_string()),
            _ => None,
        };
        let retok = |value: &str| {
            Ok(value
                .split_whitespace()
                .map(|w| PlanToken::Word(w.to_string()))
                .collect())
        };
        let out = expand_aliases(toks(&["a"]), lookup, retok).unwrap();
        assert_eq!(out, toks(&["a", "b"]));
        let out = expand_aliases(toks(&["x"]), lookup, retok).unwrap();
        assert_eq!(out, toks(&["x"]));
    }
}
