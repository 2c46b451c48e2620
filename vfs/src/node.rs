//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Highest permission word a node may carry (three rwx triads plus the
/// setuid/setgid/sticky bits).
pub const MODE_MAX: u16 = 0o7777;

/// Current time as an ISO-8601 UTC stamp, second precision.
pub fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perm {
    Read,
    Write,
    Execute,
}

impl Perm {
    fn bit(self) -> u16 {
        match self {
            Perm::Read => 0o4,
            Perm::Write => 0o2,
            Perm::Execute => 0o1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    File,
    Directory,
}

/// The identity a filesystem operation runs under. `groups` is the caller's
/// effective group set (primary group included).
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub primary_group: String,
    pub groups: BTreeSet<String>,
}

impl Credentials {
    pub fn new(user: &str, primary_group: &str, groups: BTreeSet<String>) -> Self {
        Credentials {
            user: user.to_string(),
            primary_group: primary_group.to_string(),
            groups,
        }
    }

    pub fn root() -> Self {
        Credentials {
            user: "root".to_string(),
            primary_group: "root".to_string(),
            groups: BTreeSet::from(["root".to_string()]),
        }
    }

    pub fn is_root(&self) -> bool {
        self.user == "root"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    pub owner: String,
    pub group: String,
    pub mode: u16,
    pub mtime: String,
}

impl Meta {
    fn new(owner: &str, group: &str, mode: u16) -> Self {
        Meta {
            owner: owner.to_string(),
            group: group.to_string(),
            mode,
            mtime: now_stamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileNode {
    #[serde(flatten)]
    pub meta: Meta,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirNode {
    #[serde(flatten)]
    pub meta: Meta,
    #[serde(default)]
    pub children: BTreeMap<String, Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File(FileNode),
    Directory(DirNode),
}

impl Node {
    pub fn file(owner: &str, group: &str, mode: u16, content: &str) -> Self {
        Node::File(FileNode {
            meta: Meta::new(owner, group, mode),
            content: content.to_string(),
        })
    }

    pub fn directory(owner: &str, group: &str, mode: u16) -> Self {
        Node::Directory(DirNode {
            meta: Meta::new(owner, group, mode),
            children: BTreeMap::new(),
        })
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Node::File(f) => &f.meta,
            Node::Directory(d) => &d.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        match self {
            Node::File(f) => &mut f.meta,
            Node::Directory(d) => &mut d.meta,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::File(_) => NodeType::File,
            Node::Directory(_) => NodeType::Directory,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Node::File(_) => "file",
            Node::Directory(_) => "directory",
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&DirNode> {
        match self {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        }
    }

    pub fn as_directory_mut(&mut self) -> Option<&mut DirNode> {
        match self {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileNode> {
        match self {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        }
    }

    /// Evaluates one permission for the given credentials. Root bypasses all
    /// checks; otherwise the owner, group, or other triad applies, in that
    /// order of precedence.
    pub fn allows(&self, creds: &Credentials, perm: Perm) -> bool {
        if creds.is_root() {
            return true;
        }
        let meta = self.meta();
        let shift = if creds.user == meta.owner {
            6
        } else if creds.groups.contains(&meta.group) {
            3
        } else {
            0
        };
        (meta.mode >> shift) & perm.bit() != 0
    }

    pub fn touch(&mut self) {
        self.meta_mut().mtime = now_stamp();
    }

    /// Renders the mode word in `ls -l` style, e.g. `drwxr-xr-x`.
    pub fn mode_string(&self) -> String {
        let mode = self.meta().mode;
        let mut out = String::with_capacity(10);
        out.push(if self.is_directory() { 'd' } else { '-' });
        for shift in [6u16, 3, 0] {
            let triad = (mode >> shift) & 0o7;
            out.push(if triad & 0o4 != 0 { 'r' } else { '-' });
            out.push(if triad & 0o2 != 0 { 'w' } else { '-' });
            out.push(if triad & 0o1 != 0 { 'x' } else { '-' });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(user: &str, groups: &[&str]) -> Credentials {
        Credentials::new(
            user,
            groups.first().copied().unwrap_or(user),
            groups.iter().map(|g| g.to_string()).collect(),
        )
    }

    #[test]
    fn owner_triad_takes_precedence() {
        let node = Node::file("alice", "staff", 0o407, "");
        // alice is the owner, so only the owner triad applies even though
        // the other triad is wider
        assert!(node.allows(&creds("alice", &["staff"]), Perm::Read));
        assert!(!node.allows(&creds("alice", &["staff"]), Perm::Write));
        assert!(!node.allows(&creds("alice", &["staff"]), Perm::Execute));
    }

    #[test]
    fn group_triad_applies_to_members() {
        let node = Node::file("alice", "staff", 0o640, "");
        assert!(node.allows(&creds("bob", &["staff"]), Perm::Read));
        assert!(!node.allows(&creds("bob", &["staff"]), Perm::Write));
        assert!(!node.allows(&creds("bob", &["users"]), Perm::Read));
    }

    #[test]
    fn root_bypasses_everything() {
        let node = Node::file("alice", "staff", 0o000, "");
        assert!(node.allows(&Credentials::root(), Perm::Read));
        assert!(node.allows(&Credentials::root(), Perm::Write));
        assert!(node.allows(&Credentials::root(), Perm::Execute));
    }

    #[test]
    fn mode_string_format() {
        assert_eq!(Node::directory("r", "r", 0o755).mode_string(), "drwxr-xr-x");
        assert_eq!(Node::file("r", "r", 0o640, "").mode_string(), "-rw-r-----");
        assert_eq!(Node::file("r", "r", 0o000, "").mode_string(), "----------");
    }

    #[test]
    fn node_round_trips_through_json() {
        let mut dir = Node::directory("root", "root", 0o755);
        dir.as_directory_mut()
            .unwrap()
            .children
            .insert("a.txt".to_string(), Node::file("user", "user", 0o644, "hi"));
        let blob = serde_json::to_string(&dir).unwrap();
        let back: Node = serde_json::from_str(&blob).unwrap();
        assert_eq!(dir, back);
    }
}
