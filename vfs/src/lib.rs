//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! In-memory virtual filesystem for the vshell shell: a tree of file and
//! directory nodes with POSIX-style ownership and permission metadata,
//! persisted as a single version-tagged JSON blob.
//!
//! Paths handed to [`Vfs`] operations are absolute; joining a relative path
//! against a working directory is the caller's job (see [`path::absolute`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod error;
pub mod modestr;
pub mod node;
pub mod path;

pub use error::{Result, VfsError};
pub use node::{now_stamp, Credentials, DirNode, FileNode, Meta, Node, NodeType, Perm, MODE_MAX};

pub const DEFAULT_FILE_MODE: u16 = 0o644;
pub const DEFAULT_DIR_MODE: u16 = 0o755;

const STATE_VERSION: u32 = 1;

#[derive(Serialize)]
struct PersistedTreeRef<'a> {
    version: u32,
    root: &'a Node,
}

#[derive(Deserialize)]
struct PersistedTree {
    #[allow(dead_code)]
    version: u32,
    root: Node,
}

/// Options for [`Vfs::validate_path`].
#[derive(Debug, Default, Clone)]
pub struct ValidateOptions {
    pub expected_type: Option<NodeType>,
    pub permissions: Vec<Perm>,
    pub allow_missing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsckIssue {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default, Clone)]
pub struct FsckReport {
    pub issues: Vec<FsckIssue>,
    pub repaired: usize,
}

pub struct Vfs {
    root: Node,
    dirty: bool,
}

impl Vfs {
    /// Builds the default skeleton used on first boot.
    pub fn new() -> Self {
        let mut vfs = Vfs {
            root: Node::directory("root", "root", DEFAULT_DIR_MODE),
            dirty: true,
        };
        vfs.seed("/home", Node::directory("root", "root", DEFAULT_DIR_MODE));
        vfs.seed("/home/user", Node::directory("user", "user", DEFAULT_DIR_MODE));
        vfs.seed("/etc", Node::directory("root", "root", DEFAULT_DIR_MODE));
        vfs.seed("/tmp", Node::directory("root", "root", 0o777));
        vfs.seed("/var", Node::directory("root", "root", DEFAULT_DIR_MODE));
        vfs.seed("/var/log", Node::directory("root", "root", DEFAULT_DIR_MODE));
        vfs.seed(
            "/etc/motd",
            Node::file("root", "root", DEFAULT_FILE_MODE, "Welcome to vshell.\n"),
        );
        vfs.seed("/etc/sudoers", Node::file("root", "root", 0o640, "root\nuser\n"));
        vfs
    }

    fn seed(&mut self, abs: &str, node: Node) {
        let (parent, name) = path::split_parent(abs).expect("seed path is never the root");
        let dir = self
            .node_at_mut(&parent)
            .and_then(Node::as_directory_mut)
            .expect("seed parent exists");
        dir.children.insert(name, node);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    // -- lookup --

    /// Returns the node at an absolute path, or `None`. Never fails.
    pub fn get_node(&self, abs: &str) -> Option<&Node> {
        self.node_at(&path::normalize(abs))
    }

    fn node_at(&self, abs: &str) -> Option<&Node> {
        let mut current = &self.root;
        for component in path::components(abs) {
            current = current.as_directory()?.children.get(component)?;
        }
        Some(current)
    }

    fn node_at_mut(&mut self, abs: &str) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for component in path::components(abs) {
            current = current.as_directory_mut()?.children.get_mut(component)?;
        }
        Some(current)
    }

    /// Resolves a path and checks type and permission expectations in one
    /// step. Returns the node, or `Ok(None)` when the path is absent and
    /// `allow_missing` is set.
    pub fn validate_path(
        &self,
        abs: &str,
        creds: &Credentials,
        opts: &ValidateOptions,
    ) -> Result<Option<&Node>> {
        let node = match self.get_node(abs) {
            Some(node) => node,
            None => {
                if opts.allow_missing {
                    return Ok(None);
                }
                return Err(VfsError::NotFound(abs.to_string()));
            }
        };
        match opts.expected_type {
            Some(NodeType::Directory) if !node.is_directory() => {
                return Err(VfsError::NotADirectory(abs.to_string()));
            }
            Some(NodeType::File) if node.is_directory() => {
                return Err(VfsError::IsADirectory(abs.to_string()));
            }
            _ => {}
        }
        for &perm in &opts.permissions {
            if !node.allows(creds, perm) {
                return Err(VfsError::PermissionDenied(abs.to_string()));
            }
        }
        Ok(Some(node))
    }

    pub fn has_permission(&self, abs: &str, creds: &Credentials, perm: Perm) -> bool {
        self.get_node(abs)
            .map(|node| node.allows(creds, perm))
            .unwrap_or(false)
    }

    /// Looks up the parent of `abs` for an insertion or removal, verifying it
    /// exists, is a directory, and is writable by the caller.
    fn writable_parent(&self, abs: &str, creds: &Credentials) -> Result<(String, String)> {
        let (parent, name) = match path::split_parent(abs) {
            Some(pair) => pair,
            None => return Err(VfsError::PermissionDenied("/".to_string())),
        };
        let parent_node = self
            .node_at(&parent)
            .ok_or_else(|| VfsError::NotFound(parent.clone()))?;
        if !parent_node.is_directory() {
            return Err(VfsError::NotADirectory(parent));
        }
        if !parent_node.allows(creds, Perm::Write) {
            return Err(VfsError::PermissionDenied(abs.to_string()));
        }
        Ok((parent, name))
    }

    fn insert_child(&mut self, parent: &str, name: String, node: Node) {
        let dir = self
            .node_at_mut(parent)
            .and_then(Node::as_directory_mut)
            .expect("parent checked by caller");
        dir.children.insert(name, node);
        // child insertion and removal always refresh the parent stamp
        self.node_at_mut(parent).unwrap().touch();
        self.dirty = true;
    }

    fn detach_child(&mut self, parent: &str, name: &str) -> Node {
        let dir = self
            .node_at_mut(parent)
            .and_then(Node::as_directory_mut)
            .expect("parent checked by caller");
        let node = dir.children.remove(name).expect("child checked by caller");
        self.node_at_mut(parent).unwrap().touch();
        self.dirty = true;
        node
    }

    // -- mutation --

    /// Creates or replaces a file. Creation requires a writable parent
    /// directory; replacement requires write permission on the file itself.
    pub fn write_file(&mut self, abs: &str, content: &str, creds: &Credentials) -> Result<()> {
        let abs = path::normalize(abs);
        match self.node_at(&abs) {
            Some(node) => {
                if node.is_directory() {
                    return Err(VfsError::IsADirectory(abs));
                }
                if !node.allows(creds, Perm::Write) {
                    return Err(VfsError::PermissionDenied(abs));
                }
                let file = self.node_at_mut(&abs).unwrap();
                file.as_file_mut().unwrap().content = content.to_string();
                file.touch();
                self.dirty = true;
                Ok(())
            }
            None => {
                let (parent, name) = self.writable_parent(&abs, creds)?;
                let node = Node::file(&creds.user, &creds.primary_group, DEFAULT_FILE_MODE, content);
                self.insert_child(&parent, name, node);
                Ok(())
            }
        }
    }

    /// Appends to a file, creating it if missing. One newline is interposed
    /// when the existing content does not already end in one.
    pub fn append_file(&mut self, abs: &str, content: &str, creds: &Credentials) -> Result<()> {
        let abs = path::normalize(abs);
        match self.get_node(&abs) {
            None => self.write_file(&abs, content, creds),
            Some(node) => {
                let existing = node
                    .as_file()
                    .ok_or_else(|| VfsError::IsADirectory(abs.clone()))?;
                let mut combined = existing.content.clone();
                if !combined.is_empty() && !combined.ends_with('\n') {
                    combined.push('\n');
                }
                combined.push_str(content);
                self.write_file(&abs, &combined, creds)
            }
        }
    }

    pub fn create_directory(&mut self, abs: &str, creds: &Credentials) -> Result<()> {
        let abs = path::normalize(abs);
        if self.node_at(&abs).is_some() {
            return Err(VfsError::Exists(abs));
        }
        let (parent, name) = self.writable_parent(&abs, creds)?;
        let node = Node::directory(&creds.user, &creds.primary_group, DEFAULT_DIR_MODE);
        self.insert_child(&parent, name, node);
        Ok(())
    }

    /// `mkdir -p`: creates every missing component, tolerating those that
    /// already exist as directories.
    pub fn create_directory_all(&mut self, abs: &str, creds: &Credentials) -> Result<()> {
        let abs = path::normalize(abs);
        let mut current = String::new();
        for component in path::components(&abs) {
            current.push('/');
            current.push_str(component);
            match self.node_at(&current) {
                Some(node) if node.is_directory() => {}
                Some(_) => return Err(VfsError::NotADirectory(current)),
                None => self.create_directory(&current, creds)?,
            }
        }
        Ok(())
    }

    /// Creates an empty file or refreshes an existing node's mtime.
    pub fn touch(&mut self, abs: &str, creds: &Credentials) -> Result<()> {
        let abs = path::normalize(abs);
        match self.node_at(&abs) {
            None => self.write_file(&abs, "", creds),
            Some(node) => {
                if !node.allows(creds, Perm::Write) {
                    return Err(VfsError::PermissionDenied(abs));
                }
                self.node_at_mut(&abs).unwrap().touch();
                self.dirty = true;
                Ok(())
            }
        }
    }

    /// Removes a node. Non-empty directories require `recursive`; the whole
    /// subtree is permission-checked before anything is deleted, so a denial
    /// leaves the tree unchanged.
    pub fn remove(&mut self, abs: &str, recursive: bool, creds: &Credentials) -> Result<()> {
        let abs = path::normalize(abs);
        let node = self
            .node_at(&abs)
            .ok_or_else(|| VfsError::NotFound(abs.clone()))?;
        if let Some(dir) = node.as_directory() {
            if !dir.children.is_empty() && !recursive {
                return Err(VfsError::NotEmpty(abs));
            }
            check_subtree(node, &abs, &mut |node, node_path| {
                if node.is_directory() && !node.allows(creds, Perm::Write) {
                    Err(VfsError::PermissionDenied(node_path.to_string()))
                } else {
                    Ok(())
                }
            })?;
        }
        let (parent, name) = self.writable_parent(&abs, creds)?;
        self.detach_child(&parent, &name);
        Ok(())
    }

    /// Resolves the final destination for a move or copy: an existing
    /// directory destination receives the node under its original basename.
    fn resolve_destination(&self, src: &str, dest: &str) -> String {
        let dest = path::normalize(dest);
        match self.node_at(&dest) {
            Some(node) if node.is_directory() => {
                if dest == "/" {
                    format!("/{}", path::basename(src))
                } else {
                    format!("{}/{}", dest, path::basename(src))
                }
            }
            _ => dest,
        }
    }

    /// Moves a subtree. Fails if the destination already exists as a
    /// different node; moving into an existing directory inserts the node
    /// under its original basename.
    pub fn rename_node(&mut self, old: &str, new: &str, creds: &Credentials) -> Result<String> {
        let old = path::normalize(old);
        if self.node_at(&old).is_none() {
            return Err(VfsError::NotFound(old));
        }
        if old == "/" {
            return Err(VfsError::PermissionDenied(old));
        }
        let dest = self.resolve_destination(&old, new);
        if dest == old {
            return Ok(dest);
        }
        if self.node_at(&dest).is_some() {
            return Err(VfsError::Exists(dest));
        }
        if path::is_descendant_of(&dest, &old) {
            return Err(VfsError::Exists(dest));
        }
        let (old_parent, old_name) = self.writable_parent(&old, creds)?;
        let (dest_parent, dest_name) = self.writable_parent(&dest, creds)?;
        let node = self.detach_child(&old_parent, &old_name);
        self.insert_child(&dest_parent, dest_name, node);
        Ok(dest)
    }

    /// Copies a subtree. Every source node must be readable; copies are
    /// owned by the caller and stamped with fresh mtimes.
    pub fn copy_node(
        &mut self,
        src: &str,
        dest: &str,
        recursive: bool,
        creds: &Credentials,
    ) -> Result<String> {
        let src = path::normalize(src);
        let node = self
            .node_at(&src)
            .ok_or_else(|| VfsError::NotFound(src.clone()))?;
        if node.is_directory() && !recursive {
            return Err(VfsError::IsADirectory(src));
        }
        check_subtree(node, &src, &mut |node, node_path| {
            if !node.allows(creds, Perm::Read) {
                Err(VfsError::PermissionDenied(node_path.to_string()))
            } else {
                Ok(())
            }
        })?;
        let dest = self.resolve_destination(&src, dest);
        if dest == src || path::is_descendant_of(&dest, &src) {
            return Err(VfsError::Exists(dest));
        }
        let copy = duplicate_as(node, creds);
        match self.node_at(&dest) {
            Some(existing) => {
                if existing.is_directory() {
                    return Err(VfsError::Exists(dest));
                }
                if !existing.allows(creds, Perm::Write) {
                    return Err(VfsError::PermissionDenied(dest));
                }
                let slot = self.node_at_mut(&dest).unwrap();
                *slot = copy;
                self.dirty = true;
            }
            None => {
                let (parent, name) = self.writable_parent(&dest, creds)?;
                self.insert_child(&parent, name, copy);
            }
        }
        Ok(dest)
    }

    // -- attributes --

    pub fn chmod(
        &mut self,
        abs: &str,
        mode: &modestr::ChmodMode,
        recursive: bool,
        creds: &Credentials,
    ) -> Result<()> {
        self.change_attrs(abs, recursive, creds, |node, node_path, creds| {
            if !creds.is_root() && creds.user != node.meta().owner {
                return Err(VfsError::PermissionDenied(node_path.to_string()));
            }
            Ok(())
        }, |node| {
            let meta = node.meta_mut();
            meta.mode = modestr::apply(meta.mode, mode);
        })
    }

    pub fn chown(
        &mut self,
        abs: &str,
        owner: &str,
        recursive: bool,
        creds: &Credentials,
    ) -> Result<()> {
        self.change_attrs(abs, recursive, creds, |_, node_path, creds| {
            if !creds.is_root() {
                return Err(VfsError::PermissionDenied(node_path.to_string()));
            }
            Ok(())
        }, |node| {
            node.meta_mut().owner = owner.to_string();
        })
    }

    pub fn chgrp(
        &mut self,
        abs: &str,
        group: &str,
        recursive: bool,
        creds: &Credentials,
    ) -> Result<()> {
        self.change_attrs(abs, recursive, creds, |node, node_path, creds| {
            let owner_with_group =
                creds.user == node.meta().owner && creds.groups.contains(group);
            if !creds.is_root() && !owner_with_group {
                return Err(VfsError::PermissionDenied(node_path.to_string()));
            }
            Ok(())
        }, |node| {
            node.meta_mut().group = group.to_string();
        })
    }

    fn change_attrs(
        &mut self,
        abs: &str,
        recursive: bool,
        creds: &Credentials,
        check: impl Fn(&Node, &str, &Credentials) -> Result<()>,
        mutate: impl Fn(&mut Node),
    ) -> Result<()> {
        let abs = path::normalize(abs);
        let node = self
            .node_at(&abs)
            .ok_or_else(|| VfsError::NotFound(abs.clone()))?;
        let targets = if recursive {
            let mut paths = Vec::new();
            collect_paths(node, &abs, &mut paths);
            paths
        } else {
            vec![abs.clone()]
        };
        for target in &targets {
            let node = self.node_at(target).expect("collected from live tree");
            check(node, target, creds)?;
        }
        for target in &targets {
            mutate(self.node_at_mut(target).unwrap());
        }
        self.dirty = true;
        Ok(())
    }

    // -- inspection --

    /// Total content bytes under a path; 0 for missing paths.
    pub fn calculate_node_size(&self, abs: &str) -> u64 {
        fn size_of(node: &Node) -> u64 {
            match node {
                Node::File(f) => f.content.len() as u64,
                Node::Directory(d) => d.children.values().map(size_of).sum(),
            }
        }
        self.get_node(abs).map(size_of).unwrap_or(0)
    }

    /// Walks the tree reporting nodes whose owner or group no longer exists.
    /// In repair mode those nodes are reassigned to `root:root`.
    pub fn fsck(
        &mut self,
        users: &BTreeSet<String>,
        groups: &BTreeSet<String>,
        repair: bool,
    ) -> FsckReport {
        let mut report = FsckReport::default();
        let mut paths = Vec::new();
        collect_paths(&self.root, "/", &mut paths);
        for node_path in paths {
            let node = self.node_at(&node_path).unwrap();
            let bad_owner = !users.contains(&node.meta().owner);
            let bad_group = !groups.contains(&node.meta().group);
            if !bad_owner && !bad_group {
                continue;
            }
            if bad_owner {
                report.issues.push(FsckIssue {
                    path: node_path.clone(),
                    message: format!("unknown owner '{}'", node.meta().owner),
                });
            }
            if bad_group {
                report.issues.push(FsckIssue {
                    path: node_path.clone(),
                    message: format!("unknown group '{}'", node.meta().group),
                });
            }
            if repair {
                log::warn!("fsck: reassigning {} to root:root", node_path);
                let meta = self.node_at_mut(&node_path).unwrap().meta_mut();
                meta.owner = "root".to_string();
                meta.group = "root".to_string();
                report.repaired += 1;
                self.dirty = true;
            }
        }
        report
    }

    // -- persistence --

    pub fn save_state(&self) -> String {
        serde_json::to_string(&PersistedTreeRef {
            version: STATE_VERSION,
            root: &self.root,
        })
        .expect("node trees always serialize")
    }

    pub fn load_state(blob: &str) -> serde_json::Result<Self> {
        let tree: PersistedTree = serde_json::from_str(blob)?;
        log::debug!("loaded vfs state ({} bytes)", blob.len());
        Ok(Vfs {
            root: tree.root,
            dirty: false,
        })
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

fn check_subtree(
    node: &Node,
    node_path: &str,
    check: &mut impl FnMut(&Node, &str) -> Result<()>,
) -> Result<()> {
    check(node, node_path)?;
    if let Some(dir) = node.as_directory() {
        for (name, child) in &dir.children {
            let child_path = if node_path == "/" {
                format!("/{name}")
            } else {
                format!("{node_path}/{name}")
            };
            check_subtree(child, &child_path, check)?;
        }
    }
    Ok(())
}

fn collect_paths(node: &Node, node_path: &str, out: &mut Vec<String>) {
    out.push(node_path.to_string());
    if let Some(dir) = node.as_directory() {
        for (name, child) in &dir.children {
            let child_path = if node_path == "/" {
                format!("/{name}")
            } else {
                format!("{node_path}/{name}")
            };
            collect_paths(child, &child_path, out);
        }
    }
}

fn duplicate_as(node: &Node, creds: &Credentials) -> Node {
    match node {
        Node::File(f) => Node::file(
            &creds.user,
            &creds.primary_group,
            f.meta.mode,
            &f.content,
        ),
        Node::Directory(d) => {
            let mut copy = Node::directory(&creds.user, &creds.primary_group, d.meta.mode);
            let children = &mut copy.as_directory_mut().unwrap().children;
            for (name, child) in &d.children {
                children.insert(name.clone(), duplicate_as(child, creds));
            }
            copy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_creds() -> Credentials {
        Credentials::new("user", "user", BTreeSet::from(["user".to_string()]))
    }

    #[test]
    fn skeleton_has_expected_nodes() {
        let vfs = Vfs::new();
        assert!(vfs.get_node("/").unwrap().is_directory());
        assert!(vfs.get_node("/home/user").unwrap().is_directory());
        assert!(vfs.get_node("/etc/motd").unwrap().as_file().is_some());
        assert!(vfs.get_node("/nope").is_none());
    }

    #[test]
    fn write_creates_and_replaces() {
        let mut vfs = Vfs::new();
        let creds = user_creds();
        vfs.write_file("/home/user/a.txt", "one", &creds).unwrap();
        assert_eq!(
            vfs.get_node("/home/user/a.txt").unwrap().as_file().unwrap().content,
            "one"
        );
        vfs.write_file("/home/user/a.txt", "two", &creds).unwrap();
        assert_eq!(
            vfs.get_node("/home/user/a.txt").unwrap().as_file().unwrap().content,
            "two"
        );
    }

    #[test]
    fn write_requires_writable_parent() {
        let mut vfs = Vfs::new();
        let err = vfs.write_file("/etc/new", "x", &user_creds()).unwrap_err();
        assert_eq!(err, VfsError::PermissionDenied("/etc/new".to_string()));
    }

    #[test]
    fn append_interposes_newline_only_when_needed() {
        let mut vfs = Vfs::new();
        let creds = user_creds();
        vfs.write_file("/home/user/f", "one", &creds).unwrap();
        vfs.append_file("/home/user/f", "two", &creds).unwrap();
        assert_eq!(
            vfs.get_node("/home/user/f").unwrap().as_file().unwrap().content,
            "one\ntwo"
        );
        vfs.write_file("/home/user/g", "one\n", &creds).unwrap();
        vfs.append_file("/home/user/g", "two", &creds).unwrap();
        assert_eq!(
            vfs.get_node("/home/user/g").unwrap().as_file().unwrap().content,
            "one\ntwo"
        );
    }

    #[test]
    fn mkdir_p_creates_parents() {
        let mut vfs = Vfs::new();
        let creds = Credentials::root();
        vfs.create_directory_all("/x/y/z", &creds).unwrap();
        assert!(vfs.get_node("/x/y/z").unwrap().is_directory());
        assert!(vfs.get_node("/x/y").unwrap().is_directory());
        assert!(vfs.get_node("/x/y/z/none").is_none());
    }

    #[test]
    fn remove_refuses_nonempty_without_recursive() {
        let mut vfs = Vfs::new();
        let creds = Credentials::root();
        vfs.create_directory_all("/a/b", &creds).unwrap();
        assert_eq!(
            vfs.remove("/a", false, &creds).unwrap_err(),
            VfsError::NotEmpty("/a".to_string())
        );
        vfs.remove("/a", true, &creds).unwrap();
        assert!(vfs.get_node("/a").is_none());
    }

    #[test]
    fn recursive_remove_denied_leaves_tree_unchanged() {
        let mut vfs = Vfs::new();
        let root = Credentials::root();
        vfs.create_directory_all("/a/b", &root).unwrap();
        vfs.write_file("/a/b/f", "data", &root).unwrap();
        vfs.chmod("/a", &modestr::parse("777").unwrap(), false, &root)
            .unwrap();
        // /a/b stays root-owned 755: user cannot empty it
        let err = vfs.remove("/a", true, &user_creds()).unwrap_err();
        assert!(matches!(err, VfsError::PermissionDenied(_)));
        assert!(vfs.get_node("/a/b/f").is_some());
    }

    #[test]
    fn rename_into_directory_keeps_basename() {
        let mut vfs = Vfs::new();
        let creds = Credentials::root();
        vfs.write_file("/tmp/f", "x", &creds).unwrap();
        vfs.create_directory("/tmp/d", &creds).unwrap();
        let dest = vfs.rename_node("/tmp/f", "/tmp/d", &creds).unwrap();
        assert_eq!(dest, "/tmp/d/f");
        assert!(vfs.get_node("/tmp/f").is_none());
        assert!(vfs.get_node("/tmp/d/f").is_some());
    }

    #[test]
    fn rename_over_existing_fails() {
        let mut vfs = Vfs::new();
        let creds = Credentials::root();
        vfs.write_file("/tmp/a", "1", &creds).unwrap();
        vfs.write_file("/tmp/b", "2", &creds).unwrap();
        assert_eq!(
            vfs.rename_node("/tmp/a", "/tmp/b", &creds).unwrap_err(),
            VfsError::Exists("/tmp/b".to_string())
        );
    }

    #[test]
    fn copy_directory_recursively() {
        let mut vfs = Vfs::new();
        let creds = Credentials::root();
        vfs.create_directory_all("/tmp/src/sub", &creds).unwrap();
        vfs.write_file("/tmp/src/sub/f", "payload", &creds).unwrap();
        assert!(matches!(
            vfs.copy_node("/tmp/src", "/tmp/dst", false, &creds),
            Err(VfsError::IsADirectory(_))
        ));
        vfs.copy_node("/tmp/src", "/tmp/dst", true, &creds).unwrap();
        assert_eq!(
            vfs.get_node("/tmp/dst/sub/f").unwrap().as_file().unwrap().content,
            "payload"
        );
        assert!(vfs.get_node("/tmp/src/sub/f").is_some());
    }

    #[test]
    fn chmod_only_for_owner_or_root() {
        let mut vfs = Vfs::new();
        let creds = user_creds();
        vfs.write_file("/home/user/f", "", &creds).unwrap();
        vfs.chmod("/home/user/f", &modestr::parse("600").unwrap(), false, &creds)
            .unwrap();
        assert_eq!(vfs.get_node("/home/user/f").unwrap().meta().mode, 0o600);
        let err = vfs
            .chmod("/etc/motd", &modestr::parse("777").unwrap(), false, &creds)
            .unwrap_err();
        assert!(matches!(err, VfsError::PermissionDenied(_)));
    }

    #[test]
    fn node_size_sums_subtree() {
        let mut vfs = Vfs::new();
        let creds = Credentials::root();
        vfs.create_directory("/data", &creds).unwrap();
        vfs.write_file("/data/a", "12345", &creds).unwrap();
        vfs.write_file("/data/b", "123", &creds).unwrap();
        assert_eq!(vfs.calculate_node_size("/data"), 8);
        assert_eq!(vfs.calculate_node_size("/data/a"), 5);
        assert_eq!(vfs.calculate_node_size("/missing"), 0);
    }

    #[test]
    fn fsck_reports_and_repairs() {
        let mut vfs = Vfs::new();
        let creds = Credentials::root();
        vfs.write_file("/tmp/f", "", &creds).unwrap();
        vfs.chown("/tmp/f", "ghost", false, &creds).unwrap();
        let users = BTreeSet::from(["root".to_string(), "user".to_string()]);
        let groups = users.clone();
        let report = vfs.fsck(&users, &groups, false);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.repaired, 0);
        let report = vfs.fsck(&users, &groups, true);
        assert_eq!(report.repaired, 1);
        assert_eq!(vfs.get_node("/tmp/f").unwrap().meta().owner, "root");
        assert!(vfs.fsck(&users, &groups, false).issues.is_empty());
    }

    #[test]
    fn validate_path_reports_typed_failures() {
        let mut vfs = Vfs::new();
        let creds = user_creds();
        vfs.write_file("/home/user/f", "x", &creds).unwrap();
        let opts = ValidateOptions {
            expected_type: Some(NodeType::File),
            permissions: vec![Perm::Read],
            allow_missing: false,
        };
        assert!(vfs.validate_path("/home/user/f", &creds, &opts).unwrap().is_some());
        assert_eq!(
            vfs.validate_path("/home/user/missing", &creds, &opts).unwrap_err(),
            VfsError::NotFound("/home/user/missing".to_string())
        );
        assert_eq!(
            vfs.validate_path("/home", &creds, &opts).unwrap_err(),
            VfsError::IsADirectory("/home".to_string())
        );
        let opts = ValidateOptions {
            expected_type: None,
            permissions: vec![Perm::Write],
            allow_missing: true,
        };
        assert!(vfs.validate_path("/home/user/missing", &creds, &opts).unwrap().is_none());
        assert_eq!(
            vfs.validate_path("/etc/motd", &creds, &opts).unwrap_err(),
            VfsError::PermissionDenied("/etc/motd".to_string())
        );
        assert!(vfs.has_permission("/etc/motd", &creds, Perm::Read));
        assert!(!vfs.has_permission("/etc/motd", &creds, Perm::Write));
        assert!(!vfs.has_permission("/missing", &creds, Perm::Read));
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut vfs = Vfs::new();
        let creds = Credentials::root();
        vfs.create_directory_all("/deep/nest", &creds).unwrap();
        vfs.write_file("/deep/nest/f", "content", &creds).unwrap();
        vfs.chmod("/deep/nest/f", &modestr::parse("640").unwrap(), false, &creds)
            .unwrap();
        let blob = vfs.save_state();
        let restored = Vfs::load_state(&blob).unwrap();
        assert_eq!(restored.root(), vfs.root());
        assert!(!restored.is_dirty());
    }

    #[test]
    fn mode_000_blocks_every_mutation_for_non_root() {
        let mut vfs = Vfs::new();
        let root = Credentials::root();
        vfs.write_file("/tmp/locked", "x", &root).unwrap();
        vfs.chmod("/tmp/locked", &modestr::parse("0").unwrap(), false, &root)
            .unwrap();
        let creds = user_creds();
        assert!(matches!(
            vfs.write_file("/tmp/locked", "y", &creds),
            Err(VfsError::PermissionDenied(_))
        ));
        assert!(matches!(
            vfs.touch("/tmp/locked", &creds),
            Err(VfsError::PermissionDenied(_))
        ));
        assert!(matches!(
            vfs.chmod("/tmp/locked", &modestr::parse("777").unwrap(), false, &creds),
            Err(VfsError::PermissionDenied(_))
        ));
    }
}
