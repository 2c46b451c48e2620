//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shell variables as a scope stack. Pushing copies the active scope, so a
/// script sees its caller's variables but its own assignments vanish when
/// the scope pops.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<HashMap<String, String>>,
}

pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Serialize, Deserialize)]
struct PersistedEnv {
    version: u32,
    variables: HashMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![HashMap::new()],
        }
    }

    fn active(&self) -> &HashMap<String, String> {
        self.scopes.last().expect("at least one scope")
    }

    fn active_mut(&mut self) -> &mut HashMap<String, String> {
        self.scopes.last_mut().expect("at least one scope")
    }

    pub fn push(&mut self) {
        let copy = self.active().clone();
        self.scopes.push(copy);
    }

    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.active().get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), String> {
        if !is_valid_name(name) {
            return Err(format!("invalid variable name: '{name}'"));
        }
        self.active_mut().insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn unset(&mut self, name: &str) -> bool {
        self.active_mut().remove(name).is_some()
    }

    pub fn get_all(&self) -> &HashMap<String, String> {
        self.active()
    }

    /// Replaces the active scope wholesale.
    pub fn load(&mut self, variables: HashMap<String, String>) {
        *self.active_mut() = variables;
    }

    pub fn to_blob(&self) -> String {
        serde_json::to_string(&PersistedEnv {
            version: 1,
            variables: self.active().clone(),
        })
        .expect("string maps always serialize")
    }

    pub fn from_blob(blob: &str) -> serde_json::Result<Self> {
        let persisted: PersistedEnv = serde_json::from_str(blob)?;
        Ok(Environment {
            scopes: vec![persisted.variables],
        })
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_inherit_by_copy() {
        let mut env = Environment::new();
        env.set("A", "1").unwrap();
        env.push();
        assert_eq!(env.get("A"), Some("1"));
        env.set("A", "2").unwrap();
        env.set("B", "3").unwrap();
        env.pop();
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), None);
    }

    #[test]
    fn bottom_scope_cannot_be_popped() {
        let mut env = Environment::new();
        env.set("A", "1").unwrap();
        env.pop();
        assert_eq!(env.get("A"), Some("1"));
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("PATH"));
        assert!(is_valid_name("_x2"));
        assert!(!is_valid_name("2x"));
        assert!(!is_valid_name("a-b"));
        assert!(!is_valid_name(""));
        let mut env = Environment::new();
        assert!(env.set("1BAD", "v").is_err());
    }

    #[test]
    fn blob_round_trip() {
        let mut env = Environment::new();
        env.set("HOME", "/home/user").unwrap();
        let blob = env.to_blob();
        let restored = Environment::from_blob(&blob).unwrap();
        assert_eq!(restored.get("HOME"), Some("/home/user"));
    }
}
