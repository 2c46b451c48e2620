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

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

#[derive(Serialize, Deserialize)]
struct PersistedAliases {
    version: u32,
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.aliases.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.aliases.remove(name).is_some()
    }

    /// All aliases in name order, for listing.
    pub fn get_all(&self) -> Vec<(&str, &str)> {
        let mut all: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        all.sort_by_key(|(name, _)| *name);
        all
    }

    pub fn load(&mut self, aliases: HashMap<String, String>) {
        self.aliases = aliases;
    }

    pub fn to_blob(&self) -> String {
        serde_json::to_string(&PersistedAliases {
            version: 1,
            aliases: self.aliases.clone(),
        })
        .expect("string maps always serialize")
    }

    pub fn from_blob(blob: &str) -> serde_json::Result<Self> {
        let persisted: PersistedAliases = serde_json::from_str(blob)?;
        Ok(AliasTable {
            aliases: persisted.aliases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut table = AliasTable::new();
        table.set("ll", "ls -l");
        assert_eq!(table.get("ll"), Some("ls -l"));
        assert!(table.remove("ll"));
        assert!(!table.remove("ll"));
        assert_eq!(table.get("ll"), None);
    }

    #[test]
    fn listing_is_sorted() {
        let mut table = AliasTable::new();
        table.set("z", "1");
        table.set("a", "2");
        let names: Vec<&str> = table.get_all().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["a", "z"]);
    }
}
