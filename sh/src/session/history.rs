//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    max_size: usize,
}

#[derive(Serialize, Deserialize)]
struct PersistedHistory {
    version: u32,
    entries: Vec<String>,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        History {
            entries: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    /// Appends a trimmed entry, skipping it when it repeats the previous
    /// one; the oldest entry drops out once the cap is reached.
    pub fn add(&mut self, command: &str) {
        let command = command.trim();
        if command.is_empty() {
            return;
        }
        if self.entries.back().map(String::as_str) == Some(command) {
            return;
        }
        if self.entries.len() >= self.max_size {
            self.entries.pop_front();
        }
        self.entries.push_back(command.to_string());
    }

    pub fn get_all(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn set(&mut self, entries: Vec<String>) {
        self.entries = entries.into_iter().collect();
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }

    pub fn to_blob(&self) -> String {
        serde_json::to_string(&PersistedHistory {
            version: 1,
            entries: self.entries.iter().cloned().collect(),
        })
        .expect("string lists always serialize")
    }

    pub fn from_blob(blob: &str, max_size: usize) -> serde_json::Result<Self> {
        let persisted: PersistedHistory = serde_json::from_str(blob)?;
        let mut history = History::new(max_size);
        history.set(persisted.entries);
        Ok(history)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(entries: &[&str]) -> History {
        let mut history = History::new(5);
        for entry in entries {
            history.add(entry);
        }
        history
    }

    #[test]
    fn add_trims_and_skips_blank() {
        let history = history_with(&["  ls  ", "", "   "]);
        assert_eq!(history.get_all().collect::<Vec<_>>(), vec!["ls"]);
    }

    #[test]
    fn immediate_duplicates_are_suppressed() {
        let history = history_with(&["ls", "ls", "pwd", "ls"]);
        assert_eq!(
            history.get_all().collect::<Vec<_>>(),
            vec!["ls", "pwd", "ls"]
        );
    }

    #[test]
    fn oldest_entry_drops_at_cap() {
        let history = history_with(&["a", "b", "c", "d", "e", "f"]);
        assert_eq!(history.len(), 5);
        assert_eq!(history.get_all().next(), Some("b"));
    }

    #[test]
    fn set_enforces_cap() {
        let mut history = History::new(2);
        history.set(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(history.get_all().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn blob_round_trip() {
        let history = history_with(&["one", "two"]);
        let restored = History::from_blob(&history.to_blob(), 5).unwrap();
        assert_eq!(restored.get_all().collect::<Vec<_>>(), vec!["one", "two"]);
    }
}
