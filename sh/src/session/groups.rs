//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::session::users::UserDb;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub members: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct GroupDb {
    groups: BTreeMap<String, GroupEntry>,
}

#[derive(Serialize, Deserialize)]
struct PersistedGroups {
    version: u32,
    groups: BTreeMap<String, GroupEntry>,
}

impl GroupDb {
    pub fn with_defaults() -> Self {
        let mut db = GroupDb {
            groups: BTreeMap::new(),
        };
        db.create("root").expect("fresh db");
        db.create("user").expect("fresh db");
        db
    }

    pub fn create(&mut self, name: &str) -> Result<(), String> {
        if self.groups.contains_key(name) {
            return Err(format!("group '{name}' already exists"));
        }
        self.groups.insert(name.to_string(), GroupEntry::default());
        Ok(())
    }

    /// Deletes a group, refusing while any user still has it as their
    /// primary group.
    pub fn delete(&mut self, name: &str, users: &UserDb) -> Result<(), String> {
        if !self.groups.contains_key(name) {
            return Err(format!("group '{name}' does not exist"));
        }
        if let Some((user, _)) = users
            .get_all()
            .iter()
            .find(|(_, entry)| entry.primary_group == name)
        {
            return Err(format!(
                "cannot delete group '{name}': it is the primary group of '{user}'"
            ));
        }
        self.groups.remove(name);
        Ok(())
    }

    pub fn add_user(&mut self, group: &str, user: &str) -> Result<bool, String> {
        match self.groups.get_mut(group) {
            Some(entry) => Ok(entry.members.insert(user.to_string())),
            None => Err(format!("group '{group}' does not exist")),
        }
    }

    pub fn remove_user(&mut self, group: &str, user: &str) -> Result<bool, String> {
        match self.groups.get_mut(group) {
            Some(entry) => Ok(entry.members.remove(user)),
            None => Err(format!("group '{group}' does not exist")),
        }
    }

    /// Drops a user from every member list, for account removal.
    pub fn remove_user_everywhere(&mut self, user: &str) {
        for entry in self.groups.values_mut() {
            entry.members.remove(user);
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn get_all(&self) -> &BTreeMap<String, GroupEntry> {
        &self.groups
    }

    pub fn name_set(&self) -> BTreeSet<String> {
        self.groups.keys().cloned().collect()
    }

    /// A user's effective group set: their primary group plus every group
    /// listing them as a member.
    pub fn effective_groups(&self, user: &str, primary_group: &str) -> BTreeSet<String> {
        let mut set = BTreeSet::from([primary_group.to_string()]);
        for (name, entry) in &self.groups {
            if entry.members.contains(user) {
                set.insert(name.clone());
            }
        }
        set
    }

    pub fn to_blob(&self) -> String {
        serde_json::to_string(&PersistedGroups {
            version: 1,
            groups: self.groups.clone(),
        })
        .expect("group records always serialize")
    }

    pub fn from_blob(blob: &str) -> serde_json::Result<Self> {
        let persisted: PersistedGroups = serde_json::from_str(blob)?;
        Ok(GroupDb {
            groups: persisted.groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_membership() {
        let mut groups = GroupDb::with_defaults();
        groups.create("staff").unwrap();
        assert!(groups.create("staff").is_err());
        assert!(groups.add_user("staff", "alice").unwrap());
        assert!(!groups.add_user("staff", "alice").unwrap());
        assert!(groups.add_user("missing", "alice").is_err());
    }

    #[test]
    fn effective_groups_include_primary_and_memberships() {
        let mut groups = GroupDb::with_defaults();
        groups.create("staff").unwrap();
        groups.add_user("staff", "alice").unwrap();
        let set = groups.effective_groups("alice", "alice");
        assert!(set.contains("alice"));
        assert!(set.contains("staff"));
        assert!(!set.contains("root"));
    }

    #[test]
    fn delete_refuses_primary_group() {
        let mut groups = GroupDb::with_defaults();
        let users = UserDb::with_defaults();
        assert!(groups.delete("user", &users).is_err());
        groups.create("spare").unwrap();
        groups.delete("spare", &users).unwrap();
        assert!(!groups.exists("spare"));
    }
}
