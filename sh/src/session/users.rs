//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Simulated user accounts. Passwords are stored as PBKDF2-HMAC-SHA256
//! digests (100,000 iterations, 16-byte salt), hex encoded. An account
//! without a password record accepts only empty-password logins.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::{BTreeMap, BTreeSet};

const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecord {
    pub salt: String,
    pub hash: String,
}

impl PasswordRecord {
    fn derive(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
        key
    }

    pub fn create(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let key = Self::derive(password, &salt);
        PasswordRecord {
            salt: hex::encode(salt),
            hash: hex::encode(key),
        }
    }

    pub fn matches(&self, password: &str) -> bool {
        let salt = match hex::decode(&self.salt) {
            Ok(salt) => salt,
            Err(_) => return false,
        };
        hex::encode(Self::derive(password, &salt)) == self.hash
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub password: Option<PasswordRecord>,
    pub primary_group: String,
}

#[derive(Debug, Clone)]
pub struct UserDb {
    users: BTreeMap<String, UserEntry>,
}

#[derive(Serialize, Deserialize)]
struct PersistedUsers {
    version: u32,
    users: BTreeMap<String, UserEntry>,
}

impl UserDb {
    /// The two accounts every fresh session has: `root` and `user`, both
    /// accepting only empty-password logins until a password is set.
    pub fn with_defaults() -> Self {
        let mut db = UserDb {
            users: BTreeMap::new(),
        };
        db.register("root", None, "root")
            .expect("fresh db has no root yet");
        db.register("user", None, "user")
            .expect("fresh db has no user yet");
        db
    }

    pub fn register(
        &mut self,
        name: &str,
        password: Option<&str>,
        primary_group: &str,
    ) -> Result<(), String> {
        if self.users.contains_key(name) {
            return Err(format!("user '{name}' already exists"));
        }
        self.users.insert(
            name.to_string(),
            UserEntry {
                password: password.map(PasswordRecord::create),
                primary_group: primary_group.to_string(),
            },
        );
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.users.remove(name).is_some()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&UserEntry> {
        self.users.get(name)
    }

    pub fn get_all(&self) -> &BTreeMap<String, UserEntry> {
        &self.users
    }

    pub fn name_set(&self) -> BTreeSet<String> {
        self.users.keys().cloned().collect()
    }

    pub fn verify_password(&self, name: &str, password: &str) -> bool {
        match self.users.get(name) {
            Some(entry) => match &entry.password {
                Some(record) => record.matches(password),
                None => password.is_empty(),
            },
            None => false,
        }
    }

    /// Replaces the stored password; `None` reverts the account to
    /// empty-password logins.
    pub fn change_password(&mut self, name: &str, password: Option<&str>) -> Result<(), String> {
        match self.users.get_mut(name) {
            Some(entry) => {
                entry.password = password.map(PasswordRecord::create);
                Ok(())
            }
            None => Err(format!("user '{name}' does not exist")),
        }
    }

    pub fn to_blob(&self) -> String {
        serde_json::to_string(&PersistedUsers {
            version: 1,
            users: self.users.clone(),
        })
        .expect("user records always serialize")
    }

    pub fn from_blob(blob: &str) -> serde_json::Result<Self> {
        let persisted: PersistedUsers = serde_json::from_str(blob)?;
        Ok(UserDb {
            users: persisted.users,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let mut db = UserDb::with_defaults();
        db.register("alice", Some("pw"), "alice").unwrap();
        assert!(db.verify_password("alice", "pw"));
        assert!(!db.verify_password("alice", "PW"));
        assert!(!db.verify_password("alice", ""));
        assert!(!db.verify_password("nobody", "pw"));
    }

    #[test]
    fn change_password_invalidates_old_one() {
        let mut db = UserDb::with_defaults();
        db.register("alice", Some("pw"), "alice").unwrap();
        db.change_password("alice", Some("pw2")).unwrap();
        assert!(!db.verify_password("alice", "pw"));
        assert!(db.verify_password("alice", "pw2"));
    }

    #[test]
    fn passwordless_accounts_accept_only_empty() {
        let db = UserDb::with_defaults();
        assert!(db.verify_password("root", ""));
        assert!(!db.verify_password("root", "anything"));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut db = UserDb::with_defaults();
        assert!(db.register("root", None, "root").is_err());
    }

    #[test]
    fn salts_differ_between_records() {
        let a = PasswordRecord::create("same");
        let b = PasswordRecord::create("same");
        assert_ne!(a.salt, b.salt);
        assert!(a.matches("same") && b.matches("same"));
    }

    #[test]
    fn blob_round_trip_preserves_credentials() {
        let mut db = UserDb::with_defaults();
        db.register("alice", Some("pw"), "staff").unwrap();
        let restored = UserDb::from_blob(&db.to_blob()).unwrap();
        assert!(restored.verify_password("alice", "pw"));
        assert_eq!(restored.get("alice").unwrap().primary_group, "staff");
    }
}
