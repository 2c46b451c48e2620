//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

pub mod alias;
pub mod environment;
pub mod groups;
pub mod history;
pub mod jobs;
pub mod users;

pub use alias::AliasTable;
pub use environment::Environment;
pub use groups::GroupDb;
pub use history::{History, DEFAULT_HISTORY_SIZE};
pub use jobs::{Job, JobStatus, JobTable};
pub use users::{PasswordRecord, UserDb, UserEntry};
