//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Host directives. The executor returns these instead of performing the
//! actions itself; the host dispatches on the tag. Unknown directives ride
//! through as [`Effect::Other`].

use serde::Serialize;
use serde_json::Value;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobSignal {
    Stop,
    Cont,
    Term,
}

impl Display for JobSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JobSignal::Stop => write!(f, "STOP"),
            JobSignal::Cont => write!(f, "CONT"),
            JobSignal::Term => write!(f, "TERM"),
        }
    }
}

impl std::str::FromStr for JobSignal {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches("SIG") {
            "STOP" => Ok(JobSignal::Stop),
            "CONT" => Ok(JobSignal::Cont),
            "TERM" | "KILL" => Ok(JobSignal::Term),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    ClearScreen,
    ChangeDirectory {
        path: String,
    },
    Confirm {
        message: String,
        on_confirm_command: String,
    },
    ExecuteCommands {
        commands: Vec<String>,
    },
    ExecuteScript {
        lines: Vec<String>,
        args: Vec<String>,
    },
    LaunchApp {
        app_name: String,
        options: Value,
    },
    SignalJob {
        job_id: u32,
        signal: JobSignal,
    },
    Login {
        username: String,
    },
    Logout,
    Su {
        username: String,
        command: Option<String>,
    },
    Passwd {
        username: String,
    },
    Useradd {
        username: String,
    },
    RemoveUser {
        username: String,
    },
    Visudo,
    SyncSessionState,
    SyncGroupState,
    SyncUserState,
    PageOutput {
        content: String,
        mode: String,
    },
    DisplayProse {
        header: String,
        content: String,
    },
    Delay {
        milliseconds: u64,
    },
    Reboot,
    ExportFile {
        path: String,
    },
    DumpScreenText,
    CaptureScreenshotPng,
    PlaySound {
        notes: Vec<String>,
    },
    Beep,
    Other {
        name: String,
        payload: Value,
    },
}
