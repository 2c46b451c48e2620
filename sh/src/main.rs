//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! The `vsh` host: a terminal REPL around the in-process shell core. The
//! host owns everything the core returns as effects: prompts, delays, job
//! scheduling, credential dialogs, and persistence of the state blobs.

use atty::Stream;
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use vsh::effect::{Effect, JobSignal};
use vsh::session::{AliasTable, Environment, GroupDb, History, UserDb};
use vsh::shell::home_dir;
use vsh::{ExecOutcome, Shell};

/// vsh - simulated operating-system shell
#[derive(Parser)]
#[command(version, about = "vsh - simulated operating-system shell")]
struct Args {
    /// Run a single command string and exit
    #[arg(short = 'c', long = "command")]
    command: Option<String>,

    /// Read commands from standard input without a prompt
    #[arg(short = 's', long = "stdin")]
    from_stdin: bool,

    /// Directory for persisted session state
    #[arg(long = "state-dir")]
    state_dir: Option<PathBuf>,
}

struct Host {
    shell: Shell,
    state_dir: Option<PathBuf>,
    last_ok: bool,
}

const STATE_FILES: &[&str] = &[
    "vfs.json",
    "users.json",
    "groups.json",
    "aliases.json",
    "history.json",
    "env.json",
];

fn read_blob(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name)).ok()
}

/// Atomic blob write: a reader never observes a partial file.
fn write_blob(dir: &Path, name: &str, content: &str) -> io::Result<()> {
    let tmp = dir.join(format!(".{name}.tmp"));
    fs::write(&tmp, content)?;
    fs::rename(&tmp, dir.join(name))
}

impl Host {
    fn new(state_dir: Option<PathBuf>) -> Self {
        let mut host = Host {
            shell: Shell::new(),
            state_dir,
            last_ok: true,
        };
        host.load_state();
        host
    }

    fn load_state(&mut self) {
        let Some(dir) = self.state_dir.clone() else {
            return;
        };
        if !dir.is_dir() {
            if let Err(err) = fs::create_dir_all(&dir) {
                eprintln!("vsh: cannot create state directory: {err}");
                self.state_dir = None;
            }
            return;
        }
        if let Some(blob) = read_blob(&dir, "vfs.json") {
            match vfs::Vfs::load_state(&blob) {
                Ok(vfs) => self.shell.vfs = vfs,
                Err(err) => eprintln!("vsh: corrupt vfs state, using defaults: {err}"),
            }
        }
        if let Some(blob) = read_blob(&dir, "users.json") {
            match UserDb::from_blob(&blob) {
                Ok(users) => self.shell.users = users,
                Err(err) => eprintln!("vsh: corrupt user state, using defaults: {err}"),
            }
        }
        if let Some(blob) = read_blob(&dir, "groups.json") {
            match GroupDb::from_blob(&blob) {
                Ok(groups) => self.shell.groups = groups,
                Err(err) => eprintln!("vsh: corrupt group state, using defaults: {err}"),
            }
        }
        if let Some(blob) = read_blob(&dir, "aliases.json") {
            match AliasTable::from_blob(&blob) {
                Ok(aliases) => self.shell.aliases = aliases,
                Err(err) => eprintln!("vsh: corrupt alias state, using defaults: {err}"),
            }
        }
        if let Some(blob) = read_blob(&dir, "history.json") {
            let max = self
                .shell
                .config
                .get("history.max")
                .and_then(|v| v.parse().ok())
                .unwrap_or(vsh::session::DEFAULT_HISTORY_SIZE);
            match History::from_blob(&blob, max) {
                Ok(history) => self.shell.history = history,
                Err(err) => eprintln!("vsh: corrupt history state, using defaults: {err}"),
            }
        }
        if let Some(blob) = read_blob(&dir, "env.json") {
            match Environment::from_blob(&blob) {
                Ok(env) => self.shell.env = env,
                Err(err) => eprintln!("vsh: corrupt environment state, using defaults: {err}"),
            }
        }
        log::debug!("session state loaded from {}", dir.display());
    }

    fn save_state(&mut self) {
        let Some(dir) = self.state_dir.clone() else {
            return;
        };
        let blobs = [
            ("vfs.json", self.shell.vfs.save_state()),
            ("users.json", self.shell.users.to_blob()),
            ("groups.json", self.shell.groups.to_blob()),
            ("aliases.json", self.shell.aliases.to_blob()),
            ("history.json", self.shell.history.to_blob()),
            ("env.json", self.shell.env.to_blob()),
        ];
        debug_assert_eq!(blobs.len(), STATE_FILES.len());
        for (name, blob) in blobs {
            if let Err(err) = write_blob(&dir, name, &blob) {
                eprintln!("vsh: failed to persist {name}: {err}");
                return;
            }
        }
        self.shell.vfs.mark_clean();
        log::debug!("session state saved to {}", dir.display());
    }

    fn prompt_line(&self, prompt: &str) -> Option<String> {
        eprint!("{prompt}");
        io::stderr().flush().ok();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches('\n').to_string()),
            Err(_) => None,
        }
    }

    fn submit(&mut self, input: &str) {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return;
        }
        // a trailing '&' backgrounds the whole submission; execution is
        // still cooperative, so the job runs to completion immediately
        if trimmed.ends_with('&') && !trimmed.ends_with("&&") {
            let command = trimmed.trim_end_matches('&');
            let command = command.trim().to_string();
            let id = self.shell.jobs.add(&command);
            println!("[{id}] {command}");
            self.submit(&command);
            self.shell.jobs.mark_done(id);
            println!("[{id}]+ done   {command}");
            return;
        }
        let outcome = self.shell.execute(trimmed);
        self.report(&outcome);
        self.apply_effects(outcome.effects);
        if self.shell.vfs.is_dirty() {
            self.save_state();
        }
    }

    fn report(&mut self, outcome: &ExecOutcome) {
        self.last_ok = outcome.success;
        if !outcome.output.is_empty() {
            if outcome.output.ends_with('\n') {
                print!("{}", outcome.output);
            } else {
                println!("{}", outcome.output);
            }
        }
        if let Some(error) = &outcome.error {
            if !error.message.is_empty() {
                eprintln!("{}", error.message);
            }
            if let Some(suggestion) = &error.suggestion {
                eprintln!("{suggestion}");
            }
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ClearScreen => {
                print!("\x1b[2J\x1b[H");
                io::stdout().flush().ok();
            }
            Effect::ChangeDirectory { path } => {
                if let Err(err) = self.shell.set_cwd(&path) {
                    eprintln!("{}", err.message);
                }
            }
            Effect::Confirm {
                message,
                on_confirm_command,
            } => {
                if let Some(answer) = self.prompt_line(&format!("{message} [y/N] ")) {
                    if matches!(answer.to_lowercase().as_str(), "y" | "yes") {
                        self.submit(&on_confirm_command);
                    }
                }
            }
            Effect::ExecuteCommands { commands } => {
                for command in commands {
                    self.submit(&command);
                }
            }
            Effect::ExecuteScript { lines, args } => {
                self.shell.env.push();
                for (i, arg) in args.iter().enumerate() {
                    let _ = self.shell.env.set(&format!("ARG{}", i + 1), arg);
                }
                let _ = self.shell.env.set("ARGS", &args.join(" "));
                for line in lines {
                    self.submit(&line);
                }
                self.shell.env.pop();
            }
            Effect::LaunchApp { app_name, .. } => {
                eprintln!("vsh: no application host for '{app_name}'");
            }
            Effect::SignalJob { job_id, signal } => {
                match self.shell.jobs.signal(job_id, signal) {
                    Ok(status) => println!("[{job_id}] {status}"),
                    Err(err) => eprintln!("vsh: {err}"),
                }
                if signal == JobSignal::Term {
                    self.shell.jobs.reap();
                }
            }
            Effect::Login { username } => {
                let password = self.prompt_line("password: ").unwrap_or_default();
                if self.shell.users.verify_password(&username, &password) {
                    self.shell.login_session(&username);
                } else {
                    eprintln!("login: authentication failed");
                }
            }
            Effect::Logout => {
                if self.shell.pop_session().is_none() {
                    eprintln!("logout: not within a nested session");
                }
            }
            Effect::Su { username, command } => self.elevate(username, command),
            Effect::Passwd { username } => self.change_password(&username),
            Effect::Useradd { username } => self.create_user(&username),
            Effect::RemoveUser { username } => self.remove_user(&username),
            Effect::Visudo => {
                eprintln!("visudo: no editor in this host; edit /etc/sudoers instead");
            }
            Effect::SyncSessionState | Effect::SyncGroupState | Effect::SyncUserState => {
                self.save_state();
            }
            Effect::PageOutput { content, .. } => println!("{content}"),
            Effect::DisplayProse { header, content } => {
                println!("{header}");
                println!("{}", "=".repeat(header.len()));
                println!("{content}");
            }
            Effect::Delay { milliseconds } => {
                std::thread::sleep(std::time::Duration::from_millis(milliseconds));
            }
            Effect::Reboot => {
                self.save_state();
                self.shell = Shell::new();
                self.load_state();
                println!("session restarted");
            }
            Effect::Beep => {
                print!("\x07");
                io::stdout().flush().ok();
            }
            Effect::ExportFile { path } => {
                eprintln!("vsh: no export target for {path}");
            }
            Effect::DumpScreenText | Effect::CaptureScreenshotPng | Effect::PlaySound { .. } => {
                log::info!("effect not supported by the terminal host");
            }
            Effect::Other { name, payload } => {
                log::info!("unhandled effect '{name}': {payload}");
            }
        }
    }

    /// `su`/`sudo`: verify a password, then either run one command as the
    /// target user or leave the session switched.
    fn elevate(&mut self, username: String, command: Option<String>) {
        let verify_as = match &command {
            // sudo asks for the invoking user's password
            Some(_) => self.shell.current_user().to_string(),
            None => username.clone(),
        };
        let needs_password = self
            .shell
            .users
            .get(&verify_as)
            .map(|entry| entry.password.is_some())
            .unwrap_or(false);
        if needs_password {
            let password = self.prompt_line("password: ").unwrap_or_default();
            if !self.shell.users.verify_password(&verify_as, &password) {
                eprintln!("authentication failed");
                return;
            }
        }
        match command {
            Some(command) => {
                self.shell.push_session(&username);
                self.submit(&command);
                self.shell.pop_session();
            }
            None => self.shell.push_session(&username),
        }
    }

    fn change_password(&mut self, username: &str) {
        if self.shell.current_user() != "root" {
            let current = self.prompt_line("current password: ").unwrap_or_default();
            if !self.shell.users.verify_password(username, &current) {
                eprintln!("passwd: authentication failed");
                return;
            }
        }
        let new = self.prompt_line("new password: ").unwrap_or_default();
        let again = self.prompt_line("retype new password: ").unwrap_or_default();
        if new != again {
            eprintln!("passwd: passwords do not match");
            return;
        }
        let password = if new.is_empty() { None } else { Some(new.as_str()) };
        match self.shell.users.change_password(username, password) {
            Ok(()) => {
                println!("passwd: password updated");
                self.save_state();
            }
            Err(err) => eprintln!("passwd: {err}"),
        }
    }

    fn create_user(&mut self, username: &str) {
        let new = self.prompt_line("new password: ").unwrap_or_default();
        let again = self.prompt_line("retype new password: ").unwrap_or_default();
        if new != again {
            eprintln!("useradd: passwords do not match");
            return;
        }
        let password = if new.is_empty() { None } else { Some(new.as_str()) };
        if let Err(err) = self.shell.users.register(username, password, username) {
            eprintln!("useradd: {err}");
            return;
        }
        let _ = self.shell.groups.create(username);
        let root = vfs::Credentials::root();
        let home = home_dir(username);
        if self.shell.vfs.get_node(&home).is_none() {
            let _ = self.shell.vfs.create_directory_all(&home, &root);
            let _ = self.shell.vfs.chown(&home, username, true, &root);
            let _ = self.shell.vfs.chgrp(&home, username, true, &root);
        }
        println!("useradd: user '{username}' created");
        self.save_state();
    }

    fn remove_user(&mut self, username: &str) {
        if !self.shell.users.remove(username) {
            eprintln!("removeuser: unknown user '{username}'");
            return;
        }
        self.shell.groups.remove_user_everywhere(username);
        println!("removeuser: user '{username}' removed");
        self.save_state();
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let mut host = Host::new(args.state_dir);

    if let Some(command) = args.command {
        host.submit(&command);
        std::process::exit(if host.last_ok { 0 } else { 1 });
    }

    let interactive =
        !args.from_stdin && atty::is(Stream::Stdin) && atty::is(Stream::Stdout);
    let stdin = io::stdin();
    loop {
        if interactive {
            print!(
                "{}@vshell:{}$ ",
                host.shell.current_user(),
                host.shell.cwd()
            );
            io::stdout().flush().ok();
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => host.submit(&line),
            Err(err) => {
                eprintln!("vsh: read error: {err}");
                break;
            }
        }
    }
    host.save_state();
    std::process::exit(if host.last_ok { 0 } else { 1 });
}
