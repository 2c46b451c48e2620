//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Background job bookkeeping. The host schedules the actual work; the
//! table only tracks numbered jobs and applies cooperative signals.

use crate::effect::JobSignal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Paused,
    Done,
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Running => write!(f, "running"),
            JobStatus::Paused => write!(f, "paused"),
            JobStatus::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub command: String,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Default)]
pub struct JobTable {
    jobs: BTreeMap<u32, Job>,
    last_id: u32,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, command: &str) -> u32 {
        self.last_id += 1;
        self.jobs.insert(
            self.last_id,
            Job {
                command: command.to_string(),
                status: JobStatus::Running,
            },
        );
        self.last_id
    }

    pub fn get(&self, id: u32) -> Option<&Job> {
        self.jobs.get(&id)
    }

    pub fn remove(&mut self, id: u32) -> Option<Job> {
        self.jobs.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Job)> {
        self.jobs.iter().map(|(id, job)| (*id, job))
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn mark_done(&mut self, id: u32) {
        if let Some(job) = self.jobs.get_mut(&id) {
            job.status = JobStatus::Done;
        }
    }

    /// Applies a cooperative signal: TERM finishes a job from any state,
    /// CONT resumes a paused one, STOP pauses a running one.
    pub fn signal(&mut self, id: u32, signal: JobSignal) -> Result<JobStatus, String> {
        let job = self
            .jobs
            .get_mut(&id)
            .ok_or_else(|| format!("no such job: {id}"))?;
        job.status = match (signal, job.status) {
            (JobSignal::Term, _) => JobStatus::Done,
            (JobSignal::Cont, JobStatus::Paused) => JobStatus::Running,
            (JobSignal::Stop, JobStatus::Running) => JobStatus::Paused,
            (_, unchanged) => unchanged,
        };
        log::debug!("job {id} signalled {signal}, now {}", job.status);
        Ok(job.status)
    }

    /// Drops finished jobs, returning what was removed.
    pub fn reap(&mut self) -> Vec<(u32, Job)> {
        let done: Vec<u32> = self
            .jobs
            .iter()
            .filter(|(_, job)| job.status == JobStatus::Done)
            .map(|(id, _)| *id)
            .collect();
        done.into_iter()
            .map(|id| (id, self.jobs.remove(&id).unwrap()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut jobs = JobTable::new();
        assert_eq!(jobs.add("sleep 5"), 1);
        assert_eq!(jobs.add("find /"), 2);
        jobs.remove(1);
        assert_eq!(jobs.add("du /"), 3);
    }

    #[test]
    fn signal_state_machine() {
        let mut jobs = JobTable::new();
        let id = jobs.add("sleep 10");
        assert_eq!(jobs.signal(id, JobSignal::Stop).unwrap(), JobStatus::Paused);
        // CONT resumes only a paused job
        assert_eq!(jobs.signal(id, JobSignal::Cont).unwrap(), JobStatus::Running);
        assert_eq!(jobs.signal(id, JobSignal::Cont).unwrap(), JobStatus::Running);
        assert_eq!(jobs.signal(id, JobSignal::Term).unwrap(), JobStatus::Done);
        // TERM is terminal from any state
        assert_eq!(jobs.signal(id, JobSignal::Cont).unwrap(), JobStatus::Done);
        assert!(jobs.signal(99, JobSignal::Term).is_err());
    }

    #[test]
    fn reap_removes_only_done_jobs() {
        let mut jobs = JobTable::new();
        let a = jobs.add("a");
        let b = jobs.add("b");
        jobs.mark_done(a);
        let reaped = jobs.reap();
        assert_eq!(reaped.len(), 1);
        assert_eq!(reaped[0].0, a);
        assert!(jobs.get(b).is_some());
    }
}
