// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background jobs polled from the UI thread.
//!
//! A job runs on its own thread and reports once over a channel; the UI
//! checks it every frame without blocking.

use crate::error::{Error, Result};
use std::sync::mpsc::{channel, Receiver, TryRecvError};

/// A job that has not been collected yet.
pub struct Pending<T> {
    context: &'static str,
    receiver: Receiver<Result<T>>,
}

impl<T: Send + 'static> Pending<T> {
    /// Run `job` on a new thread. `context` names it in logs and errors.
    pub fn spawn<F>(context: &'static str, job: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (sender, receiver) = channel();
        std::thread::spawn(move || {
            let _ = sender.send(job());
        });
        log::debug!("Started background job: {}", context);
        Self { context, receiver }
    }
}

impl<T> Pending<T> {
    pub fn context(&self) -> &'static str {
        self.context
    }

    /// The job's result once it has finished.
    pub fn try_take(&self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::Unreachable(
                "background job stopped without reporting",
            ))),
        }
    }

    /// Block until the job reports.
    #[cfg(test)]
    pub fn wait(self) -> Result<T> {
        self.receiver
            .recv()
            .unwrap_or(Err(Error::Unreachable("background job stopped without reporting")))
    }
}

/// Collect finished jobs out of `jobs`, keeping the rest.
pub fn drain_finished<T>(jobs: &mut Vec<Pending<T>>) -> Vec<(&'static str, Result<T>)> {
    let mut finished = Vec::new();
    jobs.retain(|job| match job.try_take() {
        Some(result) => {
            finished.push((job.context(), result));
            false
        }
        None => true,
    });
    finished
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_reports_result() {
        let job = Pending::spawn("answer", || Ok(42));
        assert_eq!(job.wait().unwrap(), 42);
    }

    #[test]
    fn test_job_reports_error() {
        let job: Pending<()> = Pending::spawn("failing", || Err(Error::GameOver));
        assert!(matches!(job.wait(), Err(Error::GameOver)));
    }

    #[test]
    fn test_drain_finished() {
        let mut jobs = vec![Pending::spawn("a", || Ok(1)), Pending::spawn("b", || Ok(2))];
        let mut collected = Vec::new();
        while !jobs.is_empty() {
            collected.extend(drain_finished(&mut jobs));
            std::thread::yield_now();
        }
        let mut values: Vec<_> = collected.into_iter().map(|(_, r)| r.unwrap()).collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2]);
    }
}
