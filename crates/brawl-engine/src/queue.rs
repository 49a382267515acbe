//! FIFO combat queue between the movement loop and the resolver.
//!
//! Unbounded: producers never block. The consumer waits on the task
//! channel and the stop signal together, with a timeout so it can re-check
//! the running flag even if nothing arrives.

use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};

use crate::detector::CombatTask;
use crate::stop::StopSignal;

/// Outcome of one wait on the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dequeue {
    /// A task was taken.
    Task(CombatTask),
    /// The stop signal fired, or every producer is gone.
    Stopped,
    /// Nothing arrived within the timeout.
    TimedOut,
}

/// Producing half.
#[derive(Clone, Debug)]
pub struct TaskSender {
    tx: Sender<CombatTask>,
}

/// Consuming half.
#[derive(Debug)]
pub struct TaskReceiver {
    rx: Receiver<CombatTask>,
}

/// Create a connected queue.
pub fn combat_queue() -> (TaskSender, TaskReceiver) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (TaskSender { tx }, TaskReceiver { rx })
}

impl TaskSender {
    /// Append a task. Dropped silently if the resolver has gone away.
    pub fn enqueue(&self, task: CombatTask) {
        if self.tx.send(task).is_err() {
            tracing::debug!(?task, "combat queue closed; task dropped");
        }
    }
}

impl TaskReceiver {
    /// Wait up to `timeout` for the next task.
    ///
    /// A stop that arrives while waiting wins over the timeout; a task
    /// already queued when the stop fires may still be returned.
    pub fn next(&self, stop: &StopSignal, timeout: Duration) -> Dequeue {
        if !stop.is_running() {
            return Dequeue::Stopped;
        }
        select! {
            recv(self.rx) -> msg => match msg {
                Ok(task) => Dequeue::Task(task),
                Err(_) => Dequeue::Stopped,
            },
            recv(stop.receiver()) -> _ => Dequeue::Stopped,
            default(timeout) => Dequeue::TimedOut,
        }
    }

    /// Number of tasks currently waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
