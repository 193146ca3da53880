//! Single-writer accumulation of plugin results.
//!
//! The [`Collector`] owns the merged warning list and the failure list for
//! the duration of a run. Invocation tasks reach it only through a
//! [`CollectorHandle`], whose sends rendezvous with the collector: a send
//! returns once the collector has taken the message, so an invocation that
//! has finished has always had its results recorded.

use std::sync::mpsc::{self, Receiver, SyncSender};

use tracing::{debug, error};

use schemalock_report::Warning;

use crate::error::PluginFailure;

/// Tracing target for result collection.
const COLLECTOR_TARGET: &str = "schemalock_plugins::collector";

/// Messages accepted by the collector.
#[derive(Debug)]
pub(crate) enum CollectorMessage {
    /// One plugin's warnings, kept together as a batch.
    Warnings {
        plugin: String,
        batch: Vec<Warning>,
    },
    /// One plugin's failure.
    Failure(PluginFailure),
    /// No further messages will be sent.
    Stop,
}

/// Final state of the accumulators once the collector has stopped.
#[derive(Debug, Default)]
pub(crate) struct Accumulated {
    pub(crate) warnings: Vec<Warning>,
    pub(crate) failures: Vec<PluginFailure>,
}

/// Sending side shared by every invocation task.
#[derive(Debug, Clone)]
pub(crate) struct CollectorHandle {
    sender: SyncSender<CollectorMessage>,
}

impl CollectorHandle {
    /// Hands a warning batch to the collector.
    pub(crate) fn send_warnings(&self, plugin: &str, batch: Vec<Warning>) {
        self.send(CollectorMessage::Warnings {
            plugin: plugin.to_owned(),
            batch,
        });
    }

    /// Hands a failure record to the collector.
    pub(crate) fn send_failure(&self, failure: PluginFailure) {
        self.send(CollectorMessage::Failure(failure));
    }

    /// Tells the collector to stop once every invocation has finished.
    pub(crate) fn stop(&self) {
        self.send(CollectorMessage::Stop);
    }

    fn send(&self, message: CollectorMessage) {
        // A send only fails when the collector is gone, which the finaliser
        // reports when it joins the collector task.
        if let Err(mpsc::SendError(undelivered)) = self.sender.send(message) {
            error!(
                target: COLLECTOR_TARGET,
                ?undelivered,
                "collector is no longer receiving"
            );
        }
    }
}

/// Consumer task that owns the run's accumulators.
#[derive(Debug)]
pub(crate) struct Collector {
    inbox: Receiver<CollectorMessage>,
    state: Accumulated,
}

impl Collector {
    /// Creates a collector seeded with the report's existing warnings.
    pub(crate) fn new(warnings: Vec<Warning>) -> (CollectorHandle, Self) {
        let (sender, inbox) = mpsc::sync_channel(0);
        let collector = Self {
            inbox,
            state: Accumulated {
                warnings,
                failures: Vec::new(),
            },
        };
        (CollectorHandle { sender }, collector)
    }

    /// Applies messages until a stop signal arrives or every handle is gone.
    pub(crate) fn run(mut self) -> Accumulated {
        while let Ok(message) = self.inbox.recv() {
            match message {
                CollectorMessage::Warnings { plugin, batch } => {
                    debug!(
                        target: COLLECTOR_TARGET,
                        plugin,
                        warnings = batch.len(),
                        "merging plugin warnings"
                    );
                    self.state.warnings.extend(batch);
                }
                CollectorMessage::Failure(failure) => {
                    debug!(
                        target: COLLECTOR_TARGET,
                        plugin = failure.name(),
                        "recording plugin failure"
                    );
                    self.state.failures.push(failure);
                }
                CollectorMessage::Stop => break,
            }
        }
        self.state
    }
}
