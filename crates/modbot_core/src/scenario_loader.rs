//! Background scenario loading
//!
//! [`ScenarioLoader`] reads and parses scenarios on a worker thread so the
//! frame loop keeps playing the current scenario while a new one loads.
//! Results are collected with [`poll`](ScenarioLoader::poll) from the frame
//! loop and installed in one step.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::error::ScenarioError;
use crate::scenario::Scenario;

/// Where a scenario comes from
enum Source {
    File(PathBuf),
    /// Text handed over by the caller, e.g. an upload
    Text(String),
}

struct LoadRequest {
    label: String,
    source: Source,
}

/// Result of a background load
#[derive(Debug)]
pub struct LoadResult {
    /// Label given with the request (the path for file loads)
    pub label: String,
    /// The parsed scenario or the reason it could not be loaded
    pub result: Result<Scenario, ScenarioError>,
}

/// Background scenario loader with one worker thread
///
/// The worker runs until the loader is dropped. Requests are served in order.
pub struct ScenarioLoader {
    sender: Sender<LoadRequest>,
    receiver: Receiver<LoadResult>,
}

impl ScenarioLoader {
    /// Create a loader and start its worker thread
    pub fn new() -> Self {
        let (request_tx, request_rx) = channel::<LoadRequest>();
        let (result_tx, result_rx) = channel::<LoadResult>();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let result = match request.source {
                    Source::File(path) => Scenario::load(path),
                    Source::Text(text) => Scenario::parse(&text),
                };
                if let Err(e) = &result {
                    log::warn!("Failed to load scenario '{}': {}", request.label, e);
                }
                let load_result = LoadResult { label: request.label, result };
                // Receiver dropped: nobody is waiting any more
                if result_tx.send(load_result).is_err() {
                    break;
                }
            }
        });

        Self {
            sender: request_tx,
            receiver: result_rx,
        }
    }

    /// Queue a scenario file to be read and parsed
    pub fn load_file(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let label = path.display().to_string();
        self.submit(LoadRequest { label, source: Source::File(path) });
    }

    /// Queue scenario text to be parsed
    pub fn load_text(&self, text: impl Into<String>, label: impl Into<String>) {
        self.submit(LoadRequest { label: label.into(), source: Source::Text(text.into()) });
    }

    fn submit(&self, request: LoadRequest) {
        log::debug!("Queued scenario load '{}'", request.label);
        if self.sender.send(request).is_err() {
            log::warn!("Scenario loader worker has stopped -- request dropped");
        }
    }

    /// Take one finished load, if any (non-blocking)
    pub fn poll(&self) -> Option<LoadResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Take every finished load (non-blocking)
    pub fn poll_all(&self) -> Vec<LoadResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }
        results
    }

    /// Block until a load finishes or `timeout` elapses
    pub fn wait(&self, timeout: Duration) -> Option<LoadResult> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Default for ScenarioLoader {
    fn default() -> Self {
        Self::new()
    }
}
