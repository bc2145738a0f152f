//! Running one conversion off the interactive thread.
//!
//! A GUI front end starts a [`ConversionJob`] and polls it from its event
//! loop, or hands a delivery closure to [`spawn_conversion`] that posts the
//! result onto its own dispatch queue. The worker owns copies of its inputs
//! and reports exactly one [`ConversionResult`]. There is no cancellation.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::pipeline::{convert_with, ConversionRequest, ConversionResult, ConvertOptions};

/// Spawn a conversion thread that passes its result to `deliver`.
///
/// `deliver` runs on the worker thread; it is expected to forward the value
/// to the UI thread through whatever channel the toolkit provides.
pub fn spawn_conversion<F>(
    source: PathBuf,
    dest: PathBuf,
    request: ConversionRequest,
    options: ConvertOptions,
    deliver: F,
) -> std::io::Result<JoinHandle<()>>
where
    F: FnOnce(ConversionResult) + Send + 'static,
{
    thread::Builder::new()
        .name("picconv-convert".into())
        .spawn(move || {
            log::debug!("worker converting {} -> {}", source.display(), dest.display());
            let result = convert_with(&source, &dest, &request, &options);
            deliver(result);
        })
}

/// Handle to a conversion running on a worker thread.
#[derive(Debug)]
pub struct ConversionJob {
    receiver: Receiver<ConversionResult>,
    handle: Option<JoinHandle<()>>,
    delivered: bool,
}

impl ConversionJob {
    /// Start converting `source` into `dest` on a new thread.
    pub fn spawn(
        source: PathBuf,
        dest: PathBuf,
        request: ConversionRequest,
        options: ConvertOptions,
    ) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let handle = spawn_conversion(source, dest, request, options, move |result| {
            // The receiver may already be gone if the UI closed; nothing to do then
            let _ = sender.send(result);
        })?;

        Ok(Self {
            receiver,
            handle: Some(handle),
            delivered: false,
        })
    }

    /// Non-blocking check for the result, for polling from a UI timer.
    ///
    /// Returns the result once; later calls return `None`.
    pub fn try_result(&mut self) -> Option<ConversionResult> {
        if self.delivered {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => Some(self.finish(result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.finish(worker_lost())),
        }
    }

    /// Block until the worker reports.
    pub fn wait(mut self) -> ConversionResult {
        let result = self.receiver.recv().unwrap_or_else(|_| worker_lost());
        self.finish(result)
    }

    pub fn is_finished(&self) -> bool {
        self.delivered || self.handle.as_ref().is_some_and(|h| h.is_finished())
    }

    fn finish(&mut self, result: ConversionResult) -> ConversionResult {
        self.delivered = true;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("conversion worker panicked");
            }
        }
        result
    }
}

fn worker_lost() -> ConversionResult {
    ConversionResult::failed("Conversion worker exited without reporting a result")
}

/// Whether the front end can accept dropped files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSupport {
    Available,
    Unavailable,
}

impl DropSupport {
    /// Resolve availability once at start-up by running the toolkit's probe.
    pub fn detect<E, F>(probe: F) -> Self
    where
        E: std::fmt::Display,
        F: FnOnce() -> Result<(), E>,
    {
        match probe() {
            Ok(()) => DropSupport::Available,
            Err(err) => {
                log::warn!("drag and drop unavailable: {err}");
                DropSupport::Unavailable
            }
        }
    }

    pub fn is_available(self) -> bool {
        self == DropSupport::Available
    }
}
