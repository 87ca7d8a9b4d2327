//! Runs one evaluation at a time on a background worker.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use drawodds_core::{CancelToken, CategoryBound, Combo, EvalError, Item};
use drawodds_core::{combo_probability, range_probability};
use thiserror::Error;
use tracing::{Level, event};

/// Inputs for one engine call.
#[derive(Debug, Clone)]
pub enum Request {
    Range {
        deck: Vec<Item>,
        bounds: Vec<CategoryBound>,
        hand_size: u32,
    },
    Combos {
        deck: Vec<Item>,
        combos: Vec<Combo>,
        hand_size: u32,
    },
}

impl Request {
    pub fn evaluate(&self, cancel: &CancelToken) -> Result<f64, EvalError> {
        match self {
            Request::Range {
                deck,
                bounds,
                hand_size,
            } => range_probability(deck, bounds, *hand_size, cancel),
            Request::Combos {
                deck,
                combos,
                hand_size,
            } => combo_probability(deck, combos, *hand_size, cancel),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Request::Range { .. } => "range",
            Request::Combos { .. } => "combos",
        }
    }
}

/// How a calculation ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Probability(f64),
    Cancelled,
}

/// A calculation running on its own worker thread.
pub struct Calculation {
    cancel: CancelToken,
    receiver: Receiver<Result<f64, EvalError>>,
    handle: JoinHandle<()>,
    started: Instant,
    label: &'static str,
}

impl Calculation {
    pub fn spawn(request: Request) -> Result<Self, RunnerError> {
        let cancel = CancelToken::new();
        let worker_token = cancel.clone();
        let label = request.label();
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(format!("drawodds-{label}"))
            .spawn(move || {
                let result = request.evaluate(&worker_token);
                // The receiver may be gone if the caller abandoned the calculation.
                let _ = sender.send(result);
            })
            .map_err(RunnerError::Spawn)?;

        event!(target: "drawodds_cli::runner", Level::DEBUG, mode = label, "calculation started");
        Ok(Self {
            cancel,
            receiver,
            handle,
            started: Instant::now(),
            label,
        })
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Blocks until the worker finishes.
    pub fn wait(self) -> Result<Outcome, RunnerError> {
        self.wait_for(None)
    }

    /// Blocks until the worker finishes, cancelling it once `timeout` elapses.
    pub fn wait_for(self, timeout: Option<Duration>) -> Result<Outcome, RunnerError> {
        let received = match timeout {
            Some(limit) => match self.receiver.recv_timeout(limit) {
                Ok(result) => Ok(result),
                Err(RecvTimeoutError::Timeout) => {
                    event!(
                        target: "drawodds_cli::runner",
                        Level::WARN,
                        mode = self.label,
                        timeout_ms = limit.as_millis() as u64,
                        "deadline reached; cancelling calculation"
                    );
                    self.cancel.cancel();
                    self.receiver.recv().map_err(|_| RunnerError::WorkerLost)
                }
                Err(RecvTimeoutError::Disconnected) => Err(RunnerError::WorkerLost),
            },
            None => self.receiver.recv().map_err(|_| RunnerError::WorkerLost),
        };

        let elapsed = self.elapsed();
        if self.handle.join().is_err() {
            return Err(RunnerError::WorkerLost);
        }

        let outcome = match received? {
            Ok(probability) => Outcome::Probability(probability),
            Err(EvalError::Cancelled) => Outcome::Cancelled,
            Err(other) => return Err(RunnerError::Eval(other)),
        };

        event!(
            target: "drawodds_cli::runner",
            Level::INFO,
            mode = self.label,
            elapsed_ms = elapsed.as_millis() as u64,
            outcome = ?outcome,
            "calculation finished"
        );
        Ok(outcome)
    }
}

/// Holds at most one active calculation; starting a new one cancels the old.
#[derive(Default)]
pub struct CalculationSlot {
    active: Option<Calculation>,
}

impl CalculationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Cancels and reaps any running calculation, then starts `request`.
    pub fn replace(&mut self, request: Request) -> Result<(), RunnerError> {
        self.cancel_active()?;
        self.active = Some(Calculation::spawn(request)?);
        Ok(())
    }

    /// Cancels the running calculation, if any, and waits for it to stop.
    pub fn cancel_active(&mut self) -> Result<Option<Outcome>, RunnerError> {
        match self.active.take() {
            Some(previous) => {
                previous.cancel();
                previous.wait().map(Some)
            }
            None => Ok(None),
        }
    }

    /// Waits for the running calculation and frees the slot.
    pub fn finish(&mut self, timeout: Option<Duration>) -> Result<Option<Outcome>, RunnerError> {
        match self.active.take() {
            Some(calculation) => calculation.wait_for(timeout).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn calculation worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("calculation worker exited without a result")]
    WorkerLost,
    #[error(transparent)]
    Eval(#[from] EvalError),
}
