//! Submission controller
//!
//! Wraps the external transfer operation in a two-state machine:
//!
//! ```text
//!   Idle --(gate passes)--> Submitting --(resolve | reject | drop)--> Idle
//! ```
//!
//! - Idle -> Submitting happens before the first await, so the submit control
//!   is disabled in the same update that started the transfer.
//! - The `Submitting` flag is the only mutual exclusion: a second submit while
//!   one is in flight returns [`SubmitOutcome::Busy`] and is not queued.
//! - Leaving `Submitting` always clears recipient and amount, whatever the
//!   outcome. The cleanup lives in a drop guard so it also runs when the
//!   handler panics or the submit future is dropped.
//! - The transfer result is always returned to the caller; [`FailurePolicy`]
//!   only decides whether a failure is also shown in the view.

use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::amount::AmountPolicy;
use crate::form::{FormState, GateRejection, TransferRequest};
use crate::selector::NetworkSelection;
use crate::types::SubmissionState;

/// The external transfer operation (`onBridge`)
///
/// The caller performs the actual signing/broadcast and owns any timeout
/// policy; this crate only decides when it is invoked.
#[async_trait]
pub trait BridgeHandler: Send + Sync {
    async fn bridge(&self, request: TransferRequest) -> Result<()>;
}

/// Adapter turning an async closure into a [`BridgeHandler`]
pub struct FnHandler<F>(F);

/// Wrap `f` as a [`BridgeHandler`]
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(TransferRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> BridgeHandler for FnHandler<F>
where
    F: Fn(TransferRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn bridge(&self, request: TransferRequest) -> Result<()> {
        (self.0)(request).await
    }
}

/// Whether a failed transfer is shown in the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Clear the form and show nothing (the integrating app reports errors)
    #[default]
    Silent,
    /// Keep the failure message in the view until the next submission
    Surface,
}

impl FromStr for FailurePolicy {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "silent" => Ok(FailurePolicy::Silent),
            "surface" => Ok(FailurePolicy::Surface),
            other => Err(eyre!(
                "Invalid failure policy '{}': expected silent or surface",
                other
            )),
        }
    }
}

/// Result of a submit attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// No wallet is connected; the form is not available
    NotConnected,
    /// The gate refused the form; nothing was invoked
    Rejected(GateRejection),
    /// A transfer is already in flight; the attempt was dropped
    Busy,
    /// The transfer operation ran to completion
    Completed {
        request: TransferRequest,
        result: Result<()>,
    },
}

impl SubmitOutcome {
    /// Whether the transfer operation was invoked
    pub fn was_invoked(&self) -> bool {
        matches!(self, SubmitOutcome::Completed { .. })
    }

    /// Whether the transfer operation was invoked and succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Completed { result: Ok(()), .. })
    }

    pub fn request(&self) -> Option<&TransferRequest> {
        match self {
            SubmitOutcome::Completed { request, .. } => Some(request),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&GateRejection> {
        match self {
            SubmitOutcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    form: FormState,
    state: SubmissionState,
    last_error: Option<String>,
}

// State is only touched in short, non-async critical sections; a panic while
// holding the lock cannot leave it half-updated.
fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a transfer in flight; returns the controller to Idle when dropped
struct InFlight {
    shared: Arc<Mutex<Shared>>,
}

impl InFlight {
    fn complete(self, surfaced_error: Option<String>) {
        lock(&self.shared).last_error = surfaced_error;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut shared = lock(&self.shared);
        shared.state = SubmissionState::Idle;
        shared.form.clear();
    }
}

/// Owns the form fields and the submission state machine
pub struct SubmissionController {
    shared: Arc<Mutex<Shared>>,
    handler: Arc<dyn BridgeHandler>,
    amount_policy: AmountPolicy,
    failure_policy: FailurePolicy,
}

impl SubmissionController {
    pub fn new(
        handler: Arc<dyn BridgeHandler>,
        amount_policy: AmountPolicy,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            handler,
            amount_policy,
            failure_policy,
        }
    }

    pub fn state(&self) -> SubmissionState {
        lock(&self.shared).state
    }

    /// Snapshot of the input fields
    pub fn form(&self) -> FormState {
        lock(&self.shared).form.clone()
    }

    /// Failure message kept under [`FailurePolicy::Surface`]
    pub fn last_error(&self) -> Option<String> {
        lock(&self.shared).last_error.clone()
    }

    pub fn set_recipient(&self, text: impl Into<String>) {
        lock(&self.shared).form.set_recipient(text);
    }

    pub fn set_amount(&self, text: impl Into<String>) {
        lock(&self.shared).form.set_amount(text);
    }

    /// Run the gate and, if it passes, the transfer operation.
    pub async fn submit(&self, selection: NetworkSelection) -> SubmitOutcome {
        let (request, in_flight) = {
            let mut shared = lock(&self.shared);
            if shared.state.is_submitting() {
                debug!("Submission already in flight, ignoring submit");
                return SubmitOutcome::Busy;
            }
            let request = match shared.form.validate(selection, self.amount_policy) {
                Ok(request) => request,
                Err(rejection) => {
                    debug!(reason = %rejection, "Submission gate rejected form");
                    return SubmitOutcome::Rejected(rejection);
                }
            };
            shared.state = SubmissionState::Submitting;
            shared.last_error = None;
            let in_flight = InFlight {
                shared: Arc::clone(&self.shared),
            };
            (request, in_flight)
        };

        info!(
            recipient = %request.recipient,
            amount = %request.amount,
            source = %request.source,
            destination = %request.destination,
            "Submitting bridge transfer"
        );

        let result = self.handler.bridge(request.clone()).await;

        let surfaced_error = match &result {
            Ok(()) => {
                info!(recipient = %request.recipient, "Bridge transfer completed");
                None
            }
            Err(e) => {
                warn!(
                    recipient = %request.recipient,
                    error = %e,
                    "Bridge transfer failed"
                );
                match self.failure_policy {
                    FailurePolicy::Silent => None,
                    FailurePolicy::Surface => Some(e.to_string()),
                }
            }
        };
        in_flight.complete(surfaced_error);

        SubmitOutcome::Completed { request, result }
    }
}
