//! Bridge form
//!
//! Composes the connection gate, network selector, form fields and submission
//! controller over injected collaborators. All methods take `&self` so a
//! network switch can be requested while a transfer is in flight; the two are
//! not coordinated.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::debug;

use crate::config::BridgeConfig;
use crate::form::FormState;
use crate::selector::{NetworkSelection, NetworkSelector, SwitchRequest};
use crate::session::{WalletProvider, WalletSession};
use crate::submission::{BridgeHandler, SubmissionController, SubmitOutcome};
use crate::types::{NetworkId, SubmissionState};
use crate::view::{self, BridgeView};

/// Input arrived while the call-to-action was showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("wallet is not connected")]
pub struct NotConnected;

pub struct BridgeForm {
    config: BridgeConfig,
    wallet: Arc<dyn WalletProvider>,
    selector: Mutex<NetworkSelector>,
    controller: SubmissionController,
}

impl BridgeForm {
    pub fn new(
        config: BridgeConfig,
        wallet: Arc<dyn WalletProvider>,
        handler: Arc<dyn BridgeHandler>,
    ) -> Self {
        let selector = NetworkSelector::new(
            Arc::new(config.catalog.clone()),
            config.default_source,
            config.destination,
            Arc::clone(&wallet),
        );
        let controller =
            SubmissionController::new(handler, config.amount_policy, config.failure_policy);
        Self {
            config,
            wallet,
            selector: Mutex::new(selector),
            controller,
        }
    }

    fn selector(&self) -> MutexGuard<'_, NetworkSelector> {
        self.selector.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_connected(&self) -> Result<(), NotConnected> {
        if self.wallet.session().is_connected {
            Ok(())
        } else {
            Err(NotConnected)
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn session(&self) -> WalletSession {
        self.wallet.session()
    }

    pub fn selection(&self) -> NetworkSelection {
        self.selector().selection()
    }

    pub fn state(&self) -> SubmissionState {
        self.controller.state()
    }

    pub fn form(&self) -> FormState {
        self.controller.form()
    }

    /// Sync the wallet with the default source network when the form is
    /// first shown
    pub fn mount(&self) -> SwitchRequest {
        self.selector().mount()
    }

    /// Source network change handler
    pub fn select_source(&self, network: NetworkId) -> Result<SwitchRequest, NotConnected> {
        self.ensure_connected()?;
        Ok(self.selector().select_source(network))
    }

    pub fn set_recipient(&self, text: impl Into<String>) -> Result<(), NotConnected> {
        self.ensure_connected()?;
        self.controller.set_recipient(text);
        Ok(())
    }

    pub fn set_amount(&self, text: impl Into<String>) -> Result<(), NotConnected> {
        self.ensure_connected()?;
        self.controller.set_amount(text);
        Ok(())
    }

    /// Submit the form. Resolves once the transfer operation (if started)
    /// has resolved and the form has been reset.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.ensure_connected().is_err() {
            debug!("Submit ignored, wallet not connected");
            return SubmitOutcome::NotConnected;
        }
        let selection = self.selection();
        self.controller.submit(selection).await
    }

    /// Render the current state
    pub fn view(&self) -> BridgeView {
        view::render(
            &self.config,
            &self.wallet.session(),
            self.selection(),
            &self.controller.form(),
            self.controller.state(),
            self.controller.last_error(),
        )
    }
}
