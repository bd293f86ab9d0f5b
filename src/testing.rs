//! Testing Utilities Module
//!
//! Collaborator doubles for exercising the form without a live wallet:
//!
//! - `RecordingWallet` - configurable session, records every switch request
//! - `ScriptedHandler` - records transfer requests, resolves or rejects on
//!   demand, optionally holds the transfer in flight until released

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use eyre::{eyre, Result};
use tokio::sync::Notify;

use crate::form::TransferRequest;
use crate::session::{WalletProvider, WalletSession};
use crate::submission::BridgeHandler;
use crate::types::NetworkId;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wait until `items` holds at least `n` entries or `timeout` elapses, then
/// return whatever was recorded.
async fn wait_for<T: Clone>(
    items: &Mutex<Vec<T>>,
    notify: &Notify,
    n: usize,
    timeout: Duration,
) -> Vec<T> {
    let wait = async {
        loop {
            let notified = notify.notified();
            if lock(items).len() >= n {
                return;
            }
            notified.await;
        }
    };
    let _ = tokio::time::timeout(timeout, wait).await;
    lock(items).clone()
}

// ============================================================================
// Wallet double
// ============================================================================

/// Wallet provider that records switch requests
pub struct RecordingWallet {
    session: Mutex<WalletSession>,
    switches: Mutex<Vec<NetworkId>>,
    reject_switches: AtomicBool,
    notify: Notify,
}

impl RecordingWallet {
    pub fn new(session: WalletSession) -> Self {
        Self {
            session: Mutex::new(session),
            switches: Mutex::new(Vec::new()),
            reject_switches: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Connected, active, balances loaded (10 native, 250 USDC)
    pub fn connected() -> Self {
        Self::new(WalletSession::connected(10.0, Some(250.0)))
    }

    /// Make every switch request fail, as if the user declined it
    pub fn rejecting_switches(self) -> Self {
        self.reject_switches.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_session(&self, session: WalletSession) {
        *lock(&self.session) = session;
    }

    /// Apply `f` to the current session
    pub fn update_session(&self, f: impl FnOnce(&mut WalletSession)) {
        f(&mut lock(&self.session));
    }

    /// Switch requests received so far, in order
    pub fn switches(&self) -> Vec<NetworkId> {
        lock(&self.switches).clone()
    }

    pub async fn wait_for_switches(&self, n: usize, timeout: Duration) -> Vec<NetworkId> {
        wait_for(&self.switches, &self.notify, n, timeout).await
    }
}

#[async_trait]
impl WalletProvider for RecordingWallet {
    fn session(&self) -> WalletSession {
        lock(&self.session).clone()
    }

    async fn switch_network(&self, network: NetworkId) -> Result<()> {
        lock(&self.switches).push(network);
        self.notify.notify_waiters();
        if self.reject_switches.load(Ordering::SeqCst) {
            return Err(eyre!("User rejected the request to switch to {}", network));
        }
        Ok(())
    }
}

// ============================================================================
// Transfer handler double
// ============================================================================

/// Bridge handler that records requests and resolves as scripted
pub struct ScriptedHandler {
    calls: Mutex<Vec<TransferRequest>>,
    failure: Mutex<Option<String>>,
    blocking: bool,
    released: AtomicBool,
    called: Notify,
    gate: Notify,
}

impl ScriptedHandler {
    pub fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            blocking: false,
            released: AtomicBool::new(false),
            called: Notify::new(),
            gate: Notify::new(),
        }
    }

    pub fn failing(message: &str) -> Self {
        let handler = Self::succeeding();
        handler.set_failure(Some(message));
        handler
    }

    /// Hold each transfer in flight until [`ScriptedHandler::release`]
    pub fn blocking(mut self) -> Self {
        self.blocking = true;
        self
    }

    /// Change how subsequent transfers resolve (`None` = success)
    pub fn set_failure(&self, message: Option<&str>) {
        *lock(&self.failure) = message.map(str::to_string);
    }

    /// Let held transfers (and all later ones) resolve
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    pub fn calls(&self) -> Vec<TransferRequest> {
        lock(&self.calls).clone()
    }

    pub async fn wait_for_calls(&self, n: usize, timeout: Duration) -> Vec<TransferRequest> {
        wait_for(&self.calls, &self.called, n, timeout).await
    }
}

#[async_trait]
impl BridgeHandler for ScriptedHandler {
    async fn bridge(&self, request: TransferRequest) -> Result<()> {
        lock(&self.calls).push(request);
        self.called.notify_waiters();

        if self.blocking {
            loop {
                let released = self.gate.notified();
                if self.released.load(Ordering::SeqCst) {
                    break;
                }
                released.await;
            }
        }

        let failure = lock(&self.failure).clone();
        match failure {
            Some(message) => Err(eyre!(message)),
            None => Ok(()),
        }
    }
}
