//! Wallet session collaborator
//!
//! The wallet connection, balances and the network-switch capability are owned
//! by an external provider (browser extension bridge, test double, ...). The
//! form only ever reads a [`WalletSession`] snapshot and asks the provider to
//! switch networks.

use async_trait::async_trait;
use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::types::{Balance, NetworkId};

/// Read-only projection of the externally owned wallet state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WalletSession {
    pub is_connected: bool,
    pub is_active: bool,
    pub is_connecting: bool,
    pub is_balance_loading: bool,
    /// Native gas token balance
    pub native_balance: Option<Balance>,
    /// Bridged token (USDC) balance
    pub token_balance: Option<Balance>,
}

impl WalletSession {
    /// A session with no wallet attached
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// A connected, active session with loaded balances
    pub fn connected(native_balance: f64, token_balance: Option<f64>) -> Self {
        Self {
            is_connected: true,
            is_active: true,
            is_connecting: false,
            is_balance_loading: false,
            native_balance: Some(Balance(native_balance)),
            token_balance: token_balance.map(Balance),
        }
    }

    /// Whether balances are still being fetched
    pub fn is_loading(&self) -> bool {
        self.is_connecting || self.is_balance_loading
    }
}

/// External wallet provider
///
/// Implementations are shared between the selector (which fires switch
/// requests on the runtime) and the form (which reads the session), hence the
/// `Send + Sync` bound.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Current session snapshot
    fn session(&self) -> WalletSession;

    /// Ask the wallet to connect to / switch its active network.
    ///
    /// The user may reject the request in their wallet; callers treat the
    /// result as advisory only.
    async fn switch_network(&self, network: NetworkId) -> Result<()>;
}
