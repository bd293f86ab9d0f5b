//! Network selector
//!
//! Holds the source/destination pair. The source is user-selectable; the
//! destination is fixed for the lifetime of the form and has no setter.
//!
//! Every source selection is an explicit change event. When the wallet is
//! connected, each event issues one network-switch request to the wallet so
//! the wallet's active network follows the user's choice:
//!
//! 1. `select_source(id)` stores `id`
//! 2. If the session is connected and `id` is set, `switch_network(id)` is
//!    spawned on the runtime
//! 3. The outcome of the switch is logged and otherwise ignored; a rejected
//!    switch never changes the selection

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::NetworkCatalog;
use crate::session::WalletProvider;
use crate::types::NetworkId;

/// What a selection change did about the wallet's active network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "network", rename_all = "snake_case")]
pub enum SwitchRequest {
    /// A switch request was spawned for this network
    Issued(NetworkId),
    /// The wallet is not connected; nothing was sent
    SkippedNotConnected,
    /// The selected network is unset (`0`); nothing was sent
    SkippedUnset,
    /// No async runtime was available to carry the request
    Dropped(NetworkId),
}

impl SwitchRequest {
    pub fn is_issued(&self) -> bool {
        matches!(self, SwitchRequest::Issued(_))
    }
}

/// Current source/destination pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkSelection {
    pub source: NetworkId,
    pub destination: NetworkId,
}

impl NetworkSelection {
    /// Both sides carry a value
    pub fn is_complete(&self) -> bool {
        self.source.is_set() && self.destination.is_set()
    }
}

pub struct NetworkSelector {
    catalog: Arc<NetworkCatalog>,
    source: NetworkId,
    destination: NetworkId,
    wallet: Arc<dyn WalletProvider>,
}

impl NetworkSelector {
    /// Create a selector with the given default source and fixed destination.
    ///
    /// No switch request is sent until [`NetworkSelector::mount`] or the first
    /// [`NetworkSelector::select_source`].
    pub fn new(
        catalog: Arc<NetworkCatalog>,
        default_source: NetworkId,
        destination: NetworkId,
        wallet: Arc<dyn WalletProvider>,
    ) -> Self {
        Self {
            catalog,
            source: default_source,
            destination,
            wallet,
        }
    }

    pub fn catalog(&self) -> &Arc<NetworkCatalog> {
        &self.catalog
    }

    pub fn source(&self) -> NetworkId {
        self.source
    }

    pub fn destination(&self) -> NetworkId {
        self.destination
    }

    pub fn selection(&self) -> NetworkSelection {
        NetworkSelection {
            source: self.source,
            destination: self.destination,
        }
    }

    /// Initial synchronization of the wallet with the default source
    pub fn mount(&self) -> SwitchRequest {
        self.request_switch(self.source)
    }

    /// Source change handler. Fires on every call, including re-selection of
    /// the current value.
    pub fn select_source(&mut self, network: NetworkId) -> SwitchRequest {
        if !self.catalog.contains(network) {
            debug!(network = %network, "Source network is not in the catalog");
        }
        let previous = self.source;
        self.source = network;
        info!(from = %previous, to = %network, "Source network selected");
        self.request_switch(network)
    }

    fn request_switch(&self, network: NetworkId) -> SwitchRequest {
        if !network.is_set() {
            return SwitchRequest::SkippedUnset;
        }
        if !self.wallet.session().is_connected {
            debug!(network = %network, "Wallet not connected, skipping network switch");
            return SwitchRequest::SkippedNotConnected;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(network = %network, error = %e, "No runtime for network switch request");
                return SwitchRequest::Dropped(network);
            }
        };

        let wallet = Arc::clone(&self.wallet);
        handle.spawn(async move {
            match wallet.switch_network(network).await {
                Ok(()) => debug!(network = %network, "Wallet switched network"),
                Err(e) => warn!(
                    network = %network,
                    error = %e,
                    "Wallet network switch failed (ignored)"
                ),
            }
        });

        SwitchRequest::Issued(network)
    }
}
