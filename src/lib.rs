//! Bridge Form: cross-chain transfer form state machine
//!
//! This crate drives a single-page USDC bridge form, independent of any UI
//! toolkit:
//!
//! - **Connection Gate** - without a connected wallet only a call-to-action is
//!   rendered and all input is ignored
//! - **Network Selector** - user-selectable source, fixed destination; every
//!   source change asks the wallet to switch networks (fire-and-forget)
//! - **Form State** - free-text recipient and amount, checked only at submit
//! - **Submission Controller** - Idle/Submitting state machine around the
//!   external transfer operation, resetting the form on every outcome
//!
//! The wallet and the transfer operation are injected collaborators
//! ([`WalletProvider`], [`BridgeHandler`]).
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use bridge_form::{handler_fn, BridgeConfig, BridgeForm};
//!
//! let handler = handler_fn(|request| async move {
//!     send_transfer(request.recipient, request.amount_f64()).await
//! });
//! let form = BridgeForm::new(BridgeConfig::load()?, wallet, Arc::new(handler));
//! form.mount();
//! form.set_recipient("0xABC")?;
//! form.set_amount("12.5")?;
//! let outcome = form.submit().await;
//! ```
//!
//! ## Feature Flags
//!
//! - `testing` - Export collaborator doubles (`RecordingWallet`, `ScriptedHandler`)

pub mod amount;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod form;
pub mod selector;
pub mod session;
pub mod submission;
pub mod types;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use amount::{from_base_units, to_base_units, AmountError, AmountPolicy, ParsedAmount};
pub use bridge::{BridgeForm, NotConnected};
pub use catalog::{CatalogError, NetworkCatalog};
pub use config::BridgeConfig;
pub use form::{FormState, GateRejection, TransferRequest};
pub use selector::{NetworkSelection, NetworkSelector, SwitchRequest};
pub use session::{WalletProvider, WalletSession};
pub use submission::{
    handler_fn, BridgeHandler, FailurePolicy, FnHandler, SubmissionController, SubmitOutcome,
};
pub use types::{Balance, NetworkId, NetworkOption, SubmissionState};
pub use view::{BridgeView, CallToAction, Footer, FormView, SubmitControl};
