//! View model
//!
//! Pure render decision over the current state. The connection gate lives
//! here: without a connected wallet only the call-to-action is produced and
//! no form data is exposed. Everything derives `Serialize` so a front-end can
//! draw it from JSON.

use serde::Serialize;

use crate::catalog::NetworkCatalog;
use crate::config::BridgeConfig;
use crate::form::FormState;
use crate::selector::NetworkSelection;
use crate::session::WalletSession;
use crate::types::{Balance, NetworkId, NetworkOption, SubmissionState};

/// Top-level render decision
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum BridgeView {
    ConnectWallet(CallToAction),
    Form(FormView),
}

impl BridgeView {
    pub fn is_form(&self) -> bool {
        matches!(self, BridgeView::Form(_))
    }

    pub fn as_form(&self) -> Option<&FormView> {
        match self {
            BridgeView::Form(form) => Some(form),
            BridgeView::ConnectWallet(_) => None,
        }
    }
}

/// Shown instead of the form while no wallet is connected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallToAction {
    pub message: String,
    pub wallet_name: String,
    pub install_url: String,
    pub refresh_hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub title: String,
    pub token_symbol: String,
    pub token_explorer_url: String,
    pub source: NetworkField,
    pub destination: NetworkField,
    pub recipient: TextField,
    pub amount: TextField,
    pub footer: Footer,
    /// Last transfer failure, only populated under `FailurePolicy::Surface`
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkField {
    pub label: String,
    pub value: NetworkId,
    /// Catalog label of `value`, if the catalog knows it
    pub value_label: Option<String>,
    pub editable: bool,
    pub options: Vec<NetworkOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
}

/// Bottom of the form: balances and the submit control
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Footer {
    /// Session not active; nothing is drawn
    Inactive,
    /// Wallet connecting or balances loading
    Loading,
    Ready {
        native_balance: BalanceLine,
        token_balance: BalanceLine,
        submit: SubmitControl,
    },
}

impl Footer {
    pub fn submit(&self) -> Option<&SubmitControl> {
        match self {
            Footer::Ready { submit, .. } => Some(submit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceLine {
    pub symbol: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmitControl {
    Enabled { label: String },
    /// Disabled with a spinner in place of the label
    InFlight,
}

impl SubmitControl {
    pub fn is_enabled(&self) -> bool {
        matches!(self, SubmitControl::Enabled { .. })
    }
}

fn network_field(
    label: &str,
    value: NetworkId,
    editable: bool,
    catalog: &NetworkCatalog,
) -> NetworkField {
    NetworkField {
        label: label.to_string(),
        value,
        value_label: catalog.label_of(value).map(str::to_string),
        editable,
        options: catalog.options().to_vec(),
    }
}

fn native_balance_display(balance: Option<Balance>) -> String {
    balance.map(|b| b.to_string()).unwrap_or_default()
}

// Token balance shows a dash when missing or zero
fn token_balance_display(balance: Option<Balance>) -> String {
    match balance {
        Some(b) if !b.is_zero() => b.to_string(),
        _ => "-".to_string(),
    }
}

/// Render the current state.
pub fn render(
    config: &BridgeConfig,
    session: &WalletSession,
    selection: NetworkSelection,
    form: &FormState,
    state: SubmissionState,
    last_error: Option<String>,
) -> BridgeView {
    if !session.is_connected {
        return BridgeView::ConnectWallet(CallToAction {
            message: format!("Please connect your {} to use this app.", config.wallet_name),
            wallet_name: config.wallet_name.clone(),
            install_url: config.wallet_install_url.to_string(),
            refresh_hint: "Ctrl+Shift+R to download the latest version!".to_string(),
        });
    }

    let symbol = &config.token_symbol;
    let footer = if !session.is_active {
        Footer::Inactive
    } else if session.is_loading() {
        Footer::Loading
    } else {
        let submit = if state.is_submitting() {
            SubmitControl::InFlight
        } else {
            SubmitControl::Enabled {
                label: format!("Bridge {}", symbol),
            }
        };
        Footer::Ready {
            native_balance: BalanceLine {
                symbol: "$Native".to_string(),
                display: native_balance_display(session.native_balance),
            },
            token_balance: BalanceLine {
                symbol: format!("${}", symbol),
                display: token_balance_display(session.token_balance),
            },
            submit,
        }
    };

    BridgeView::Form(FormView {
        title: format!("Transfer ${} across chains", symbol),
        token_symbol: symbol.clone(),
        token_explorer_url: config.token_explorer_url.to_string(),
        source: network_field("From Network", selection.source, true, &config.catalog),
        destination: network_field("To Network", selection.destination, false, &config.catalog),
        recipient: TextField {
            label: "Recipient Address".to_string(),
            value: form.recipient().to_string(),
            placeholder: "0xRecipientAddress...".to_string(),
        },
        amount: TextField {
            label: format!("Amount ({})", symbol),
            value: form.amount().to_string(),
            placeholder: format!("Amount in {}", symbol),
        },
        footer,
        error: last_error,
    })
}
