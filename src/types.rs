//! Common types for the bridge form
//!
//! Network identifiers, catalog entries, balances and the submission state
//! shared by the selector, form, controller and view modules.

use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Network ID
// ============================================================================

/// Numeric network (chain) identifier as understood by the wallet.
///
/// `0` is the unset value: a source or destination of `0` never passes the
/// submission gate and never triggers a network switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub u64);

impl NetworkId {
    /// Avalanche Fuji C-Chain, the default source network
    pub const FUJI_C_CHAIN: NetworkId = NetworkId(43113);

    /// Custom Avalanche L1, the default (and only) destination network
    pub const DEFAULT_L1: NetworkId = NetworkId(173750);

    /// The unset identifier
    pub const UNSET: NetworkId = NetworkId(0);

    pub fn new(id: u64) -> Self {
        NetworkId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether this identifier carries a value (non-zero)
    pub fn is_set(&self) -> bool {
        self.0 != 0
    }

    /// Create from hex string (with or without 0x prefix), as returned by
    /// `eth_chainId`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        if hex.is_empty() {
            return Err(eyre!("NetworkId hex string is empty"));
        }
        // hex::decode needs an even number of digits
        let padded = if hex.len() % 2 == 1 {
            format!("0{}", hex)
        } else {
            hex.to_string()
        };
        let bytes = hex::decode(&padded)?;
        if bytes.len() > 8 {
            return Err(eyre!(
                "NetworkId must fit in 8 bytes, got {} bytes",
                bytes.len()
            ));
        }
        let mut buf = [0u8; 8];
        buf[8 - bytes.len()..].copy_from_slice(&bytes);
        Ok(NetworkId(u64::from_be_bytes(buf)))
    }

    /// Convert to a minimal hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NetworkId {
    fn from(id: u64) -> Self {
        NetworkId(id)
    }
}

impl FromStr for NetworkId {
    type Err = eyre::Report;

    /// Accepts decimal (`43113`) or hex (`0xa869`)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with("0x") || s.starts_with("0X") {
            return NetworkId::from_hex(&s[2..]);
        }
        s.parse::<u64>()
            .map(NetworkId)
            .map_err(|e| eyre!("Invalid network id '{}': {}", s, e))
    }
}

/// One entry of the network catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkOption {
    pub value: NetworkId,
    pub label: String,
}

impl NetworkOption {
    pub fn new(value: impl Into<NetworkId>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

// ============================================================================
// Balances
// ============================================================================

/// A wallet balance as reported by the wallet provider, already scaled to
/// whole token units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub f64);

impl Balance {
    /// Zero balances render the same as a missing balance in the token row
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Balance {
    fn from(value: f64) -> Self {
        Balance(value)
    }
}

// ============================================================================
// Submission state
// ============================================================================

/// Lifecycle of the submit control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
