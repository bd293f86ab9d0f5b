//! Bridge form configuration

use eyre::{eyre, Result, WrapErr};
use std::env;
use std::str::FromStr;
use url::Url;

use crate::amount::AmountPolicy;
use crate::catalog::NetworkCatalog;
use crate::submission::FailurePolicy;
use crate::types::NetworkId;

const DEFAULT_WALLET_INSTALL_URL: &str = "https://chromewebstore.google.com/detail/core-crypto-wallet-nft-ex/agoakfejjabomempkjlepdflaleeobhb";
const DEFAULT_TOKEN_EXPLORER_URL: &str = "https://testnet.snowtrace.io/token/0x5425890298aed601595a70AB815c96711a31Bc65?chainid=43113";

/// Bridge form configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Networks offered by the source selector (and shown for the destination)
    pub catalog: NetworkCatalog,
    /// Source network selected when the form is created
    pub default_source: NetworkId,
    /// Fixed destination network
    pub destination: NetworkId,

    /// Symbol of the bridged token (e.g. USDC)
    pub token_symbol: String,
    /// Decimals of the bridged token, for base-unit conversion
    pub token_decimals: u8,
    /// Block explorer page of the bridged token
    pub token_explorer_url: Url,

    /// Wallet extension named in the connect call-to-action
    pub wallet_name: String,
    /// Where to install the wallet extension
    pub wallet_install_url: Url,

    /// Whether failed transfers are shown in the view
    pub failure_policy: FailurePolicy,
    /// Whether malformed amounts block submission
    pub amount_policy: AmountPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            catalog: NetworkCatalog::default(),
            default_source: NetworkId::FUJI_C_CHAIN,
            destination: NetworkId::DEFAULT_L1,
            token_symbol: "USDC".to_string(),
            token_decimals: 6,
            token_explorer_url: parse_default_url(DEFAULT_TOKEN_EXPLORER_URL),
            wallet_name: "Core wallet".to_string(),
            wallet_install_url: parse_default_url(DEFAULT_WALLET_INSTALL_URL),
            failure_policy: FailurePolicy::Silent,
            amount_policy: AmountPolicy::PassThrough,
        }
    }
}

fn parse_default_url(url: &str) -> Url {
    Url::parse(url).expect("built-in default URL must parse")
}

/// Read an optional variable, treating empty values as unset
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional_var(name)
        .map(|v| v.parse::<T>().map_err(|e| eyre!("Invalid {}: {}", name, e)))
        .transpose()
}

impl BridgeConfig {
    /// Load configuration from environment, falling back to defaults
    pub fn load() -> Result<Self> {
        // Try to load .env file
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded .env from {:?}", path);
        }
        Self::from_env()
    }

    /// Build configuration from the current process environment only
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let catalog = parse_var::<NetworkCatalog>("BRIDGE_NETWORKS")?.unwrap_or(defaults.catalog);

        let token_explorer_url = optional_var("BRIDGE_TOKEN_EXPLORER_URL")
            .map(|v| Url::parse(&v).wrap_err("Invalid BRIDGE_TOKEN_EXPLORER_URL"))
            .transpose()?
            .unwrap_or(defaults.token_explorer_url);
        let wallet_install_url = optional_var("BRIDGE_WALLET_INSTALL_URL")
            .map(|v| Url::parse(&v).wrap_err("Invalid BRIDGE_WALLET_INSTALL_URL"))
            .transpose()?
            .unwrap_or(defaults.wallet_install_url);

        let config = Self {
            catalog,
            default_source: parse_var("BRIDGE_SOURCE_NETWORK")?.unwrap_or(defaults.default_source),
            destination: parse_var("BRIDGE_DESTINATION_NETWORK")?.unwrap_or(defaults.destination),
            token_symbol: optional_var("BRIDGE_TOKEN_SYMBOL").unwrap_or(defaults.token_symbol),
            token_decimals: parse_var("BRIDGE_TOKEN_DECIMALS")?.unwrap_or(defaults.token_decimals),
            token_explorer_url,
            wallet_name: optional_var("BRIDGE_WALLET_NAME").unwrap_or(defaults.wallet_name),
            wallet_install_url,
            failure_policy: parse_var("BRIDGE_FAILURE_POLICY")?.unwrap_or(defaults.failure_policy),
            amount_policy: parse_var("BRIDGE_AMOUNT_POLICY")?.unwrap_or(defaults.amount_policy),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<()> {
        if !self.default_source.is_set() {
            return Err(eyre!("Source network must be non-zero"));
        }
        if !self.destination.is_set() {
            return Err(eyre!("Destination network must be non-zero"));
        }
        if !self.catalog.contains(self.default_source) {
            return Err(eyre!(
                "Default source network {} is not in the network catalog",
                self.default_source
            ));
        }
        if self.token_decimals > 38 {
            return Err(eyre!(
                "Token decimals {} exceed the supported maximum of 38",
                self.token_decimals
            ));
        }
        Ok(())
    }
}
