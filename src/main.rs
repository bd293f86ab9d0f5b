//! Bridge form terminal driver
//!
//! Runs a [`BridgeForm`] against a simulated wallet and a transfer handler that
//! only logs, so the form lifecycle can be exercised from a terminal:
//!
//! ```text
//! connect | disconnect        toggle the simulated wallet
//! from <network-id>           select the source network
//! recipient <text>            type into the recipient field
//! amount <text>               type into the amount field
//! submit                      submit (runs in the background)
//! show                        print the rendered view as JSON
//! networks                    list the network catalog
//! quit
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bridge_form::{
    handler_fn, to_base_units, Balance, BridgeConfig, BridgeForm, NetworkId, SubmitOutcome,
    TransferRequest, WalletProvider, WalletSession,
};
use eyre::{eyre, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// How long the simulated wallet and transfer take to respond
const SIMULATED_LATENCY: Duration = Duration::from_millis(1500);

/// Wallet stand-in: connects instantly, loads balances after a delay and
/// accepts every switch request except to unknown networks.
struct SimulatedWallet {
    session: Mutex<WalletSession>,
    known: Vec<NetworkId>,
}

impl SimulatedWallet {
    fn new(known: Vec<NetworkId>) -> Self {
        Self {
            session: Mutex::new(WalletSession::disconnected()),
            known,
        }
    }

    fn session_mut(&self) -> MutexGuard<'_, WalletSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the wallet connected; balances arrive via [`Self::load_balances`]
    fn connect(&self) {
        let mut session = self.session_mut();
        session.is_connected = true;
        session.is_active = true;
        session.is_connecting = true;
        session.is_balance_loading = true;
    }

    async fn load_balances(self: Arc<Self>) {
        tokio::time::sleep(SIMULATED_LATENCY).await;
        let mut session = self.session_mut();
        session.is_connecting = false;
        session.is_balance_loading = false;
        session.native_balance = Some(Balance(2.5));
        session.token_balance = Some(Balance(100.0));
        info!("Simulated wallet connected");
    }

    fn disconnect(&self) {
        *self.session_mut() = WalletSession::disconnected();
        info!("Simulated wallet disconnected");
    }
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    fn session(&self) -> WalletSession {
        self.session_mut().clone()
    }

    async fn switch_network(&self, network: NetworkId) -> Result<()> {
        tokio::time::sleep(SIMULATED_LATENCY / 3).await;
        if !self.known.contains(&network) {
            return Err(eyre!("Wallet does not know network {}", network));
        }
        info!(network = %network, "Simulated wallet switched network");
        Ok(())
    }
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> eyre::Result<()> {
    init_logging();

    let config = BridgeConfig::load()?;
    info!(
        source = %config.default_source,
        destination = %config.destination,
        token = %config.token_symbol,
        "Configuration loaded"
    );

    let known = config.catalog.iter().map(|o| o.value).collect();
    let wallet = Arc::new(SimulatedWallet::new(known));
    let decimals = config.token_decimals;
    let handler = handler_fn(move |request: TransferRequest| async move {
        let units = to_base_units(request.amount.text(), decimals)?;
        tokio::time::sleep(SIMULATED_LATENCY).await;
        info!(
            recipient = %request.recipient,
            units = %units,
            source = %request.source,
            destination = %request.destination,
            "Simulated transfer sent"
        );
        Ok::<(), eyre::Report>(())
    });
    let form = Arc::new(BridgeForm::new(config, wallet.clone(), Arc::new(handler)));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("bridge-form ready, type 'connect' to start");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "" => continue,
            "connect" => {
                wallet.connect();
                tokio::spawn(Arc::clone(&wallet).load_balances());
                println!("{:?}", form.mount());
            }
            "disconnect" => wallet.disconnect(),
            "from" => match arg.parse::<NetworkId>() {
                Ok(network) => match form.select_source(network) {
                    Ok(request) => println!("{:?}", request),
                    Err(e) => println!("{}", e),
                },
                Err(e) => println!("{}", e),
            },
            "recipient" => report(form.set_recipient(arg)),
            "amount" => report(form.set_amount(arg)),
            "submit" => {
                let form = Arc::clone(&form);
                tokio::spawn(async move {
                    match form.submit().await {
                        SubmitOutcome::Completed { result: Err(e), .. } => {
                            warn!(error = %e, "Transfer failed")
                        }
                        outcome => info!(?outcome, "Submit finished"),
                    }
                });
                tokio::task::yield_now().await;
            }
            "show" => println!("{}", serde_json::to_string_pretty(&form.view())?),
            "networks" => {
                for option in form.config().catalog.iter() {
                    println!("{:>10}  {}", option.value.to_string(), option.label);
                }
            }
            "quit" | "exit" => break,
            other => println!("unknown command '{}'", other),
        }
    }

    info!("Bridge form driver stopped");
    Ok(())
}

fn report(result: Result<(), bridge_form::NotConnected>) {
    if let Err(e) = result {
        println!("{}", e);
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bridge_form=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}
