//! End-to-end tests of the bridge form through its public API
//!
//! Uses local fakes for the wallet and the transfer operation, so no wallet
//! or chain is required:
//!
//! ```bash
//! cargo test --test bridge_flow
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bridge_form::{
    handler_fn, AmountPolicy, BridgeConfig, BridgeForm, BridgeHandler, BridgeView, GateRejection,
    NetworkId, NotConnected, SubmissionState, SubmitOutcome, SwitchRequest, TransferRequest,
    WalletProvider, WalletSession,
};
use eyre::{eyre, Result};
use tokio::sync::{mpsc, oneshot};

// ============================================================================
// Fakes
// ============================================================================

/// Wallet fake that reports switch requests on a channel
struct ChannelWallet {
    session: Mutex<WalletSession>,
    switches: mpsc::UnboundedSender<NetworkId>,
}

impl ChannelWallet {
    fn new(session: WalletSession) -> (Arc<Self>, mpsc::UnboundedReceiver<NetworkId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let wallet = Arc::new(Self {
            session: Mutex::new(session),
            switches: tx,
        });
        (wallet, rx)
    }

    fn set_session(&self, session: WalletSession) {
        *self.session.lock().unwrap() = session;
    }
}

#[async_trait]
impl WalletProvider for ChannelWallet {
    fn session(&self) -> WalletSession {
        self.session.lock().unwrap().clone()
    }

    async fn switch_network(&self, network: NetworkId) -> Result<()> {
        let _ = self.switches.send(network);
        Ok(())
    }
}

/// Handler fake whose outcome is decided by the test through a oneshot
struct ControlledHandler {
    calls: Mutex<Vec<(String, f64)>>,
    started: mpsc::UnboundedSender<()>,
    resolve: Mutex<Option<oneshot::Receiver<Result<()>>>>,
}

impl ControlledHandler {
    fn new() -> (
        Arc<Self>,
        mpsc::UnboundedReceiver<()>,
        oneshot::Sender<Result<()>>,
    ) {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let (resolve_tx, resolve_rx) = oneshot::channel();
        let handler = Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            started: started_tx,
            resolve: Mutex::new(Some(resolve_rx)),
        });
        (handler, started_rx, resolve_tx)
    }

    fn calls(&self) -> Vec<(String, f64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BridgeHandler for ControlledHandler {
    async fn bridge(&self, request: TransferRequest) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((request.recipient.clone(), request.amount_f64()));
        let _ = self.started.send(());
        let resolve = self.resolve.lock().unwrap().take();
        match resolve {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(eyre!("test dropped resolver"))),
            None => Ok(()),
        }
    }
}

async fn next_switch(rx: &mut mpsc::UnboundedReceiver<NetworkId>) -> NetworkId {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for switch request")
        .expect("switch channel closed")
}

fn connected() -> WalletSession {
    WalletSession::connected(5.0, Some(42.0))
}

// ============================================================================
// Connection Gate
// ============================================================================

#[tokio::test]
async fn test_disconnected_wallet_shows_call_to_action_only() {
    let (wallet, mut switches) = ChannelWallet::new(WalletSession::disconnected());
    let (handler, _started, _resolve) = ControlledHandler::new();
    let form = BridgeForm::new(BridgeConfig::default(), wallet, handler.clone());

    assert_eq!(form.mount(), SwitchRequest::SkippedNotConnected);
    assert!(matches!(form.view(), BridgeView::ConnectWallet(_)));
    assert_eq!(form.set_recipient("0xABC"), Err(NotConnected));
    assert!(matches!(form.submit().await, SubmitOutcome::NotConnected));
    assert!(handler.calls().is_empty());
    assert!(switches.try_recv().is_err());
}

#[tokio::test]
async fn test_gate_reevaluated_on_session_change() {
    let (wallet, _switches) = ChannelWallet::new(WalletSession::disconnected());
    let (handler, _started, _resolve) = ControlledHandler::new();
    let form = BridgeForm::new(BridgeConfig::default(), wallet.clone(), handler);

    assert!(!form.view().is_form());
    wallet.set_session(connected());
    assert!(form.view().is_form());
}

// ============================================================================
// Network Selector
// ============================================================================

#[tokio::test]
async fn test_every_source_change_fires_one_switch() {
    let (wallet, mut switches) = ChannelWallet::new(connected());
    let (handler, _started, _resolve) = ControlledHandler::new();
    let form = BridgeForm::new(BridgeConfig::default(), wallet, handler);

    form.mount();
    assert_eq!(next_switch(&mut switches).await, NetworkId::FUJI_C_CHAIN);

    for _ in 0..2 {
        let request = form.select_source(NetworkId::DEFAULT_L1).unwrap();
        assert_eq!(request, SwitchRequest::Issued(NetworkId::DEFAULT_L1));
        assert_eq!(next_switch(&mut switches).await, NetworkId::DEFAULT_L1);
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(switches.try_recv().is_err(), "no extra switch requests");
    assert_eq!(form.selection().destination, NetworkId::DEFAULT_L1);
}

// ============================================================================
// Submission Controller
// ============================================================================

#[tokio::test]
async fn test_successful_transfer_scenario() {
    let (wallet, _switches) = ChannelWallet::new(connected());
    let (handler, mut started, resolve) = ControlledHandler::new();
    let form = Arc::new(BridgeForm::new(
        BridgeConfig::default(),
        wallet,
        handler.clone(),
    ));

    form.set_recipient("0xABC").unwrap();
    form.set_amount("12.5").unwrap();

    let task = {
        let form = Arc::clone(&form);
        tokio::spawn(async move { form.submit().await })
    };
    started.recv().await.unwrap();

    assert_eq!(form.state(), SubmissionState::Submitting);
    let view = form.view();
    let submit = view.as_form().unwrap().footer.submit().unwrap().clone();
    assert!(!submit.is_enabled());

    resolve.send(Ok(())).unwrap();
    let outcome = task.await.unwrap();
    assert!(outcome.is_success());

    assert_eq!(handler.calls(), vec![("0xABC".to_string(), 12.5)]);
    assert_eq!(form.state(), SubmissionState::Idle);
    assert_eq!(form.form().recipient(), "");
    assert_eq!(form.form().amount(), "");
}

#[tokio::test]
async fn test_failed_transfer_resets_identically() {
    let (wallet, _switches) = ChannelWallet::new(connected());
    let (handler, mut started, resolve) = ControlledHandler::new();
    let form = Arc::new(BridgeForm::new(
        BridgeConfig::default(),
        wallet,
        handler.clone(),
    ));

    form.set_recipient("0xABC").unwrap();
    form.set_amount("7").unwrap();
    let task = {
        let form = Arc::clone(&form);
        tokio::spawn(async move { form.submit().await })
    };
    started.recv().await.unwrap();

    resolve.send(Err(eyre!("user denied signature"))).unwrap();
    let outcome = task.await.unwrap();
    assert!(outcome.was_invoked());
    assert!(!outcome.is_success());

    assert_eq!(form.state(), SubmissionState::Idle);
    assert_eq!(form.form().recipient(), "");
    assert_eq!(form.form().amount(), "");
    // Default policy keeps the failure out of the view
    assert_eq!(form.view().as_form().unwrap().error, None);
}

#[tokio::test]
async fn test_empty_recipient_never_invokes_transfer() {
    let (wallet, _switches) = ChannelWallet::new(connected());
    let (handler, _started, _resolve) = ControlledHandler::new();
    let form = BridgeForm::new(BridgeConfig::default(), wallet, handler.clone());

    form.set_recipient("").unwrap();
    form.set_amount("5").unwrap();

    let outcome = form.submit().await;
    assert_eq!(outcome.rejection(), Some(&GateRejection::EmptyRecipient));
    assert!(handler.calls().is_empty());
    assert_eq!(form.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn test_non_numeric_amount_passes_through_as_nan() {
    let (wallet, _switches) = ChannelWallet::new(connected());
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let handler = handler_fn(move |request: TransferRequest| {
        let recorded = Arc::clone(&recorded);
        async move {
            recorded.lock().unwrap().push(request);
            Ok::<(), eyre::Report>(())
        }
    });
    let form = BridgeForm::new(BridgeConfig::default(), wallet, Arc::new(handler));

    form.set_recipient("0xABC").unwrap();
    form.set_amount("abc").unwrap();
    assert!(form.submit().await.is_success());

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].amount_f64().is_nan());
    assert!(!calls[0].amount.is_valid());
}

#[tokio::test]
async fn test_partially_numeric_amount_passes_through_as_prefix() {
    let (wallet, _switches) = ChannelWallet::new(connected());
    let amounts = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&amounts);
    let handler = handler_fn(move |request: TransferRequest| {
        let recorded = Arc::clone(&recorded);
        async move {
            recorded.lock().unwrap().push(request.amount_f64());
            Ok::<(), eyre::Report>(())
        }
    });
    let form = BridgeForm::new(BridgeConfig::default(), wallet, Arc::new(handler));

    for text in ["12abc", "Infinity"] {
        form.set_recipient("0xABC").unwrap();
        form.set_amount(text).unwrap();
        assert!(form.submit().await.is_success());
    }

    assert_eq!(*amounts.lock().unwrap(), vec![12.0, f64::INFINITY]);
}

#[tokio::test]
async fn test_reject_policy_blocks_non_numeric_amount() {
    let (wallet, _switches) = ChannelWallet::new(connected());
    let (handler, _started, _resolve) = ControlledHandler::new();
    let config = BridgeConfig {
        amount_policy: AmountPolicy::Reject,
        ..BridgeConfig::default()
    };
    let form = BridgeForm::new(config, wallet, handler.clone());

    form.set_recipient("0xABC").unwrap();
    form.set_amount("abc").unwrap();
    let outcome = form.submit().await;

    assert!(matches!(
        outcome.rejection(),
        Some(GateRejection::MalformedAmount(_))
    ));
    assert!(handler.calls().is_empty());
    // Rejected input stays in the form
    assert_eq!(form.form().amount(), "abc");
}
