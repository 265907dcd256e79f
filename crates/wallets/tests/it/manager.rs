use alloy_primitives::{Address, address};
use simplepay_config::{NetworkConfig, SEPOLIA_CHAIN_ID};
use simplepay_test_utils::{ALICE, BOB, StubWalletProvider, init_tracing};
use simplepay_wallets::{
    ProviderEvent, WalletError, WalletSession, WalletSessionManager,
    provider::EVENT_CHANNEL_CAPACITY,
};
use std::{sync::Arc, time::Duration};

const ACCOUNT: Address = address!("0xAAA0000000000000000000000000000000000001");
const MAINNET: u64 = 1;

fn manager(provider: StubWalletProvider) -> (Arc<StubWalletProvider>, WalletSessionManager) {
    init_tracing();
    let provider = Arc::new(provider);
    let manager = WalletSessionManager::with_provider(provider.clone(), NetworkConfig::sepolia());
    (provider, manager)
}

#[tokio::test]
async fn connects_on_required_network() {
    let (provider, manager) = manager(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID));

    let session = manager.connect().await.unwrap();
    assert_eq!(session, WalletSession::connected(ACCOUNT, SEPOLIA_CHAIN_ID));
    assert_eq!(manager.session(), session);
    assert_eq!(manager.last_error(), None);
    assert!(!manager.is_connecting());
    assert_eq!(provider.call_count("wallet_switchEthereumChain"), 0);
}

#[tokio::test]
async fn fails_without_provider() {
    init_tracing();
    let manager = WalletSessionManager::new(None, NetworkConfig::sepolia());

    let err = manager.connect().await.unwrap_err();
    assert_eq!(err, WalletError::ProviderUnavailable);
    assert_eq!(
        manager.last_error().as_deref(),
        Some("No wallet provider found. Install a wallet provider to continue.")
    );
    assert!(!manager.session().is_connected());
    assert!(Arc::new(manager).listen().is_none());
}

#[tokio::test]
async fn switches_to_known_network() {
    let (provider, manager) =
        manager(StubWalletProvider::new(ACCOUNT, MAINNET).with_known_chain(SEPOLIA_CHAIN_ID));

    let session = manager.connect().await.unwrap();
    assert_eq!(session.chain_id(), Some(SEPOLIA_CHAIN_ID));
    assert_eq!(provider.current_chain(), SEPOLIA_CHAIN_ID);
    assert_eq!(provider.call_count("wallet_switchEthereumChain"), 1);
    assert!(provider.added_chains().is_empty());
}

#[tokio::test]
async fn registers_unknown_network() {
    let (provider, manager) = manager(StubWalletProvider::new(ACCOUNT, MAINNET));

    let session = manager.connect().await.unwrap();
    assert_eq!(session, WalletSession::connected(ACCOUNT, SEPOLIA_CHAIN_ID));
    assert_eq!(
        provider.calls(),
        [
            "eth_requestAccounts",
            "eth_chainId",
            "wallet_switchEthereumChain",
            "wallet_addEthereumChain",
            "wallet_switchEthereumChain",
            "eth_chainId",
        ]
    );

    let added = provider.added_chains();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].chain_id, "0xaa36a7");
    assert_eq!(added[0].chain_name, "Sepolia Test Network");
    assert_eq!(added[0].native_currency.decimals, 18);
}

#[tokio::test]
async fn rejected_switch_keeps_session() {
    let (_provider, manager) = manager(
        StubWalletProvider::new(ACCOUNT, MAINNET)
            .with_known_chain(SEPOLIA_CHAIN_ID)
            .rejecting_switch(),
    );

    let err = manager.connect().await.unwrap_err();
    assert!(matches!(err, WalletError::ConnectionRejected(_)), "{err:?}");
    assert!(!manager.session().is_connected());
    assert_eq!(manager.last_error(), Some(err.to_string()));
}

#[tokio::test]
async fn rejected_registration_keeps_session() {
    let (provider, manager) = manager(StubWalletProvider::new(ACCOUNT, MAINNET).rejecting_add());

    let err = manager.connect().await.unwrap_err();
    assert!(matches!(err, WalletError::ConnectionRejected(_)), "{err:?}");
    assert!(!manager.session().is_connected());
    assert_eq!(provider.call_count("wallet_switchEthereumChain"), 1);
}

#[tokio::test]
async fn wrong_chain_after_switch_is_rejected() {
    let (_provider, manager) = manager(
        StubWalletProvider::new(ACCOUNT, MAINNET).with_known_chain(SEPOLIA_CHAIN_ID).stuck(),
    );

    let err = manager.connect().await.unwrap_err();
    assert!(matches!(err, WalletError::ConnectionRejected(_)), "{err:?}");
    assert!(!manager.session().is_connected());
}

#[tokio::test]
async fn rejected_authorization() {
    let (provider, manager) =
        manager(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID).rejecting_accounts());

    let err = manager.connect().await.unwrap_err();
    assert_eq!(err.to_string(), "User rejected the request.");
    assert!(!manager.session().is_connected());
    assert_eq!(provider.call_count("eth_chainId"), 0);
}

#[tokio::test]
async fn no_authorized_accounts() {
    let (_provider, manager) =
        manager(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID).without_accounts());

    let err = manager.connect().await.unwrap_err();
    assert_eq!(err, WalletError::ConnectionRejected("No accounts were authorized.".into()));
}

#[tokio::test]
async fn reconnecting_clears_previous_error() {
    init_tracing();
    let provider = Arc::new(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID));
    let manager = WalletSessionManager::with_provider(provider.clone(), NetworkConfig::sepolia());
    manager.connect().await.unwrap();
    provider.change_accounts(vec![]);
    manager.handle_event(ProviderEvent::AccountsChanged(vec![])).await;
    assert!(!manager.session().is_connected());

    provider.change_accounts(vec![BOB]);
    let session = manager.connect().await.unwrap();
    assert_eq!(session.address(), Some(BOB));
    assert_eq!(manager.last_error(), None);
}

#[tokio::test]
async fn disconnect_is_idempotent() {
    let (_provider, manager) = manager(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID));
    manager.connect().await.unwrap();

    manager.disconnect();
    let first = manager.session();
    manager.disconnect();
    assert_eq!(manager.session(), first);
    assert_eq!(first, WalletSession::disconnected());
    assert_eq!(manager.last_error(), None);
}

#[tokio::test]
async fn restores_authorized_account() {
    let (provider, manager) =
        manager(StubWalletProvider::new(ALICE, SEPOLIA_CHAIN_ID).authorized());

    let session = manager.restore_session().await;
    assert_eq!(session, WalletSession::connected(ALICE, SEPOLIA_CHAIN_ID));
    assert_eq!(provider.call_count("eth_requestAccounts"), 0);
}

#[tokio::test]
async fn restore_is_silent_without_accounts() {
    let (provider, manager) = manager(StubWalletProvider::new(ALICE, SEPOLIA_CHAIN_ID));

    let session = manager.restore_session().await;
    assert_eq!(session, WalletSession::disconnected());
    assert_eq!(manager.last_error(), None);
    assert_eq!(provider.calls(), ["eth_accounts"]);

    let manager = WalletSessionManager::new(None, NetworkConfig::sepolia());
    assert_eq!(manager.restore_session().await, WalletSession::disconnected());
}

#[tokio::test]
async fn empty_accounts_disconnect() {
    let (_provider, manager) = manager(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID));
    manager.connect().await.unwrap();

    manager.handle_event(ProviderEvent::AccountsChanged(vec![])).await;
    let session = manager.session();
    assert!(!session.is_connected());
    assert_eq!(session.address(), None);
    assert_eq!(session.chain_id(), None);
}

#[tokio::test]
async fn chain_change_updates_session() {
    let (provider, manager) = manager(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID));
    manager.connect().await.unwrap();

    provider.change_chain(MAINNET);
    manager.handle_event(ProviderEvent::ChainChanged(MAINNET)).await;
    assert_eq!(manager.session(), WalletSession::connected(ACCOUNT, MAINNET));
}

#[tokio::test]
async fn listener_follows_provider_events() {
    let (provider, manager) = manager(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID));
    let manager = Arc::new(manager);
    let subscription = manager.listen().unwrap();
    assert!(subscription.is_active());

    let mut sessions = manager.subscribe();
    manager.connect().await.unwrap();

    provider.change_accounts(vec![BOB]);
    let session = *tokio::time::timeout(
        Duration::from_secs(5),
        sessions.wait_for(|session| session.address() == Some(BOB)),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(session.chain_id(), Some(SEPOLIA_CHAIN_ID));

    provider.change_accounts(vec![]);
    tokio::time::timeout(Duration::from_secs(5), sessions.wait_for(|s| !s.is_connected()))
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn listener_resyncs_revoked_accounts_after_lag() {
    let (provider, manager) = manager(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID));
    let manager = Arc::new(manager);
    manager.connect().await.unwrap();
    let _subscription = manager.listen().unwrap();
    let mut sessions = manager.subscribe();

    // the revocation is pushed out of the channel before the listener gets to run
    provider.change_accounts(vec![]);
    for _ in 0..EVENT_CHANNEL_CAPACITY {
        provider.emit(ProviderEvent::ChainChanged(SEPOLIA_CHAIN_ID));
    }

    tokio::time::timeout(Duration::from_secs(5), sessions.wait_for(|s| !s.is_connected()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(manager.session(), WalletSession::disconnected());
}

#[tokio::test]
async fn dropping_subscription_stops_listener() {
    let (provider, manager) = manager(StubWalletProvider::new(ACCOUNT, SEPOLIA_CHAIN_ID));
    let manager = Arc::new(manager);
    manager.connect().await.unwrap();

    drop(manager.listen().unwrap());
    provider.change_accounts(vec![]);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(manager.session().is_connected());
}
