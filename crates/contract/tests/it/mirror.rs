use alloy_primitives::{Address, TxHash, U256, address, utils::parse_ether};
use simplepay_config::{NetworkConfig, SEPOLIA_CHAIN_ID};
use simplepay_contract::{
    CallError, ContractCall, ContractMirror, ContractSnapshot, FETCH_ERROR, MirrorError,
    Operation, TxPhase,
};
use simplepay_test_utils::{ALICE, BOB, StubPaymentContract, StubWalletProvider, init_tracing};
use simplepay_wallets::{WalletError, WalletSessionManager};
use std::{sync::Arc, time::Duration};

const CONTRACT: Address = address!("0xC4a450b7f6B373889f3eA5efC4D326b28D8300b5");

struct Fixture {
    wallet: Arc<StubWalletProvider>,
    contract: StubPaymentContract,
    manager: Arc<WalletSessionManager>,
    mirror: Arc<ContractMirror>,
}

impl Fixture {
    fn new(account: Address, owner: Address) -> Self {
        init_tracing();
        let wallet = Arc::new(StubWalletProvider::new(account, SEPOLIA_CHAIN_ID));
        let contract = StubPaymentContract::new(CONTRACT, owner).with_totals(
            ether("1.5"),
            ether("0.1"),
            ether("0.75"),
        );
        let manager =
            Arc::new(WalletSessionManager::with_provider(wallet.clone(), NetworkConfig::sepolia()));
        let mirror = Arc::new(ContractMirror::new(manager.clone(), Arc::new(contract.clone())));
        Self { wallet, contract, manager, mirror }
    }

    async fn connected(account: Address, owner: Address) -> Self {
        let fixture = Self::new(account, owner);
        fixture.manager.connect().await.unwrap();
        fixture.mirror.sync_session().await;
        fixture
    }

    fn view_reads(&self) -> [usize; 3] {
        [
            self.contract.read_count("totalPayments"),
            self.contract.read_count("totalFees"),
            self.contract.read_count("getContractBalance"),
        ]
    }
}

fn ether(amount: &str) -> U256 {
    parse_ether(amount).unwrap()
}

#[tokio::test]
async fn refresh_replaces_snapshot() {
    let fixture = Fixture::new(ALICE, ALICE);
    assert_eq!(fixture.mirror.snapshot(), ContractSnapshot::default());

    let snapshot = fixture.mirror.refresh().await.unwrap();
    let expected = ContractSnapshot {
        total_payments: ether("1.5"),
        total_fees: ether("0.1"),
        contract_balance: ether("0.75"),
    };
    assert_eq!(snapshot, expected);
    assert_eq!(fixture.mirror.snapshot(), expected);
    assert_eq!(fixture.mirror.treasury(), Some(ALICE));
}

#[tokio::test]
async fn failed_refresh_keeps_snapshot() {
    let fixture = Fixture::new(ALICE, ALICE);
    let before = fixture.mirror.refresh().await.unwrap();

    fixture.contract.fail_reads(true);
    let err = fixture.mirror.refresh().await.unwrap_err();
    assert!(matches!(err, MirrorError::CallFailed(_)), "{err:?}");
    assert_eq!(fixture.mirror.snapshot(), before);
    assert_eq!(fixture.mirror.last_error().as_deref(), Some(FETCH_ERROR));

    fixture.contract.fail_reads(false);
    fixture.mirror.refresh().await.unwrap();
    assert_eq!(fixture.mirror.last_error(), None);
}

#[tokio::test]
async fn refresh_requires_provider() {
    init_tracing();
    let manager = Arc::new(WalletSessionManager::new(None, NetworkConfig::sepolia()));
    let contract = StubPaymentContract::new(CONTRACT, ALICE);
    let mirror = ContractMirror::new(manager, Arc::new(contract.clone()));

    let err = mirror.refresh().await.unwrap_err();
    assert_eq!(err, MirrorError::Wallet(WalletError::ProviderUnavailable));
    assert_eq!(contract.read_count("totalPayments"), 0);
    assert!(!mirror.check_ownership().await);
}

#[tokio::test]
async fn ownership_follows_owner() {
    let fixture = Fixture::connected(ALICE, ALICE).await;
    assert!(fixture.mirror.is_owner());

    fixture.contract.set_owner(BOB);
    assert!(!fixture.mirror.check_ownership().await);
    assert!(!fixture.mirror.is_owner());
}

#[tokio::test]
async fn ownership_read_failure_clears_flag() {
    let fixture = Fixture::connected(ALICE, ALICE).await;
    assert!(fixture.mirror.is_owner());

    fixture.contract.fail_reads(true);
    assert!(!fixture.mirror.check_ownership().await);
    assert!(!fixture.mirror.is_owner());
}

#[tokio::test]
async fn ownership_requires_session() {
    let fixture = Fixture::new(ALICE, ALICE);
    assert!(!fixture.mirror.check_ownership().await);
    assert_eq!(fixture.contract.read_count("owner"), 0);
}

#[tokio::test]
async fn invalid_amounts_touch_nothing() {
    let fixture = Fixture::connected(ALICE, ALICE).await;
    let reads = fixture.view_reads();
    let wallet_calls = fixture.wallet.calls().len();

    for amount in ["", "abc", "0", "-1", "0.0000000000000000001"] {
        let err = fixture.mirror.make_payment(amount).await.unwrap_err();
        assert!(matches!(err, MirrorError::InvalidAmount(_)), "{amount}: {err:?}");
    }
    let err = fixture.mirror.transfer_fee("-1").await.unwrap_err();
    assert!(matches!(err, MirrorError::InvalidAmount(_)), "{err:?}");

    assert!(fixture.contract.submitted().is_empty());
    assert_eq!(fixture.view_reads(), reads);
    assert_eq!(fixture.wallet.calls().len(), wallet_calls);
    assert_eq!(fixture.mirror.phase(), TxPhase::Idle);
}

#[tokio::test]
async fn payment_requires_connection() {
    let fixture = Fixture::new(ALICE, ALICE);
    let err = fixture.mirror.make_payment("0.01").await.unwrap_err();
    assert_eq!(err, MirrorError::NotConnected);
    assert!(fixture.contract.submitted().is_empty());
}

#[tokio::test]
async fn payment_confirms_and_refreshes_once() {
    let fixture = Fixture::connected(BOB, ALICE).await;
    let reads = fixture.view_reads();

    let outcome = fixture.mirror.make_payment("0.01").await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.hash, Some(TxHash::with_last_byte(1)));
    assert_eq!(outcome.error, None);

    assert_eq!(fixture.view_reads(), reads.map(|n| n + 1));
    assert_eq!(
        fixture.contract.submitted(),
        [(BOB, ContractCall::MakePayment { value: ether("0.01") })]
    );
    assert_eq!(fixture.mirror.snapshot().total_payments, ether("1.51"));
    assert_eq!(fixture.mirror.snapshot().contract_balance, ether("0.76"));
    assert_eq!(fixture.mirror.phase(), TxPhase::Succeeded);
    assert_eq!(fixture.mirror.operation(), Some(Operation::Payment));
    assert_eq!(fixture.mirror.last_outcome(), Some(outcome));
}

#[tokio::test]
async fn fee_transfer_updates_totals() {
    let fixture = Fixture::connected(BOB, ALICE).await;

    let outcome = fixture.mirror.transfer_fee("0.05").await.unwrap();
    assert!(outcome.success);
    assert_eq!(fixture.mirror.snapshot().total_fees, ether("0.15"));
    assert_eq!(fixture.mirror.operation(), Some(Operation::FeeTransfer));
}

#[tokio::test]
async fn rejected_submission_is_failed_outcome() {
    let fixture = Fixture::connected(BOB, ALICE).await;
    let reads = fixture.view_reads();
    fixture
        .contract
        .fail_next_submit(CallError::Rejected("User denied transaction signature.".into()));

    let outcome = fixture.mirror.make_payment("0.01").await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.hash, None);
    assert_eq!(outcome.error.as_deref(), Some("User denied transaction signature."));
    assert_eq!(fixture.view_reads(), reads);
    assert_eq!(fixture.mirror.phase(), TxPhase::Failed);
    assert_eq!(fixture.mirror.last_error(), outcome.error);
}

#[tokio::test]
async fn reverted_receipt_is_failed_outcome() {
    let fixture = Fixture::connected(BOB, ALICE).await;
    let reads = fixture.view_reads();
    fixture.contract.revert_next();

    let outcome = fixture.mirror.transfer_fee("0.01").await.unwrap();
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("reverted"));
    assert_eq!(fixture.view_reads(), reads);
    assert_eq!(fixture.mirror.snapshot().total_fees, ether("0.1"));
}

#[tokio::test]
async fn new_operation_clears_previous_error() {
    let fixture = Fixture::connected(BOB, ALICE).await;
    fixture.contract.fail_next_confirm(CallError::Failed("nonce too low".into()));
    assert!(!fixture.mirror.make_payment("0.01").await.unwrap().success);
    assert_eq!(fixture.mirror.last_error().as_deref(), Some("nonce too low"));

    assert!(fixture.mirror.make_payment("0.01").await.unwrap().success);
    assert_eq!(fixture.mirror.last_error(), None);
}

#[tokio::test]
async fn withdraw_requires_owner() {
    let fixture = Fixture::connected(BOB, ALICE).await;
    let owner_reads = fixture.contract.read_count("owner");

    let err = fixture.mirror.withdraw().await.unwrap_err();
    assert_eq!(err, MirrorError::NotAuthorized);
    let err = fixture.mirror.update_treasury(BOB).await.unwrap_err();
    assert_eq!(err, MirrorError::NotAuthorized);

    assert!(fixture.contract.submitted().is_empty());
    assert_eq!(fixture.contract.read_count("owner"), owner_reads);
}

#[tokio::test]
async fn owner_withdraws_balance() {
    let fixture = Fixture::connected(ALICE, ALICE).await;

    let outcome = fixture.mirror.withdraw().await.unwrap();
    assert!(outcome.success);
    assert_eq!(fixture.contract.submitted(), [(ALICE, ContractCall::Withdraw)]);
    assert_eq!(fixture.mirror.snapshot().contract_balance, U256::ZERO);
    assert_eq!(fixture.mirror.operation(), Some(Operation::Withdrawal));
}

#[tokio::test]
async fn owner_updates_treasury() {
    let fixture = Fixture::connected(ALICE, ALICE).await;

    let outcome = fixture.mirror.update_treasury(BOB).await.unwrap();
    assert!(outcome.success);
    assert_eq!(fixture.mirror.treasury(), Some(BOB));
}

#[tokio::test]
async fn one_transaction_at_a_time() {
    let fixture = Fixture::connected(BOB, ALICE).await;
    let gate = fixture.contract.pause_confirmations();

    let mirror = fixture.mirror.clone();
    let pending = tokio::spawn(async move { mirror.make_payment("0.01").await });
    while fixture.mirror.phase() != TxPhase::Confirming {
        tokio::task::yield_now().await;
    }
    assert!(fixture.mirror.is_busy());

    let err = fixture.mirror.transfer_fee("0.01").await.unwrap_err();
    assert_eq!(err, MirrorError::Busy(Operation::Payment));

    gate.notify_one();
    let outcome = pending.await.unwrap().unwrap();
    assert!(outcome.success);
    assert!(!fixture.mirror.is_busy());
    assert_eq!(fixture.contract.submitted().len(), 1);
}

#[tokio::test]
async fn connecting_refreshes_then_checks_ownership() {
    let fixture = Fixture::new(ALICE, ALICE);
    fixture.manager.connect().await.unwrap();
    fixture.mirror.sync_session().await;

    assert_eq!(fixture.view_reads(), [1, 1, 1]);
    assert_eq!(fixture.contract.read_count("owner"), 1);
    assert!(fixture.mirror.is_owner());

    // unchanged session
    fixture.mirror.sync_session().await;
    assert_eq!(fixture.view_reads(), [1, 1, 1]);
    assert_eq!(fixture.contract.read_count("owner"), 1);
}

#[tokio::test]
async fn account_change_refreshes_and_rechecks_ownership() {
    let fixture = Fixture::connected(ALICE, ALICE).await;
    assert!(fixture.mirror.is_owner());

    fixture.wallet.change_accounts(vec![BOB]);
    fixture.manager.restore_session().await;
    // stale until recomputed
    assert!(!fixture.mirror.is_owner());

    fixture.mirror.sync_session().await;
    assert!(!fixture.mirror.is_owner());
    assert_eq!(fixture.contract.read_count("owner"), 2);
    assert_eq!(fixture.view_reads(), [2, 2, 2]);
}

#[tokio::test]
async fn chain_change_refreshes_snapshot() {
    let fixture = Fixture::connected(ALICE, ALICE).await;
    assert_eq!(fixture.view_reads(), [1, 1, 1]);

    fixture.contract.set_totals(ether("2"), ether("0.2"), ether("1"));
    fixture.wallet.change_chain(1);
    fixture.manager.restore_session().await;
    fixture.mirror.sync_session().await;

    assert_eq!(fixture.view_reads(), [2, 2, 2]);
    assert_eq!(fixture.mirror.snapshot().total_payments, ether("2"));
    assert_eq!(fixture.contract.read_count("owner"), 2);
    assert!(fixture.mirror.is_owner());
}

#[tokio::test]
async fn disconnect_clears_ownership() {
    let fixture = Fixture::connected(ALICE, ALICE).await;
    assert!(fixture.mirror.is_owner());

    fixture.manager.disconnect();
    fixture.mirror.sync_session().await;
    assert!(!fixture.mirror.is_owner());
    assert_eq!(fixture.mirror.withdraw().await.unwrap_err(), MirrorError::NotAuthorized);
}

#[tokio::test]
async fn watcher_follows_session() {
    let fixture = Fixture::new(ALICE, ALICE);
    let _watcher = fixture.mirror.watch_session();

    fixture.manager.connect().await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !fixture.mirror.is_owner() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(fixture.mirror.snapshot().total_payments, ether("1.5"));

    fixture.manager.disconnect();
    tokio::time::timeout(Duration::from_secs(5), async {
        while fixture.contract.read_count("owner") < 1 || fixture.mirror.is_owner() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}
