use crate::{
    args::{Command, GlobalOpts},
    ui::{ConnectionWidget, Footer, Header, InfoPanel, PaymentPanel, WithdrawPanel},
};
use alloy_primitives::Address;
use eyre::{Result, WrapErr};
use simplepay_config::Config;
use simplepay_contract::{ContractMirror, Operation, RpcPaymentContract, TransactionOutcome};
use simplepay_wallets::{RpcWalletProvider, WalletSessionManager, utils::create_private_key_signer};
use std::{sync::Arc, time::Duration};

/// The wired-up wallet session and contract mirror.
pub struct App {
    config: Config,
    provider: Arc<RpcWalletProvider>,
    wallet: Arc<WalletSessionManager>,
    mirror: Arc<ContractMirror>,
}

impl App {
    pub async fn new(opts: &GlobalOpts) -> Result<Self> {
        let config = opts.load_config()?;
        let signer = opts.private_key.as_deref().map(create_private_key_signer).transpose()?;
        let provider = RpcWalletProvider::connect(&config.rpc_url, signer)
            .await
            .wrap_err_with(|| format!("failed to connect to {}", config.rpc_url))?;
        let provider = Arc::new(provider);

        let contract = RpcPaymentContract::new(config.contract, provider.provider().clone());
        let wallet =
            Arc::new(WalletSessionManager::with_provider(provider.clone(), config.network.clone()));
        let mirror = Arc::new(ContractMirror::new(wallet.clone(), Arc::new(contract)));
        debug!(rpc_url = %config.rpc_url, contract = %config.contract, "initialized");

        Ok(Self { config, provider, wallet, mirror })
    }

    pub async fn run(self, cmd: Command) -> Result<()> {
        match cmd {
            Command::Info => {
                if let Err(err) = self.mirror.refresh().await {
                    debug!(%err, "failed to read contract state");
                }
                anstream::print!("{}\n{}", Header, self.info());
                anstream::print!("\n{}", Footer { network: &self.config.network });
                Ok(())
            }
            Command::Status => {
                self.wallet.restore_session().await;
                self.mirror.sync_session().await;
                anstream::print!("{}", self.status());
                Ok(())
            }
            Command::Connect => {
                self.connect().await?;
                anstream::print!("{}", self.status());
                Ok(())
            }
            Command::Pay { amount } => {
                self.connect().await?;
                let outcome = self.mirror.make_payment(&amount).await?;
                self.report(outcome)
            }
            Command::Fee { amount } => {
                self.connect().await?;
                let outcome = self.mirror.transfer_fee(&amount).await?;
                self.report(outcome)
            }
            Command::Withdraw => {
                self.connect().await?;
                let outcome = self.mirror.withdraw().await?;
                self.report(outcome)
            }
            Command::SetTreasury { treasury } => self.set_treasury(treasury).await,
            Command::Watch => self.watch().await,
        }
    }

    async fn connect(&self) -> Result<()> {
        if let Err(err) = self.wallet.connect().await {
            anstream::eprint!("{}", self.connection());
            return Err(err).wrap_err("failed to connect wallet");
        }
        self.mirror.sync_session().await;
        Ok(())
    }

    async fn set_treasury(&self, treasury: Address) -> Result<()> {
        self.connect().await?;
        let outcome = self.mirror.update_treasury(treasury).await?;
        anstream::print!("{}", self.info());
        outcome_result(outcome)
    }

    /// Prints the panels, then fails if the transaction did.
    fn report(&self, outcome: TransactionOutcome) -> Result<()> {
        anstream::print!("{}", self.status());
        outcome_result(outcome)
    }

    /// Follows provider events and polls the contract until interrupted, printing the status
    /// whenever it changes.
    async fn watch(&self) -> Result<()> {
        let interval = Duration::from_secs(self.config.chain_poll_interval.max(1));
        let _events = self.wallet.listen();
        let _chain = self.provider.watch_chain(interval);
        self.wallet.restore_session().await;
        let _sync = self.mirror.watch_session();

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut ticker = tokio::time::interval(interval);
        let mut last = String::new();
        loop {
            tokio::select! {
                _ = &mut ctrl_c => break,
                _ = ticker.tick() => {
                    if self.wallet.session().is_connected()
                        && let Err(err) = self.mirror.refresh().await
                    {
                        debug!(%err, "failed to refresh contract state");
                    }
                    let status = self.status();
                    if status != last {
                        anstream::println!("{status}");
                        last = status;
                    }
                }
            }
        }
        Ok(())
    }

    fn connection(&self) -> String {
        let error = self.wallet.last_error();
        ConnectionWidget {
            session: self.wallet.session(),
            connecting: self.wallet.is_connecting(),
            error: error.as_deref(),
            network: &self.config.network,
        }
        .to_string()
    }

    fn info(&self) -> String {
        InfoPanel {
            contract: self.mirror.contract_address(),
            treasury: self.mirror.treasury(),
            network: &self.config.network,
        }
        .to_string()
    }

    fn status(&self) -> String {
        let mirror = &self.mirror;
        let session = self.wallet.session();
        let snapshot = mirror.snapshot();
        let error = mirror.last_error();
        let outcome = mirror.last_outcome();
        let last = mirror.operation().zip(outcome.as_ref());
        let withdrawal = last.filter(|(op, _)| *op == Operation::Withdrawal).map(|(_, o)| o);

        let payments = PaymentPanel {
            connected: session.is_connected(),
            snapshot,
            phase: mirror.phase(),
            error: error.as_deref(),
            last,
            network: &self.config.network,
        };
        let withdraw = WithdrawPanel {
            connected: session.is_connected(),
            is_owner: mirror.is_owner(),
            balance: snapshot.contract_balance,
            last: withdrawal,
            network: &self.config.network,
        };
        format!("{}\n{payments}{withdraw}", self.connection())
    }
}

fn outcome_result(outcome: TransactionOutcome) -> Result<()> {
    match outcome.error {
        Some(error) if !outcome.success => eyre::bail!("transaction failed: {error}"),
        _ => Ok(()),
    }
}
