//! Shared clients and setup for every script.

use std::sync::Arc;

use crate::blockchain::{
    ensure_funded, load_account, Account, AccountAddress, AptosRestClient, BlockchainResult,
    EntryFunctionId, FaucetApi, HttpFaucetClient, NodeApi, TransactionSubmitter,
};
use crate::config::ScriptConfig;
use crate::resilience::{RetryPolicy, Sleeper, TokioSleeper};

/// Everything a script needs, constructed once and passed down.
#[derive(Clone)]
pub struct ScriptContext {
    pub config: ScriptConfig,
    pub node: Arc<dyn NodeApi>,
    pub faucet: Arc<dyn FaucetApi>,
    pub sleeper: Arc<dyn Sleeper>,
}

impl ScriptContext {
    pub fn new(
        config: ScriptConfig,
        node: Arc<dyn NodeApi>,
        faucet: Arc<dyn FaucetApi>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            config,
            node,
            faucet,
            sleeper,
        }
    }

    /// Build real HTTP clients from the configuration.
    pub fn connect(config: ScriptConfig) -> BlockchainResult<Self> {
        let node: Arc<dyn NodeApi> = Arc::new(AptosRestClient::new(&config.network)?);
        let faucet: Arc<dyn FaucetApi> =
            Arc::new(HttpFaucetClient::new(&config.network, node.clone())?);

        tracing::info!(
            node_url = %config.network.node_url,
            faucet_url = %config.network.faucet_url,
            contract = %config.contract.address,
            "Clients initialized"
        );

        Ok(Self::new(config, node, faucet, Arc::new(TokioSleeper)))
    }

    pub fn contract_address(&self) -> BlockchainResult<AccountAddress> {
        self.config.contract.address.parse()
    }

    /// `contract::module::function` for the configured module.
    pub fn contract_function(&self, function: &str) -> BlockchainResult<EntryFunctionId> {
        Ok(EntryFunctionId::new(
            self.contract_address()?,
            self.config.contract.module.clone(),
            function,
        ))
    }

    pub fn submitter(&self) -> TransactionSubmitter<'_> {
        TransactionSubmitter::new(
            self.node.as_ref(),
            self.sleeper.as_ref(),
            RetryPolicy::from(self.config.retries.clone()),
            self.config.gas.clone(),
        )
    }

    /// Load the signing account and top it up if needed.
    ///
    /// `default_amount` is the script's own top-up size; `funding.amount`
    /// in the config overrides it.
    pub async fn prepare_account(
        &self,
        explicit_key: Option<&str>,
        default_amount: u64,
    ) -> BlockchainResult<Account> {
        let loaded = load_account(explicit_key, &self.config.account)?;
        let account = loaded.account;
        let amount = self.config.funding.amount.unwrap_or(default_amount);

        tracing::info!(address = %account.address(), source = ?loaded.source, "Using account");
        ensure_funded(
            self.node.as_ref(),
            self.faucet.as_ref(),
            account.address(),
            amount,
        )
        .await?;

        Ok(account)
    }
}
