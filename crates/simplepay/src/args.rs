use alloy_primitives::Address;
use clap::{Parser, Subcommand, ValueHint};
use simplepay_config::{
    CONFIG_FILE_NAME, Config, ExtractConfigError,
    figment::{
        self, Metadata, Profile,
        value::{Dict, Map, Value},
    },
};
use std::path::PathBuf;

/// Pay into the SimplePayment contract from your terminal.
#[derive(Debug, Parser)]
#[command(name = "simplepay", version, next_display_order = None)]
pub struct Cli {
    #[command(flatten)]
    pub opts: GlobalOpts,

    #[command(subcommand)]
    pub cmd: Command,
}

/// Options shared by every command. Values given here override the config file and environment.
#[derive(Clone, Debug, Default, Parser)]
pub struct GlobalOpts {
    /// The RPC endpoint.
    #[arg(long, global = true, env = "ETH_RPC_URL", value_hint = ValueHint::Url)]
    pub rpc_url: Option<String>,

    /// Sign with this private key instead of the endpoint's accounts.
    #[arg(long, global = true, value_name = "RAW_PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Address of the payment contract.
    #[arg(long, global = true, value_name = "ADDRESS")]
    pub contract: Option<Address>,

    /// Path to the config file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

impl GlobalOpts {
    /// Loads the config, with these options merged on top.
    pub fn load_config(&self) -> Result<Config, ExtractConfigError> {
        let file = self.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Config::from_provider(Config::figment_with_file(file).merge(self.clone()))
    }

    fn dict(&self) -> Dict {
        let mut dict = Dict::new();
        if let Some(url) = &self.rpc_url {
            dict.insert("rpc_url".into(), url.clone().into());
        }
        if let Some(contract) = self.contract {
            dict.insert("contract".into(), Value::from(contract.to_string()));
        }
        dict
    }
}

impl figment::Provider for GlobalOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("command-line options")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Map::from([(Profile::Default, self.dict())]))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the contract address, network and treasury.
    Info,

    /// Show the wallet connection and contract statistics.
    Status,

    /// Authorize an account and switch the wallet to the contract's network.
    Connect,

    /// Send a payment to the contract.
    #[command(visible_alias = "p")]
    Pay {
        /// Amount in ether, e.g. `0.01`.
        amount: String,
    },

    /// Transfer a fee to the treasury through the contract.
    Fee {
        /// Amount in ether, e.g. `0.001`.
        amount: String,
    },

    /// Withdraw the contract balance. Owner only.
    Withdraw,

    /// Change the treasury wallet. Owner only.
    SetTreasury {
        /// The new treasury address.
        treasury: Address,
    },

    /// Follow wallet and contract changes until interrupted.
    Watch,
}
