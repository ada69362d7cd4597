use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use thiserror::Error;

/// Mnemonic of the well-known development accounts, used when no other mnemonic is configured.
pub const DEFAULT_MNEMONIC: &str = "test test test test test test test test test test test junk";
/// BIP-44 prefix of the derived accounts; the account index is appended to it.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0";
pub const DEFAULT_ACCOUNT_COUNT: u32 = 10;
/// Public Infura project key, used when no own key is configured.
pub const DEFAULT_INFURA_KEY: &str = "9aa3d95b3bc440fa88ea12eaa4456161";

const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";
const LOCAL_GAS_LIMIT: u64 = 10_000_000;

/// Names of all networks with a built-in configuration.
pub const BUILTIN_NETWORKS: [&str; 7] = [
    "hardhat", "localhost", "local", "ropsten", "rinkeby", "harmony", "devnet",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown network `{0}` (provide an RPC URL to use a custom network)")]
    UnknownNetwork(String),

    #[error("account index {index} is outside of the {count} derived accounts")]
    AccountIndexOutOfRange { index: u32, count: u32 },

    #[error("cannot derive signer: {0}")]
    SignerDerivation(#[from] alloy_signer_local::LocalSignerError),
}

/// Infura project keys for the networks served through Infura.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct InfuraKeys {
    pub ropsten: String,
    pub rinkeby: String,
}

impl Default for InfuraKeys {
    fn default() -> Self {
        Self {
            ropsten: DEFAULT_INFURA_KEY.to_string(),
            rinkeby: DEFAULT_INFURA_KEY.to_string(),
        }
    }
}

/// How the deploying account is derived from a mnemonic.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AccountDerivation {
    pub mnemonic: String,
    pub path: String,
    pub initial_index: u32,
    pub count: u32,
}

impl AccountDerivation {
    pub fn new(mnemonic: impl Into<String>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            path: DEFAULT_DERIVATION_PATH.to_string(),
            initial_index: 0,
            count: DEFAULT_ACCOUNT_COUNT,
        }
    }

    /// Derive the `index`-th account (counted from `initial_index`).
    pub fn signer(&self, index: u32) -> Result<PrivateKeySigner, ConfigError> {
        let out_of_range = ConfigError::AccountIndexOutOfRange {
            index,
            count: self.count,
        };
        if index >= self.count {
            return Err(out_of_range);
        }
        let child = self.initial_index.checked_add(index).ok_or(out_of_range)?;

        let path = format!("{}/{child}", self.path);
        Ok(MnemonicBuilder::<English>::default()
            .phrase(self.mnemonic.as_str())
            .derivation_path(path)?
            .build()?)
    }
}

impl Default for AccountDerivation {
    fn default() -> Self {
        Self::new(DEFAULT_MNEMONIC)
    }
}

/// Everything needed to talk to one target network.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    /// Gas limit set on every creation transaction. `None` leaves estimation to the node.
    pub gas_limit: Option<u64>,
    pub accounts: AccountDerivation,
}

impl NetworkConfig {
    /// Built-in configuration of the network called `name`.
    pub fn lookup(
        name: &str,
        keys: &InfuraKeys,
        accounts: AccountDerivation,
    ) -> Result<Self, ConfigError> {
        let (rpc_url, gas_limit) = match name {
            "hardhat" | "localhost" | "local" => (LOCAL_RPC_URL.to_string(), Some(LOCAL_GAS_LIMIT)),
            "ropsten" => (format!("https://ropsten.infura.io/v3/{}", keys.ropsten), None),
            "rinkeby" => (format!("https://rinkeby.infura.io/v3/{}", keys.rinkeby), None),
            "harmony" => ("https://api.s0.b.hmny.io".to_string(), None),
            "devnet" => ("https://api.s0.ps.hmny.io/".to_string(), None),
            other => return Err(ConfigError::UnknownNetwork(other.to_string())),
        };

        Ok(Self {
            name: name.to_string(),
            rpc_url,
            gas_limit,
            accounts,
        })
    }

    /// A network outside of the built-in table, reachable at `rpc_url`.
    pub fn custom(name: &str, rpc_url: &str, accounts: AccountDerivation) -> Self {
        Self {
            name: name.to_string(),
            rpc_url: rpc_url.to_string(),
            gas_limit: None,
            accounts,
        }
    }

    /// All built-in networks, in table order.
    pub fn all(keys: &InfuraKeys, accounts: &AccountDerivation) -> Vec<Self> {
        BUILTIN_NETWORKS
            .iter()
            .filter_map(|name| Self::lookup(name, keys, accounts.clone()).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use assert2::{assert, let_assert};

    use super::*;

    #[test]
    fn local_networks_share_endpoint_and_gas_limit() {
        for name in ["hardhat", "localhost", "local"] {
            let config =
                NetworkConfig::lookup(name, &InfuraKeys::default(), Default::default()).unwrap();
            assert!(config.rpc_url == LOCAL_RPC_URL);
            assert!(config.gas_limit == Some(LOCAL_GAS_LIMIT));
        }
    }

    #[test]
    fn infura_networks_use_configured_keys() {
        let keys = InfuraKeys {
            ropsten: "r0".to_string(),
            rinkeby: "r1".to_string(),
        };

        let ropsten = NetworkConfig::lookup("ropsten", &keys, Default::default()).unwrap();
        let rinkeby = NetworkConfig::lookup("rinkeby", &keys, Default::default()).unwrap();

        assert!(ropsten.rpc_url == "https://ropsten.infura.io/v3/r0");
        assert!(rinkeby.rpc_url == "https://rinkeby.infura.io/v3/r1");
        assert!(ropsten.gas_limit.is_none());
    }

    #[test]
    fn unknown_network_is_rejected() {
        let_assert!(
            Err(ConfigError::UnknownNetwork(name)) =
                NetworkConfig::lookup("mainnet", &InfuraKeys::default(), Default::default())
        );
        assert!(name == "mainnet");
    }

    #[test]
    fn every_builtin_network_is_listed() {
        let all = NetworkConfig::all(&InfuraKeys::default(), &Default::default());
        let names = all.iter().map(|config| config.name.as_str()).collect::<Vec<_>>();
        assert!(names == BUILTIN_NETWORKS);
    }

    #[test]
    fn default_mnemonic_derives_development_accounts() {
        let accounts = AccountDerivation::default();

        assert!(
            accounts.signer(0).unwrap().address()
                == address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        assert!(
            accounts.signer(1).unwrap().address()
                == address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }

    #[test]
    fn account_index_is_bounded_by_count() {
        let_assert!(
            Err(ConfigError::AccountIndexOutOfRange { index: 10, count: 10 }) =
                AccountDerivation::default().signer(10)
        );
    }

    #[test]
    fn derivation_index_overflow_is_out_of_range() {
        let accounts = AccountDerivation {
            initial_index: u32::MAX,
            ..AccountDerivation::default()
        };

        let_assert!(
            Err(ConfigError::AccountIndexOutOfRange { index: 1, .. }) = accounts.signer(1)
        );
    }

    #[test]
    fn initial_index_shifts_derived_accounts() {
        let accounts = AccountDerivation {
            initial_index: 1,
            ..AccountDerivation::default()
        };

        assert!(
            accounts.signer(0).unwrap().address()
                == address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }
}
