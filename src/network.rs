use std::fmt;
use std::str::FromStr;

use bitcoin::NetworkKind;
use bitcoincash_addr::Network as AddrNetwork;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// アドレス・WIF のエンコード規則を決めるネットワークパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    pub name: &'static str,
    /// CashAddr のプレフィックス (コロンなし)
    pub cashaddr_prefix: &'static str,
    /// WIF 秘密鍵が属するべきネットワーク種別
    pub wif_kind: NetworkKind,
}

pub const MAINNET_PARAMS: NetworkParams = NetworkParams {
    name: "mainnet",
    cashaddr_prefix: "bitcoincash",
    wif_kind: NetworkKind::Main,
};

pub const TESTNET_PARAMS: NetworkParams = NetworkParams {
    name: "testnet",
    cashaddr_prefix: "bchtest",
    wif_kind: NetworkKind::Test,
};

pub const REGTEST_PARAMS: NetworkParams = NetworkParams {
    name: "regtest",
    cashaddr_prefix: "bchreg",
    wif_kind: NetworkKind::Test,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    pub fn params(self) -> &'static NetworkParams {
        match self {
            Network::Mainnet => &MAINNET_PARAMS,
            Network::Testnet => &TESTNET_PARAMS,
            Network::Regtest => &REGTEST_PARAMS,
        }
    }

    /// CashAddr コーデック側のネットワーク
    pub(crate) fn cashaddr_network(self) -> AddrNetwork {
        match self {
            Network::Mainnet => AddrNetwork::Main,
            Network::Testnet => AddrNetwork::Test,
            Network::Regtest => AddrNetwork::Regtest,
        }
    }

    /// レガシー形式のネットワーク。regtest は testnet と同じバージョンバイトを使う
    pub(crate) fn legacy_network(self) -> AddrNetwork {
        match self {
            Network::Mainnet => AddrNetwork::Main,
            Network::Testnet | Network::Regtest => AddrNetwork::Test,
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "bitcoincash" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" | "chipnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(Error::InvalidNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.params().name)
    }
}
