//! Bitcoin Cash のアドレス
//!
//! CashAddr (`bitcoincash:q...`) とレガシー Base58Check の両形式を
//! `bitcoincash_addr` で読み書きし、P2PKH / P2SH のロックスクリプトと相互変換する。

use std::fmt;

use bitcoin::hashes::Hash;
use bitcoin::{PubkeyHash, PublicKey, Script, ScriptBuf, ScriptHash};
use bitcoincash_addr::{Address as EncodedAddress, HashType, Network as AddrNetwork, Scheme};

use crate::error::Error;
use crate::network::Network;
use crate::types::ScriptType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pub kind: ScriptType,
    pub hash: [u8; 20],
    pub network: Network,
}

impl Address {
    pub fn from_pubkey_hash(hash: [u8; 20], network: Network) -> Self {
        Address { kind: ScriptType::P2PKH, hash, network }
    }

    pub fn from_pubkey(public_key: &PublicKey, network: Network) -> Self {
        Self::from_pubkey_hash(public_key.pubkey_hash().to_byte_array(), network)
    }

    pub fn from_script_hash(hash: [u8; 20], network: Network) -> Self {
        Address { kind: ScriptType::P2SH, hash, network }
    }

    /// CashAddr (プレフィックス省略可、全大文字可) またはレガシー形式をデコードする。
    ///
    /// プレフィックス・バージョンバイトは `network` のものでなければならない。
    pub fn decode(address: &str, network: Network) -> Result<Self, Error> {
        let fail = |reason: String| Error::AddressDecode {
            address: address.to_string(),
            reason,
        };

        let decoded = EncodedAddress::decode(address)
            .or_else(|first_err| {
                // コーデックは小文字・プレフィックス付きの CashAddr しか読まないため正規化して再試行
                let mut candidate = if address.chars().any(|c| c.is_ascii_lowercase()) {
                    address.to_string()
                } else {
                    address.to_ascii_lowercase()
                };
                if !candidate.contains(':') {
                    candidate = format!("{}:{}", network.params().cashaddr_prefix, candidate);
                }
                EncodedAddress::decode(&candidate).map_err(|_| first_err)
            })
            .map_err(|(cash_err, base58_err)| {
                fail(format!("cashaddr: {:?}, base58: {:?}", cash_err, base58_err))
            })?;

        let network_matches = matches!(
            (network, &decoded.network, &decoded.scheme),
            (Network::Mainnet, AddrNetwork::Main, _)
                | (Network::Testnet, AddrNetwork::Test, _)
                | (Network::Regtest, AddrNetwork::Regtest, Scheme::CashAddr)
                | (Network::Regtest, AddrNetwork::Test, Scheme::Base58)
        );
        if !network_matches {
            return Err(fail(format!(
                "ネットワーク {} のアドレスではありません: {:?}",
                network, decoded.network
            )));
        }

        let kind = match decoded.hash_type {
            HashType::Key => ScriptType::P2PKH,
            HashType::Script => ScriptType::P2SH,
        };
        let hash: [u8; 20] = decoded
            .body
            .as_slice()
            .try_into()
            .map_err(|_| fail(format!("未対応のハッシュ長: {} bytes", decoded.body.len())))?;
        Ok(Address { kind, hash, network })
    }

    /// P2PKH / P2SH のロックスクリプトから支払先アドレスを復元する
    pub fn from_script(script: &Script, network: Network) -> Result<Self, Error> {
        let kind = ScriptType::from_script_buf(script)?;
        let bytes = script.as_bytes();
        // P2PKH: OP_DUP OP_HASH160 <20> ... / P2SH: OP_HASH160 <20> ...
        let start = match kind {
            ScriptType::P2PKH => 3,
            ScriptType::P2SH => 2,
        };
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&bytes[start..start + 20]);
        Ok(Address { kind, hash, network })
    }

    pub fn script_pubkey(&self) -> ScriptBuf {
        match self.kind {
            ScriptType::P2PKH => ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(self.hash)),
            ScriptType::P2SH => ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(self.hash)),
        }
    }

    pub fn to_cashaddr(&self) -> Result<String, Error> {
        self.encode(Scheme::CashAddr, self.network.cashaddr_network())
    }

    pub fn to_legacy(&self) -> Result<String, Error> {
        self.encode(Scheme::Base58, self.network.legacy_network())
    }

    fn encode(&self, scheme: Scheme, network: AddrNetwork) -> Result<String, Error> {
        let hash_type = match self.kind {
            ScriptType::P2PKH => HashType::Key,
            ScriptType::P2SH => HashType::Script,
        };
        EncodedAddress::new(self.hash.to_vec(), scheme, hash_type, network)
            .encode()
            .map_err(|e| Error::AddressEncode(format!("{:?}", e)))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_cashaddr() {
            Ok(encoded) => f.write_str(&encoded),
            Err(_) => write!(f, "{:?}:{}", self.kind, hex::encode(self.hash)),
        }
    }
}
