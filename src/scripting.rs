//! トランザクションビルダーと UTXO スクリプト/ワイヤ形式ライブラリの境界
//!
//! [`TransactionBuilder`](crate::builder::TransactionBuilder) はこのトレイトの
//! 呼び出し順序だけを管理する。本番実装は [`BitcoinCashScripting`]。

use std::str::FromStr;

use bitcoin::hashes::Hash;
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::secp256k1::{All, Secp256k1};
use bitcoin::{Amount, PrivateKey, Script, ScriptBuf, Transaction, Txid};
use sv::transaction::generate_signature;
use sv::util::{Hash256, Serializable};

use crate::address::Address;
use crate::error::Error;
use crate::network::Network;
use crate::sighash;
use crate::types::PubkeyEncoding;
use crate::verify::{Engine, ScriptFlags};

pub trait UtxoScripting {
    type Address;
    type Credential;

    fn decode_address(&self, address: &str, network: Network) -> Result<Self::Address, Error>;

    fn pay_to_address_script(&self, address: &Self::Address) -> Result<ScriptBuf, Error>;

    fn parse_hash(&self, hash: &str) -> Result<Txid, Error>;

    fn decode_credential(&self, secret: &str, network: Network) -> Result<Self::Credential, Error>;

    /// `credential` で解除できるロックスクリプト
    fn credential_script(&self, credential: &Self::Credential, network: Network) -> Result<ScriptBuf, Error>;

    fn signature_script(
        &self,
        tx: &Transaction,
        input_index: usize,
        value: Amount,
        locking_script: &Script,
        hash_type: u8,
        credential: &Self::Credential,
    ) -> Result<ScriptBuf, Error>;

    /// `tx` の `input_index` 番目の入力に対してロックスクリプトを実行する
    fn verify_input(
        &self,
        locking_script: &Script,
        tx: &Transaction,
        input_index: usize,
        flags: ScriptFlags,
        value: Amount,
    ) -> Result<(), Error>;

    fn serialize(&self, tx: &Transaction) -> Result<Vec<u8>, Error>;
}

#[derive(Debug, Clone)]
pub struct BitcoinCashScripting {
    secp: Secp256k1<All>,
    pubkey_encoding: PubkeyEncoding,
}

impl BitcoinCashScripting {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
            pubkey_encoding: PubkeyEncoding::default(),
        }
    }

    /// 公開鍵のエンコード方式を指定する。既定は [`PubkeyEncoding::Uncompressed`]
    pub fn with_pubkey_encoding(mut self, encoding: PubkeyEncoding) -> Self {
        self.pubkey_encoding = encoding;
        self
    }

    pub fn set_pubkey_encoding(&mut self, encoding: PubkeyEncoding) {
        self.pubkey_encoding = encoding;
    }

    pub fn pubkey_encoding(&self) -> PubkeyEncoding {
        self.pubkey_encoding
    }
}

impl Default for BitcoinCashScripting {
    fn default() -> Self {
        Self::new()
    }
}

impl UtxoScripting for BitcoinCashScripting {
    type Address = Address;
    type Credential = PrivateKey;

    fn decode_address(&self, address: &str, network: Network) -> Result<Address, Error> {
        Address::decode(address, network)
    }

    fn pay_to_address_script(&self, address: &Address) -> Result<ScriptBuf, Error> {
        Ok(address.script_pubkey())
    }

    fn parse_hash(&self, hash: &str) -> Result<Txid, Error> {
        Txid::from_str(hash).map_err(|e| Error::HashParse {
            hash: hash.to_string(),
            reason: e.to_string(),
        })
    }

    fn decode_credential(&self, secret: &str, network: Network) -> Result<PrivateKey, Error> {
        let mut private_key = PrivateKey::from_wif(secret)?;
        let expected = network.params().wif_kind;
        if private_key.network != expected {
            return Err(Error::NetworkMismatch {
                expected: format!("{:?}", expected),
                found: format!("{:?}", private_key.network),
            });
        }
        // ロックスクリプトと署名スクリプトの両方がこのフラグに従う
        if self.pubkey_encoding == PubkeyEncoding::Uncompressed {
            private_key.compressed = false;
        }
        Ok(private_key)
    }

    fn credential_script(&self, credential: &PrivateKey, network: Network) -> Result<ScriptBuf, Error> {
        let public_key = credential.public_key(&self.secp);
        let address = Address::from_pubkey(&public_key, network);
        let script = self.pay_to_address_script(&address)?;
        log::debug!(
            "ロックスクリプト: {} (アドレス: {}, 圧縮公開鍵: {})",
            script.to_asm_string(),
            address,
            credential.compressed
        );
        Ok(script)
    }

    fn signature_script(
        &self,
        tx: &Transaction,
        input_index: usize,
        value: Amount,
        locking_script: &Script,
        hash_type: u8,
        credential: &PrivateKey,
    ) -> Result<ScriptBuf, Error> {
        let digest = sighash::signature_hash(tx, input_index, locking_script, value, hash_type)?;

        // DER署名 + sighash タイプ
        let sig_bytes = generate_signature(&credential.inner.secret_bytes(), &Hash256(digest.to_byte_array()), hash_type)
            .map_err(|e| Error::SignatureGeneration(format!("input {}: {}", input_index, e)))?;
        let sig_push = PushBytesBuf::try_from(sig_bytes)
            .map_err(|_| Error::SignatureGeneration(format!("署名のPushBytes変換失敗 (input {})", input_index)))?;

        let public_key = credential.public_key(&self.secp);
        Ok(Builder::new().push_slice(sig_push).push_key(&public_key).into_script())
    }

    fn verify_input(
        &self,
        locking_script: &Script,
        tx: &Transaction,
        input_index: usize,
        flags: ScriptFlags,
        value: Amount,
    ) -> Result<(), Error> {
        let engine = Engine::new(locking_script, tx, input_index, flags, value)?;
        engine.execute()?;
        Ok(())
    }

    /// セグウィット以前の形式。入力のないトランザクションにもマーカーは付かない
    fn serialize(&self, tx: &Transaction) -> Result<Vec<u8>, Error> {
        let sv_tx = sighash::to_sv_tx(tx)?;
        let mut buf = Vec::with_capacity(tx.total_size());
        sv_tx
            .write(&mut buf)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(buf)
    }
}
