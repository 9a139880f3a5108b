use bitcoin::hashes::{sha256d, Hash};
use bitcoin::{Amount, Script, ScriptBuf, Transaction, Txid};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScriptType {
    P2PKH,
    P2SH,
}

impl ScriptType {
    pub fn from_script_buf(script: &Script) -> Result<Self, Error> {
        if script.is_p2pkh() {
            Ok(ScriptType::P2PKH)
        } else if script.is_p2sh() {
            Ok(ScriptType::P2SH)
        } else {
            Err(Error::ScriptDerivation(format!(
                "不明なスクリプトタイプ: {}",
                script.to_hex_string()
            )))
        }
    }
}

/// これから使用する UTXO と、その署名に必要な情報
#[derive(Clone)]
pub struct PendingInput {
    pub source_txid: Txid,
    pub output_index: u32,
    pub(crate) signing_secret: String,
    pub input_value: Amount,
}

// 秘密鍵はログに出さない
impl std::fmt::Debug for PendingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingInput")
            .field("source_txid", &self.source_txid)
            .field("output_index", &self.output_index)
            .field("signing_secret", &"<redacted>")
            .field("input_value", &self.input_value)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOutput {
    pub address: String,
    pub amount: Amount,
    pub script_pubkey: ScriptBuf,
}

/// 署名鍵から公開鍵を導出するときのエンコード
///
/// 既定では WIF の圧縮フラグに関係なく非圧縮 (65 bytes) の公開鍵を使う。
/// ロックスクリプトの導出と署名スクリプトの両方に同じ方式が適用される。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PubkeyEncoding {
    #[default]
    Uncompressed,
    /// WIF の圧縮フラグに従う
    FollowWif,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuilderState {
    Initialized,
    Accumulating,
    /// 終端状態。以降の操作はすべて `Error::AlreadySigned` になる
    Signed,
}

/// 署名・シリアライズ済みのトランザクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    bytes: Vec<u8>,
    transaction: Transaction,
}

impl SignedTransaction {
    pub(crate) fn new(bytes: Vec<u8>, transaction: Transaction) -> Self {
        Self { bytes, transaction }
    }

    /// 小文字の16進数文字列
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn txid(&self) -> Txid {
        Txid::from_raw_hash(sha256d::Hash::hash(&self.bytes))
    }
}
