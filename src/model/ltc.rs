//! ブロックチェーン API が返す Litecoin トランザクション

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LtcTx {
    pub hash: String,
    /// SegWit トランザクションの場合のみ
    pub witness_hash: String,
    /// LTC 単位の手数料
    pub fee: String,
    pub rate: String,
    pub ps: u32,
    pub height: u32,
    /// ブロックハッシュ
    pub block: String,
    pub ts: u64,
    /// ブロック内の位置
    pub index: u32,
    pub version: u32,
    pub flag: u32,
    pub inputs: Vec<LtcTxInput>,
    pub outputs: Vec<LtcTxOutput>,
    pub locktime: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LtcTxInput {
    pub prevout: LtcTxPrevout,
    pub script: String,
    pub witness: String,
    pub sequence: u32,
    pub coin: LtcTxCoin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LtcTxOutput {
    pub value: String,
    pub script: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LtcTxPrevout {
    pub hash: String,
    pub index: u32,
}

/// 入力が使用する出力
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LtcTxCoin {
    pub version: u32,
    pub height: u32,
    pub value: String,
    pub script: String,
    pub address: String,
    pub coinbase: bool,
}
