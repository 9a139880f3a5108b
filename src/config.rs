use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::network::Network;
use crate::types::PubkeyEncoding;

fn default_verify() -> bool {
    true
}

/// 署名リクエスト (JSON)
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    #[serde(default)]
    pub network: Option<Network>,
    pub inputs: Vec<InputDef>,
    pub outputs: Vec<OutputDef>,
    #[serde(default = "default_verify")]
    pub verify: bool,
    /// 省略時は非圧縮公開鍵
    #[serde(default)]
    pub pubkey_encoding: PubkeyEncoding,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InputDef {
    pub tx_hash: String,
    pub index: u32,
    pub private_key_wif: String,
    pub value_sats: u64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OutputDef {
    pub address: String,
    pub value_sats: u64,
}

impl SignRequest {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|e| {
            log::error!("入力ファイルの読み込みに失敗しました: {:?}", path);
            Error::Io(e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            log::error!("入力JSONのパースに失敗しました。");
            Error::JsonParse {
                file_path: path.to_path_buf(),
                source: e,
            }
        })
    }
}
