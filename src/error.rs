use std::path::PathBuf;
use bitcoin::key::FromWifError as BitcoinKeyError; // WIFデコードエラー用
use thiserror::Error;

use crate::verify::VerifyError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSONパースエラー ファイル: {file_path:?}, 詳細: {source}")]
    JsonParse {
        file_path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("無効なネットワークが指定されました: {0}")]
    InvalidNetwork(String),

    #[error("アドレスのデコードに失敗しました ({address}): {reason}")]
    AddressDecode { address: String, reason: String },

    #[error("アドレスのエンコードに失敗しました: {0}")]
    AddressEncode(String),

    #[error("ロックスクリプトの導出に失敗しました: {0}")]
    ScriptDerivation(String),

    #[error("無効なトランザクションハッシュ形式 ({hash}): {reason}")]
    HashParse { hash: String, reason: String },

    #[error("秘密鍵(WIF)のデコードエラー: {0}")]
    CredentialDecode(#[from] BitcoinKeyError),

    #[error("ネットワーク不整合: 指定 ({expected}) vs WIF/アドレス ({found})")]
    NetworkMismatch { expected: String, found: String },

    #[error("署名スクリプトの生成に失敗しました: {0}")]
    SignatureGeneration(String),

    #[error("スクリプト検証エラー: {0}")]
    ScriptVerification(#[from] VerifyError),

    #[error("シリアライズエラー: {0}")]
    Serialization(String),

    #[error("入力インデックス {input_index} が範囲外です (入力数 {input_count})")]
    InputIndex {
        input_index: usize,
        input_count: usize,
    },

    #[error("トランザクションは既に署名済みです")]
    AlreadySigned,

    #[error("入力 {input_index} の署名処理に失敗しました: {source}")]
    Input {
        input_index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// 署名処理で失敗した入力のインデックス
    pub fn input_index(&self) -> Option<usize> {
        match self {
            Error::Input { input_index, .. } => Some(*input_index),
            _ => None,
        }
    }

    pub(crate) fn at_input(self, input_index: usize) -> Self {
        Error::Input {
            input_index,
            source: Box::new(self),
        }
    }
}
