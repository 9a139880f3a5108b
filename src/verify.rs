//! 署名済み入力のスクリプト検証
//!
//! アンロックスクリプトとロックスクリプトを `sv` のインタプリタで実行する。
//! プッシュのみ・low-S はインタプリタに渡す前にポリシーとして確認し、
//! FORKID の要求はチェッカーに渡す。

use std::ops::BitOr;

use bitcoin::script::Instruction;
use bitcoin::secp256k1::ecdsa;
use bitcoin::{Amount, Script, Transaction};
use sv::messages::Tx as SvTx;
use sv::script::op_codes::OP_CODESEPARATOR;
use sv::script::{Script as SvScript, TransactionChecker, NO_FLAGS};
use sv::transaction::sighash::SigHashCache;
use thiserror::Error;

use crate::sighash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptFlags(pub u32);

impl ScriptFlags {
    pub const NONE: ScriptFlags = ScriptFlags(0);
    /// 署名の S 値は曲線位数の半分以下
    pub const VERIFY_LOW_S: ScriptFlags = ScriptFlags(1 << 3);
    /// アンロックスクリプトはプッシュ命令のみ
    pub const VERIFY_SIG_PUSH_ONLY: ScriptFlags = ScriptFlags(1 << 5);
    /// FORKID ビットのない署名を拒否する
    pub const ENABLE_SIGHASH_FORKID: ScriptFlags = ScriptFlags(1 << 16);

    /// 標準ポリシーのフラグ
    pub const STANDARD: ScriptFlags = ScriptFlags(
        Self::VERIFY_LOW_S.0 | Self::VERIFY_SIG_PUSH_ONLY.0 | Self::ENABLE_SIGHASH_FORKID.0,
    );

    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("入力インデックス {input_index} が範囲外です (入力数 {input_count})")]
    InputIndex { input_index: usize, input_count: usize },

    #[error("アンロックスクリプトがプッシュのみで構成されていません")]
    SigScriptNotPushOnly,

    #[error("署名のエンコードが不正です")]
    InvalidSignatureEncoding,

    #[error("署名のS値が大きすぎます (low-S違反)")]
    HighS,

    #[error("トランザクションの変換に失敗しました: {0}")]
    Conversion(String),

    #[error("スクリプトの実行に失敗しました: {0}")]
    Eval(String),
}

/// 1つの入力と、それが使用するロックスクリプトの組
pub struct Engine<'a> {
    locking_script: &'a Script,
    tx: &'a Transaction,
    sv_tx: SvTx,
    input_index: usize,
    flags: ScriptFlags,
    satoshis: i64,
}

impl<'a> Engine<'a> {
    pub fn new(
        locking_script: &'a Script,
        tx: &'a Transaction,
        input_index: usize,
        flags: ScriptFlags,
        value: Amount,
    ) -> Result<Self, VerifyError> {
        if input_index >= tx.input.len() {
            return Err(VerifyError::InputIndex {
                input_index,
                input_count: tx.input.len(),
            });
        }
        let sv_tx = sighash::to_sv_tx(tx).map_err(|e| VerifyError::Conversion(e.to_string()))?;
        let satoshis = sighash::to_satoshis(value).map_err(|e| VerifyError::Conversion(e.to_string()))?;
        Ok(Engine { locking_script, tx, sv_tx, input_index, flags, satoshis })
    }

    pub fn execute(&self) -> Result<(), VerifyError> {
        let unlocking = &self.tx.input[self.input_index].script_sig;
        if self.flags.has_flag(ScriptFlags::VERIFY_SIG_PUSH_ONLY) && !unlocking.is_push_only() {
            return Err(VerifyError::SigScriptNotPushOnly);
        }
        if self.flags.has_flag(ScriptFlags::VERIFY_LOW_S) {
            check_low_s(unlocking)?;
        }

        let mut script = SvScript::new();
        script.append_slice(unlocking.as_bytes());
        script.append(OP_CODESEPARATOR);
        script.append_slice(self.locking_script.as_bytes());

        let mut sig_hash_cache = SigHashCache::new();
        let mut checker = TransactionChecker {
            tx: &self.sv_tx,
            sig_hash_cache: &mut sig_hash_cache,
            input: self.input_index,
            satoshis: self.satoshis,
            require_sighash_forkid: self.flags.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID),
        };
        script
            .eval(&mut checker, NO_FLAGS)
            .map_err(|e| VerifyError::Eval(e.to_string()))
    }
}

// 先頭のプッシュを <DER署名><sighashタイプ> として確認する
fn check_low_s(unlocking: &Script) -> Result<(), VerifyError> {
    let Some(Ok(Instruction::PushBytes(first))) = unlocking.instructions().next() else {
        return Ok(());
    };
    let Some((_, der)) = first.as_bytes().split_last() else {
        return Ok(());
    };
    let signature = ecdsa::Signature::from_der(der).map_err(|_| VerifyError::InvalidSignatureEncoding)?;
    let mut normalized = signature;
    normalized.normalize_s();
    if normalized != signature {
        return Err(VerifyError::HighS);
    }
    Ok(())
}
