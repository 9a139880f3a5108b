//! リプレイ保護 (FORKID) 付きの署名ハッシュ
//!
//! 使用する出力の金額までコミットする BIP-143 形式のダイジェストで、
//! 計算自体は `sv` の実装に任せる。ここでは `bitcoin` のトランザクションを
//! `sv` の形に写し、受け付ける sighash タイプを絞る。

use bitcoin::hashes::{sha256d, Hash};
use bitcoin::{Amount, Script, Transaction};
use sv::messages::{OutPoint as SvOutPoint, Tx as SvTx, TxIn as SvTxIn, TxOut as SvTxOut};
use sv::script::Script as SvScript;
use sv::transaction::sighash::{sighash, SigHashCache};
use sv::util::Hash256;

use crate::error::Error;

pub use sv::transaction::sighash::{SIGHASH_ALL, SIGHASH_FORKID};

/// このクレートが生成・受理する唯一の sighash タイプ (0x41)
pub const SIGHASH_ALL_FORKID: u8 = SIGHASH_ALL | SIGHASH_FORKID;

/// `input_index` の入力について ECDSA で署名するダイジェスト
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    value: Amount,
    sighash_type: u8,
) -> Result<sha256d::Hash, Error> {
    if input_index >= tx.input.len() {
        return Err(Error::InputIndex {
            input_index,
            input_count: tx.input.len(),
        });
    }
    // ANYONECANPAY (0x80) などの修飾ビットも受け付けない
    if sighash_type != SIGHASH_ALL_FORKID {
        return Err(Error::SignatureGeneration(format!(
            "未対応のsighashタイプ: 0x{:02x}",
            sighash_type
        )));
    }

    let sv_tx = to_sv_tx(tx)?;
    let satoshis = to_satoshis(value)?;
    let mut cache = SigHashCache::new();
    let digest = sighash(&sv_tx, input_index, script_code.as_bytes(), satoshis, sighash_type, &mut cache)
        .map_err(|e| Error::SignatureGeneration(e.to_string()))?;
    Ok(sha256d::Hash::from_byte_array(digest.0))
}

pub(crate) fn to_satoshis(value: Amount) -> Result<i64, Error> {
    i64::try_from(value.to_sat())
        .map_err(|_| Error::Serialization(format!("金額が大きすぎます: {}", value)))
}

/// `bitcoin` のトランザクションを `sv` のメッセージ型に写す
pub(crate) fn to_sv_tx(tx: &Transaction) -> Result<SvTx, Error> {
    let inputs = tx
        .input
        .iter()
        .map(|txin| SvTxIn {
            prev_output: SvOutPoint {
                hash: Hash256(txin.previous_output.txid.to_byte_array()),
                index: txin.previous_output.vout,
            },
            unlock_script: SvScript(txin.script_sig.to_bytes()),
            sequence: txin.sequence.0,
        })
        .collect();
    let outputs = tx
        .output
        .iter()
        .map(|txout| {
            Ok(SvTxOut {
                satoshis: to_satoshis(txout.value)?,
                lock_script: SvScript(txout.script_pubkey.to_bytes()),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(SvTx {
        version: tx.version.0 as u32,
        inputs,
        outputs,
        lock_time: tx.lock_time.to_consensus_u32(),
    })
}
