use bitcoin::absolute::LockTime;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness};

use crate::address::Address;
use crate::error::Error;
use crate::network::Network;
use crate::scripting::{BitcoinCashScripting, UtxoScripting};
use crate::sighash::SIGHASH_ALL_FORKID;
use crate::types::{BuilderState, PendingInput, PendingOutput, PubkeyEncoding, SignedTransaction};
use crate::verify::ScriptFlags;

/// Bitcoin Cash の送金トランザクションを組み立て、署名し、シリアライズする
///
/// `pending_inputs[i]` は常に `tx.input[i]` に対応する。
pub struct TransactionBuilder<S: UtxoScripting = BitcoinCashScripting> {
    scripting: S,
    network: Network,
    tx: Transaction,
    pending_inputs: Vec<PendingInput>,
    pending_outputs: Vec<PendingOutput>,
    verify: bool,
    state: BuilderState,
}

impl TransactionBuilder<BitcoinCashScripting> {
    pub fn new(network: Network) -> Self {
        Self::with_scripting(network, BitcoinCashScripting::new())
    }

    /// 署名鍵の公開鍵エンコードを切り替える。既定は非圧縮
    pub fn pubkey_encoding(&mut self, encoding: PubkeyEncoding) -> &mut Self {
        self.scripting.set_pubkey_encoding(encoding);
        self
    }
}

impl<S: UtxoScripting> TransactionBuilder<S> {
    pub fn with_scripting(network: Network, scripting: S) -> Self {
        TransactionBuilder {
            scripting,
            network,
            tx: Transaction {
                version: Version::ONE,
                lock_time: LockTime::ZERO,
                input: Vec::new(),
                output: Vec::new(),
            },
            pending_inputs: Vec::new(),
            pending_outputs: Vec::new(),
            verify: true,
            state: BuilderState::Initialized,
        }
    }

    /// [`sign`](Self::sign) 中のスクリプト検証を有効/無効にする
    pub fn verify_scripts(&mut self, enabled: bool) -> &mut Self {
        self.verify = enabled;
        self
    }

    /// `address` へ `amount` satoshi を支払う出力を追加する
    ///
    /// 金額 0 は拒否しない (ネットワークのルールに任せる)。
    /// エラー時、ビルダーは変更されない。
    pub fn add_output(&mut self, address: &str, amount: u64) -> Result<&mut Self, Error> {
        self.ensure_open()?;
        let script_pubkey = self
            .scripting
            .decode_address(address, self.network)
            .and_then(|decoded| self.scripting.pay_to_address_script(&decoded))
            .inspect_err(|e| log::warn!("出力を追加できませんでした: {}", e))?;

        let amount = Amount::from_sat(amount);
        self.tx.output.push(TxOut {
            value: amount,
            script_pubkey: script_pubkey.clone(),
        });
        self.pending_outputs.push(PendingOutput {
            address: address.to_string(),
            amount,
            script_pubkey,
        });
        self.state = BuilderState::Accumulating;
        log::debug!("出力追加: address={}, value={}", address, amount.to_sat());
        Ok(self)
    }

    /// `tx_hash` の `index` 番目の出力 (`amount` satoshi) を WIF 鍵
    /// `signing_secret` で使用する入力を追加する
    ///
    /// エラー時、ビルダーは変更されない。
    pub fn add_input(&mut self, tx_hash: &str, index: u32, signing_secret: &str, amount: u64) -> Result<&mut Self, Error> {
        self.ensure_open()?;
        let txid = self
            .scripting
            .parse_hash(tx_hash)
            .inspect_err(|e| log::warn!("入力を追加できませんでした: {}", e))?;

        self.tx.input.push(TxIn {
            previous_output: OutPoint::new(txid, index),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::new(),
        });
        self.pending_inputs.push(PendingInput {
            source_txid: txid,
            output_index: index,
            signing_secret: signing_secret.to_string(),
            input_value: Amount::from_sat(amount),
        });
        self.state = BuilderState::Accumulating;
        log::debug!("入力追加: txid={}, vout={}, value={}", txid, index, amount);
        Ok(self)
    }

    /// 全入力を順に署名し、シリアライズする
    ///
    /// 最初に失敗した入力で処理全体を中断し、そのインデックスを
    /// [`Error::input_index`] で返す。結果に関わらず、以降ビルダーは終端状態になる。
    pub fn sign(&mut self) -> Result<SignedTransaction, Error> {
        self.ensure_open()?;
        self.state = BuilderState::Signed;
        log::info!("トランザクション署名処理を開始します。入力数: {}, 出力数: {}", self.tx.input.len(), self.tx.output.len());

        for input_index in 0..self.tx.input.len() {
            self.sign_input(input_index).map_err(|e| {
                log::error!("入力 {} の署名に失敗しました: {}", input_index, e);
                e.at_input(input_index)
            })?;
        }

        let bytes = self.scripting.serialize(&self.tx)?;
        log::info!("全ての入力の署名が完了しました。サイズ: {} bytes", bytes.len());
        Ok(SignedTransaction::new(bytes, self.tx.clone()))
    }

    fn sign_input(&mut self, input_index: usize) -> Result<(), Error> {
        let pending = &self.pending_inputs[input_index];
        let value = pending.input_value;
        let credential = self.scripting.decode_credential(&pending.signing_secret, self.network)?;
        let locking_script = self.scripting.credential_script(&credential, self.network)?;
        if let Ok(address) = Address::from_script(&locking_script, self.network) {
            log::debug!("入力 {} の支払元アドレス: {}", input_index, address);
        }

        let script_sig = self.scripting.signature_script(
            &self.tx,
            input_index,
            value,
            &locking_script,
            SIGHASH_ALL_FORKID,
            &credential,
        )?;
        self.tx.input[input_index].script_sig = script_sig;

        if self.verify {
            self.scripting
                .verify_input(&locking_script, &self.tx, input_index, ScriptFlags::STANDARD, value)?;
            log::debug!("入力 {} のスクリプト検証に成功しました。", input_index);
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), Error> {
        match self.state {
            BuilderState::Signed => Err(Error::AlreadySigned),
            _ => Ok(()),
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    pub fn input_count(&self) -> usize {
        self.tx.input.len()
    }

    pub fn output_count(&self) -> usize {
        self.tx.output.len()
    }

    pub fn inputs(&self) -> &[PendingInput] {
        &self.pending_inputs
    }

    pub fn outputs(&self) -> &[PendingOutput] {
        &self.pending_outputs
    }

    /// 組み立て中のトランザクション
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }
}
