//! 本番バックエンドでの署名を端から端まで確認する

use bcash_ledger_sdk::verify::{Engine, ScriptFlags, VerifyError};
use bcash_ledger_sdk::{Address, Error, Network, PubkeyEncoding, TransactionBuilder};
use bitcoin::consensus::encode::deserialize;
use bitcoin::hashes::{sha256d, Hash};
use bitcoin::secp256k1::{ecdsa, Message, Secp256k1, SecretKey};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::{Amount, NetworkKind, PrivateKey, PublicKey, Transaction, TxOut};

const FUNDING_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
const OTHER_TXID: &str = "0e3e2357e806b6cdb1f70b54c3a3a17b6714ee1f0e68bebb44a74b1efd512098";

fn key(byte: u8) -> PrivateKey {
    PrivateKey::new(SecretKey::from_slice(&[byte; 32]).unwrap(), NetworkKind::Test)
}

fn public_key(private_key: &PrivateKey, encoding: PubkeyEncoding) -> PublicKey {
    let secp = Secp256k1::new();
    match encoding {
        PubkeyEncoding::Uncompressed => PublicKey::new_uncompressed(private_key.inner.public_key(&secp)),
        PubkeyEncoding::FollowWif => private_key.public_key(&secp),
    }
}

/// 既定の (非圧縮公開鍵の) 支払元アドレス
fn address_of(private_key: &PrivateKey) -> Address {
    Address::from_pubkey(&public_key(private_key, PubkeyEncoding::Uncompressed), Network::Testnet)
}

fn decode(hex_str: &str) -> Transaction {
    deserialize(&hex::decode(hex_str).unwrap()).unwrap()
}

fn verify_with_engine(tx: &Transaction, input_index: usize, spender: &PrivateKey, value: u64) -> Result<(), VerifyError> {
    let locking = address_of(spender).script_pubkey();
    let engine = Engine::new(&locking, tx, input_index, ScriptFlags::STANDARD, Amount::from_sat(value))?;
    engine.execute()
}

/// BIP-143 のプリイメージを `bitcoin` で作り、sighash ワードを 0x41 にして
/// secp256k1 で直接検証する
fn verify_independently(
    tx: &Transaction,
    input_index: usize,
    spender: &PrivateKey,
    encoding: PubkeyEncoding,
    value: u64,
) -> bool {
    let expected_key = public_key(spender, encoding);
    let locking = Address::from_pubkey(&expected_key, Network::Testnet).script_pubkey();

    let pushes: Vec<Vec<u8>> = tx.input[input_index]
        .script_sig
        .instructions()
        .map(|i| i.unwrap().push_bytes().unwrap().as_bytes().to_vec())
        .collect();
    assert_eq!(pushes.len(), 2);
    assert_eq!(pushes[1], expected_key.to_bytes());
    let (&hash_type, der) = pushes[0].split_last().unwrap();
    assert_eq!(hash_type, 0x41);

    let mut preimage = Vec::new();
    SighashCache::new(tx)
        .segwit_v0_encode_signing_data_to(
            &mut preimage,
            input_index,
            &locking,
            Amount::from_sat(value),
            EcdsaSighashType::All,
        )
        .unwrap();
    let body_len = preimage.len() - 4;
    preimage.truncate(body_len);
    preimage.extend_from_slice(&0x41u32.to_le_bytes());

    let message = Message::from_digest(sha256d::Hash::hash(&preimage).to_byte_array());
    let signature = ecdsa::Signature::from_der(der).unwrap();
    Secp256k1::new()
        .verify_ecdsa(&message, &signature, &expected_key.inner)
        .is_ok()
}

#[test]
fn signs_single_input_single_output() {
    let spender = key(0x11);
    let recipient = address_of(&key(0x22));

    let mut builder = TransactionBuilder::new(Network::Testnet);
    builder
        .add_output(&recipient.to_cashaddr().unwrap(), 100_000)
        .unwrap()
        .add_input(FUNDING_TXID, 0, &spender.to_wif(), 150_000)
        .unwrap();
    let signed = builder.sign().unwrap();

    let raw = signed.to_hex();
    assert!(!raw.is_empty());
    assert_eq!(raw, raw.to_lowercase());

    let tx = decode(&raw);
    assert_eq!(tx.input.len(), 1);
    assert_eq!(tx.output.len(), 1);
    assert_eq!(tx.output[0].value, Amount::from_sat(100_000));
    assert_eq!(tx.input[0].previous_output.txid.to_string(), FUNDING_TXID);
    assert_eq!(tx.input[0].previous_output.vout, 0);
    assert_eq!(Address::from_script(&tx.output[0].script_pubkey, Network::Testnet).unwrap(), recipient);
    assert_eq!(tx.compute_txid(), signed.txid());

    assert!(verify_independently(&tx, 0, &spender, PubkeyEncoding::Uncompressed, 150_000));
    verify_with_engine(&tx, 0, &spender, 150_000).unwrap();
}

#[test]
fn round_trips_multiple_inputs_and_outputs() {
    let first = key(0x31);
    let second = PrivateKey::new_uncompressed(key(0x32).inner, NetworkKind::Test);
    let pay_to = address_of(&key(0x41));
    let script_dest = Address::from_script_hash([0x5c; 20], Network::Testnet);

    let mut builder = TransactionBuilder::new(Network::Testnet);
    builder.add_output(&pay_to.to_legacy().unwrap(), 70_000).unwrap();
    builder.add_output(&script_dest.to_cashaddr().unwrap(), 20_000).unwrap();
    builder.add_input(FUNDING_TXID, 3, &first.to_wif(), 60_000).unwrap();
    builder.add_input(OTHER_TXID, 1, &second.to_wif(), 40_000).unwrap();
    let signed = builder.sign().unwrap();

    let tx = decode(&signed.to_hex());
    assert_eq!(tx.input.len(), 2);
    assert_eq!(tx.output.len(), 2);

    let prevouts: Vec<(String, u32)> = tx
        .input
        .iter()
        .map(|i| (i.previous_output.txid.to_string(), i.previous_output.vout))
        .collect();
    assert_eq!(prevouts, vec![(FUNDING_TXID.to_string(), 3), (OTHER_TXID.to_string(), 1)]);

    let outputs: Vec<(Address, Amount)> = tx
        .output
        .iter()
        .map(|o: &TxOut| (Address::from_script(&o.script_pubkey, Network::Testnet).unwrap(), o.value))
        .collect();
    assert_eq!(
        outputs,
        vec![(pay_to, Amount::from_sat(70_000)), (script_dest, Amount::from_sat(20_000))]
    );

    assert!(verify_independently(&tx, 0, &first, PubkeyEncoding::Uncompressed, 60_000));
    assert!(verify_independently(&tx, 1, &second, PubkeyEncoding::Uncompressed, 40_000));
    verify_with_engine(&tx, 0, &first, 60_000).unwrap();
    verify_with_engine(&tx, 1, &second, 40_000).unwrap();
}

#[test]
fn follow_wif_signs_with_compressed_key() {
    let spender = key(0x91);
    let mut builder = TransactionBuilder::new(Network::Testnet);
    builder.pubkey_encoding(PubkeyEncoding::FollowWif);
    builder.add_output(&address_of(&key(0x92)).to_cashaddr().unwrap(), 3_000).unwrap();
    builder.add_input(FUNDING_TXID, 5, &spender.to_wif(), 4_000).unwrap();
    let tx = decode(&builder.sign().unwrap().to_hex());

    assert!(verify_independently(&tx, 0, &spender, PubkeyEncoding::FollowWif, 4_000));
    // 非圧縮アドレスにロックされた UTXO は解除できない
    assert!(matches!(verify_with_engine(&tx, 0, &spender, 4_000), Err(VerifyError::Eval(_))));
}

#[test]
fn signature_does_not_verify_against_true_value() {
    let spender = key(0x51);
    let mut builder = TransactionBuilder::new(Network::Testnet);
    builder.add_output(&address_of(&key(0x52)).to_cashaddr().unwrap(), 100_000).unwrap();
    // 実際の UTXO は 150000 sats
    builder.add_input(FUNDING_TXID, 0, &spender.to_wif(), 140_000).unwrap();
    let tx = decode(&builder.sign().unwrap().to_hex());

    assert!(verify_independently(&tx, 0, &spender, PubkeyEncoding::Uncompressed, 140_000));
    assert!(!verify_independently(&tx, 0, &spender, PubkeyEncoding::Uncompressed, 150_000));
    verify_with_engine(&tx, 0, &spender, 140_000).unwrap();
    assert!(matches!(verify_with_engine(&tx, 0, &spender, 150_000), Err(VerifyError::Eval(_))));
}

#[test]
fn tampered_output_breaks_signature() {
    let spender = key(0x61);
    let mut builder = TransactionBuilder::new(Network::Testnet);
    builder.add_output(&address_of(&key(0x62)).to_cashaddr().unwrap(), 10_000).unwrap();
    builder.add_input(FUNDING_TXID, 2, &spender.to_wif(), 20_000).unwrap();
    let mut tx = decode(&builder.sign().unwrap().to_hex());

    tx.output[0].value = Amount::from_sat(19_000);
    assert!(!verify_independently(&tx, 0, &spender, PubkeyEncoding::Uncompressed, 20_000));
    assert!(matches!(verify_with_engine(&tx, 0, &spender, 20_000), Err(VerifyError::Eval(_))));
}

#[test]
fn malformed_address_adds_nothing() {
    let mut builder = TransactionBuilder::new(Network::Testnet);
    let result = builder.add_output("bchtest:this-is-not-valid", 100_000);
    assert!(matches!(result, Err(Error::AddressDecode { .. })));
    assert_eq!(builder.output_count(), 0);

    // 他ネットワークのアドレスも拒否される
    let mainnet = Address::from_pubkey_hash([1; 20], Network::Mainnet).to_cashaddr().unwrap();
    assert!(builder.add_output(&mainnet, 1).is_err());
    assert_eq!(builder.output_count(), 0);
}

#[test]
fn mainnet_key_on_testnet_fails_at_sign() {
    let mainnet_key = PrivateKey::new(SecretKey::from_slice(&[0x71; 32]).unwrap(), NetworkKind::Main);
    let mut builder = TransactionBuilder::new(Network::Testnet);
    builder.add_output(&address_of(&key(0x72)).to_cashaddr().unwrap(), 1_000).unwrap();
    builder.add_input(FUNDING_TXID, 0, &mainnet_key.to_wif(), 2_000).unwrap();

    let err = builder.sign().unwrap_err();
    assert_eq!(err.input_index(), Some(0));
    assert!(matches!(err, Error::Input { ref source, .. } if matches!(**source, Error::NetworkMismatch { .. })));
}

#[test]
fn second_sign_is_rejected() {
    let spender = key(0x81);
    let mut builder = TransactionBuilder::new(Network::Regtest);
    let regtest_addr = Address::from_pubkey(&public_key(&spender, PubkeyEncoding::Uncompressed), Network::Regtest);
    builder.add_output(&regtest_addr.to_cashaddr().unwrap(), 5_000).unwrap();
    builder.add_input(OTHER_TXID, 0, &spender.to_wif(), 6_000).unwrap();

    assert!(builder.sign().is_ok());
    assert!(matches!(builder.sign(), Err(Error::AlreadySigned)));
}
