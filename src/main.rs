use std::fs::File;
use std::io::Write;
use clap::Parser;

mod cli;

use bcash_ledger_sdk::config::SignRequest;
use bcash_ledger_sdk::{Error, TransactionBuilder};
use cli::{CliArgs, resolve_network};

fn main() -> Result<(), Error> {
    env_logger::init();

    let args = CliArgs::parse();
    log::info!("アプリケーションを開始します。引数: {:?}", args);

    let request = SignRequest::from_file(&args.input_file)?;
    log::debug!("入力数: {}, 出力数: {}", request.inputs.len(), request.outputs.len());

    let network = resolve_network(&args, &request)?;
    log::info!("指定されたネットワーク: {}", network);

    let mut builder = TransactionBuilder::new(network);
    builder.verify_scripts(request.verify).pubkey_encoding(request.pubkey_encoding);
    for output in &request.outputs {
        builder.add_output(&output.address, output.value_sats)?;
    }
    for input in &request.inputs {
        builder.add_input(&input.tx_hash, input.index, &input.private_key_wif, input.value_sats)?;
    }

    let signed_tx = builder.sign()?;
    log::info!("署名済みトランザクションの生成に成功しました。txid: {}", signed_tx.txid());

    let serialized_tx = signed_tx.to_hex();
    println!("{}", serialized_tx);

    if let Some(path) = &args.output_file {
        let mut output_file = File::create(path).map_err(|e| {
            log::error!("出力ファイルの作成に失敗しました: {:?}", path);
            Error::Io(e)
        })?;
        output_file.write_all(serialized_tx.as_bytes())?;
        log::info!("Raw transactionを {:?} に保存しました。", path);
    }

    log::info!("処理が正常に完了しました。");
    Ok(())
}
