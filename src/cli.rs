use clap::Parser;
use std::path::PathBuf;

use bcash_ledger_sdk::config::SignRequest;
use bcash_ledger_sdk::{Error, Network};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// 署名リクエストを記述したJSONファイルへのパス
    #[clap(short, long, value_parser)]
    pub input_file: PathBuf,

    /// 生成されたraw transaction hexを保存するファイルへのパス
    #[clap(short, long, value_parser)]
    pub output_file: Option<PathBuf>,

    /// 使用するネットワーク ("mainnet", "testnet", "regtest")。リクエストの指定より優先
    #[clap(short, long, value_parser)]
    pub network: Option<String>,
}

/// CLI 指定 > リクエストファイル > testnet の順で決定する
pub fn resolve_network(args: &CliArgs, request: &SignRequest) -> Result<Network, Error> {
    match &args.network {
        Some(name) => name.parse(),
        None => Ok(request.network.unwrap_or(Network::Testnet)),
    }
}
