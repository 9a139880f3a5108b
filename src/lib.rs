//! 台帳 API のクライアント SDK
//!
//! リクエスト/レスポンスのモデルと、Bitcoin Cash の送金トランザクションを
//! オフラインで署名・シリアライズするビルダーを提供する。
//!
//! ```no_run
//! use bcash_ledger_sdk::{Network, TransactionBuilder};
//!
//! # fn main() -> Result<(), bcash_ledger_sdk::Error> {
//! let mut builder = TransactionBuilder::new(Network::Testnet);
//! builder
//!     .add_output("bchtest:qr...", 100_000)?
//!     .add_input("4f0c...", 0, "cV...", 150_000)?;
//! let raw_hex = builder.sign()?.to_hex();
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod network;
pub mod scripting;
pub mod sighash;
pub mod types;
pub mod verify;

pub use address::Address;
pub use builder::TransactionBuilder;
pub use error::Error;
pub use network::{Network, NetworkParams};
pub use scripting::{BitcoinCashScripting, UtxoScripting};
pub use types::{BuilderState, PendingInput, PendingOutput, PubkeyEncoding, SignedTransaction};
