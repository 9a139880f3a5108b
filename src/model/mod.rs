//! 台帳 API とやり取りするデータ転送オブジェクト

pub mod ledger;
pub mod ltc;
pub mod request;

pub use ledger::{OperationType, SubscriptionType, TransactionType};
pub use ltc::{LtcTx, LtcTxCoin, LtcTxInput, LtcTxOutput, LtcTxPrevout};
pub use request::TransactionFilter;
