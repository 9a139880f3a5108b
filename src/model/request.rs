use serde::{Deserialize, Serialize};

use super::ledger::{OperationType, TransactionType};

/// 台帳トランザクションの検索条件。必須は `id` のみ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub id: String,
    /// 開始時刻 (UNIX time)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    /// 終了時刻 (UNIX time)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_type: Option<OperationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
}
