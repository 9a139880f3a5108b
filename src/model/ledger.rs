use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
    AccountBalanceLimit,
    OffchainWithdrawal,
    TransactionHistoryReport,
    AccountIncomingBlockchainTransaction,
    CompleteBlockchainTransaction,
}

impl SubscriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::AccountBalanceLimit => "ACCOUNT_BALANCE_LIMIT",
            SubscriptionType::OffchainWithdrawal => "OFFCHAIN_WITHDRAWAL",
            SubscriptionType::TransactionHistoryReport => "TRANSACTION_HISTORY_REPORT",
            SubscriptionType::AccountIncomingBlockchainTransaction => "ACCOUNT_INCOMING_BLOCKCHAIN_TRANSACTION",
            SubscriptionType::CompleteBlockchainTransaction => "COMPLETE_BLOCKCHAIN_TRANSACTION",
        }
    }
}

/// トランザクションが属する台帳操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Payment,
    Withdrawal,
    BlockchainTransaction,
    Exchange,
    Failed,
    Deposit,
    Mint,
    Revoke,
}

/// 台帳トランザクションの方向と目的
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Failed,
    DebitPayment,
    CreditPayment,
    CreditDeposit,
    DebitWithdrawal,
    CancelWithdrawal,
    DebitOutgoingPayment,
    CreditIncomingPayment,
    ExchangeBuy,
    ExchangeSell,
}
