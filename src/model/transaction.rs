use std::str::FromStr;

use money2::{Currency, Money};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Successful,
    Other(String),
}

impl From<&str> for TransactionStatus {
    fn from(value: &str) -> Self {
        match value {
            "Successful" => TransactionStatus::Successful,
            other => TransactionStatus::Other(other.to_owned()),
        }
    }
}

/// A transaction as served by the account service. The currency code is kept
/// raw since the service may hand back codes the money layer does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub status: TransactionStatus,
    pub currency: String,
    pub amount: Decimal,
}

impl Transaction {
    /// Only settled transactions in the home currency can fund a donation.
    pub fn is_eligible(&self, home: Currency) -> bool {
        self.status == TransactionStatus::Successful
            && Currency::from_str(&self.currency).is_ok_and(|currency| currency == home)
    }

    /// The distance from the amount to the next whole currency unit, exact to
    /// two decimal places. `None` means the transaction is not eligible, which
    /// is a valid terminal outcome rather than an error. A whole-unit amount
    /// yields a zero round-up, which is still eligible.
    pub fn round_up(&self, home: Currency) -> Option<Money> {
        if !self.is_eligible(home) {
            return None;
        }

        let amount = self.amount.round_dp(2);
        Some(Money {
            amount: (amount.ceil() - amount).round_dp(2),
            currency: home,
        })
    }
}
