use crate::error::Error;
use crate::models::category::find_category;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!(
                "Invalid transaction type '{}'. Use 'income' or 'expense'.",
                other
            )),
        }
    }
}

/// A single income or expense event. Never edited once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(
        id: String,
        date: NaiveDate,
        description: String,
        amount: Decimal,
        transaction_type: TransactionType,
        category: String,
    ) -> Self {
        Self {
            id,
            transaction_type,
            amount,
            description,
            category,
            date,
        }
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}

/// User input for a new transaction, not yet validated.
///
/// `amount` is kept as the raw text that was entered so that the store can
/// reject empty or malformed values.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub transaction_type: TransactionType,
    pub amount: String,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
}

impl TransactionDraft {
    /// Checks the draft and returns its parsed amount.
    pub fn validate(&self) -> Result<Decimal, Error> {
        let raw_amount = self.amount.trim();
        if raw_amount.is_empty() {
            return Err(Error::invalid_input("Amount cannot be empty"));
        }
        let amount = Decimal::from_str(raw_amount).map_err(|_| {
            Error::invalid_input(format!(
                "Invalid amount format {}. Please provide a valid decimal number.",
                raw_amount
            ))
        })?;
        if amount <= Decimal::ZERO {
            return Err(Error::invalid_input("Amount must be greater than zero"));
        }

        if self.description.trim().is_empty() {
            return Err(Error::invalid_input("Description cannot be empty"));
        }

        if find_category(self.transaction_type, &self.category).is_none() {
            return Err(Error::invalid_input(format!(
                "Unknown {} category '{}'",
                self.transaction_type, self.category
            )));
        }

        Ok(amount)
    }
}
