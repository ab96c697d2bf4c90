use crate::error::Error;
use crate::models::category::{default_category, normalize_category_id};
use crate::models::transaction::{TransactionDraft, TransactionType};
use chrono::NaiveDate;

pub const ADD_FORMAT_HINT: &str = "date(YYYY-MM-DD, empty for today), description, amount, \
     type(income/expense), category(empty for default)";

/// Turns one line of user input into a transaction draft.
///
/// The line holds five comma separated fields:
/// `date, description, amount, type, category`. A description containing
/// commas can be wrapped in double quotes. The amount is left as text for
/// the store to validate.
pub fn parse_transaction_draft(input: &str, today: NaiveDate) -> Result<TransactionDraft, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(input.trim().as_bytes());

    let record = match reader.records().next() {
        Some(record) => record?,
        None => return Err(Error::invalid_input("No transaction details provided")),
    };

    if record.len() != 5 {
        return Err(Error::invalid_input(format!(
            "Invalid number of details provided. Expected 5 details separated by commas but got {}",
            record.len()
        )));
    }

    let date = match &record[0] {
        "" => today,
        raw => parse_iso_date(raw)?,
    };

    let transaction_type = record[3]
        .parse::<TransactionType>()
        .map_err(Error::InvalidInput)?;

    let category = match &record[4] {
        "" => default_category(transaction_type).id.to_string(),
        raw => normalize_category_id(raw),
    };

    Ok(TransactionDraft {
        transaction_type,
        amount: record[2].to_string(),
        description: record[1].to_string(),
        category,
        date,
    })
}

pub fn parse_iso_date(s: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::invalid_input(format!("Invalid date '{}'. Use YYYY-MM-DD.", s.trim())))
}
