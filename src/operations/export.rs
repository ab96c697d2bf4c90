use crate::error::Error;
use crate::models::transaction::Transaction;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub const EXPORT_HEADER: [&str; 5] = ["Date", "Type", "Category", "Description", "Amount"];
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Encodes `transactions` as CSV text in their current order.
///
/// Descriptions are always quoted, with embedded quotes doubled. Rows are
/// separated by `\n` and there is no trailing newline.
pub fn encode(transactions: &[Transaction]) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for transaction in transactions {
        let description = format!("\"{}\"", transaction.description.replace('"', "\"\""));
        writer.write_record([
            transaction.date.format("%Y-%m-%d").to_string(),
            transaction.transaction_type.to_string(),
            transaction.category.clone(),
            description,
            transaction.amount.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| Error::invalid_input(format!("Export is not valid UTF-8: {}", e)))?;
    Ok(text.trim_end_matches('\n').to_string())
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("budget-export-{}.csv", today.format("%Y-%m-%d"))
}

/// Writes the export for `today` into `dir`, replacing an earlier export of
/// the same day, and returns the file's path.
pub fn write_export(
    dir: &Path,
    transactions: &[Transaction],
    today: NaiveDate,
) -> Result<PathBuf, Error> {
    let contents = encode(transactions)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(today));
    fs::write(&path, contents)?;
    tracing::info!(
        "Exported {} transactions to {} ({})",
        transactions.len(),
        path.display(),
        EXPORT_MIME_TYPE
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionType;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    fn create_test_transaction(description: &str, amount: Decimal) -> Transaction {
        Transaction::new(
            "1".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
            description.to_string(),
            amount,
            TransactionType::Expense,
            "food".to_string(),
        )
    }

    #[test]
    fn test_encode_empty_is_header_only() {
        assert_eq!(encode(&[]).unwrap(), "Date,Type,Category,Description,Amount");
    }

    #[test]
    fn test_encode_rows_in_iteration_order() {
        let mut income = create_test_transaction("Pay", Decimal::new(1000, 0));
        income.transaction_type = TransactionType::Income;
        income.category = "salary".to_string();
        income.date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let expense = create_test_transaction("Food", Decimal::new(20050, 2));

        let csv = encode(&[expense, income]).unwrap();
        assert_eq!(
            csv,
            "Date,Type,Category,Description,Amount\n\
             2024-01-16,expense,food,\"Food\",200.50\n\
             2024-01-15,income,salary,\"Pay\",1000"
        );
    }

    #[test]
    fn test_encode_quotes_commas_and_quotes() {
        let transaction = create_test_transaction("Dinner, \"fancy\"", Decimal::new(42, 0));
        let csv = encode(&[transaction]).unwrap();
        assert!(csv.ends_with("food,\"Dinner, \"\"fancy\"\"\",42"));
    }

    #[test]
    fn test_export_file_name() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_file_name(today), "budget-export-2025-03-07.csv");
    }

    #[test]
    fn test_write_export() {
        let dir = tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let transactions = vec![create_test_transaction("Lunch", Decimal::new(12, 0))];

        let path = write_export(dir.path(), &transactions, today).unwrap();
        assert_eq!(path, dir.path().join("budget-export-2025-03-07.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), encode(&transactions).unwrap());
    }
}
