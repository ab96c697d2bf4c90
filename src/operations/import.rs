use super::add::parse_iso_date;
use crate::db::kv_store::KeyValueStore;
use crate::error::Error;
use crate::models::category::normalize_category_id;
use crate::models::transaction::{TransactionDraft, TransactionType};
use crate::operations::export::EXPORT_HEADER;
use crate::stores::transaction_store::TransactionStore;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Imports a CSV file in the export format into `store`.
///
/// Either every row is imported or none is. Returns the number of imported
/// transactions.
pub fn import_transactions<S: KeyValueStore>(
    store: &mut TransactionStore<S>,
    path: &Path,
) -> Result<usize, Error> {
    let file = File::open(path).map_err(|e| {
        Error::invalid_input(format!("Failed to open file '{}': {}", path.display(), e))
    })?;
    let drafts = read_drafts(file)?;
    let count = store.add_all(drafts)?;
    tracing::info!("Imported {count} transactions from {}", path.display());
    Ok(count)
}

fn read_drafts(input: impl Read) -> Result<Vec<TransactionDraft>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.iter().ne(EXPORT_HEADER.iter().copied()) {
        return Err(Error::invalid_input(format!(
            "Unexpected header. Expected {}",
            EXPORT_HEADER.join(",")
        )));
    }

    let mut drafts = Vec::new();
    for (index, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let record = result.map_err(|e| Error::invalid_input(format!("Line {}: {}", line, e)))?;
        let draft = parse_record(&record).map_err(|e| at_line(line, e))?;
        // Checked here as well as in the store so the line number can be reported.
        draft.validate().map_err(|e| at_line(line, e))?;
        drafts.push(draft);
    }

    Ok(drafts)
}

fn at_line(line: usize, error: Error) -> Error {
    match error {
        Error::InvalidInput(message) => Error::InvalidInput(format!("Line {}: {}", line, message)),
        other => other,
    }
}

fn parse_record(record: &csv::StringRecord) -> Result<TransactionDraft, Error> {
    if record.len() != EXPORT_HEADER.len() {
        return Err(Error::invalid_input(format!(
            "Invalid number of columns: expected {}, got {}",
            EXPORT_HEADER.len(),
            record.len()
        )));
    }

    Ok(TransactionDraft {
        date: parse_iso_date(&record[0])?,
        transaction_type: record[1]
            .parse::<TransactionType>()
            .map_err(Error::InvalidInput)?,
        category: normalize_category_id(&record[2]),
        description: record[3].to_string(),
        amount: record[4].to_string(),
    })
}
