use crate::error::{LoadError, RecordError};
use crate::ordered::{Keyed, OrderedMap, Values};
use crate::transaction::{ParsedRecord, RawTransaction, Transaction, TransactionId};

use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Read-only snapshot of loaded transactions, in first-seen order.
///
/// The sum of absolute amounts always fits in a [`Decimal`], so no total,
/// per-sender or per-beneficiary sum over the snapshot can overflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transactions {
    items: OrderedMap<TransactionId, Transaction>,
    gross: Decimal,
}

impl Transactions {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> Values<'_, TransactionId, Transaction> {
        self.items.values()
    }

    pub fn get(&self, transaction_id: TransactionId) -> Option<&Transaction> {
        self.items.get(&transaction_id)
    }

    fn get_mut(&mut self, transaction_id: TransactionId) -> Option<&mut Transaction> {
        self.items.get_mut(&transaction_id)
    }

    /// Appends a transaction whose id is not present yet.
    fn push(&mut self, tx: Transaction) -> Result<(), RecordError> {
        self.gross = self
            .gross
            .checked_add(tx.amount.abs())
            .ok_or(RecordError::AmountOverflow)?;
        self.items.insert_if_absent(tx.key(), tx);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = Values<'a, TransactionId, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl TryFrom<Vec<Transaction>> for Transactions {
    type Error = LoadError;

    /// Builds a snapshot from already-merged transactions. Later duplicates of a
    /// transaction id are dropped.
    fn try_from(transactions: Vec<Transaction>) -> Result<Self, Self::Error> {
        let mut snapshot = Transactions::default();
        for (index, tx) in transactions.into_iter().enumerate() {
            if snapshot.get(tx.key()).is_none() {
                snapshot
                    .push(tx)
                    .map_err(|source| LoadError::InvalidRecord { index, source })?;
            }
        }
        Ok(snapshot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    /// Pick by file extension.
    #[default]
    Auto,
    Json,
    Csv,
}

/// Merges raw (transaction, issue) rows into one [`Transaction`] per id.
pub fn load<I>(records: I) -> Result<Transactions, LoadError>
where
    I: IntoIterator<Item = RawTransaction>,
{
    let mut merged = Transactions::default();
    let mut rows = 0;

    for (index, raw) in records.into_iter().enumerate() {
        rows += 1;
        let ParsedRecord { transaction, issue } = ParsedRecord::try_from(raw)
            .map_err(|source| LoadError::InvalidRecord { index, source })?;

        let id = transaction.key();
        match merged.get(id) {
            Some(existing) => {
                debug!(transaction_id = id, index, "Merging row into existing transaction");
                if !existing.same_details(&transaction) {
                    warn!(
                        transaction_id = id,
                        index, "Row disagrees with first sighting of transaction, keeping first"
                    );
                }
            }
            None => merged
                .push(transaction)
                .map_err(|source| LoadError::InvalidRecord { index, source })?,
        }

        if let (Some(issue), Some(entry)) = (issue, merged.get_mut(id)) {
            let issue_id = issue.issue_id;
            if !entry.issues.insert(issue) {
                debug!(transaction_id = id, issue_id, "Duplicate issue ignored");
            }
        }
    }

    info!(rows, transactions = merged.len(), "Loaded transactions");

    Ok(merged)
}

pub fn load_json(json: &str) -> Result<Transactions, LoadError> {
    let records: Vec<RawTransaction> = serde_json::from_str(json)?;
    load(records)
}

pub fn load_csv<R: Read>(reader: R) -> Result<Transactions, LoadError> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let amount_column = headers.iter().position(|header| header == "amount");

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let mut raw: RawTransaction = row.deserialize(Some(&headers))?;
        // csv hands untyped numbers over as f64; take the amount from its text
        if let Some(amount) = amount_column
            .and_then(|column| row.get(column))
            .and_then(parse_amount)
        {
            raw.amount = Some(amount);
        }
        records.push(raw);
    }

    load(records)
}

fn parse_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

pub fn load_file(path: &Path, format: SourceFormat) -> Result<Transactions, LoadError> {
    let format = match format {
        SourceFormat::Auto => format_from_extension(path)?,
        explicit => explicit,
    };
    debug!(path = %path.display(), ?format, "Reading transactions");

    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    match format {
        SourceFormat::Json => load_json(&fs::read_to_string(path).map_err(io_err)?),
        SourceFormat::Csv => load_csv(File::open(path).map_err(io_err)?),
        SourceFormat::Auto => unreachable!("format resolved above"),
    }
}

fn format_from_extension(path: &Path) -> Result<SourceFormat, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("json") => Ok(SourceFormat::Json),
        Some("csv") => Ok(SourceFormat::Csv),
        _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}
