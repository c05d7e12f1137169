use crate::error::RecordError;
use crate::ordered::{Keyed, KeyedSet};

use rust_decimal::Decimal;
use serde::Deserialize;

pub type TransactionId = u64;
pub type IssueId = u32;

/// A compliance flag raised against a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub issue_id: IssueId,
    pub solved: bool,
    pub message: String,
}

impl Keyed for Issue {
    type Key = IssueId;

    fn key(&self) -> IssueId {
        self.issue_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub amount: Decimal,
    pub sender_name: String,
    pub sender_age: Option<u32>,
    pub beneficiary_name: String,
    pub beneficiary_age: Option<u32>,
    pub issues: KeyedSet<Issue>,
}

impl Keyed for Transaction {
    type Key = TransactionId;

    fn key(&self) -> TransactionId {
        self.transaction_id
    }
}

/// One (transaction, issue) row as it appears in the source data.
///
/// Every field is optional so that shape problems surface as [`RecordError`]s
/// from the loader instead of opaque decoder failures.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(rename = "mtn")]
    pub transaction_id: Option<TransactionId>,
    /// JSON numbers are decoded from their literal digits, not through `f64`.
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub amount: Option<Decimal>,
    pub sender_full_name: Option<String>,
    pub sender_age: Option<u32>,
    pub beneficiary_full_name: Option<String>,
    pub beneficiary_age: Option<u32>,
    pub issue_id: Option<IssueId>,
    pub issue_solved: Option<bool>,
    pub issue_message: Option<String>,
}

/// A raw row split into its transaction part (with no issues yet) and the
/// issue it carries, if any.
#[derive(Debug, PartialEq)]
pub struct ParsedRecord {
    pub transaction: Transaction,
    pub issue: Option<Issue>,
}

impl TryFrom<RawTransaction> for ParsedRecord {
    type Error = RecordError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let transaction_id = raw
            .transaction_id
            .ok_or(RecordError::MissingField("mtn"))?;
        let amount = raw.amount.ok_or(RecordError::MissingField("amount"))?;
        let sender_name = raw
            .sender_full_name
            .ok_or(RecordError::MissingField("senderFullName"))?;
        let beneficiary_name = raw
            .beneficiary_full_name
            .ok_or(RecordError::MissingField("beneficiaryFullName"))?;

        // A bare `issueSolved` with no id and no message carries no issue.
        let issue = match (raw.issue_id, raw.issue_solved, raw.issue_message) {
            (Some(issue_id), Some(solved), Some(message)) => Some(Issue {
                issue_id,
                solved,
                message,
            }),
            (None, _, None) => None,
            _ => return Err(RecordError::PartialIssue),
        };

        Ok(ParsedRecord {
            transaction: Transaction {
                transaction_id,
                amount,
                sender_name,
                sender_age: raw.sender_age,
                beneficiary_name,
                beneficiary_age: raw.beneficiary_age,
                issues: KeyedSet::new(),
            },
            issue,
        })
    }
}

impl Transaction {
    pub fn new(
        transaction_id: TransactionId,
        amount: Decimal,
        sender_name: &str,
        beneficiary_name: &str,
    ) -> Self {
        Self {
            transaction_id,
            amount,
            sender_name: sender_name.to_string(),
            sender_age: None,
            beneficiary_name: beneficiary_name.to_string(),
            beneficiary_age: None,
            issues: KeyedSet::new(),
        }
    }

    pub fn with_ages(mut self, sender_age: u32, beneficiary_age: u32) -> Self {
        self.sender_age = Some(sender_age);
        self.beneficiary_age = Some(beneficiary_age);
        self
    }

    pub fn with_issue(mut self, issue_id: IssueId, solved: bool, message: &str) -> Self {
        self.issues.insert(Issue {
            issue_id,
            solved,
            message: message.to_string(),
        });
        self
    }

    pub fn involves(&self, name: &str) -> bool {
        self.sender_name == name || self.beneficiary_name == name
    }

    pub fn has_unsolved_issue(&self) -> bool {
        self.issues.iter().any(|issue| !issue.solved)
    }

    /// True when every field except the issue set matches.
    pub fn same_details(&self, other: &Transaction) -> bool {
        self.transaction_id == other.transaction_id
            && self.amount == other.amount
            && self.sender_name == other.sender_name
            && self.sender_age == other.sender_age
            && self.beneficiary_name == other.beneficiary_name
            && self.beneficiary_age == other.beneficiary_age
    }
}
