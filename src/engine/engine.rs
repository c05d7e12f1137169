use crate::engine::aggregate::{MAX, SUM};
use crate::error::{ClientRole, QueryError};
use crate::loader::Transactions;
use crate::ordered::{OrderedMap, OrderedSet};
use crate::transaction::{IssueId, Transaction, TransactionId};

use rust_decimal::Decimal;

/// Read-only query layer over a loaded snapshot.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    transactions: Transactions,
}

impl Engine {
    pub fn new(transactions: Transactions) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    pub fn transaction(&self, transaction_id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(transaction_id)
    }

    pub fn total_amount(&self) -> Decimal {
        SUM.apply(self.transactions.iter().map(|tx| tx.amount))
    }

    /// Sum of amounts sent by `sender`. Fails if `sender` never sent anything.
    pub fn total_amount_sent_by(&self, sender: &str) -> Result<Decimal, QueryError> {
        let mut found = false;
        let total = SUM.apply(
            self.transactions
                .iter()
                .filter(|tx| tx.sender_name == sender)
                .inspect(|_| found = true)
                .map(|tx| tx.amount),
        );

        if !found {
            return Err(QueryError::NotFound {
                name: sender.to_string(),
                role: ClientRole::Sender,
            });
        }

        Ok(total)
    }

    pub fn max_amount(&self) -> Decimal {
        MAX.apply(self.transactions.iter().map(|tx| tx.amount))
    }

    /// Every name that appears as sender or beneficiary, in first-seen order.
    pub fn client_names(&self) -> OrderedSet<&str> {
        self.transactions
            .iter()
            .flat_map(|tx| [tx.sender_name.as_str(), tx.beneficiary_name.as_str()])
            .collect()
    }

    pub fn count_unique_clients(&self) -> usize {
        self.client_names().len()
    }

    /// Whether any transaction `client` sent or received has an unsolved issue.
    /// Fails if `client` appears on no transaction at all.
    pub fn has_open_compliance_issues(&self, client: &str) -> Result<bool, QueryError> {
        let mut found = false;
        let mut open = false;

        for tx in self.transactions.iter().filter(|tx| tx.involves(client)) {
            found = true;
            if tx.has_unsolved_issue() {
                open = true;
                break;
            }
        }

        if !found {
            return Err(QueryError::NotFound {
                name: client.to_string(),
                role: ClientRole::Client,
            });
        }

        Ok(open)
    }

    pub fn transactions_by_beneficiary(&self) -> OrderedMap<&str, Vec<&Transaction>> {
        let mut index = OrderedMap::new();
        for tx in self.transactions.iter() {
            let (group, _) = index.get_or_insert_with(tx.beneficiary_name.as_str(), Vec::new);
            group.push(tx);
        }
        index
    }

    pub fn unsolved_issue_ids(&self) -> OrderedSet<IssueId> {
        self.transactions
            .iter()
            .flat_map(|tx| tx.issues.iter())
            .filter(|issue| !issue.solved)
            .map(|issue| issue.issue_id)
            .collect()
    }

    /// Messages of solved issues in encounter order. Repeated messages on
    /// different issues are all kept.
    pub fn solved_issue_messages(&self) -> Vec<&str> {
        self.transactions
            .iter()
            .flat_map(|tx| tx.issues.iter())
            .filter(|issue| issue.solved)
            .map(|issue| issue.message.as_str())
            .collect()
    }

    /// The `n` largest per-transaction amounts, descending. Equal amounts keep
    /// encounter order.
    pub fn top_amounts(&self, n: usize) -> Vec<Decimal> {
        let mut amounts: Vec<Decimal> = self.transactions.iter().map(|tx| tx.amount).collect();
        amounts.sort_by(|a, b| b.cmp(a));
        amounts.truncate(n);
        amounts
    }

    pub fn top_3_amounts(&self) -> Vec<Decimal> {
        self.top_amounts(3)
    }

    /// Sender with the largest summed amount. On a tie the sender seen first
    /// wins; `None` when there are no transactions.
    pub fn top_sender(&self) -> Option<&str> {
        let mut totals: OrderedMap<&str, Decimal> = OrderedMap::new();
        for tx in self.transactions.iter() {
            let (total, _) = totals.get_or_insert_with(tx.sender_name.as_str(), || SUM.identity);
            *total = (SUM.combine)(*total, tx.amount);
        }

        let mut best: Option<(&str, Decimal)> = None;
        for (&sender, &total) in totals.iter() {
            match best {
                Some((_, best_total)) if total <= best_total => {}
                _ => best = Some((sender, total)),
            }
        }

        best.map(|(sender, _)| sender)
    }
}
