use crate::engine::aggregate::SUM;
use crate::engine::engine::Engine;
use crate::transaction::IssueId;

use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary<'a> {
    pub transaction_count: usize,
    pub total_amount: Decimal,
    pub max_amount: Decimal,
    pub unique_clients: usize,
    pub unsolved_issue_ids: Vec<IssueId>,
    pub solved_issue_messages: Vec<&'a str>,
    pub top_amounts: Vec<Decimal>,
    pub top_sender: Option<&'a str>,
    pub clients: Vec<ClientSummary<'a>>,
}

/// Per-client figures. A `None` means the name was not found in that role.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary<'a> {
    pub name: &'a str,
    pub total_sent: Option<Decimal>,
    pub has_open_issues: Option<bool>,
}

impl<'a> Summary<'a> {
    /// Names from the client list that appear on no transaction at all.
    pub fn unknown_clients(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.clients
            .iter()
            .filter(|client| client.has_open_issues.is_none())
            .map(|client| client.name)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

#[derive(Debug, Serialize)]
struct BeneficiaryRow<'a> {
    beneficiary: &'a str,
    transactions: usize,
    total_amount: Decimal,
}

impl Engine {
    pub fn summary<'a>(&'a self, clients: &[&'a str]) -> Summary<'a> {
        Summary {
            transaction_count: self.transactions().len(),
            total_amount: self.total_amount(),
            max_amount: self.max_amount(),
            unique_clients: self.count_unique_clients(),
            unsolved_issue_ids: self.unsolved_issue_ids().to_vec(),
            solved_issue_messages: self.solved_issue_messages(),
            top_amounts: self.top_3_amounts(),
            top_sender: self.top_sender(),
            clients: clients
                .iter()
                .map(|&name| ClientSummary {
                    name,
                    total_sent: self.total_amount_sent_by(name).ok(),
                    has_open_issues: self.has_open_compliance_issues(name).ok(),
                })
                .collect(),
        }
    }

    pub fn write_summary<W: Write>(&self, clients: &[&str], writer: W) -> serde_json::Result<()> {
        self.summary(clients).write_json(writer)
    }

    /// CSV with one row per beneficiary: `beneficiary,transactions,total_amount`.
    pub fn write_beneficiaries<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        for (&beneficiary, txs) in self.transactions_by_beneficiary().iter() {
            wtr.serialize(BeneficiaryRow {
                beneficiary,
                transactions: txs.len(),
                total_amount: SUM.apply(txs.iter().map(|tx| tx.amount)),
            })?;
        }

        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Transactions;
    use crate::transaction::Transaction;
    use std::str::FromStr;

    fn sample_engine() -> Engine {
        Engine::new(
            Transactions::try_from(vec![
                Transaction::new(1, Decimal::from(100), "Tom Shelby", "Alfie Solomons")
                    .with_issue(1, false, "Looks like money laundering"),
                Transaction::new(
                    2,
                    Decimal::from_str("42.0001").unwrap(),
                    "Aunt Polly",
                    "Alfie Solomons",
                )
                .with_issue(2, true, "Never gonna give you up"),
                Transaction::new(3, Decimal::from(200), "Tom Shelby", "Ben Younger"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_summary_clients_not_found_are_none() {
        let engine = sample_engine();
        let summary = engine.summary(&["Tom Shelby", "Alfie Solomons", "Nobody"]);

        assert_eq!(
            summary.clients,
            vec![
                ClientSummary {
                    name: "Tom Shelby",
                    total_sent: Some(Decimal::from(300)),
                    has_open_issues: Some(true),
                },
                ClientSummary {
                    name: "Alfie Solomons",
                    total_sent: None,
                    has_open_issues: Some(true),
                },
                ClientSummary {
                    name: "Nobody",
                    total_sent: None,
                    has_open_issues: None,
                },
            ]
        );
        assert_eq!(summary.top_sender, Some("Tom Shelby"));
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.unknown_clients().collect::<Vec<_>>(), vec!["Nobody"]);
    }

    #[test]
    fn test_write_summary_output() {
        let engine = sample_engine();

        let mut buf = Vec::new();
        engine.write_summary(&[], &mut buf).unwrap();
        let output: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(output["transactionCount"], 3);
        assert_eq!(output["uniqueClients"], 4);
        assert_eq!(output["unsolvedIssueIds"], serde_json::json!([1]));
        assert_eq!(output["topSender"], "Tom Shelby");
    }

    #[test]
    fn test_write_beneficiaries_output() {
        let engine = sample_engine();

        let mut buf = Vec::new();
        engine.write_beneficiaries(&mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.starts_with("beneficiary,transactions,total_amount\n"));
        assert!(output.contains("Alfie Solomons,2,142.0001"));
        assert!(output.contains("Ben Younger,1,200"));
    }
}
