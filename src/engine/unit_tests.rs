use crate::engine::engine::Engine;
use crate::error::{ClientRole, QueryError};
use crate::loader::load_json;
use crate::transaction::Transaction;
use rust_decimal::Decimal;
use std::str::FromStr;

const FIXTURE: &str = include_str!("../../tests/fixtures/transactions.json");

fn fixture_engine() -> Engine {
    Engine::new(load_json(FIXTURE).unwrap())
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[cfg(test)]
mod amount_tests {
    use super::*;

    #[test]
    fn test_total_amount() {
        assert_eq!(fixture_engine().total_amount(), dec("2889.17"));
    }

    #[test]
    fn test_total_amount_counts_merged_transaction_once() {
        let engine = fixture_engine();
        let merged = engine.transaction(1284564).unwrap();

        assert_eq!(engine.transactions().len(), 10);
        assert_eq!(merged.amount, dec("150.2"));
        assert_eq!(merged.issues.len(), 2);
    }

    #[test]
    fn test_total_amount_sent_by() {
        assert_eq!(
            fixture_engine().total_amount_sent_by("Grace Burgess"),
            Ok(dec("666.0"))
        );
    }

    #[test]
    fn test_total_amount_sent_by_not_found() {
        let result = fixture_engine().total_amount_sent_by("test_client");

        assert!(result.is_err());
        match result {
            Err(QueryError::NotFound { name, role }) => {
                assert_eq!(name, "test_client");
                assert_eq!(role, ClientRole::Sender);
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_max_amount() {
        assert_eq!(fixture_engine().max_amount(), dec("985.0"));
    }

    #[test]
    fn test_top_3_amounts() {
        assert_eq!(
            fixture_engine().top_3_amounts(),
            vec![dec("985.0"), dec("666.0"), dec("430.2")]
        );
    }

    #[test]
    fn test_top_sender() {
        assert_eq!(fixture_engine().top_sender(), Some("Arthur Shelby"));
    }
}

#[cfg(test)]
mod client_tests {
    use super::*;

    #[test]
    fn test_count_unique_clients() {
        assert_eq!(fixture_engine().count_unique_clients(), 14);
    }

    #[test]
    fn test_has_open_compliance_issues() {
        let engine = fixture_engine();

        assert_eq!(engine.has_open_compliance_issues("Grace Burgess"), Ok(true));
        assert_eq!(engine.has_open_compliance_issues("Michael Gray"), Ok(true));
        assert_eq!(engine.has_open_compliance_issues("Aunt Polly"), Ok(false));
        assert_eq!(engine.has_open_compliance_issues("Oswald Mosley"), Ok(false));
    }

    #[test]
    fn test_has_open_compliance_issues_not_found() {
        let result = fixture_engine().has_open_compliance_issues("test client");

        assert_eq!(
            result,
            Err(QueryError::NotFound {
                name: "test client".to_string(),
                role: ClientRole::Client,
            })
        );
    }

    #[test]
    fn test_transactions_by_beneficiary() {
        let engine = fixture_engine();
        let index = engine.transactions_by_beneficiary();

        let expected = Transaction::new(1284564, dec("150.2"), "Tom Shelby", "Arthur Shelby")
            .with_ages(22, 60)
            .with_issue(2, true, "Never gonna give you up")
            .with_issue(3, false, "Looks like money laundering");

        assert_eq!(index.len(), 10);
        assert_eq!(index.get(&"Arthur Shelby"), Some(&vec![&expected]));

        let tom: Vec<_> = index
            .get(&"Tom Shelby")
            .unwrap()
            .iter()
            .map(|tx| tx.sender_name.as_str())
            .collect();
        assert_eq!(tom, vec!["Ada Thorne"]);
    }
}

#[cfg(test)]
mod issue_tests {
    use super::*;

    #[test]
    fn test_unsolved_issue_ids() {
        assert_eq!(
            fixture_engine().unsolved_issue_ids().to_vec(),
            vec![1, 3, 15, 54, 99]
        );
    }

    #[test]
    fn test_solved_issue_messages() {
        assert_eq!(
            fixture_engine().solved_issue_messages(),
            vec![
                "Never gonna give you up",
                "Never gonna let you down",
                "Never gonna run around and desert you",
            ]
        );
    }

    #[test]
    fn test_solved_and_unsolved_partition_all_issues() {
        let engine = fixture_engine();
        let unsolved = engine.unsolved_issue_ids();

        let mut solved = Vec::new();
        let mut all = Vec::new();
        for tx in engine.transactions() {
            for issue in tx.issues.iter() {
                all.push(issue.issue_id);
                if issue.solved {
                    solved.push(issue.issue_id);
                }
            }
        }

        assert!(solved.iter().all(|id| !unsolved.contains(id)));
        assert_eq!(solved.len() + unsolved.len(), all.len());
    }
}

#[cfg(test)]
mod idempotence_tests {
    use super::*;

    #[test]
    fn test_queries_are_repeatable() {
        let engine = fixture_engine();

        assert_eq!(engine.total_amount(), engine.total_amount());
        assert_eq!(engine.top_sender(), engine.top_sender());
        assert_eq!(engine.unsolved_issue_ids(), engine.unsolved_issue_ids());
        assert_eq!(
            engine.transactions_by_beneficiary(),
            engine.transactions_by_beneficiary()
        );
        assert_eq!(engine.summary(&["Tom Shelby"]), engine.summary(&["Tom Shelby"]));
    }

    #[test]
    fn test_queries_from_several_threads() {
        let engine = fixture_engine();

        let (total, top) = std::thread::scope(|s| {
            let total = s.spawn(|| engine.total_amount());
            let top = s.spawn(|| engine.top_sender());
            (total.join().unwrap(), top.join().unwrap())
        });

        assert_eq!(total, dec("2889.17"));
        assert_eq!(top, Some("Arthur Shelby"));
    }
}
