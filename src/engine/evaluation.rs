use crate::instrument::{ContractSpec, SyntheticContract};
use crate::portfolio::TradeLedger;
use chrono::NaiveDate;
use serde::Serialize;

//outcome of one evaluation run that did not hit a configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RunStatus {
    Completed,
    InsufficientHistory { available: usize, required: usize },
    //a spread leg had no positive price on the first shared date to fix the hedge ratio from
    UnanchoredSpread { date: NaiveDate },
}

//what an evaluator hands back: status, the contract to label results with, and the trades
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub strategy: &'static str,
    pub status: RunStatus,
    pub contract: ContractSpec,
    pub synthetic: Option<SyntheticContract>,
    ledger: TradeLedger,
}

impl Evaluation {
    pub fn completed(
        strategy: &'static str,
        contract: ContractSpec,
        synthetic: Option<SyntheticContract>,
        ledger: TradeLedger,
    ) -> Self {
        Evaluation {
            strategy,
            status: RunStatus::Completed,
            contract,
            synthetic,
            ledger,
        }
    }

    pub fn insufficient_history(
        strategy: &'static str,
        contract: ContractSpec,
        available: usize,
        required: usize,
    ) -> Self {
        Evaluation::skipped(
            strategy,
            contract,
            RunStatus::InsufficientHistory {
                available,
                required,
            },
        )
    }

    //a run the data did not allow, carries no trades
    pub fn skipped(strategy: &'static str, contract: ContractSpec, status: RunStatus) -> Self {
        Evaluation {
            strategy,
            status,
            contract,
            synthetic: None,
            ledger: TradeLedger::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }

    //the trades, only for a completed run
    pub fn ledger(&self) -> Option<&TradeLedger> {
        self.is_success().then_some(&self.ledger)
    }

    pub fn into_ledger(self) -> Option<TradeLedger> {
        self.is_success().then_some(self.ledger)
    }

    //name used when reporting this run
    pub fn label(&self) -> &str {
        &self.contract.shortcode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_run_hides_its_ledger() {
        let es = ContractSpec::new("ES", "S&P Equity index", 0.25, 50.0);
        let evaluation = Evaluation::insufficient_history("trend_follow", es, 1, 41);
        assert!(!evaluation.is_success());
        assert!(evaluation.ledger().is_none());
        assert_eq!(
            evaluation.status,
            RunStatus::InsufficientHistory {
                available: 1,
                required: 41
            }
        );
    }
}
