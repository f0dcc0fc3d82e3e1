use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use basketrules_mining::api::Rule;
use basketrules_mining::itemset_miner::{ItemsetMiner, MiningOutcome};
use basketrules_mining::rule_generator::RuleGenerator;
use basketrules_transactions::transaction_source::{FileTransactionSource, TransactionSource};
use basketrules_transactions::transaction_store::TransactionStore;

use crate::api::{PipelineSummary, Recommendations};
use crate::app_config::Settings;
use crate::recommendations::RecommendationsEngine;
use crate::reports::{write_recommendations_report, write_rules_report};

/// Everything computed by one run, before anything is written out
pub struct Evaluation {
    pub store: TransactionStore,
    pub mining: MiningOutcome,
    pub rules: Vec<Rule>,
    pub recommendations: Recommendations,
}

impl Evaluation {
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            transactions: self.store.len(),
            skipped_lines: self.store.stats().skipped(),
            frequent_itemsets: self.mining.frequent.len(),
            evaluated_itemsets: self.mining.support.len(),
            rules: self.rules.len(),
            customers_with_recommendations: self.recommendations.len(),
        }
    }
}

/// Load -> mine -> generate rules -> recommend -> write reports
pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Runs every stage against the configured transaction file and writes both reports
    pub fn run(&self) -> anyhow::Result<PipelineSummary> {
        let source = FileTransactionSource::new(&self.settings.transactions_path);
        let evaluation = self.evaluate(&source)?;
        self.write_reports(&evaluation)?;

        let summary = evaluation.summary();
        tracing::info!("Pipeline finished {:?}", summary);
        Ok(summary)
    }

    pub fn evaluate(&self, source: &dyn TransactionSource) -> anyhow::Result<Evaluation> {
        let store = TransactionStore::load(source)
            .with_context(|| format!("Failed to load transactions from {}", source.name()))?;

        let mining = ItemsetMiner::new(self.settings.min_support_percent).mine(store.transactions());

        let rules = RuleGenerator::new(self.settings.rule_generator_config())
            .generate(&mining.frequent, &mining.support);

        let recommendations =
            RecommendationsEngine::with_successors(&rules, self.settings.successor_map())
                .recommend(store.named());

        Ok(Evaluation {
            store,
            mining,
            rules,
            recommendations,
        })
    }

    pub fn write_reports(&self, evaluation: &Evaluation) -> anyhow::Result<()> {
        write_report(&self.settings.rules_report_path, |writer| {
            write_rules_report(writer, &evaluation.rules)
        })?;
        write_report(&self.settings.recommendations_report_path, |writer| {
            write_recommendations_report(
                writer,
                evaluation.store.named(),
                &evaluation.recommendations,
            )
        })?;
        Ok(())
    }
}

fn write_report<F>(path: &Path, write: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).with_context(|| format!("Failed to write report {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush report {}", path.display()))?;
    tracing::info!("Written report {}", path.display());
    Ok(())
}

#[cfg(test)]
mod pipeline_tests {
    use basketrules_transactions::transaction_source::InMemoryTransactionSource;

    use super::*;
    use crate::api::Successor;

    fn settings_in(directory: &Path) -> Settings {
        Settings {
            transactions_path: directory.join("transactions.txt"),
            rules_report_path: directory.join("rules.txt"),
            recommendations_report_path: directory.join("recommendations.txt"),
            ..Settings::default()
        }
    }

    #[test]
    /// Evaluates an in-memory dataset with enough repeated baskets to pass the sample floor
    fn test_evaluate() {
        let mut lines = vec!["Zoe Black Phone Case Charger".to_string(); 5];
        lines.push("Yan Green Phone Case".to_string());
        lines.push("Xia Brown Phone".to_string());
        let source = InMemoryTransactionSource::from_lines(lines);

        let evaluation = Pipeline::new(Settings::default())
            .evaluate(&source)
            .expect("Failed to evaluate");

        let rules: Vec<String> = evaluation
            .rules
            .iter()
            .map(|rule| format!("{} -> {}", rule.precedent, rule.antecedent))
            .collect();
        assert!(rules.contains(&"Case Phone -> Charger".to_string()));
        assert!(rules.contains(&"Phone -> Case Charger".to_string()));

        // Zoe Black is listed five times but is one customer who already has everything
        assert_eq!(evaluation.recommendations.len(), 2);
        assert_eq!(
            evaluation.recommendations["Yan Green"]
                .iter()
                .collect::<Vec<_>>(),
            vec!["Charger"]
        );
        assert_eq!(
            evaluation.recommendations["Xia Brown"]
                .iter()
                .collect::<Vec<_>>(),
            vec!["Case", "Charger"]
        );
        assert_eq!(evaluation.summary().transactions, 7);
    }

    #[test]
    /// Customers outside every rule are offered the configured successors of their purchases
    fn test_evaluate_with_successors() {
        let mut lines = vec!["Zoe Black Phone Case Charger".to_string(); 5];
        lines.push("Wes Grey Tablet".to_string());
        let source = InMemoryTransactionSource::from_lines(lines);
        let settings = Settings {
            successors: vec![
                Successor {
                    item: "Tablet".to_string(),
                    next: "Phone".to_string(),
                },
                Successor {
                    item: "Phone".to_string(),
                    next: "Case".to_string(),
                },
            ],
            ..Settings::default()
        };

        let evaluation = Pipeline::new(settings)
            .evaluate(&source)
            .expect("Failed to evaluate");

        assert_eq!(evaluation.recommendations.len(), 1);
        assert_eq!(
            evaluation.recommendations["Wes Grey"]
                .iter()
                .collect::<Vec<_>>(),
            vec!["Phone"]
        );
    }

    #[test]
    /// Reports are written to the configured paths
    fn test_run_writes_reports() {
        let directory = tempfile::tempdir().unwrap();
        let settings = settings_in(directory.path());
        std::fs::write(
            &settings.transactions_path,
            "Alice Smith A B\nBob Jones A B C\nCarl Young A B\n",
        )
        .unwrap();

        let summary = Pipeline::new(settings.clone()).run().expect("Pipeline failed");

        assert_eq!(summary.transactions, 3);
        assert_eq!(summary.rules, 0);
        assert_eq!(
            std::fs::read_to_string(&settings.rules_report_path).unwrap(),
            "Recommender Rules:\n"
        );
        assert_eq!(
            std::fs::read_to_string(&settings.recommendations_report_path).unwrap(),
            ""
        );
    }

    #[test]
    fn test_run_fails_without_source() {
        let directory = tempfile::tempdir().unwrap();
        let settings = settings_in(directory.path());

        let result = Pipeline::new(settings.clone()).run();

        assert!(result.is_err());
        assert!(!settings.rules_report_path.exists());
        assert!(!settings.recommendations_report_path.exists());
    }
}
