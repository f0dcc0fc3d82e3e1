use std::path::Path;

use basketrules_recommendations::app_config::Settings;
use basketrules_recommendations::pipeline::Pipeline;

const STORE_TRANSACTIONS: &str = "\
Ann Lee Phone Case Screen
Ben Cho Screen Phone Case
Cat Diaz Phone Case Screen

Dan Eck Phone Case Screen
Eve Fox Case Phone Screen
Solo
Fay Gil Phone Case
Gus Ho Phone
Hal Ito Case Screen Earbuds
Ivy Jo Earbuds
";

fn settings_in(directory: &Path) -> Settings {
    Settings {
        transactions_path: directory.join("transactions.txt"),
        rules_report_path: directory.join("rules.txt"),
        recommendations_report_path: directory.join("recommendations.txt"),
        ..Settings::default()
    }
}

/// Writes `transactions` and runs the whole pipeline, returns both reports
fn run_pipeline(settings: &Settings, transactions: &str) -> (String, String) {
    std::fs::write(&settings.transactions_path, transactions)
        .expect("Failed to write transactions");
    Pipeline::new(settings.clone())
        .run()
        .expect("Pipeline failed");
    (
        std::fs::read_to_string(&settings.rules_report_path).expect("No rules report"),
        std::fs::read_to_string(&settings.recommendations_report_path)
            .expect("No recommendations report"),
    )
}

#[test]
/// Full run over a small store
/// 1. Six rules survive, one-to-one rules and Earbuds rules are dropped
/// 2. Only customers missing an item of the Phone/Case/Screen bundle get recommendations
/// 3. Blank and malformed lines are skipped
fn store_e2e_test() {
    let directory = tempfile::tempdir().unwrap();
    let settings = settings_in(directory.path());

    let (rules_report, recommendations_report) = run_pipeline(&settings, STORE_TRANSACTIONS);

    assert_eq!(
        rules_report,
        "Recommender Rules:\n\
         { Case } -> { Phone Screen } : Confidence: 71.4286\n\
         { Case Phone } -> { Screen } : Confidence: 83.3333\n\
         { Case Screen } -> { Phone } : Confidence: 83.3333\n\
         { Phone } -> { Case Screen } : Confidence: 71.4286\n\
         { Phone Screen } -> { Case } : Confidence: 100\n\
         { Screen } -> { Case Phone } : Confidence: 83.3333\n"
    );
    assert_eq!(
        recommendations_report,
        "Fay Gil: Purchased Items: Case Phone  Recommended Items: Screen\n\
         Gus Ho: Purchased Items: Phone  Recommended Items: Case Screen\n\
         Hal Ito: Purchased Items: Case Earbuds Screen  Recommended Items: Phone\n"
    );

    let summary = Pipeline::new(settings.clone()).run().unwrap();
    assert_eq!(summary.transactions, 9);
    assert_eq!(summary.skipped_lines, 2);
    assert_eq!(summary.rules, 6);
    assert_eq!(summary.customers_with_recommendations, 3);
}

#[test]
/// A higher confidence threshold keeps only the strongest rules
fn store_high_confidence_e2e_test() {
    let directory = tempfile::tempdir().unwrap();
    let settings = Settings {
        min_rule_confidence: 0.9,
        ..settings_in(directory.path())
    };

    let (rules_report, recommendations_report) = run_pipeline(&settings, STORE_TRANSACTIONS);

    assert_eq!(
        rules_report,
        "Recommender Rules:\n{ Phone Screen } -> { Case } : Confidence: 100\n"
    );
    assert_eq!(recommendations_report, "");
}

#[test]
/// {A,B} -> {C} has confidence 1/3 but only one supporting transaction,
/// the sample floor suppresses it and both reports stay empty
fn small_sample_rules_are_suppressed_e2e_test() {
    let directory = tempfile::tempdir().unwrap();
    let settings = settings_in(directory.path());

    let (rules_report, recommendations_report) = run_pipeline(
        &settings,
        "Alice Smith A B\nBob Jones A B C\nCarl Young A B\n",
    );

    assert_eq!(rules_report, "Recommender Rules:\n");
    assert_eq!(recommendations_report, "");
}

#[test]
fn empty_input_e2e_test() {
    let directory = tempfile::tempdir().unwrap();
    let settings = settings_in(directory.path());

    let (rules_report, recommendations_report) = run_pipeline(&settings, "");

    assert_eq!(rules_report, "Recommender Rules:\n");
    assert_eq!(recommendations_report, "");
}

#[test]
/// A Latin-1 encoded customer name does not stop the run, the customer still gets
/// recommendations under the decoded name
fn latin1_line_e2e_test() {
    let directory = tempfile::tempdir().unwrap();
    let settings = settings_in(directory.path());
    let mut content = "Ann Lee Phone Case Screen\n".repeat(5).into_bytes();
    content.extend_from_slice(b"Jos\xe9 Ruiz Phone\n");
    std::fs::write(&settings.transactions_path, content).unwrap();

    let summary = Pipeline::new(settings.clone())
        .run()
        .expect("Pipeline failed");

    assert_eq!(summary.transactions, 6);
    assert_eq!(summary.skipped_lines, 0);
    let rules_report = std::fs::read_to_string(&settings.rules_report_path).unwrap();
    assert!(rules_report.contains("{ Phone } -> { Case Screen } : Confidence: 83.3333\n"));
    assert_eq!(
        std::fs::read_to_string(&settings.recommendations_report_path).unwrap(),
        "Jos\u{FFFD} Ruiz: Purchased Items: Phone  Recommended Items: Case Screen\n"
    );
}

#[test]
fn missing_input_e2e_test() {
    let directory = tempfile::tempdir().unwrap();
    let settings = settings_in(directory.path());

    let error = Pipeline::new(settings.clone())
        .run()
        .expect_err("Pipeline should fail without a transaction file");

    assert!(format!("{error:#}").contains("Failed to load transactions"));
    assert!(!settings.rules_report_path.exists());
}

#[test]
/// Two runs over the same input give byte identical reports
fn idempotence_e2e_test() {
    let first_directory = tempfile::tempdir().unwrap();
    let second_directory = tempfile::tempdir().unwrap();

    let first = run_pipeline(&settings_in(first_directory.path()), STORE_TRANSACTIONS);
    let second = run_pipeline(&settings_in(second_directory.path()), STORE_TRANSACTIONS);

    assert_eq!(first, second);
}
