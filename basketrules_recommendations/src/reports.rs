use std::collections::BTreeMap;
use std::io::{self, Write};

use itertools::Itertools;

use basketrules_mining::api::Rule;
use basketrules_transactions::api::{CustomerId, Itemset};

use crate::api::Recommendations;

pub const RULES_REPORT_HEADER: &str = "Recommender Rules:";

const SIGNIFICANT_DIGITS: i32 = 6;

/// Formats `value` with six significant digits and no trailing zeros
fn format_significant(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let integer_digits = value.abs().log10().floor() as i32 + 1;
    let decimals = (SIGNIFICANT_DIGITS - integer_digits).max(0) as usize;
    let formatted = format!("{value:.decimals$}");
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Confidence as a percentage, e.g. `0.714285` becomes `71.4286`
pub fn format_confidence(confidence: f64) -> String {
    format_significant(confidence * 100.0)
}

pub fn format_rule(rule: &Rule) -> String {
    format!(
        "{{ {} }} -> {{ {} }} : Confidence: {}",
        rule.precedent,
        rule.antecedent,
        format_confidence(rule.confidence)
    )
}

pub fn write_rules_report(writer: &mut impl Write, rules: &[Rule]) -> io::Result<()> {
    writeln!(writer, "{RULES_REPORT_HEADER}")?;
    for rule in rules.iter().sorted() {
        writeln!(writer, "{}", format_rule(rule))?;
    }
    Ok(())
}

/// Writes one line per customer with recommendations, in customer order
pub fn write_recommendations_report(
    writer: &mut impl Write,
    customers: &BTreeMap<CustomerId, Itemset>,
    recommendations: &Recommendations,
) -> io::Result<()> {
    for (customer, recommended) in recommendations.iter() {
        let purchased = customers.get(customer).cloned().unwrap_or_default();
        writeln!(
            writer,
            "{}: Purchased Items: {}  Recommended Items: {}",
            customer,
            purchased,
            recommended.iter().join(" ")
        )?;
    }
    Ok(())
}
