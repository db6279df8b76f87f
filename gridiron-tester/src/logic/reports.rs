use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

/// Career totals across every successful run in a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CareerAggregate {
    pub careers: usize,
    pub seasons: u64,
    pub playoff_appearances: u64,
    pub championships: u64,
    pub fired: usize,
    pub playoff_rate: f64,
    pub title_rate: f64,
    pub average_tenure: f64,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate_careers(results: &[ScenarioResult]) -> CareerAggregate {
    let mut aggregate = CareerAggregate::default();
    for summary in results.iter().flat_map(|result| &result.careers) {
        aggregate.careers += 1;
        aggregate.seasons += u64::from(summary.seasons_completed);
        aggregate.playoff_appearances += u64::from(summary.playoff_appearances);
        aggregate.championships += u64::from(summary.championships);
        if summary.fired_after.is_some() {
            aggregate.fired += 1;
        }
    }
    if aggregate.seasons > 0 {
        let seasons = aggregate.seasons as f64;
        aggregate.playoff_rate = aggregate.playoff_appearances as f64 / seasons;
        aggregate.title_rate = aggregate.championships as f64 / seasons;
        aggregate.average_tenure = seasons / aggregate.careers as f64;
    }
    aggregate
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    aggregate: CareerAggregate,
    results: &'a [ScenarioResult],
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn pass_counts(results: &[ScenarioResult]) -> (usize, usize, usize, f64) {
    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let success_rate = if total_tests == 0 {
        0.0
    } else {
        (passed_tests as f64 / total_tests as f64) * 100.0
    };
    (total_tests, passed_tests, total_tests - passed_tests, success_rate)
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    let (total_tests, passed_tests, failed_tests, success_rate) = pass_counts(results);

    writeln!(out)?;
    writeln!(out, "{}", "📊 Career Test Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===============================".cyan())?;
    writeln!(out, "Total scenarios: {total_tests}")?;
    writeln!(out, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(out, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(out, "Success rate: {success_rate:.1}%")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            out,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    let aggregate = aggregate_careers(results);
    if aggregate.careers > 0 {
        writeln!(out, "{}", "🏈 Career Outcomes".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        writeln!(out, "Careers simulated: {}", aggregate.careers)?;
        writeln!(out, "Seasons played: {}", aggregate.seasons)?;
        writeln!(
            out,
            "Playoff rate: {:.1}% | Title rate: {:.1}%",
            aggregate.playoff_rate * 100.0,
            aggregate.title_rate * 100.0
        )?;
        writeln!(
            out,
            "Coaches fired: {} | Average tenure: {:.1} seasons",
            aggregate.fired, aggregate.average_tenure
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let report = JsonReport {
        generated_at: timestamp(),
        aggregate: aggregate_careers(results),
        results,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let (total_tests, passed_tests, failed_tests, success_rate) = pass_counts(results);

    writeln!(out, "# Gridiron Career Test Results\n")?;
    writeln!(out, "_Generated {}_\n", timestamp())?;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total_tests}")?;
    writeln!(out, "- **Passed**: {passed_tests}")?;
    writeln!(out, "- **Failed**: {failed_tests}")?;
    writeln!(out, "- **Success rate**: {success_rate:.1}%\n")?;

    let aggregate = aggregate_careers(results);
    writeln!(out, "## Career Outcomes\n")?;
    writeln!(out, "| Careers | Seasons | Playoff rate | Title rate | Fired |")?;
    writeln!(out, "|---|---|---|---|---|")?;
    writeln!(
        out,
        "| {} | {} | {:.1}% | {:.1}% | {} |\n",
        aggregate.careers,
        aggregate.seasons,
        aggregate.playoff_rate * 100.0,
        aggregate.title_rate * 100.0,
        aggregate.fired
    )?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };

        writeln!(
            out,
            "### {} {} (seed {})\n",
            status, result.scenario_name, result.seed
        )?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::career_tester::CareerSummary;

    fn result(passed: bool, careers: Vec<CareerSummary>) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "full-career".to_string(),
            seed: 9,
            passed,
            iterations_run: careers.len().max(1),
            successful_iterations: careers.len(),
            failures: if passed {
                Vec::new()
            } else {
                vec!["Iteration 1: boom".to_string()]
            },
            careers,
            average_duration: Duration::from_millis(3),
            performance_data: Vec::new(),
        }
    }

    fn summary(seasons: u32, playoffs: u32, titles: u32, fired: bool) -> CareerSummary {
        CareerSummary {
            seasons_completed: seasons,
            playoff_appearances: playoffs,
            championships: titles,
            fired_after: fired.then_some(seasons),
            ..CareerSummary::default()
        }
    }

    #[test]
    fn aggregate_rolls_up_careers() {
        let results = vec![result(
            true,
            vec![summary(6, 1, 0, true), summary(4, 2, 1, false)],
        )];
        let aggregate = aggregate_careers(&results);
        assert_eq!(aggregate.careers, 2);
        assert_eq!(aggregate.seasons, 10);
        assert_eq!(aggregate.fired, 1);
        assert!((aggregate.playoff_rate - 0.3).abs() < 1e-9);
        assert!((aggregate.title_rate - 0.1).abs() < 1e-9);
        assert!((aggregate.average_tenure - 5.0).abs() < 1e-9);
    }

    #[test]
    fn markdown_lists_failures() {
        let mut out = Vec::new();
        generate_markdown_report(&mut out, &[result(false, Vec::new())]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# Gridiron Career Test Results"));
        assert!(text.contains("- **Failed**: 1"));
        assert!(text.contains("  - Iteration 1: boom"));
    }

    #[test]
    fn json_report_is_parseable() {
        let mut out = Vec::new();
        generate_json_report(&mut out, &[result(true, vec![summary(3, 0, 0, false)])]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["aggregate"]["careers"], 1);
        assert_eq!(value["results"][0]["scenario_name"], "full-career");
    }
}
