use std::fmt::Write;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::filter::{Decision, FilterReport};

use super::styling::{bright, bright_green, bright_yellow, dim};

/// Prints a human-readable summary of a filter evaluation to stderr.
///
/// Shows every evaluated pattern with its match outcome and a color-coded
/// decision line (green proceed, yellow skip). Goes to stderr so stdout
/// stays clean for JSON reports and the dispatched build.
pub fn print_summary(report: &FilterReport) {
    eprintln!("{}", render_summary(report));
}

fn render_summary(report: &FilterReport) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{} {}",
        bright("🚦"),
        bright("Build Type Filter").underlined()
    );

    if report.patterns.is_empty() {
        let _ = writeln!(output, "{}", dim("No build-type directive in commit message"));
    } else {
        let mut table = create_table();
        table.set_header(create_cyan_header(&["Pattern", "Matched"]));
        for outcome in &report.patterns {
            table.add_row(vec![Cell::new(&outcome.pattern), matched_cell(outcome.matched)]);
        }
        let _ = writeln!(output, "{table}");
    }

    let decision = match report.decision {
        Decision::Proceed => bright_green("PROCEED"),
        Decision::Skip => bright_yellow("SKIP"),
    };
    let _ = writeln!(
        output,
        "Decision for {}: {}",
        bright(&report.build_type),
        decision
    );

    output
}

fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

fn matched_cell(matched: bool) -> Cell {
    if matched {
        Cell::new("yes").fg(TableColor::Green)
    } else {
        Cell::new("no").fg(TableColor::Yellow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PatternOutcome;
    use chrono::Utc;

    fn report(decision: Decision, patterns: Vec<PatternOutcome>) -> FilterReport {
        FilterReport {
            build_type: "macos-x86_64".to_string(),
            decision,
            evaluated_at: Utc::now(),
            patterns,
        }
    }

    #[test]
    fn test_render_summary_without_directive() {
        let output = render_summary(&report(Decision::Proceed, vec![]));
        assert!(output.contains("No build-type directive"));
        assert!(output.contains("PROCEED"));
    }

    #[test]
    fn test_render_summary_lists_every_pattern() {
        let output = render_summary(&report(
            Decision::Skip,
            vec![
                PatternOutcome {
                    pattern: "centos7-x86_64-clang17".to_string(),
                    matched: false,
                },
                PatternOutcome {
                    pattern: "ubuntu2204-x86_64-gcc11".to_string(),
                    matched: false,
                },
            ],
        ));
        assert!(output.contains("centos7-x86_64-clang17"));
        assert!(output.contains("ubuntu2204-x86_64-gcc11"));
        assert!(output.contains("SKIP"));
    }
}
