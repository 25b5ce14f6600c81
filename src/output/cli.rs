use crate::error::Result;
use crate::model::{ScanReport, UNKNOWN_VERSION};
use crate::report::render;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Check")]
    check: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl SummaryRow {
    fn new(check: &str, result: impl Into<String>) -> Self {
        Self {
            check: check.to_string(),
            result: result.into(),
        }
    }
}

pub fn print_cli_table(report: &ScanReport, colorize: bool) -> Result<()> {
    println!("{}", format_cli_table(report, colorize));
    Ok(())
}

pub fn format_cli_table(report: &ScanReport, colorize: bool) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!(
        "Scan of {} completed at: {}\n\n",
        report.target,
        report.scan_time.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let detection = &report.detection;
    let mut rows = vec![
        SummaryRow::new("WordPress", if report.is_wordpress { "yes" } else { "no" }),
        SummaryRow::new(
            "Probe hits",
            format!(
                "{}/{} ({:.0}%)",
                detection.matched_as_distinct,
                detection.total_probed,
                detection.hit_rate() * 100.0
            ),
        ),
        SummaryRow::new(
            "Admin probe",
            if detection.tie_break_used { "used" } else { "not needed" },
        ),
    ];

    if let Some(version) = &report.version {
        rows.push(SummaryRow::new(
            "Installed version",
            format_version(&version.current_version),
        ));
        rows.push(SummaryRow::new(
            "Latest version",
            format_version(&version.last_version),
        ));
        rows.push(SummaryRow::new(
            "Status",
            format_status(report.outdated, version.has_current(), colorize),
        ));
    }

    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out.push('\n');

    let advisories = render(&report.advisories, colorize);
    if !advisories.is_empty() {
        out.push_str(&advisories);
        out.push('\n');
    }

    if report.is_wordpress {
        out.push('\n');
        out.push_str(&format!("Summary: {} known advisories\n", report.advisories.len()));
    }

    out
}

fn format_version(version: &str) -> String {
    if version == UNKNOWN_VERSION || version.is_empty() {
        "-".to_string()
    } else {
        version.to_string()
    }
}

fn format_status(outdated: bool, known: bool, colorize: bool) -> String {
    let text = match (known, outdated) {
        (false, _) => return "-".to_string(),
        (true, true) => "OUTDATED",
        (true, false) => "up to date",
    };

    match (colorize, outdated) {
        (true, true) => text.yellow().to_string(),
        (true, false) => text.green().to_string(),
        (false, _) => text.to_string(),
    }
}
