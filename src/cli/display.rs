//! Terminal rendering for run reports.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use console::style;

use crate::domain::models::ActivityRecord;
use crate::services::RunReport;

/// Render controller activity as a table, newest first.
pub fn activity_table(activities: &[ActivityRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Start", "Status", "Description", "Cause"]);

    for activity in activities {
        table.add_row(vec![
            Cell::new(activity.started_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(&activity.status_code),
            Cell::new(&activity.description),
            Cell::new(&activity.cause),
        ]);
    }
    table
}

/// Print the human-readable report summary.
pub fn print_report(report: &RunReport) {
    println!(
        "{} fleet scaled out to {} members in {}s, back to {} in {}s",
        style("PASS").green().bold(),
        report.peak_members.len(),
        report.scale_out_waited.as_secs(),
        report.final_member_count,
        report.scale_in_waited.as_secs(),
    );
    println!("peak members: {}", report.peak_members.join(", "));

    if report.activities.is_empty() {
        println!("no scaling activity within the report window");
    } else {
        println!("{}", activity_table(&report.activities));
    }
}
