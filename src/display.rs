use crate::models::{ErrorReport, Report, Statistics};

pub fn display_report(report: &Report) {
    match report {
        Report::Success(stats) => display_success(stats),
        Report::Failure(err) => display_failure(err),
    }
}

pub fn display_success(stats: &Statistics) {
    println!("Accepted: {}", stats.summary());
}

/// Prints e.g.
///
/// ```text
/// wrong answer: solution provided an invalid answer
///   ---> on input: [2,7,11,15], 9
///   | expected: [0,1]
///   | got: [1,0]
/// ```
pub fn display_failure(err: &ErrorReport) {
    print!("{}", render_failure(err));
}

pub fn render_failure(err: &ErrorReport) -> String {
    let mut out = format!("{}: {}\n", err.class, err.message);
    if !err.context_header.is_empty() {
        out.push_str(&format!("  ---> {}\n", err.context_header));
    }
    for line in err.context_body.lines() {
        out.push_str(&format!("  | {}\n", line).replace("  | \n", "  |\n"));
    }
    out
}
