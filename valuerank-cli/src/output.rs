/// Output formatting: terminal table and JSON.
use serde::Serialize;
use valuerank_core::{RatedItem, SessionRecord, Strategy};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    strategy: Strategy,
    answers: usize,
    confidence: f64,
    #[serde(flatten)]
    record: &'a SessionRecord,
}

pub fn render_table(top: &[RatedItem], answers: usize, confidence: f64) -> String {
    let name_width = top.iter().map(|v| v.name.len()).max().unwrap_or(5).max(5); // at least "Value"

    let mut out = String::new();
    out.push_str(&format!(" # | {:<name_width$} |  Score | Rating | Description\n", "Value"));
    out.push_str(&format!("---|-{}-|--------|--------|------------\n", "-".repeat(name_width)));

    for (i, v) in top.iter().enumerate() {
        let name = if v.is_custom { format!("{}*", v.name) } else { v.name.clone() };
        out.push_str(&format!(
            "{:>2} | {:<name_width$} | {:>6.1} | {:>6} | {}\n",
            i + 1,
            name,
            v.score,
            v.rating,
            v.description,
        ));
    }

    out.push_str(&format!(
        "\nTop {} values from {} answers (ranking confidence {:.0}%)\n",
        top.len(),
        answers,
        confidence,
    ));
    if top.iter().any(|v| v.is_custom) {
        out.push_str("* custom value\n");
    }
    out
}

/// Print results as a formatted terminal table.
pub fn print_table(top: &[RatedItem], answers: usize, confidence: f64) {
    print!("{}", render_table(top, answers, confidence));
}

pub fn render_json(
    record: &SessionRecord,
    strategy: Strategy,
    answers: usize,
    confidence: f64,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput { strategy, answers, confidence, record })
}

/// Print results as JSON.
pub fn print_json(record: &SessionRecord, strategy: Strategy, answers: usize, confidence: f64) {
    match render_json(record, strategy, answers, confidence) {
        Ok(json) => println!("{json}"),
        Err(e) => crate::bail(format!("Failed to serialize results: {e}")),
    }
}
