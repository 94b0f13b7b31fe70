//! # Report Rendering
//!
//! Renders a [`CombinationReport`] as plain text, Markdown or JSON.
//!
//! The text and Markdown forms share one layout:
//!
//! 1. Header (edition, method, load level, units)
//! 2. Warnings
//! 3. Base combinations with substituted formulas and level adjustments
//! 4. One table per scenario and wind extreme
//! 5. Governing envelope
//!
//! ## Example
//!
//! ```rust
//! use combo_core::calculations::{calculate, CombinationInput};
//! use combo_core::loads::{DesignMethod, Standard};
//! use combo_core::report::{render, ReportFormat};
//!
//! let input = CombinationInput::new(Standard::Asce7_16, DesignMethod::Asd, 20.0);
//! let report = calculate(&input).unwrap();
//!
//! let text = render(&report, ReportFormat::Text).unwrap();
//! assert!(text.contains("ASCE 7-16"));
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::combo::CombinationReport;
use crate::calculations::envelope::{GoverningValue, PATTERN_LABEL_SUFFIX};
use crate::calculations::scenario::{ScenarioEvaluation, WindCase};
use crate::errors::CalcResult;
use crate::loads::{AdjustmentNotes, EvaluatedCombination};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Render `report` in the requested format.
pub fn render(report: &CombinationReport, format: ReportFormat) -> CalcResult<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Text => Ok(render_with(report, &TextStyle)),
        ReportFormat::Markdown => Ok(render_with(report, &MarkdownStyle)),
    }
}

/// Layout primitives that differ between text and Markdown
trait Style {
    fn title(&self, out: &mut String, text: &str);
    fn heading(&self, out: &mut String, text: &str);
    fn bullet(&self, out: &mut String, text: &str);
    fn table(&self, out: &mut String, header: &[&str], rows: &[Vec<String>]);
}

struct TextStyle;

impl Style for TextStyle {
    fn title(&self, out: &mut String, text: &str) {
        let rule = "=".repeat(text.chars().count().max(40));
        out.push_str(&format!("{}\n{}\n{}\n", rule, text, rule));
    }

    fn heading(&self, out: &mut String, text: &str) {
        out.push_str(&format!("\n{}\n{}\n", text, "-".repeat(text.chars().count())));
    }

    fn bullet(&self, out: &mut String, text: &str) {
        out.push_str(&format!("  * {}\n", text));
    }

    fn table(&self, out: &mut String, header: &[&str], rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: Vec<&str>| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect();
            format!("  {}\n", padded.join("  ").trim_end())
        };

        out.push_str(&line(header.to_vec()));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&line(rule.iter().map(String::as_str).collect()));
        for row in rows {
            out.push_str(&line(row.iter().map(String::as_str).collect()));
        }
    }
}

struct MarkdownStyle;

impl Style for MarkdownStyle {
    fn title(&self, out: &mut String, text: &str) {
        out.push_str(&format!("# {}\n\n", text));
    }

    fn heading(&self, out: &mut String, text: &str) {
        out.push_str(&format!("\n## {}\n\n", text));
    }

    fn bullet(&self, out: &mut String, text: &str) {
        out.push_str(&format!("- {}\n", text));
    }

    fn table(&self, out: &mut String, header: &[&str], rows: &[Vec<String>]) {
        let escape = |s: &str| s.replace('|', "\\|");
        let joined: Vec<String> = header.iter().map(|h| escape(h)).collect();
        out.push_str(&format!("| {} |\n", joined.join(" | ")));
        out.push_str(&format!("|{}\n", " --- |".repeat(header.len())));
        for row in rows {
            let cells: Vec<String> = row.iter().map(|c| escape(c)).collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
    }
}

fn render_with(report: &CombinationReport, style: &dyn Style) -> String {
    let mut out = String::new();
    let units = report.unit_system.pressure_label();

    let title = if report.label.is_empty() {
        "Load Combinations".to_string()
    } else {
        format!("Load Combinations: {}", report.label)
    };
    style.title(&mut out, &title);

    style.bullet(&mut out, &format!("Standard: {}", report.standard));
    if !report.jurisdiction.trim().is_empty() {
        style.bullet(&mut out, &format!("Jurisdiction: {}", report.jurisdiction.trim()));
    }
    style.bullet(&mut out, &format!("Design method: {}", report.method.display_name()));
    style.bullet(&mut out, &format!("Input load level: {}", report.input_load_level));
    style.bullet(&mut out, &format!("Units: {}", units));

    if !report.warnings.is_empty() {
        style.heading(&mut out, "Warnings");
        for w in &report.warnings {
            style.bullet(&mut out, w);
        }
    }

    let base = &report.base_combos;
    style.heading(&mut out, "Base Combinations (S = W = 0)");
    let rows: Vec<Vec<String>> = base
        .final_formulas
        .iter()
        .map(|f| vec![f.label.clone(), f.expression.clone(), format_value(f.value, units)])
        .collect();
    style.table(&mut out, &["Combination", "Substituted", "Result"], &rows);
    if let Some(governing) = &base.governing {
        out.push_str(&format!(
            "\nGoverning: {} = {}\n",
            governing.label,
            format_value(governing.value, units)
        ));
    }
    if base.pattern_load_required {
        style.heading(&mut out, "Base Combinations, Pattern Live Load (0.75L)");
        style.table(&mut out, &["Combination", "Result"], &result_rows(&base.pattern_results, units));
    }
    write_adjustments(&mut out, style, &base.adjustment_notes, units);

    for eval in &report.scenarios {
        write_scenario(&mut out, style, eval, units);
    }

    let env = &report.envelope;
    if !env.per_scenario.is_empty() {
        style.heading(&mut out, "Governing Envelope");
        let rows: Vec<Vec<String>> = env
            .per_scenario
            .iter()
            .map(|s| {
                vec![
                    s.title.clone(),
                    s.max.combo.clone(),
                    format_value(s.max.value, units),
                    s.min.combo.clone(),
                    format_value(s.min.value, units),
                ]
            })
            .collect();
        style.table(&mut out, &["Scenario", "Max combination", "Max", "Min combination", "Min"], &rows);

        if let Some(max) = &env.overall_max {
            style.bullet(&mut out, &format!("Overall maximum: {}", describe(max, units)));
        }
        if let Some(min) = &env.overall_min {
            style.bullet(&mut out, &format!("Overall minimum: {}", describe(min, units)));
        }
    }

    out
}

fn write_scenario(out: &mut String, style: &dyn Style, eval: &ScenarioEvaluation, units: &str) {
    let extreme = match eval.wind_case {
        WindCase::Max => "Max Wind",
        WindCase::Min => "Min Wind",
    };
    style.heading(
        out,
        &format!(
            "{} ({}): S = {}, W = {}",
            eval.title,
            extreme,
            format_value(eval.loads.snow, units),
            format_value(eval.loads.wind, units)
        ),
    );

    let mut rows = result_rows(&eval.evaluation.results, units);
    for r in &eval.evaluation.pattern_results {
        rows.push(vec![format!("{}{}", r.label, PATTERN_LABEL_SUFFIX), format_value(r.value, units)]);
    }
    style.table(out, &["Combination", "Result"], &rows);
    write_adjustments(out, style, &eval.evaluation.adjustment_notes, units);
}

fn write_adjustments(out: &mut String, style: &dyn Style, notes: &AdjustmentNotes, units: &str) {
    for note in notes.iter() {
        style.bullet(
            out,
            &format!(
                "{}: {} -> {} ({})",
                note.load,
                format_value(note.original, units),
                format_value(note.adjusted, units),
                note.description
            ),
        );
    }
}

fn result_rows(results: &[EvaluatedCombination], units: &str) -> Vec<Vec<String>> {
    results
        .iter()
        .map(|r| vec![r.label.clone(), format_value(r.value, units)])
        .collect()
}

fn describe(value: &GoverningValue, units: &str) -> String {
    format!("{} under {} = {}", value.title, value.combo, format_value(value.value, units))
}

fn format_value(value: f64, units: &str) -> String {
    format!("{:.2} {}", value, units)
}
