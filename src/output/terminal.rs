// Colored terminal output for detection results and gate decisions.
//
// main.rs delegates all display formatting here.

use colored::Colorize;

use crate::detection::{DetectionResult, DetectionSource, Severity};
use crate::gate::{GateDecision, GateState};

/// Display a single detection result.
pub fn display_detection(text: &str, result: &DetectionResult) {
    println!(
        "\n{}",
        format!("=== Screening: \"{}\" ===", super::truncate_chars(text, 60)).bold()
    );

    let verdict = if result.is_toxic {
        "TOXIC".red().bold()
    } else {
        "ok".green()
    };
    println!("  Verdict: {verdict}");
    println!(
        "  Score: {:.2}  Severity: {}",
        result.score,
        colorize_severity(result.severity())
    );
    println!("  Source: {}", colorize_source(result.source));

    if !result.categories.is_empty() {
        println!("  Categories: {}", result.categories_summary().yellow());
    }
    if !result.warning.is_empty() {
        println!("  {} {}", "Warning:".red(), result.warning);
    }
}

/// Display the outcome of the publication gate.
pub fn display_gate_decision(decision: &GateDecision) {
    let state = match decision.state {
        GateState::Allowed => decision.state.as_str().green().bold(),
        GateState::AllowedWithOverride => decision.state.as_str().yellow().bold(),
        GateState::PendingConfirmation => decision.state.as_str().bright_red(),
        GateState::Blocked => decision.state.as_str().red().bold(),
        GateState::Idle => decision.state.as_str().dimmed(),
    };
    println!("\n  Gate: {state}");
    if !decision.message.is_empty() {
        println!("  {}", decision.message);
    }
    if decision.requires_confirmation || decision.state == GateState::Blocked {
        println!(
            "  {}",
            "Re-run with --confirm to publish anyway.".dimmed()
        );
    }
}

/// Display a batch of results as a compact table.
pub fn display_batch(texts: &[String], results: &[DetectionResult]) {
    println!(
        "\n{}",
        format!("=== Batch Screening ({} texts) ===", results.len()).bold()
    );
    println!();
    println!(
        "  {:>3}  {:>5}  {:<8}  {:<8}  {}",
        "#".dimmed(),
        "Score".dimmed(),
        "Severity".dimmed(),
        "Source".dimmed(),
        "Text".dimmed(),
    );
    println!("  {}", "-".repeat(72).dimmed());

    for (i, (text, result)) in texts.iter().zip(results).enumerate() {
        let preview = super::truncate_chars(text, 40);
        let preview = if result.is_toxic {
            preview.red().to_string()
        } else {
            preview
        };
        println!(
            "  {:>3}  {:>5.2}  {:<8}  {:<8}  {}",
            i + 1,
            result.score,
            result.severity().as_str(),
            result.source.as_str(),
            preview,
        );
    }

    let toxic = results.iter().filter(|r| r.is_toxic).count();
    println!();
    if toxic > 0 {
        println!("  {} {} flagged", "!!".red().bold(), toxic);
    } else {
        println!("  {}", "Nothing flagged.".green());
    }
}

fn colorize_severity(severity: Severity) -> colored::ColoredString {
    let label = severity.as_str();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.bright_red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.normal(),
        Severity::None => label.green(),
    }
}

fn colorize_source(source: DetectionSource) -> colored::ColoredString {
    match source {
        DetectionSource::Remote => source.as_str().normal(),
        DetectionSource::Fallback => source.as_str().dimmed(),
    }
}
