//! Plain-text rendering for terminal output.

use std::fmt::Write;

use synergy_core::{AdviceResult, AdviceTag, Assessment, PartnerLabels, Report};

pub fn tag_label(tag: &AdviceTag, labels: &PartnerLabels) -> String {
    match tag {
        AdviceTag::SharedStruggle => "Shared struggle".to_string(),
        AdviceTag::LeadSupport { leader } => {
            format!("Lead/support ({} leads)", labels.label(*leader))
        }
        AdviceTag::Balanced => "Balanced".to_string(),
    }
}

pub fn categories(assessment: &Assessment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (v{})", assessment.name(), assessment.assessment_version());
    for category in assessment.categories() {
        let _ = writeln!(out, "\n{}", category.name);
        for attribute in &category.attributes {
            let _ = writeln!(out, "  - {}", attribute);
        }
    }
    out
}

pub fn advice(category: &str, result: &AdviceResult, labels: &PartnerLabels) -> String {
    format!(
        "{}: {}\n{}\n",
        category,
        tag_label(&result.tag, labels),
        result.text
    )
}

pub fn report(report: &Report, labels: &PartnerLabels) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.assessment);
    let _ = writeln!(out, "{}", "=".repeat(report.assessment.chars().count()));

    for category in &report.categories {
        let _ = writeln!(out, "\n{}", category.category);
        let _ = writeln!(
            out,
            "  {}: {:.2}  {}: {:.2}",
            labels.one, category.averages.one, labels.two, category.averages.two
        );
        let _ = writeln!(out, "  {}", tag_label(&category.advice.tag, labels));
        let _ = writeln!(out, "  {}", category.advice.text);
        if !category.note.trim().is_empty() {
            let _ = writeln!(out, "  Notes: {}", category.note);
        }
    }

    let summary = report.summary();
    let _ = writeln!(
        out,
        "\nSummary: {} shared struggle, {} lead/support, {} balanced",
        summary.shared_struggle, summary.lead_support, summary.balanced
    );

    if !report.wins.is_empty() {
        let _ = writeln!(out, "\nWins:");
        for win in &report.wins {
            let _ = writeln!(
                out,
                "  - [{}] {}",
                win.logged_at.format("%Y-%m-%d %H:%M"),
                win.text
            );
        }
    }

    out
}
