// src/report.rs
//! Terminal and JSON rendering of suggestions and patterns.

use crate::error::Result;
use crate::patterns::CodePattern;
use crate::suggest::CodeSuggestion;
use colored::Colorize;
use std::fmt::Write;

const RULE_WIDTH: usize = 70;

/// Formats ranked suggestions for terminal display, grouped by the pattern
/// they were generated for. Groups appear in the order of their best
/// suggestion; within a group the ranking order is kept.
#[must_use]
pub fn format_terminal(suggestions: &[CodeSuggestion]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH).dimmed());
    let _ = writeln!(out, "{}", " SUGGESTIONS ".cyan().bold());
    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH).dimmed());
    let _ = writeln!(out);

    if suggestions.is_empty() {
        let _ = writeln!(out, "{}", "Nothing to suggest. The code looks complete.".green());
    } else {
        for (pattern, group) in group_by_pattern(suggestions) {
            let _ = writeln!(out, "{} {}", "▸".cyan(), pattern.bold());
            for s in group {
                write_suggestion(&mut out, s);
            }
        }
    }

    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH).dimmed());
    out
}

fn group_by_pattern(suggestions: &[CodeSuggestion]) -> Vec<(&str, Vec<&CodeSuggestion>)> {
    let mut groups: Vec<(&str, Vec<&CodeSuggestion>)> = Vec::new();
    for s in suggestions {
        let name = s.context.source_pattern.as_str();
        match groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, group)) => group.push(s),
            None => groups.push((name, vec![s])),
        }
    }
    groups
}

fn write_suggestion(out: &mut String, s: &CodeSuggestion) {
    let _ = writeln!(
        out,
        "  {} {} {}",
        format_confidence(s.confidence),
        s.kind.to_string().yellow(),
        s.context.description.dimmed()
    );
    for line in s.content.lines() {
        let _ = writeln!(out, "      {line}");
    }
    let _ = writeln!(out);
}

fn format_confidence(confidence: f64) -> String {
    let pct = format!("[{:>3.0}%]", confidence * 100.0);
    if confidence >= 0.85 {
        pct.green().bold().to_string()
    } else if confidence >= 0.7 {
        pct.yellow().to_string()
    } else {
        pct.dimmed().to_string()
    }
}

/// Formats suggestions as pretty JSON.
///
/// # Errors
/// Returns `CodesenseError::Json` if serialization fails.
pub fn format_json(suggestions: &[CodeSuggestion]) -> Result<String> {
    Ok(serde_json::to_string_pretty(suggestions)?)
}

/// Formats aggregated patterns as a table: kind, name, occurrences and the
/// first location.
#[must_use]
pub fn format_patterns(patterns: &[CodePattern]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("{:<16} {:<32} {:>5}  {}", "KIND", "NAME", "COUNT", "AT").bold()
    );
    for p in patterns {
        let at = p
            .first_location()
            .map_or_else(String::new, |l| format!("{}:{}", l.start.line, l.start.column));
        let _ = writeln!(
            out,
            "{:<16} {:<32} {:>5}  {}",
            p.kind().label(),
            p.name,
            p.occurrence_count,
            at.dimmed()
        );
    }
    let _ = writeln!(out, "{} pattern(s)", patterns.len().to_string().cyan());
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::suggest::SuggestionKind;

    fn suggestion(source: &str, confidence: f64) -> CodeSuggestion {
        CodeSuggestion::new(
            SuggestionKind::Documentation,
            "/**\n * Doc.\n */",
            confidence,
            source,
            format!("Document '{source}'"),
        )
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let list = vec![
            suggestion("b", 0.9),
            suggestion("a", 0.8),
            suggestion("b", 0.7),
        ];
        let groups = group_by_pattern(&list);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "b");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "a");
    }

    #[test]
    fn terminal_lists_content_and_percentages() {
        let text = format_terminal(&[suggestion("load", 0.9)]);
        assert!(text.contains("90%"));
        assert!(text.contains("      * Doc."));
        assert!(text.contains("Document 'load'"));
    }

    #[test]
    fn empty_terminal_report() {
        assert!(format_terminal(&[]).contains("Nothing to suggest"));
    }

    #[test]
    fn json_is_an_array_of_suggestions() {
        let json = format_json(&[suggestion("f", 0.5)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "documentation");
        assert_eq!(value[0]["context"]["source_pattern"], "f");
    }
}
