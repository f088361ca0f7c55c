//! Check outcome recording for the surrounding reporting pipeline
//!
//! The comparator knows nothing about report formats. This module collects
//! [`Comparison`] outcomes and renders them as a text summary, JSON, a
//! self-contained HTML page, or JUnit XML for CI. Diff artifacts are
//! embedded as base64 PNG; rendered reports carry no store paths.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::comparator::Comparison;
use crate::result::CotejoResult;

/// Verdict of one recorded check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Difference stayed within the threshold
    Passed,
    /// Difference exceeded the threshold or dimensions mismatched
    Failed,
}

/// One recorded check outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRecord {
    /// Check this record belongs to
    pub check_name: String,
    /// Pass/fail verdict
    pub status: CheckStatus,
    /// Percentage of differing pixels at comparison time
    pub diff_percentage: f64,
    /// Base64-encoded PNG of the diff artifact, when one was attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_image: Option<String>,
}

/// Collects check outcomes and renders them for external consumption
#[derive(Debug, Serialize)]
pub struct CheckReport {
    name: String,
    records: Vec<CheckRecord>,
}

impl Default for CheckReport {
    fn default() -> Self {
        Self::new("visual-checks")
    }
}

impl CheckReport {
    /// Empty report with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Report name, used as the suite name in rendered output
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record one comparison outcome
    pub fn record(&mut self, comparison: &Comparison) {
        let status = if comparison.passed {
            CheckStatus::Passed
        } else {
            CheckStatus::Failed
        };
        self.records.push(CheckRecord {
            check_name: comparison.check_name.clone(),
            status,
            diff_percentage: comparison.diff_percentage,
            diff_image: None,
        });
    }

    /// Attach an encoded diff artifact to the latest record for `check_name`
    ///
    /// No-op when the check was never recorded.
    pub fn attach_diff(&mut self, check_name: &str, png_bytes: &[u8]) {
        if let Some(entry) = self
            .records
            .iter_mut()
            .rev()
            .find(|r| r.check_name == check_name)
        {
            entry.diff_image = Some(base64::engine::general_purpose::STANDARD.encode(png_bytes));
        }
    }

    /// Recorded outcomes, oldest first
    #[must_use]
    pub fn records(&self) -> &[CheckRecord] {
        &self.records
    }

    /// Number of recorded outcomes
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of passed checks
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == CheckStatus::Passed)
            .count()
    }

    /// Number of failed checks
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == CheckStatus::Failed)
            .count()
    }

    /// Fraction of checks that passed (1.0 for an empty report)
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.passed_count() as f64 / self.records.len() as f64;
        rate
    }

    /// Whether no recorded check failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} passed ({:.1}%)",
            self.name,
            self.passed_count(),
            self.len(),
            self.pass_rate() * 100.0
        )
    }

    /// JSON dump of the report
    ///
    /// # Errors
    ///
    /// Returns [`crate::CotejoError::Json`] when serialization fails.
    pub fn to_json(&self) -> CotejoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Self-contained HTML page with embedded diff images
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_xml(&self.name)));
        html.push_str("<style>\n");
        html.push_str("body { font-family: sans-serif; margin: 2em; }\n");
        html.push_str(".check { padding: 0.5em 1em; margin: 0.5em 0; border-left: 4px solid; }\n");
        html.push_str(".passed { border-color: #2e7d32; background: #e8f5e9; }\n");
        html.push_str(".failed { border-color: #c62828; background: #ffebee; }\n");
        html.push_str(".pct { color: #555; margin-left: 0.5em; }\n");
        html.push_str("img.diff { display: block; margin-top: 0.5em; max-width: 100%; image-rendering: pixelated; }\n");
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_xml(&self.name)));
        html.push_str(&format!(
            "<p>{} checks: {} passed, {} failed</p>\n",
            self.len(),
            self.passed_count(),
            self.failed_count()
        ));

        for record in &self.records {
            let (class, mark) = match record.status {
                CheckStatus::Passed => ("passed", "&#10003;"),
                CheckStatus::Failed => ("failed", "&#10007;"),
            };
            html.push_str(&format!(
                "<div class=\"check {class}\">{mark} {}<span class=\"pct\">{:.2}% pixels differ</span>",
                escape_xml(&record.check_name),
                record.diff_percentage
            ));
            if let Some(diff) = &record.diff_image {
                html.push_str(&format!(
                    "<img class=\"diff\" alt=\"diff for {}\" src=\"data:image/png;base64,{diff}\">",
                    escape_xml(&record.check_name)
                ));
            }
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// JUnit-style XML for CI consumption
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuite name="{}" tests="{}" failures="{}">"#,
            escape_xml(&self.name),
            self.len(),
            self.failed_count()
        ));
        xml.push('\n');

        for record in &self.records {
            match record.status {
                CheckStatus::Passed => {
                    xml.push_str(&format!(
                        r#"  <testcase name="{}"/>"#,
                        escape_xml(&record.check_name)
                    ));
                }
                CheckStatus::Failed => {
                    xml.push_str(&format!(
                        r#"  <testcase name="{}">"#,
                        escape_xml(&record.check_name)
                    ));
                    xml.push('\n');
                    xml.push_str(&format!(
                        r#"    <failure message="{:.2}% pixels differ"/>"#,
                        record.diff_percentage
                    ));
                    xml.push('\n');
                    xml.push_str("  </testcase>");
                }
            }
            xml.push('\n');
        }

        xml.push_str("</testsuite>\n");
        xml
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
