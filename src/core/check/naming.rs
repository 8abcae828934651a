//! Report naming strategy built from the report-prefix/postfix options.
use serde::{Deserialize, Serialize};

/// Produces report file names of the form `{prefix-}{stem}-report{-postfix}.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportNaming {
    prefix: Option<String>,
    postfix: Option<String>,
}

impl ReportNaming {
    pub fn new(prefix: Option<String>, postfix: Option<String>) -> Self {
        Self { prefix, postfix }
    }

    pub fn report_file_name(&self, stem: &str) -> String {
        let mut name = String::new();
        if let Some(prefix) = &self.prefix {
            name.push_str(prefix);
            name.push('-');
        }
        name.push_str(stem);
        name.push_str("-report");
        if let Some(postfix) = &self.postfix {
            name.push('-');
            name.push_str(postfix);
        }
        name.push_str(".json");
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_naming() {
        assert_eq!(
            ReportNaming::default().report_file_name("invoice"),
            "invoice-report.json"
        );
    }

    #[test]
    fn prefix_and_postfix() {
        let naming = ReportNaming::new(Some("ci".to_string()), Some("v2".to_string()));
        assert_eq!(naming.report_file_name("invoice"), "ci-invoice-report-v2.json");
    }

    #[test]
    fn prefix_only() {
        let naming = ReportNaming::new(Some("ci".to_string()), None);
        assert_eq!(naming.report_file_name("a"), "ci-a-report.json");
    }
}
