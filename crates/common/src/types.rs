use std::slice;

use serde::{Deserialize, Serialize};

/// One address or a list, as accepted by the send endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(addr) => slice::from_ref(addr),
            Self::Many(list) => list,
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(addr) => vec![addr],
            Self::Many(list) => list,
        }
    }
}

impl From<&str> for Recipients {
    fn from(addr: &str) -> Self {
        Self::One(addr.to_string())
    }
}

/// One item of a batch that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub target: String,
    pub error: String,
}

/// Outcome of a batch where individual failures never abort the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, target: impl Into<String>, error: impl ToString) {
        self.failures.push(BatchFailure {
            target: target.into(),
            error: error.to_string(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub fn is_partial(&self) -> bool {
        self.succeeded > 0 && !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipients_accept_string_or_list() {
        let one: Recipients = serde_json::from_str(r#""a@example.com""#).unwrap();
        assert_eq!(one.as_slice(), ["a@example.com"]);
        let many: Recipients = serde_json::from_str(r#"["a@example.com","b@example.com"]"#).unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }

    #[test]
    fn counts_successes_and_failures() {
        let mut report = BatchReport::default();
        report.record_success();
        report.record_failure("b@example.com", "550 mailbox unavailable");
        report.record_success();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.attempted(), 3);
        assert!(report.is_partial());
    }

    #[test]
    fn serializes_failures() {
        let mut report = BatchReport::default();
        report.record_failure("x", "boom");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["succeeded"], 0);
        assert_eq!(json["failures"][0]["target"], "x");
        assert_eq!(json["failures"][0]["error"], "boom");
    }
}
