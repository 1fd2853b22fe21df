use std::fmt;

use crate::exit_codes;

/// Terminal state of a judged submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    RuntimeError,
    CompileError,
    OtherFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    CompileError,
    RuntimeError,
    WrongAnswer,
    TimeLimitExceeded,
    Unhandled,
}

impl ErrorClass {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorClass::CompileError => "compile error",
            ErrorClass::RuntimeError => "runtime error",
            ErrorClass::WrongAnswer => "wrong answer",
            ErrorClass::TimeLimitExceeded => "time limit exceeded",
            ErrorClass::Unhandled => "unhandled",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorClass::CompileError => exit_codes::COMPILE_ERROR,
            ErrorClass::RuntimeError => exit_codes::RUNTIME_ERROR,
            ErrorClass::WrongAnswer => exit_codes::WRONG_ANSWER,
            ErrorClass::TimeLimitExceeded => exit_codes::TIME_LIMIT_EXCEEDED,
            ErrorClass::Unhandled => exit_codes::UNHANDLED_VERDICT,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub class: ErrorClass,
    pub message: String,
    pub context_header: String,
    pub context_body: String,
}

impl ErrorReport {
    pub fn new(
        class: ErrorClass,
        message: impl Into<String>,
        context_header: impl Into<String>,
        context_body: impl Into<String>,
    ) -> Self {
        Self {
            class,
            message: message.into(),
            context_header: context_header.into(),
            context_body: context_body.into(),
        }
    }

    /// Report for a verdict nobody taught us about. The raw payload is kept
    /// so the user can still see what the judge said.
    pub fn unhandled(message: impl Into<String>, raw: &str) -> Self {
        let body = if raw.trim().is_empty() {
            "<empty verdict payload>".to_string()
        } else {
            raw.to_string()
        };
        Self::new(ErrorClass::Unhandled, message, "raw output", body)
    }
}

/// Success summary. Fields the judge did not report stay at their sentinel:
/// NaN for percentiles, empty strings for formatted values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_test_cases: u64,
    pub runtime: String,
    pub runtime_percentile: f64,
    pub memory: String,
    pub memory_percentile: f64,
    pub score: String,
    pub max_score: String,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            total_test_cases: 0,
            runtime: String::new(),
            runtime_percentile: f64::NAN,
            memory: String::new(),
            memory_percentile: f64::NAN,
            score: String::new(),
            max_score: String::new(),
        }
    }
}

fn with_percentile(value: &str, percentile: f64) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if percentile.is_nan() {
        Some(value.to_string())
    } else {
        Some(format!("{} ({:.2}%)", value, percentile))
    }
}

impl Statistics {
    /// One line, e.g. `10 done in 4 ms (91.20%) and 2.1 MB (75.00%)`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(runtime) = with_percentile(&self.runtime, self.runtime_percentile) {
            parts.push(runtime);
        }
        if let Some(memory) = with_percentile(&self.memory, self.memory_percentile) {
            parts.push(memory);
        }

        let mut line = format!("{} done", self.total_test_cases);
        if !parts.is_empty() {
            line.push_str(&format!(" in {}", parts.join(" and ")));
        }
        if !self.score.is_empty() {
            if self.max_score.is_empty() {
                line.push_str(&format!(", score {}", self.score));
            } else {
                line.push_str(&format!(", score {}/{}", self.score, self.max_score));
            }
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Success(Statistics),
    Failure(ErrorReport),
}

impl Report {
    pub fn exit_code(&self) -> i32 {
        match self {
            Report::Success(_) => exit_codes::SUCCESS,
            Report::Failure(err) => err.class.exit_code(),
        }
    }
}

/// A submission that reached a terminal state on its judge.
pub trait SubmissionReport {
    fn verdict(&self) -> Verdict;

    fn has_succeeded(&self) -> bool;

    /// Platform-assigned identifier, for logs.
    fn identify(&self) -> String;

    fn statistics(&self) -> Statistics;

    /// Only meaningful when [`has_succeeded`](Self::has_succeeded) is false.
    /// Implementations must be total: unknown verdicts map to
    /// [`ErrorClass::Unhandled`].
    fn error_report(&self) -> ErrorReport;

    fn classify(&self) -> Report {
        if self.has_succeeded() {
            Report::Success(self.statistics())
        } else {
            Report::Failure(self.error_report())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_statistics_use_sentinels() {
        let stats = Statistics::default();
        assert!(stats.runtime_percentile.is_nan());
        assert!(stats.memory_percentile.is_nan());
        assert!(stats.runtime.is_empty());
        assert!(stats.score.is_empty());
        assert_eq!(stats.summary(), "0 done");
    }

    #[test]
    fn test_summary_with_everything() {
        let stats = Statistics {
            total_test_cases: 10,
            runtime: "4 ms".to_string(),
            runtime_percentile: 91.2,
            memory: "2.1 MB".to_string(),
            memory_percentile: 0.0,
            score: "30pts".to_string(),
            max_score: "30pts".to_string(),
        };
        assert_eq!(
            stats.summary(),
            "10 done in 4 ms (91.20%) and 2.1 MB (0.00%), score 30pts/30pts"
        );
    }

    #[test]
    fn test_summary_skips_unreported_percentile() {
        let stats = Statistics {
            total_test_cases: 3,
            runtime: "120ms".to_string(),
            ..Statistics::default()
        };
        assert_eq!(stats.summary(), "3 done in 120ms");
    }

    #[test]
    fn test_unhandled_body_never_empty() {
        let report = ErrorReport::unhandled("Output Limit Exceeded (13)", "");
        assert_eq!(report.class, ErrorClass::Unhandled);
        assert!(!report.context_body.is_empty());
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let classes = [
            ErrorClass::CompileError,
            ErrorClass::RuntimeError,
            ErrorClass::WrongAnswer,
            ErrorClass::TimeLimitExceeded,
            ErrorClass::Unhandled,
        ];
        let mut codes: Vec<i32> = classes.iter().map(|c| c.exit_code()).collect();
        codes.push(exit_codes::SUCCESS);
        codes.push(exit_codes::ERROR);
        let total = codes.len();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }
}
