use serde::{Deserialize, Serialize};

use crate::judge::Judgment;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

/// Classify a suite. `None` means the suite could not be run at all.
pub fn classify_outcome(judgment: Option<&Judgment>) -> Outcome {
    match judgment {
        Some(judgment) if judgment.all_passed() => Outcome::Pass,
        Some(_) => Outcome::Fail,
        None => Outcome::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::CheckOutcome;

    fn judgment(pass: bool) -> Judgment {
        Judgment {
            checks: vec![CheckOutcome::WriteSucceeded {
                path: "out.txt".to_string(),
                passed: pass,
                diagnostic: None,
            }],
        }
    }

    #[test]
    fn pass_when_all_checks_pass() {
        assert_eq!(classify_outcome(Some(&judgment(true))), Outcome::Pass);
    }

    #[test]
    fn fail_when_any_check_fails() {
        assert_eq!(classify_outcome(Some(&judgment(false))), Outcome::Fail);
    }

    #[test]
    fn error_when_suite_did_not_run() {
        assert_eq!(classify_outcome(None), Outcome::Error);
    }
}
