//! Scripted sessions: a file describing everything a couple entered.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use synergy_core::{Assessment, Partner, ResetScope, SessionError, SessionState};

/// category -> attribute -> raw rating
pub type CategoryRatings = BTreeMap<String, BTreeMap<String, i64>>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartnerRatings {
    #[serde(default)]
    pub one: CategoryRatings,
    #[serde(default)]
    pub two: CategoryRatings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Confirmations {
    #[serde(default)]
    pub one: bool,
    #[serde(default)]
    pub two: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    /// Absent: open session. Present: gated session, unlocked if true.
    #[serde(default)]
    pub authenticated: Option<bool>,
    #[serde(default)]
    pub ratings: PartnerRatings,
    #[serde(default)]
    pub notes: BTreeMap<String, String>,
    #[serde(default)]
    pub wins: Vec<String>,
    #[serde(default)]
    pub confirmed: Confirmations,
    /// Applied after everything else
    #[serde(default)]
    pub reset: Option<ResetScope>,
}

impl SessionScript {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session file {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let script = if is_json {
            serde_json::from_str(&contents)
                .with_context(|| format!("invalid session JSON in {}", path.display()))?
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("invalid session YAML in {}", path.display()))?
        };
        Ok(script)
    }

    /// Replay the script into a fresh session.
    pub fn apply(&self, assessment: Arc<Assessment>) -> Result<SessionState, SessionError> {
        let mut session = match self.authenticated {
            None => SessionState::new(assessment),
            Some(authenticated) => {
                let mut session = SessionState::gated(assessment);
                if authenticated {
                    session.authenticate();
                }
                session
            }
        };

        let by_partner = [
            (Partner::One, &self.ratings.one),
            (Partner::Two, &self.ratings.two),
        ];
        for (partner, ratings) in by_partner {
            for (category, attributes) in ratings {
                for (attribute, value) in attributes {
                    session.set_rating(partner, category, attribute, *value)?;
                }
            }
        }

        for (category, text) in &self.notes {
            session.set_note(category, text.clone())?;
        }

        for win in &self.wins {
            session.log_win(win.clone())?;
        }

        if self.confirmed.one {
            session.confirm(Partner::One)?;
        }
        if self.confirmed.two {
            session.confirm(Partner::Two)?;
        }

        if let Some(scope) = self.reset {
            session.reset(scope);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use synergy_core::{AdviceTag, Reveal, ValidationError};

    fn assessment() -> Arc<Assessment> {
        Arc::new(Assessment::builtin().unwrap())
    }

    const COMPLETE: &str = r#"
ratings:
  one:
    "Household Management":
      Laundry: 4
      "Meal Planning": 4
  two:
    "Household Management":
      Laundry: 1
      "Meal Planning": 1
notes:
  "Household Management": "Laundry pile-ups every Sunday"
wins:
  - "Paid the electricity bill early!"
confirmed:
  one: true
  two: true
"#;

    #[test]
    fn test_complete_script_reveals_report() {
        let script: SessionScript = serde_yaml::from_str(COMPLETE).unwrap();
        let session = script.apply(assessment()).unwrap();

        let reveal = session.results().unwrap();
        let report = reveal.report().unwrap();
        let household = report.category("Household Management").unwrap();

        // (4+4+3+3+3+3)/6 vs (1+1+3+3+3+3)/6
        assert!((household.averages.one - 20.0 / 6.0).abs() < 1e-12);
        assert!((household.averages.two - 14.0 / 6.0).abs() < 1e-12);
        assert_eq!(household.advice.tag, AdviceTag::Balanced);
        assert_eq!(household.note, "Laundry pile-ups every Sunday");
        assert_eq!(report.wins.len(), 1);
    }

    #[test]
    fn test_unconfirmed_script_waits() {
        let script: SessionScript = serde_yaml::from_str("confirmed: { one: true }").unwrap();
        let session = script.apply(assessment()).unwrap();

        match session.results().unwrap() {
            Reveal::Waiting { pending, .. } => assert_eq!(pending, vec![Partner::Two]),
            Reveal::Ready { .. } => panic!("should be waiting"),
        }
    }

    #[test]
    fn test_soft_reset_in_script() {
        let mut script: SessionScript = serde_yaml::from_str(COMPLETE).unwrap();
        script.reset = Some(ResetScope::Soft);
        let session = script.apply(assessment()).unwrap();

        assert!(!session.results().unwrap().is_ready());
        assert_eq!(session.wins().unwrap().len(), 1);
    }

    #[test]
    fn test_locked_script_rejected() {
        let script: SessionScript = serde_yaml::from_str(
            r#"
authenticated: false
wins: ["Cooked dinner"]
"#,
        )
        .unwrap();
        assert_eq!(script.apply(assessment()).unwrap_err(), SessionError::Locked);
    }

    #[test]
    fn test_out_of_range_rating_rejected() {
        let script: SessionScript = serde_yaml::from_str(
            r#"
ratings:
  one:
    "Household Management":
      Laundry: 9
"#,
        )
        .unwrap();
        assert_eq!(
            script.apply(assessment()).unwrap_err(),
            SessionError::Validation(ValidationError::RatingOutOfRange { value: 9 })
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_yaml::from_str::<SessionScript>("ratingz: {}").is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"authenticated": true, "confirmed": {{"one": true, "two": true}}}}"#
        )
        .unwrap();

        let script = SessionScript::from_file(file.path()).unwrap();
        assert_eq!(script.authenticated, Some(true));
        let session = script.apply(assessment()).unwrap();
        assert!(session.results().unwrap().is_ready());
    }
}
