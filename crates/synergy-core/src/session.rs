//! Session state: the aggregate owning everything one couple enters.
//!
//! Each session is an isolated value. Reset is a direct field clear with two
//! scopes:
//! - `Soft` clears ratings, notes and confirmations
//! - `Hard` additionally drops authentication
//!
//! The win log survives both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::advice::AdviceEngine;
use crate::assessment::{Assessment, Thresholds};
use crate::handshake::{Handshake, HandshakeStatus};
use crate::report::Report;
use crate::scoring::ScoringStore;
use crate::types::{Partner, Rating, ValidationError};

/// Errors from session operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Session is locked: authenticate first")]
    Locked,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// How much of the session a reset clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetScope {
    /// Ratings, notes and confirmations. Keeps wins and authentication.
    Soft,

    /// Everything `Soft` clears, plus authentication.
    Hard,
}

/// A logged achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinEntry {
    pub text: String,
    pub logged_at: DateTime<Utc>,
}

/// Outcome of asking for results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reveal {
    /// Both partners confirmed; here are the results.
    Ready { report: Box<Report> },

    /// Results are hidden until the listed partners confirm.
    Waiting {
        pending: Vec<Partner>,
        message: String,
    },
}

impl Reveal {
    pub fn is_ready(&self) -> bool {
        matches!(self, Reveal::Ready { .. })
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            Reveal::Ready { report } => Some(report.as_ref()),
            Reveal::Waiting { .. } => None,
        }
    }
}

/// All state for one interactive session.
#[derive(Debug, Clone)]
pub struct SessionState {
    assessment: Arc<Assessment>,
    engine: AdviceEngine,
    scores: ScoringStore,
    notes: HashMap<String, String>,
    handshake: Handshake,
    wins: Vec<WinEntry>,
    gated: bool,
    authenticated: bool,
}

impl SessionState {
    /// An open session with no authentication gate.
    pub fn new(assessment: Arc<Assessment>) -> Self {
        Self::build(assessment, false)
    }

    /// A session that refuses every operation until `authenticate` is called.
    pub fn gated(assessment: Arc<Assessment>) -> Self {
        Self::build(assessment, true)
    }

    fn build(assessment: Arc<Assessment>, gated: bool) -> Self {
        Self {
            engine: AdviceEngine::new(Arc::clone(&assessment)),
            scores: ScoringStore::new(Arc::clone(&assessment)),
            assessment,
            notes: HashMap::new(),
            handshake: Handshake::new(),
            wins: Vec::new(),
            gated,
            authenticated: !gated,
        }
    }

    /// Override the advice thresholds for this session.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.engine = self.engine.with_thresholds(thresholds);
        self
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn is_gated(&self) -> bool {
        self.gated
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Record that the authentication collaborator accepted the user.
    pub fn authenticate(&mut self) {
        if !self.authenticated {
            tracing::info!("Session authenticated");
        }
        self.authenticated = true;
    }

    fn ensure_unlocked(&self) -> Result<(), SessionError> {
        if self.authenticated {
            Ok(())
        } else {
            tracing::warn!("Rejected operation on locked session");
            Err(SessionError::Locked)
        }
    }

    pub fn set_rating(
        &mut self,
        partner: Partner,
        category: &str,
        attribute: &str,
        value: i64,
    ) -> Result<Rating, SessionError> {
        self.ensure_unlocked()?;
        self.scores
            .set_rating(partner, category, attribute, value)
            .map_err(|e| {
                tracing::warn!(partner = %partner, category, attribute, value, error = %e, "Rating rejected");
                SessionError::from(e)
            })
    }

    pub fn rating(
        &self,
        partner: Partner,
        category: &str,
        attribute: &str,
    ) -> Result<Rating, SessionError> {
        self.ensure_unlocked()?;
        Ok(self.scores.get_rating(partner, category, attribute)?)
    }

    /// Replace the note for a category. The text is stored as given.
    pub fn set_note(
        &mut self,
        category: &str,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.ensure_unlocked()?;
        self.assessment.require_category(category)?;
        self.notes.insert(category.to_string(), text.into());
        Ok(())
    }

    /// The note for a category; empty if none was written.
    pub fn note(&self, category: &str) -> Result<&str, SessionError> {
        self.ensure_unlocked()?;
        self.assessment.require_category(category)?;
        Ok(self.notes.get(category).map(String::as_str).unwrap_or(""))
    }

    pub fn confirm(&mut self, partner: Partner) -> Result<(), SessionError> {
        self.ensure_unlocked()?;
        self.handshake.confirm(partner);
        tracing::info!(partner = %partner, "Completion confirmed");
        Ok(())
    }

    pub fn withdraw(&mut self, partner: Partner) -> Result<(), SessionError> {
        self.ensure_unlocked()?;
        self.handshake.withdraw(partner);
        tracing::info!(partner = %partner, "Completion withdrawn");
        Ok(())
    }

    pub fn handshake(&self) -> &Handshake {
        &self.handshake
    }

    /// Append a win. Blank text is ignored and reported as `false`.
    pub fn log_win(&mut self, text: impl Into<String>) -> Result<bool, SessionError> {
        self.ensure_unlocked()?;
        let text = text.into();
        if text.trim().is_empty() {
            return Ok(false);
        }

        self.wins.push(WinEntry {
            text,
            logged_at: Utc::now(),
        });
        tracing::info!(total = self.wins.len(), "Win logged");
        Ok(true)
    }

    pub fn wins(&self) -> Result<&[WinEntry], SessionError> {
        self.ensure_unlocked()?;
        Ok(&self.wins)
    }

    /// Results if both partners have confirmed, otherwise a waiting state.
    pub fn results(&self) -> Result<Reveal, SessionError> {
        self.ensure_unlocked()?;

        match self.handshake.status() {
            HandshakeStatus::Ready => {
                let report = Report::build(&self.scores, &self.engine, &self.notes, &self.wins)?;
                tracing::info!(
                    categories = report.categories.len(),
                    "Report generated"
                );
                Ok(Reveal::Ready {
                    report: Box::new(report),
                })
            }
            HandshakeStatus::Waiting { pending } => {
                let message = self
                    .handshake
                    .waiting_message(self.assessment.partners())
                    .unwrap_or_default();
                Ok(Reveal::Waiting { pending, message })
            }
        }
    }

    /// Clear session state. Wins are never cleared.
    pub fn reset(&mut self, scope: ResetScope) {
        self.scores.clear();
        self.notes.clear();
        self.handshake.clear();

        if scope == ResetScope::Hard {
            self.authenticated = !self.gated;
        }

        tracing::info!(scope = ?scope, wins_kept = self.wins.len(), "Session reset");
    }
}
