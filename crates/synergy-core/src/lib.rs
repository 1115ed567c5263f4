//! # synergy-core
//!
//! Deterministic scoring and advice engine for a two-partner relationship
//! self-assessment.
//!
//! Each partner rates themselves 1 (comes easily) to 5 (a struggle) on the
//! attributes of every category. The engine answers:
//! - How does each partner score per category?
//! - Is the category a shared struggle, a chance for one partner to lead,
//!   or balanced?
//! - May results be shown yet?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same ratings always produce the same advice
//! 2. **Validated up front**: An `Assessment` only exists once its schema and
//!    advice table are complete
//! 3. **No silent coercion**: Out-of-range ratings are rejected, never clamped
//! 4. **Isolated sessions**: All mutable state lives in an explicit `SessionState`
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use synergy_core::{Assessment, Partner, Reveal, SessionState};
//!
//! let assessment = Arc::new(Assessment::builtin()?);
//! let mut session = SessionState::new(assessment);
//!
//! session.set_rating(Partner::One, "Household Management", "Laundry", 5)?;
//! session.confirm(Partner::One)?;
//! session.confirm(Partner::Two)?;
//!
//! match session.results()? {
//!     Reveal::Ready { report } => println!("{} categories", report.categories.len()),
//!     Reveal::Waiting { message, .. } => println!("{}", message),
//! }
//! ```

pub mod advice;
pub mod assessment;
pub mod averaging;
pub mod handshake;
pub mod report;
pub mod scoring;
pub mod session;
pub mod types;

// Re-export main types at crate root
pub use advice::{classify, AdviceEngine};
pub use assessment::{AdviceTemplates, Assessment, Category, ConfigurationError, Thresholds};
pub use averaging::{average_for, averages_for};
pub use handshake::{Handshake, HandshakeStatus};
pub use report::{AdviceSummary, CategoryReport, RadarChart, RadarSeries, Report};
pub use scoring::ScoringStore;
pub use session::{ResetScope, Reveal, SessionError, SessionState, WinEntry};
pub use types::{
    AdviceResult, AdviceTag, Partner, PartnerAverages, PartnerLabels, Rating, ValidationError,
    DEFAULT_RATING, MAX_RATING, MIN_RATING,
};

use std::sync::Arc;
use thiserror::Error;

/// Any error the engine can produce.
#[derive(Error, Debug)]
pub enum SynergyError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Advice for one category of an assessment.
///
/// Convenience wrapper that builds an `AdviceEngine` with the assessment's
/// thresholds. Use the engine directly when advising many categories.
pub fn advise(
    assessment: &Arc<Assessment>,
    category: &str,
    p1_average: f64,
    p2_average: f64,
) -> Result<AdviceResult, SynergyError> {
    let engine = AdviceEngine::new(Arc::clone(assessment));
    Ok(engine.advice_for(category, p1_average, p2_average)?)
}
