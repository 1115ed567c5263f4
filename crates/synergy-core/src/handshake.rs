//! Completion handshake: both partners must confirm before results show.

use serde::{Deserialize, Serialize};

use crate::types::{Partner, PartnerLabels};

/// Whether results may be revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HandshakeStatus {
    /// Both partners have confirmed.
    Ready,

    /// At least one partner has not confirmed yet.
    Waiting { pending: Vec<Partner> },
}

impl HandshakeStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, HandshakeStatus::Ready)
    }
}

/// One completion flag per partner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
    one: bool,
    two: bool,
}

impl Handshake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a partner as finished.
    pub fn confirm(&mut self, partner: Partner) {
        *self.flag_mut(partner) = true;
    }

    /// Clear a partner's confirmation. Results hide again immediately.
    pub fn withdraw(&mut self, partner: Partner) {
        *self.flag_mut(partner) = false;
    }

    pub fn is_confirmed(&self, partner: Partner) -> bool {
        match partner {
            Partner::One => self.one,
            Partner::Two => self.two,
        }
    }

    pub fn status(&self) -> HandshakeStatus {
        let pending: Vec<Partner> = Partner::BOTH
            .into_iter()
            .filter(|p| !self.is_confirmed(*p))
            .collect();

        if pending.is_empty() {
            HandshakeStatus::Ready
        } else {
            HandshakeStatus::Waiting { pending }
        }
    }

    /// Human-readable waiting message, or `None` once both have confirmed.
    pub fn waiting_message(&self, labels: &PartnerLabels) -> Option<String> {
        match self.status() {
            HandshakeStatus::Ready => None,
            HandshakeStatus::Waiting { pending } => {
                let names: Vec<&str> = pending.iter().map(|p| labels.label(*p)).collect();
                Some(format!(
                    "Waiting for {} to confirm completion.",
                    names.join(" and ")
                ))
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    fn flag_mut(&mut self, partner: Partner) -> &mut bool {
        match partner {
            Partner::One => &mut self.one,
            Partner::Two => &mut self.two,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_waiting_for_both() {
        let handshake = Handshake::new();
        assert_eq!(
            handshake.status(),
            HandshakeStatus::Waiting {
                pending: vec![Partner::One, Partner::Two]
            }
        );
        assert_eq!(
            handshake.waiting_message(&PartnerLabels::default()).unwrap(),
            "Waiting for Partner 1 and Partner 2 to confirm completion."
        );
    }

    #[test]
    fn test_ready_only_when_both_confirm() {
        let mut handshake = Handshake::new();
        handshake.confirm(Partner::Two);
        assert_eq!(
            handshake.status(),
            HandshakeStatus::Waiting {
                pending: vec![Partner::One]
            }
        );

        handshake.confirm(Partner::One);
        assert!(handshake.status().is_ready());
        assert!(handshake.waiting_message(&PartnerLabels::default()).is_none());
    }

    #[test]
    fn test_withdraw_hides_again() {
        let mut handshake = Handshake::new();
        handshake.confirm(Partner::One);
        handshake.confirm(Partner::Two);
        handshake.withdraw(Partner::One);

        assert!(!handshake.status().is_ready());
        let labels = PartnerLabels {
            one: "Sam".to_string(),
            two: "Alex".to_string(),
        };
        assert_eq!(
            handshake.waiting_message(&labels).unwrap(),
            "Waiting for Sam to confirm completion."
        );
    }

    #[test]
    fn test_confirm_is_idempotent() {
        let mut handshake = Handshake::new();
        handshake.confirm(Partner::One);
        handshake.confirm(Partner::One);
        assert!(handshake.is_confirmed(Partner::One));
        assert!(!handshake.is_confirmed(Partner::Two));
    }
}
