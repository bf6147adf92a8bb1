use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pipeline::domain::{ApplicationId, OfferId};
use crate::pipeline::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Draft,
    Sent,
    Signed,
    Declined,
}

impl OfferStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Signed => "signed",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a sent offer was answered. The conclude operation only accepts these
/// two outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferResolution {
    Signed,
    Declined,
}

/// An offer drafted for one application: draft → sent → signed / declined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub application_id: ApplicationId,
    pub status: OfferStatus,
    pub drafted_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub signed_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
}

impl Offer {
    pub fn draft(id: OfferId, application_id: ApplicationId) -> Self {
        Self {
            id,
            application_id,
            status: OfferStatus::Draft,
            drafted_at: Utc::now(),
            sent_at: None,
            signed_at: None,
            declined_at: None,
        }
    }

    /// Marks the offer as sent to the seeker, stamping `sent_at`.
    pub fn send(&mut self) -> Result<(), ValidationError> {
        if self.status != OfferStatus::Draft {
            return Err(ValidationError::OfferAlreadySent(self.status));
        }
        self.status = OfferStatus::Sent;
        self.sent_at = Some(Utc::now());
        Ok(())
    }

    /// Resolves a sent offer, stamping `signed_at` or `declined_at`.
    pub fn conclude(&mut self, resolution: OfferResolution) -> Result<(), ValidationError> {
        match self.status {
            OfferStatus::Sent => {}
            OfferStatus::Draft => return Err(ValidationError::OfferNotSent),
            OfferStatus::Signed | OfferStatus::Declined => {
                return Err(ValidationError::OfferClosed(self.status))
            }
        }

        let now = Utc::now();
        match resolution {
            OfferResolution::Signed => {
                self.status = OfferStatus::Signed;
                self.signed_at = Some(now);
            }
            OfferResolution::Declined => {
                self.status = OfferStatus::Declined;
                self.declined_at = Some(now);
            }
        }
        Ok(())
    }
}
