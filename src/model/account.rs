use std::fmt;

use crate::{api::bank, Error, Result};

/// A bank account as served by the account service. Read-only; fetched once
/// per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub risk_score: i64,
    pub home_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerKind {
    Donator,
    Advisee,
}

impl CustomerKind {
    /// Scores above 70 get pointed at debt advice instead of a donation.
    /// Out-of-range scores are accepted as-is.
    pub fn classify(risk_score: i64) -> Self {
        if risk_score > 70 {
            CustomerKind::Advisee
        } else {
            CustomerKind::Donator
        }
    }
}

impl fmt::Display for CustomerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerKind::Donator => write!(f, "donator"),
            CustomerKind::Advisee => write!(f, "advisee"),
        }
    }
}

impl Account {
    pub fn customer_kind(&self) -> CustomerKind {
        CustomerKind::classify(self.risk_score)
    }

    /// The customer's area, taken as the second comma-separated component of
    /// the home address (`"123 Main St, Springfield, UK"` -> `"Springfield"`).
    pub fn customer_area(&self) -> Result<String> {
        self.home_address
            .split(',')
            .nth(1)
            .map(|area| area.trim_start().to_owned())
            .filter(|area| !area.is_empty())
            .ok_or_else(|| Error::MalformedResponse {
                service: bank::SERVICE,
                detail: format!("home address `{}` has no area component", self.home_address),
            })
    }
}
