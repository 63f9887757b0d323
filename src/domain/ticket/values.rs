//! Value objects carried by a ticket.

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the passenger paid for the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    /// Faster Payments System transfer.
    Sbp,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Sbp => "sbp",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "sbp" => Ok(PaymentMethod::Sbp),
            other => Err(ValidationError::invalid_format(
                "payment_method",
                format!("unknown payment method '{}'", other),
            )),
        }
    }
}

/// Optional passenger details printed on the ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Identity document number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Passenger {
    /// Anonymous passenger (cash sale at the counter).
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Trims every field and drops the blank ones.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: clean(self.name),
            document: clean(self.document),
            phone: clean(self.phone),
            email: clean(self.email),
        }
    }

    /// Checks the fields that have a format.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for an e-mail without `@`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ValidationError::invalid_format(
                    "passenger.email",
                    "must contain '@'",
                ));
            }
        }
        Ok(())
    }
}
