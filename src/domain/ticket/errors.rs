//! Errors returned by ticket operations.
//!
//! # Transport Mapping
//!
//! | Kind | HTTP Status |
//! |------|-------------|
//! | Validation | 400 |
//! | NotFound | 404 |
//! | Conflict | 409 |
//! | Unavailable | 503 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, TicketId, ValidationError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Coarse classification used by transports and retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unavailable,
    Infrastructure,
}

/// What could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundTarget {
    Ticket(TicketId),
    /// QR or barcode that resolves to no ticket.
    Code(String),
}

impl fmt::Display for NotFoundTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundTarget::Ticket(id) => write!(f, "ticket {}", id),
            NotFoundTarget::Code(code) => write!(f, "ticket with code {}", code),
        }
    }
}

/// Why a state-changing operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictReason {
    SeatTaken,
    BoardingAlreadyStarted,
    BoardingNotStarted,
    AlreadyMarked,
    TicketNotActive,
}

impl ConflictReason {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConflictReason::SeatTaken => ErrorCode::SeatTaken,
            ConflictReason::BoardingAlreadyStarted => ErrorCode::BoardingAlreadyStarted,
            ConflictReason::BoardingNotStarted => ErrorCode::BoardingNotStarted,
            ConflictReason::AlreadyMarked => ErrorCode::AlreadyMarked,
            ConflictReason::TicketNotActive => ErrorCode::TicketNotActive,
        }
    }

    fn from_code(code: ErrorCode) -> Option<Self> {
        match code {
            ErrorCode::SeatTaken => Some(ConflictReason::SeatTaken),
            ErrorCode::BoardingAlreadyStarted => Some(ConflictReason::BoardingAlreadyStarted),
            ErrorCode::BoardingNotStarted => Some(ConflictReason::BoardingNotStarted),
            ErrorCode::AlreadyMarked => Some(ConflictReason::AlreadyMarked),
            ErrorCode::TicketNotActive => Some(ConflictReason::TicketNotActive),
            _ => None,
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictReason::SeatTaken => "seat is already taken on this trip",
            ConflictReason::BoardingAlreadyStarted => "boarding has already started for this trip",
            ConflictReason::BoardingNotStarted => "boarding has not started for this trip",
            ConflictReason::AlreadyMarked => "ticket is already marked as boarded",
            ConflictReason::TicketNotActive => "ticket is not active",
        };
        f.write_str(s)
    }
}

/// Ticket operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Not found: {0}")]
    NotFound(NotFoundTarget),

    #[error("Conflict: {0}")]
    Conflict(ConflictReason),

    /// Transient failure; safe to retry.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Non-retryable store fault, e.g. an unreadable row.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl TicketError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TicketError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn ticket_not_found(id: TicketId) -> Self {
        TicketError::NotFound(NotFoundTarget::Ticket(id))
    }

    pub fn code_not_found(code: impl Into<String>) -> Self {
        TicketError::NotFound(NotFoundTarget::Code(code.into()))
    }

    pub fn conflict(reason: ConflictReason) -> Self {
        TicketError::Conflict(reason)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        TicketError::Unavailable(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        TicketError::Infrastructure(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TicketError::Validation { .. } => ErrorKind::Validation,
            TicketError::NotFound(_) => ErrorKind::NotFound,
            TicketError::Conflict(_) => ErrorKind::Conflict,
            TicketError::Unavailable(_) => ErrorKind::Unavailable,
            TicketError::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TicketError::Validation { .. } => ErrorCode::ValidationFailed,
            TicketError::NotFound(_) => ErrorCode::TicketNotFound,
            TicketError::Conflict(reason) => reason.code(),
            TicketError::Unavailable(_) => ErrorCode::ServiceUnavailable,
            TicketError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns true if the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TicketError::Unavailable(_))
    }

    /// The conflict reason, if this is a conflict.
    pub fn conflict_reason(&self) -> Option<ConflictReason> {
        match self {
            TicketError::Conflict(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<ValidationError> for TicketError {
    fn from(err: ValidationError) -> Self {
        TicketError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for TicketError {
    fn from(err: DomainError) -> Self {
        if let Some(reason) = ConflictReason::from_code(err.code) {
            return TicketError::Conflict(reason);
        }

        match err.code {
            ErrorCode::ValidationFailed => TicketError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::TicketNotFound => {
                let target = err
                    .details
                    .get("ticket_id")
                    .and_then(|id| id.parse::<TicketId>().ok())
                    .map(NotFoundTarget::Ticket)
                    .unwrap_or_else(|| {
                        NotFoundTarget::Code(
                            err.details.get("code").cloned().unwrap_or(err.message),
                        )
                    });
                TicketError::NotFound(target)
            }
            ErrorCode::Timeout
            | ErrorCode::ServiceUnavailable
            | ErrorCode::DatabaseError
            | ErrorCode::CacheError
            | ErrorCode::CodeCollision => TicketError::Unavailable(err.to_string()),
            _ => TicketError::Infrastructure(err.to_string()),
        }
    }
}

impl From<TicketError> for DomainError {
    fn from(err: TicketError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_retryable() {
        assert!(TicketError::unavailable("pool timed out").is_retryable());
        assert!(!TicketError::infrastructure("bad row").is_retryable());
        assert!(!TicketError::conflict(ConflictReason::SeatTaken).is_retryable());
        assert!(!TicketError::validation("price", "must be positive").is_retryable());
        assert!(!TicketError::ticket_not_found(TicketId::new()).is_retryable());
    }

    #[test]
    fn conflict_codes_are_specific() {
        assert_eq!(
            TicketError::conflict(ConflictReason::AlreadyMarked).code(),
            ErrorCode::AlreadyMarked
        );
        assert_eq!(
            TicketError::conflict(ConflictReason::BoardingAlreadyStarted).kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn domain_conflict_codes_become_conflicts() {
        let err: TicketError = DomainError::new(ErrorCode::SeatTaken, "seat 4").into();
        assert_eq!(err, TicketError::Conflict(ConflictReason::SeatTaken));

        let err: TicketError = DomainError::new(ErrorCode::TicketNotActive, "returned").into();
        assert_eq!(err.conflict_reason(), Some(ConflictReason::TicketNotActive));
    }

    #[test]
    fn domain_not_found_recovers_ticket_id() {
        let id = TicketId::new();
        let err: TicketError = DomainError::new(ErrorCode::TicketNotFound, "missing")
            .with_detail("ticket_id", id.to_string())
            .into();
        assert_eq!(err, TicketError::ticket_not_found(id));
    }

    #[test]
    fn database_errors_are_unavailable_and_internal_errors_are_not() {
        let err: TicketError = DomainError::new(ErrorCode::DatabaseError, "reset").into();
        assert_eq!(err.kind(), ErrorKind::Unavailable);

        let err: TicketError = DomainError::new(ErrorCode::InternalError, "bad status").into();
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
    }

    #[test]
    fn validation_error_keeps_field() {
        let err: TicketError = ValidationError::empty_field("seat_id").into();
        assert!(matches!(err, TicketError::Validation { ref field, .. } if field == "seat_id"));
    }

    #[test]
    fn display_reads_naturally() {
        let err = TicketError::conflict(ConflictReason::BoardingNotStarted);
        assert_eq!(
            err.to_string(),
            "Conflict: boarding has not started for this trip"
        );
    }
}
