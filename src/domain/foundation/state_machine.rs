//! Transition rules for lifecycle statuses.

use std::fmt::Debug;

use super::ValidationError;

/// A status enum whose moves are fixed by a successor table.
///
/// ```ignore
/// impl StateMachine for TicketStatus {
///     fn successors(&self) -> &'static [Self] {
///         match self {
///             TicketStatus::Active => &[TicketStatus::Returned],
///             TicketStatus::Returned => &[],
///         }
///     }
/// }
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + Debug + 'static {
    /// Statuses reachable in one step.
    fn successors(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.successors().contains(target)
    }

    /// Returns `target` if the move is allowed.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` on the `status` field otherwise.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "status",
                format!("{:?} cannot move to {:?}", self, target),
            ))
        }
    }

    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}
