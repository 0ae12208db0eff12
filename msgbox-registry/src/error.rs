//! Rejection taxonomy for registry operations.

use thiserror::Error;

/// Why an attempted operation was rejected.
///
/// Every precondition failure maps to exactly one variant, and a rejected
/// operation leaves the registry state untouched. Nothing is retried
/// internally; after [`StaleOrInvalidWitness`](RejectReason::StaleOrInvalidWitness)
/// in particular, the caller is expected to fetch a fresh witness from the
/// mirror and try again.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Caller digest does not match the stored administrator digest.
    #[error("caller is not the registry administrator")]
    Unauthorized,

    /// Registration attempted with the registry at capacity.
    #[error("registry is at capacity")]
    CapacityExceeded,

    /// Witness proves a non-empty slot for the registration candidate.
    #[error("identity is already registered")]
    AlreadyRegistered,

    /// Witness proves an empty slot for the depositing caller.
    #[error("caller is not registered")]
    NotRegistered,

    /// Witness proves an existing payload for the depositing caller.
    #[error("caller has already deposited a message")]
    AlreadyDeposited,

    /// Message does not match any accepted flag pattern.
    #[error("message does not match any accepted flag pattern")]
    InvalidMessage,

    /// Witness does not fold to the current map root under any slot value
    /// the registry could have written.
    #[error("witness does not fold to the current map root")]
    StaleOrInvalidWitness,
}
