//! Per-identity slot lifecycle and its committed encoding.

use halo2curves_axiom::{bn256::Fr, ff::Field};
use serde::{Deserialize, Serialize};

use crate::message::{Message, MAX_FLAGS};

/// Committed encoding of [`Slot::Placeholder`]: the first value above the
/// flag space, so it can neither collide with the map's default value nor
/// satisfy the message validity predicate.
pub const PLACEHOLDER_VALUE: u64 = 1 << MAX_FLAGS;

/// Lifecycle state of one identity's map entry.
///
/// Slots only ever move forward: `Empty` to `Placeholder` at registration,
/// `Placeholder` to `Payload` at deposit. `Payload` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    /// The map's default value; identity not registered.
    Empty,
    /// Registered, no payload yet.
    Placeholder,
    /// A deposited message value.
    Payload(Message),
}

impl Slot {
    /// The field element this slot commits to in the map.
    pub fn to_field(self) -> Fr {
        match self {
            Slot::Empty => Fr::zero(),
            Slot::Placeholder => Fr::from(PLACEHOLDER_VALUE),
            Slot::Payload(message) => message.as_field(),
        }
    }

    /// Decode a committed leaf value back into a slot.
    ///
    /// Unambiguous for every value the registry ever writes: the validity
    /// predicate keeps payloads away from both sentinels.
    pub fn from_field(value: Fr) -> Self {
        if value == Fr::zero() {
            Slot::Empty
        } else if value == Fr::from(PLACEHOLDER_VALUE) {
            Slot::Placeholder
        } else {
            Slot::Payload(Message::from_field(value))
        }
    }
}
