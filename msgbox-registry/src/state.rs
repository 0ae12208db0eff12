//! Committed registry state and its two transitions.
//!
//! Operations are pure precondition-check-then-apply: they take the state by
//! value and return either a fresh state (plus, for deposits, the event to
//! log) or a [`RejectReason`], never mutating anything on failure. The
//! caller's execution environment is responsible for serializing commits;
//! see [`MessageBox`](crate::MessageBox).

use halo2curves_axiom::bn256::Fr;
use msgbox_common::IdentityDigest;
use msgbox_map::{empty_root, Witness};
use serde::{Deserialize, Serialize};

use crate::{error::RejectReason, event::Event, message::Message, slot::Slot};

/// Capacity bound on the registry.
pub const MAX_ADDRESS_COUNT: u32 = 100;

/// The entire persisted state of the system.
///
/// Created once at deployment; mutated only by [`register`](Self::register)
/// (map root, registered count) and [`deposit`](Self::deposit) (map root,
/// deposited count).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    /// Digest of the administrator identity. Never used as a map key.
    pub admin_digest: IdentityDigest,
    /// Root commitment over the full identity-slot assignment.
    #[serde(with = "msgbox_common::serde_fr_bytes")]
    pub map_root: Fr,
    /// Number of identities admitted so far.
    pub registered_count: u32,
    /// Number of slots currently holding a payload.
    pub deposited_count: u32,
}

impl RegistryState {
    /// Deployment state: empty map, zero counters.
    pub fn new(admin_digest: IdentityDigest) -> Self {
        Self {
            admin_digest,
            map_root: empty_root(),
            registered_count: 0,
            deposited_count: 0,
        }
    }

    /// Resolve the slot value this witness proves for `key` under the
    /// current root.
    ///
    /// The registry only ever writes the placeholder or a predicate-valid
    /// payload, so the set of values a slot can hold is closed and small;
    /// probing it decides between a genuine slot state and a witness that
    /// proves nothing against the current root (stale or forged).
    fn provable_slot(&self, key: &Fr, witness: &Witness) -> Option<Slot> {
        let mut candidates = vec![Slot::Empty, Slot::Placeholder];
        candidates.extend(Message::accepted().into_iter().map(Slot::Payload));
        candidates
            .into_iter()
            .find(|slot| witness.verifies(&self.map_root, key, slot.to_field()))
    }

    /// Admit `candidate` into the registry.
    ///
    /// Preconditions, checked in order: the caller is the administrator,
    /// the registry has capacity, and the witness proves the candidate's
    /// slot is still empty under the current root. On success the slot
    /// becomes the placeholder and the root and registered count move
    /// together. No event is emitted.
    pub fn register(
        self,
        caller: &IdentityDigest,
        candidate: &IdentityDigest,
        witness: &Witness,
    ) -> Result<RegistryState, RejectReason> {
        if *caller != self.admin_digest {
            return Err(RejectReason::Unauthorized);
        }
        if self.registered_count >= MAX_ADDRESS_COUNT {
            return Err(RejectReason::CapacityExceeded);
        }

        let key = candidate.as_fr();
        match self.provable_slot(key, witness) {
            Some(Slot::Empty) => {}
            Some(_) => return Err(RejectReason::AlreadyRegistered),
            None => return Err(RejectReason::StaleOrInvalidWitness),
        }

        Ok(RegistryState {
            map_root: witness.new_root(key, Slot::Placeholder.to_field()),
            registered_count: self.registered_count + 1,
            ..self
        })
    }

    /// Deposit `message` into the caller's own slot.
    ///
    /// The witness must prove the caller's slot holds exactly the
    /// placeholder: an empty slot rejects as never registered, an existing
    /// payload as already deposited. The message must then satisfy the
    /// validity predicate. On success the slot becomes the payload and the
    /// returned event records the deposit.
    pub fn deposit(
        self,
        caller: &IdentityDigest,
        message: Message,
        witness: &Witness,
    ) -> Result<(RegistryState, Event), RejectReason> {
        let key = caller.as_fr();
        match self.provable_slot(key, witness) {
            Some(Slot::Placeholder) => {}
            Some(Slot::Empty) => return Err(RejectReason::NotRegistered),
            Some(Slot::Payload(_)) => return Err(RejectReason::AlreadyDeposited),
            None => return Err(RejectReason::StaleOrInvalidWitness),
        }

        if !message.is_valid() {
            return Err(RejectReason::InvalidMessage);
        }

        let next = RegistryState {
            map_root: witness.new_root(key, Slot::Payload(message).to_field()),
            deposited_count: self.deposited_count + 1,
            ..self
        };
        let event = Event {
            identity_digest: *caller,
            message,
        };
        Ok((next, event))
    }
}
