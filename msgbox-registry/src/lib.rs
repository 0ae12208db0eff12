//! Authenticated registry and one-shot message deposit.
//!
//! A trusted administrator admits up to [`MAX_ADDRESS_COUNT`] identities
//! into a registry committed as a sparse Merkle map; each admitted identity
//! may then deposit exactly one predicate-valid message. Every mutation
//! carries a membership witness tied to the current map root, so a verifier
//! decides admissibility without ever holding the full map.
//!
//! # Slot lifecycle
//!
//! ```text
//! Empty --register--> Placeholder --deposit--> Payload(message)
//! ```
//!
//! `Payload` is terminal; no operation moves a slot backward.
//!
//! # Concurrency
//!
//! Witness verification is exact-root-match, so a witness generated before
//! any intervening commit is rejected as stale and the caller re-fetches
//! from the mirror. That optimistic check is the only concurrency control;
//! [`MessageBox`] assumes its owner serializes calls.

pub mod error;
pub mod event;
pub mod message;
pub mod slot;
pub mod state;

pub use error::RejectReason;
pub use event::{Event, EventLog};
pub use message::{Message, MessageFlags, MAX_FLAGS};
pub use slot::{Slot, PLACEHOLDER_VALUE};
pub use state::{RegistryState, MAX_ADDRESS_COUNT};

use halo2curves_axiom::bn256::Fr;
use msgbox_common::{identity_digest, Identity, IdentityDigest};
use msgbox_map::Witness;

/// Owns one [`RegistryState`] plus the deposit log, applying operations
/// atomically in call order.
///
/// This is the execution-environment seam: callers are authenticated
/// upstream and present their identity explicitly, and concurrent access is
/// expected to be serialized outside (a mutex around the box, or a
/// single-threaded command loop).
#[derive(Clone, Debug)]
pub struct MessageBox {
    state: RegistryState,
    events: EventLog,
}

impl MessageBox {
    /// Deploy a new registry with `admin` as the administrator.
    pub fn new(admin: &Identity) -> Self {
        Self {
            state: RegistryState::new(identity_digest(admin)),
            events: EventLog::new(),
        }
    }

    /// Admin-gated registration of `candidate`. See
    /// [`RegistryState::register`] for the precondition order.
    pub fn register(
        &mut self,
        caller: &Identity,
        candidate: &Identity,
        witness: &Witness,
    ) -> Result<(), RejectReason> {
        let caller_digest = identity_digest(caller);
        let candidate_digest = identity_digest(candidate);
        match self.state.register(&caller_digest, &candidate_digest, witness) {
            Ok(next) => {
                self.state = next;
                tracing::info!(
                    registered = self.state.registered_count,
                    "identity registered"
                );
                Ok(())
            }
            Err(reason) => {
                tracing::warn!(%reason, "registration rejected");
                Err(reason)
            }
        }
    }

    /// Deposit `message` into the caller's own slot. See
    /// [`RegistryState::deposit`].
    pub fn deposit(
        &mut self,
        caller: &Identity,
        message: Message,
        witness: &Witness,
    ) -> Result<(), RejectReason> {
        let caller_digest = identity_digest(caller);
        match self.state.deposit(&caller_digest, message, witness) {
            Ok((next, event)) => {
                self.state = next;
                self.events.append(event);
                tracing::info!(
                    deposited = self.state.deposited_count,
                    "message deposited"
                );
                Ok(())
            }
            Err(reason) => {
                tracing::warn!(%reason, "deposit rejected");
                Err(reason)
            }
        }
    }

    pub fn admin_digest(&self) -> &IdentityDigest {
        &self.state.admin_digest
    }

    pub fn map_root(&self) -> &Fr {
        &self.state.map_root
    }

    pub fn registered_count(&self) -> u32 {
        self.state.registered_count
    }

    pub fn deposited_count(&self) -> u32 {
        self.state.deposited_count
    }

    /// Deposit events in commit order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Snapshot of the committed state.
    pub fn state(&self) -> &RegistryState {
        &self.state
    }
}
