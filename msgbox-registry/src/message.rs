//! Deposit messages and the flag-pattern validity predicate.
//!
//! A message is a field element carrying six boolean flags in its low bits
//! (`flag1` at bit 0 through `flag6` at bit 5), all higher bits zero. The
//! predicate accepts exactly three mutually exclusive patterns, so a valid
//! message signals one of three categories with no ambiguity, and validity
//! is checkable with pure boolean logic over the committed value.

use halo2curves_axiom::bn256::Fr;
use msgbox_common::fr_to_bytes;
use serde::{Deserialize, Serialize};

/// Number of flag bits a message carries.
pub const MAX_FLAGS: usize = 6;

/// A candidate deposit payload.
///
/// Any field element can be wrapped; [`Message::is_valid`] decides whether
/// the deposit operation will accept it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message(#[serde(with = "msgbox_common::serde_fr_bytes")] Fr);

/// The six message flags, all false by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFlags {
    pub flag1: bool,
    pub flag2: bool,
    pub flag3: bool,
    pub flag4: bool,
    pub flag5: bool,
    pub flag6: bool,
}

impl MessageFlags {
    /// The three-pattern validity predicate.
    ///
    /// - A: `flag1` set, all others clear.
    /// - B: `flag2` and `flag3` set, all others clear.
    /// - C: `flag4` set, all others clear.
    ///
    /// The patterns partition the accepted space: no flag combination
    /// satisfies two of them at once.
    pub fn is_valid(&self) -> bool {
        let pattern_a =
            self.flag1 && !self.flag2 && !self.flag3 && !self.flag4 && !self.flag5 && !self.flag6;
        let pattern_b =
            self.flag2 && self.flag3 && !self.flag1 && !self.flag4 && !self.flag5 && !self.flag6;
        let pattern_c =
            self.flag4 && !self.flag5 && !self.flag6 && !self.flag1 && !self.flag2 && !self.flag3;
        pattern_a || pattern_b || pattern_c
    }

    fn to_bits(self) -> u8 {
        (self.flag1 as u8)
            | (self.flag2 as u8) << 1
            | (self.flag3 as u8) << 2
            | (self.flag4 as u8) << 3
            | (self.flag5 as u8) << 4
            | (self.flag6 as u8) << 5
    }

    fn from_bits(bits: u8) -> Self {
        Self {
            flag1: bits & 1 != 0,
            flag2: bits & (1 << 1) != 0,
            flag3: bits & (1 << 2) != 0,
            flag4: bits & (1 << 3) != 0,
            flag5: bits & (1 << 4) != 0,
            flag6: bits & (1 << 5) != 0,
        }
    }
}

impl Message {
    /// Pack flags into a message value.
    pub fn from_flags(flags: MessageFlags) -> Self {
        Self(Fr::from(flags.to_bits() as u64))
    }

    /// Wrap an arbitrary field element as a candidate message.
    pub fn from_field(value: Fr) -> Self {
        Self(value)
    }

    pub fn as_field(&self) -> Fr {
        self.0
    }

    /// Decode the flag bits, or `None` if any bit outside the flag space is
    /// set (such a value can never be a valid message).
    pub fn flags(&self) -> Option<MessageFlags> {
        let bytes = fr_to_bytes(&self.0);
        if bytes[0] >= 1 << MAX_FLAGS || bytes[1..].iter().any(|&b| b != 0) {
            return None;
        }
        Some(MessageFlags::from_bits(bytes[0]))
    }

    /// Whether the deposit operation will accept this message.
    pub fn is_valid(&self) -> bool {
        self.flags().is_some_and(|flags| flags.is_valid())
    }

    /// The three messages the predicate accepts, in pattern order A, B, C.
    pub fn accepted() -> [Message; 3] {
        [
            Message::from_flags(MessageFlags {
                flag1: true,
                ..MessageFlags::default()
            }),
            Message::from_flags(MessageFlags {
                flag2: true,
                flag3: true,
                ..MessageFlags::default()
            }),
            Message::from_flags(MessageFlags {
                flag4: true,
                ..MessageFlags::default()
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo2curves_axiom::ff::Field;

    #[test]
    fn predicate_accepts_exactly_three_of_sixty_four_combinations() {
        let mut accepted = Vec::new();
        for bits in 0u8..64 {
            let message = Message::from_flags(MessageFlags::from_bits(bits));
            if message.is_valid() {
                accepted.push(bits);
            }
        }
        // flag1 alone, flag2+flag3, flag4 alone.
        assert_eq!(accepted, vec![0b000001, 0b000110, 0b001000]);
    }

    #[test]
    fn literal_pattern_checks() {
        // flag1..flag6 written left to right.
        let accept = Message::from_flags(MessageFlags {
            flag1: true,
            ..MessageFlags::default()
        });
        assert!(accept.is_valid());

        let flag2_and_flag6 = Message::from_flags(MessageFlags {
            flag2: true,
            flag6: true,
            ..MessageFlags::default()
        });
        assert!(!flag2_and_flag6.is_valid());

        let flag5_alone = Message::from_flags(MessageFlags {
            flag5: true,
            ..MessageFlags::default()
        });
        assert!(!flag5_alone.is_valid());

        let all_clear = Message::from_flags(MessageFlags::default());
        assert!(!all_clear.is_valid());
    }

    #[test]
    fn high_bits_invalidate_the_message() {
        let out_of_range = Message::from_field(Fr::from(1u64 << MAX_FLAGS));
        assert_eq!(out_of_range.flags(), None);
        assert!(!out_of_range.is_valid());

        let huge = Message::from_field(Fr::from(u64::MAX));
        assert!(!huge.is_valid());
    }

    #[test]
    fn accepted_messages_round_trip_their_flags() {
        for message in Message::accepted() {
            let flags = message.flags().expect("accepted messages are in range");
            assert!(flags.is_valid());
            assert_eq!(Message::from_flags(flags), message);
        }
    }

    #[test]
    fn zero_message_decodes_to_default_flags() {
        let zero = Message::from_field(Fr::zero());
        assert_eq!(zero.flags(), Some(MessageFlags::default()));
        assert!(!zero.is_valid());
    }
}
