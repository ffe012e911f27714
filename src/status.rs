use std::fmt::{Display, Formatter};
use bitflags::bitflags;
use strum::IntoEnumIterator;

bitflags! {
    /// The processor status register.
    ///
    /// Bit 5 is not a flag. It reads back as set in `to_byte` and is
    /// dropped by `from_byte`.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct ProcessorStatus: u8 {
        const NEGATIVE = 0b1000_0000;
        const OVERFLOW = 0b0100_0000;
        const BREAK = 0b0001_0000;
        const DECIMAL = 0b0000_1000;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const ZERO = 0b0000_0010;
        const CARRY = 0b0000_0001;
    }
}

const UNUSED_BIT: u8 = 0b0010_0000;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, strum::Display, strum::EnumIter)]
pub enum Flag {
    Negative,
    Overflow,
    Break,
    Decimal,
    InterruptDisable,
    Zero,
    Carry,
}

impl Flag {
    pub fn mask(self) -> ProcessorStatus {
        return match self {
            Flag::Negative => ProcessorStatus::NEGATIVE,
            Flag::Overflow => ProcessorStatus::OVERFLOW,
            Flag::Break => ProcessorStatus::BREAK,
            Flag::Decimal => ProcessorStatus::DECIMAL,
            Flag::InterruptDisable => ProcessorStatus::INTERRUPT_DISABLE,
            Flag::Zero => ProcessorStatus::ZERO,
            Flag::Carry => ProcessorStatus::CARRY,
        }
    }

    fn letter(self) -> char {
        return match self {
            Flag::Negative => 'N',
            Flag::Overflow => 'V',
            Flag::Break => 'B',
            Flag::Decimal => 'D',
            Flag::InterruptDisable => 'I',
            Flag::Zero => 'Z',
            Flag::Carry => 'C',
        }
    }
}

impl Default for ProcessorStatus {
    fn default() -> Self {
        return Self::empty()
    }
}

impl ProcessorStatus {
    pub fn from_byte(byte: u8) -> Self {
        return Self::from_bits_truncate(byte)
    }

    pub fn to_byte(self) -> u8 {
        return self.bits() | UNUSED_BIT
    }

    pub fn flag(self, flag: Flag) -> bool {
        return self.contains(flag.mask())
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.set(flag.mask(), value);
    }

    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Zero and Negative as implied by an 8-bit result.
    pub fn zero_negative(result: u8) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::ZERO, result == 0);
        flags.set(Self::NEGATIVE, result & 0x80 != 0);
        return flags
    }

    pub fn carry_if(condition: bool) -> Self {
        return if condition { Self::CARRY } else { Self::empty() }
    }

    pub fn overflow_if(condition: bool) -> Self {
        return if condition { Self::OVERFLOW } else { Self::empty() }
    }

    /// Replaces the flags selected by `mask` with their value in `computed`.
    /// Flags outside the mask are left alone.
    pub fn apply(&mut self, mask: Self, computed: Self) {
        *self = self.difference(mask) | computed.intersection(mask);
    }
}

impl std::ops::Index<Flag> for ProcessorStatus {
    type Output = bool;

    fn index(&self, flag: Flag) -> &bool {
        return if self.flag(flag) { &true } else { &false }
    }
}

impl Display for ProcessorStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for flag in Flag::iter() {
            if flag == Flag::Break {
                f.write_str("-")?;
            }
            let letter = if self.flag(flag) { flag.letter() } else { flag.letter().to_ascii_lowercase() };
            f.write_fmt(format_args!("{}", letter))?;
        }
        return Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_layout() {
        let status = ProcessorStatus::NEGATIVE | ProcessorStatus::CARRY;
        assert_eq!(status.to_byte(), 0b1010_0001);
        assert_eq!(ProcessorStatus::from_byte(0xFF).bits(), 0b1101_1111);
    }

    #[test]
    fn from_byte_round_trips_every_flag_combination() {
        for byte in 0..=255u8 {
            let status = ProcessorStatus::from_byte(byte);
            assert_eq!(ProcessorStatus::from_byte(status.to_byte()), status);
            assert_eq!(status.to_byte() | UNUSED_BIT, byte | UNUSED_BIT);
        }
    }

    #[test]
    fn flags_are_independent() {
        let mut status = ProcessorStatus::default();
        for flag in Flag::iter() {
            status.set_flag(flag, true);
            assert!(status[flag]);
            for other in Flag::iter().filter(|other| *other != flag) {
                let before = status.flag(other);
                status.set_flag(flag, false);
                assert_eq!(status.flag(other), before);
                status.set_flag(flag, true);
            }
        }
        assert_eq!(status.bits(), 0b1101_1111);
        status.reset();
        assert_eq!(status, ProcessorStatus::empty());
    }

    #[test]
    fn or_never_clears_a_flag() {
        let zn = ProcessorStatus::zero_negative(0x00);
        let carry = ProcessorStatus::carry_if(true);
        let combined = zn | carry;
        assert!(combined.flag(Flag::Zero));
        assert!(combined.flag(Flag::Carry));
        assert!(!combined.flag(Flag::Negative));
        assert_eq!(combined | ProcessorStatus::empty(), combined);
    }

    #[test]
    fn apply_touches_only_masked_flags() {
        let mut status = ProcessorStatus::DECIMAL | ProcessorStatus::ZERO;
        let mask = ProcessorStatus::ZERO | ProcessorStatus::NEGATIVE;
        status.apply(mask, ProcessorStatus::zero_negative(0x80));
        assert_eq!(status, ProcessorStatus::DECIMAL | ProcessorStatus::NEGATIVE);
    }

    #[test]
    fn display_marks_set_flags_in_upper_case() {
        let status = ProcessorStatus::NEGATIVE | ProcessorStatus::INTERRUPT_DISABLE | ProcessorStatus::CARRY;
        assert_eq!(status.to_string(), "Nv-bdIzC");
    }
}
