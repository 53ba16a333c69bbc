//! The Hack machine uses 16-bit words for both instructions (held in
//! ROM) and data (held in RAM).  Instruction memory and data memory
//! are separately addressed, but an address into either of them is
//! just a number, which we represent with [`Address`].
use std::fmt::{self, Binary, Debug, Display, Formatter};

#[cfg(test)]
use test_strategy::Arbitrary;

use super::error::ConversionFailed;

#[cfg(test)]
mod tests;

/// Number of registers in the instruction memory.  A program cannot
/// contain more instructions than this.
pub const ROM_SIZE: usize = 1 << 15;

/// Base address of the memory-mapped screen.
pub const SCREEN: Address = Address(16384);

/// Address of the memory-mapped keyboard register.
pub const KBD: Address = Address(24576);

/// The first RAM register available for user variables.  Registers
/// below this are the virtual registers R0 to R15.
pub const FIRST_VARIABLE: Address = Address(16);

/// A location in RAM or ROM.
///
/// Not every address can be loaded by an address instruction; only
/// the 15-bit ones can (see [`crate::instruction::Operand`]).
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u16);

impl Address {
    pub const ZERO: Address = Address(0);
    pub const MAX: Address = Address(u16::MAX);

    #[must_use]
    pub const fn new(a: u16) -> Address {
        Address(a)
    }

    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Computes the address following the current address.  Used to
    /// hand out RAM registers to variables.
    ///
    /// There is no address after `Address::MAX`.
    #[must_use]
    pub const fn successor(&self) -> Option<Address> {
        match self.0.checked_add(1) {
            Some(next) => Some(Address(next)),
            None => None,
        }
    }
}

impl From<u16> for Address {
    fn from(a: u16) -> Address {
        Address(a)
    }
}

impl From<u8> for Address {
    fn from(a: u8) -> Address {
        Address(a.into())
    }
}

impl From<Address> for u16 {
    fn from(a: Address) -> u16 {
        a.0
    }
}

impl From<Address> for u32 {
    fn from(a: Address) -> u32 {
        a.0.into()
    }
}

impl From<Address> for usize {
    fn from(a: Address) -> usize {
        a.0.into()
    }
}

impl TryFrom<usize> for Address {
    type Error = ConversionFailed;
    fn try_from(n: usize) -> Result<Address, ConversionFailed> {
        u16::try_from(n)
            .map(Address)
            .map_err(|_| ConversionFailed::TooLarge)
    }
}

impl TryFrom<u64> for Address {
    type Error = ConversionFailed;
    fn try_from(n: u64) -> Result<Address, ConversionFailed> {
        u16::try_from(n)
            .map(Address)
            .map_err(|_| ConversionFailed::TooLarge)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl Binary for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Binary::fmt(&self.0, f) // delegate to u16's implementation
    }
}

/// A 16-bit Hack machine word.
///
/// The `Display` form of a word is the one used in `.hack` files:
/// sixteen `0` or `1` characters, most significant bit first.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word(u16);

impl Word {
    pub const ZERO: Word = Word(0);

    #[must_use]
    pub const fn new(bits: u16) -> Word {
        Word(bits)
    }

    #[must_use]
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Returns true if bit `n` (counting from the least significant
    /// end, starting at 0) is set.
    #[must_use]
    pub const fn bit(&self, n: u32) -> bool {
        (self.0 >> n) & 1 != 0
    }
}

impl From<u16> for Word {
    fn from(bits: u16) -> Word {
        Word(bits)
    }
}

impl From<Word> for u16 {
    fn from(w: Word) -> u16 {
        w.0
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:016b})", self.0)
    }
}

impl Binary for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Binary::fmt(&self.0, f)
    }
}
