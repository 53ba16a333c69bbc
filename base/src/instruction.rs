//! Binary and symbolic representations of Hack instructions.
//!
//! A Hack instruction occupies 16 bits.  There are two kinds.  An
//! address instruction (written `@value`) loads a 15-bit value into
//! the A register:
//!
//! |Opcode|Value  |
//! |------|-------|
//! |0     |15 bits|
//! |(15)  |(0-14) |
//!
//! A compute instruction (written `dest=comp;jump`) looks like this
//! (least significant bit on the right):
//!
//! |Opcode|Unused|a    |Comp  |Dest  |Jump  |
//! |------|------|-----|------|------|------|
//! |1     |11    |1 bit|6 bits|3 bits|3 bits|
//! |(15)  |(13-14)|(12)|(6-11)|(3-5) |(0-2) |
//!
//! The a bit selects whether the ALU's second operand is the A
//! register itself (a=0) or the RAM register which A addresses (a=1,
//! written `M` in the mnemonic).

use std::fmt::{self, Debug, Display, Formatter};

#[cfg(test)]
use test_strategy::Arbitrary;

use super::error::ConversionFailed;
use super::types::{Address, Word};


const COMPUTE_PREFIX: u16 = 0b111 << 13;
const A_BIT: u16 = 1 << 12;

/// The value field of an address instruction.  Only 15 bits are
/// available, since the top bit of the instruction word is the
/// opcode.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Operand(u16);

impl Operand {
    pub const ZERO: Operand = Operand(0);
    pub const MAX: Operand = Operand(0x7FFF);

    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Operand {
    type Error = ConversionFailed;
    fn try_from(n: u16) -> Result<Operand, ConversionFailed> {
        if n > Operand::MAX.0 {
            Err(ConversionFailed::TooLarge)
        } else {
            Ok(Operand(n))
        }
    }
}

impl TryFrom<u64> for Operand {
    type Error = ConversionFailed;
    fn try_from(n: u64) -> Result<Operand, ConversionFailed> {
        let narrow = u16::try_from(n).map_err(|_| ConversionFailed::TooLarge)?;
        Operand::try_from(narrow)
    }
}

impl TryFrom<Address> for Operand {
    type Error = ConversionFailed;
    fn try_from(a: Address) -> Result<Operand, ConversionFailed> {
        Operand::try_from(a.value())
    }
}

impl From<Operand> for Address {
    fn from(op: Operand) -> Address {
        Address::new(op.0)
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Operand({})", self.0)
    }
}

/// The registers a compute instruction writes its result to.  The
/// enumerator names list the registers in the canonical order A, M,
/// D.
#[repr(u8)]
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum Dest {
    #[default]
    Null = 0b000,
    M = 0b001,
    D = 0b010,
    MD = 0b011,
    A = 0b100,
    AM = 0b101,
    AD = 0b110,
    AMD = 0b111,
}

/// All accepted destination mnemonics.  `null` is the spelling of
/// an absent destination.
pub const DEST_MNEMONICS: [(&str, Dest); 8] = [
    ("null", Dest::Null),
    ("M", Dest::M),
    ("D", Dest::D),
    ("MD", Dest::MD),
    ("A", Dest::A),
    ("AM", Dest::AM),
    ("AD", Dest::AD),
    ("AMD", Dest::AMD),
];

impl Dest {
    #[must_use]
    pub fn from_mnemonic(s: &str) -> Option<Dest> {
        lookup(&DEST_MNEMONICS, s)
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        reverse_lookup(&DEST_MNEMONICS, self)
    }
}

/// The ALU computation of a compute instruction.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum Comp {
    #[default]
    Zero,
    One,
    MinusOne,
    D,
    A,
    M,
    NotD,
    NotA,
    NotM,
    NegD,
    NegA,
    NegM,
    DPlusOne,
    APlusOne,
    MPlusOne,
    DMinusOne,
    AMinusOne,
    MMinusOne,
    DPlusA,
    DPlusM,
    DMinusA,
    DMinusM,
    AMinusD,
    MMinusD,
    DAndA,
    DAndM,
    DOrA,
    DOrM,
}

/// All accepted computation mnemonics.  `null` is accepted as a
/// synonym for `0`; the first spelling listed for a computation is
/// the canonical one.
pub const COMP_MNEMONICS: [(&str, Comp); 29] = [
    ("0", Comp::Zero),
    ("null", Comp::Zero),
    ("1", Comp::One),
    ("-1", Comp::MinusOne),
    ("D", Comp::D),
    ("A", Comp::A),
    ("M", Comp::M),
    ("!D", Comp::NotD),
    ("!A", Comp::NotA),
    ("!M", Comp::NotM),
    ("-D", Comp::NegD),
    ("-A", Comp::NegA),
    ("-M", Comp::NegM),
    ("D+1", Comp::DPlusOne),
    ("A+1", Comp::APlusOne),
    ("M+1", Comp::MPlusOne),
    ("D-1", Comp::DMinusOne),
    ("A-1", Comp::AMinusOne),
    ("M-1", Comp::MMinusOne),
    ("D+A", Comp::DPlusA),
    ("D+M", Comp::DPlusM),
    ("D-A", Comp::DMinusA),
    ("D-M", Comp::DMinusM),
    ("A-D", Comp::AMinusD),
    ("M-D", Comp::MMinusD),
    ("D&A", Comp::DAndA),
    ("D&M", Comp::DAndM),
    ("D|A", Comp::DOrA),
    ("D|M", Comp::DOrM),
];

impl Comp {
    #[must_use]
    pub fn from_mnemonic(s: &str) -> Option<Comp> {
        lookup(&COMP_MNEMONICS, s)
    }

    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        reverse_lookup(&COMP_MNEMONICS, self)
    }

    /// Returns true when the computation reads the RAM register
    /// addressed by A (that is, its mnemonic uses `M`).
    #[must_use]
    pub const fn a_bit(self) -> bool {
        matches!(
            self,
            Comp::M
                | Comp::NotM
                | Comp::NegM
                | Comp::MPlusOne
                | Comp::MMinusOne
                | Comp::DPlusM
                | Comp::DMinusM
                | Comp::MMinusD
                | Comp::DAndM
                | Comp::DOrM
        )
    }

    /// The six ALU control bits.  The `A` and `M` forms of a
    /// computation share the same code; they differ only in the a
    /// bit.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Comp::Zero => 0b101010,
            Comp::One => 0b111111,
            Comp::MinusOne => 0b111010,
            Comp::D => 0b001100,
            Comp::A | Comp::M => 0b110000,
            Comp::NotD => 0b001101,
            Comp::NotA | Comp::NotM => 0b110001,
            Comp::NegD => 0b001111,
            Comp::NegA | Comp::NegM => 0b110011,
            Comp::DPlusOne => 0b011111,
            Comp::APlusOne | Comp::MPlusOne => 0b110111,
            Comp::DMinusOne => 0b001110,
            Comp::AMinusOne | Comp::MMinusOne => 0b110010,
            Comp::DPlusA | Comp::DPlusM => 0b000010,
            Comp::DMinusA | Comp::DMinusM => 0b010011,
            Comp::AMinusD | Comp::MMinusD => 0b000111,
            Comp::DAndA | Comp::DAndM => 0b000000,
            Comp::DOrA | Comp::DOrM => 0b010101,
        }
    }
}

/// The jump condition of a compute instruction, tested against the
/// ALU output.
#[repr(u8)]
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum Jump {
    #[default]
    Null = 0b000,
    Jgt = 0b001,
    Jeq = 0b010,
    Jge = 0b011,
    Jle = 0b100,
    Jne = 0b101,
    Jlt = 0b110,
    Jmp = 0b111,
}

/// All accepted jump mnemonics.  Note that this assembler encodes
/// `JLE` as 100 and `JLT` as 110.
pub const JUMP_MNEMONICS: [(&str, Jump); 8] = [
    ("null", Jump::Null),
    ("JGT", Jump::Jgt),
    ("JEQ", Jump::Jeq),
    ("JGE", Jump::Jge),
    ("JLE", Jump::Jle),
    ("JNE", Jump::Jne),
    ("JLT", Jump::Jlt),
    ("JMP", Jump::Jmp),
];

impl Jump {
    #[must_use]
    pub fn from_mnemonic(s: &str) -> Option<Jump> {
        lookup(&JUMP_MNEMONICS, s)
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        reverse_lookup(&JUMP_MNEMONICS, self)
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Option<T> {
    table
        .iter()
        .find_map(|(mnemonic, value)| (*mnemonic == name).then_some(*value))
}

fn reverse_lookup<T: Copy + PartialEq>(table: &[(&'static str, T)], value: T) -> &'static str {
    match table.iter().find(|(_, v)| *v == value) {
        Some((mnemonic, _)) => *mnemonic,
        None => {
            // Every enumerator appears in its table.
            unreachable!("mnemonic table is incomplete")
        }
    }
}

/// A symbolic Hack instruction, with every symbol already resolved.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Instruction {
    /// `@value`
    Address(Operand),
    /// `dest=comp;jump`
    Compute { dest: Dest, comp: Comp, jump: Jump },
}

impl Instruction {
    /// Assemble the instruction into its binary form.
    #[must_use]
    pub fn bits(&self) -> Word {
        match self {
            Instruction::Address(operand) => Word::new(operand.value()),
            Instruction::Compute { dest, comp, jump } => {
                let a: u16 = if comp.a_bit() { A_BIT } else { 0 };
                Word::new(
                    COMPUTE_PREFIX | a | (comp.code() << 6) | (dest.code() << 3) | jump.code(),
                )
            }
        }
    }
}

impl From<&Instruction> for Word {
    fn from(inst: &Instruction) -> Word {
        inst.bits()
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Address(operand) => write!(f, "@{operand}"),
            Instruction::Compute { dest, comp, jump } => {
                if *dest != Dest::Null {
                    write!(f, "{}=", dest.mnemonic())?;
                }
                f.write_str(comp.mnemonic())?;
                if *jump != Jump::Null {
                    write!(f, ";{}", jump.mnemonic())?;
                }
                Ok(())
            }
        }
    }
}
