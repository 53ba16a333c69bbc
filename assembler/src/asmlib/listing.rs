use std::fmt::{self, Display, Formatter};

use super::driver::AssembledInstruction;
use super::symtab::SymbolTable;

/// Source text longer than this is cut short in the listing.
const LISTING_TEXT_WIDTH: usize = 45;

/// The user-defined symbols (labels and variables) of a program.
pub struct SymbolReport<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> SymbolReport<'a> {
    #[must_use]
    pub fn new(symbols: &'a SymbolTable) -> SymbolReport<'a> {
        SymbolReport { symbols }
    }
}

impl Display for SymbolReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "User-Defined Symbols and Labels:")?;
        write!(f, "{}", self.symbols)?;
        writeln!(f)
    }
}

fn listing_text(text: &str) -> String {
    if text.chars().count() > LISTING_TEXT_WIDTH {
        let mut shortened: String = text.chars().take(LISTING_TEXT_WIDTH).collect();
        shortened.push_str("..");
        shortened
    } else {
        text.to_string()
    }
}

/// The assembled program, one instruction per line, alongside the
/// (cleaned-up) source it came from.
pub struct Listing<'a> {
    instructions: &'a [AssembledInstruction],
}

impl<'a> Listing<'a> {
    #[must_use]
    pub fn new(instructions: &'a [AssembledInstruction]) -> Listing<'a> {
        Listing { instructions }
    }
}

impl Display for Listing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Assembled Machine Code:")?;
        for inst in self.instructions {
            writeln!(
                f,
                "{:>5}  {:<47}  {}",
                inst.slot,
                listing_text(&inst.text),
                inst.word
            )?;
        }
        Ok(())
    }
}
