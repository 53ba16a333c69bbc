//! An assembler for the Hack machine.
//!
//! The assembler reads symbolic source, one instruction or label per
//! line, and produces one 16-bit word per instruction.  The main
//! entry points are [`assemble_source`], [`assemble_lines`] and
//! [`assemble_file`].
#![deny(unreachable_pub)]
#![deny(unsafe_code)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::manual_string_new)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::wildcard_imports)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)] // fix soon

mod driver;
mod listing;
mod parser;
mod rx;
mod source;
mod symbol;
mod symtab;
mod types;

pub use driver::*;
pub use listing::{Listing, SymbolReport};
pub use parser::{parse_line, ParsedLine};
pub use source::{normalise, Source, SourceLine};
pub use symbol::SymbolName;
pub use symtab::{LabelDefinition, SymbolKind, SymbolTable};
pub use types::*;
