//! The `base` crate defines the Hack-related things which are useful
//! in more than one tool.  The idea is that if you want to write an
//! assembler, it would depend on the base crate but would not need to
//! depend on a simulator.

mod error;
mod types;

pub mod instruction;
pub mod prelude;
