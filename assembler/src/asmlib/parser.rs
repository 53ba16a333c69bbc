//! Classification of a single (already normalised) source line.
//!
//! Each non-blank line is one of
//!
//! - an address instruction, `@value` or `@symbol`;
//! - a label definition, `(NAME)`;
//! - a compute instruction, `dest=comp;jump` where `dest=` and
//!   `;jump` are optional.
use base::prelude::*;

use super::rx::NUMERAL;
use super::symbol::SymbolName;
use super::symtab::SymbolTable;
use super::types::LineErrorKind;


/// What a line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Nothing but whitespace and/or a comment.
    Blank,
    /// A label definition.  The label is bound by the caller, which
    /// knows the current instruction slot.
    Label(SymbolName),
    /// Looks like a label definition, but the name is not made only
    /// of letters.  Such lines are ignored.
    MalformedLabel(String),
    Instruction(Instruction),
}

/// Split a compute instruction into its `dest`, `comp` and `jump`
/// parts.  Both `=` and `;` are split at their first occurrence.
pub(crate) fn split_compute(line: &str) -> (Option<&str>, &str, Option<&str>) {
    let (dest, rest): (Option<&str>, &str) = match line.split_once('=') {
        Some((dest, rest)) => (Some(dest), rest),
        None => (None, line),
    };
    match rest.split_once(';') {
        Some((comp, jump)) => (dest, comp, Some(jump)),
        None => (dest, rest, None),
    }
}

fn parse_compute(line: &str) -> Result<Instruction, LineErrorKind> {
    let (dest_token, comp_token, jump_token) = split_compute(line);
    let dest: Dest = match dest_token {
        None => Dest::Null,
        Some(token) => Dest::from_mnemonic(token)
            .ok_or_else(|| LineErrorKind::UnknownDestination(token.to_string()))?,
    };
    let comp: Comp = Comp::from_mnemonic(comp_token)
        .ok_or_else(|| LineErrorKind::UnknownMnemonic(comp_token.to_string()))?;
    let jump: Jump = match jump_token {
        None => Jump::Null,
        Some(token) => Jump::from_mnemonic(token)
            .ok_or_else(|| LineErrorKind::UnknownJump(token.to_string()))?,
    };
    Ok(Instruction::Compute { dest, comp, jump })
}

/// Work out the value of the operand of an address instruction.
/// Symbols not seen before become new variables.
fn parse_operand(token: &str, symtab: &mut SymbolTable) -> Result<Operand, LineErrorKind> {
    let out_of_range = |_| LineErrorKind::OperandOutOfRange(token.to_string());
    if NUMERAL.is_match(token) {
        // The only way for a string of digits to fail to parse is
        // for it to be too large.
        let value: u64 = token
            .parse()
            .map_err(|_| LineErrorKind::OperandOutOfRange(token.to_string()))?;
        Operand::try_from(value).map_err(out_of_range)
    } else if SymbolName::is_user_definable(token) || symtab.lookup(token).is_some() {
        // A new variable which cannot be given an address is not bound.
        let address = symtab
            .resolve(token)
            .ok_or_else(|| LineErrorKind::OperandOutOfRange(token.to_string()))?;
        Operand::try_from(address).map_err(out_of_range)
    } else {
        Err(LineErrorKind::InvalidOperand(token.to_string()))
    }
}

/// Classify a normalised line, and encode it if it is an
/// instruction.
///
/// # Errors
///
/// Fails when the line is an instruction which cannot be encoded;
/// see [`LineErrorKind`].
pub fn parse_line(cleaned: &str, symtab: &mut SymbolTable) -> Result<ParsedLine, LineErrorKind> {
    if cleaned.is_empty() {
        Ok(ParsedLine::Blank)
    } else if let Some(token) = cleaned.strip_prefix('@') {
        Ok(ParsedLine::Instruction(Instruction::Address(parse_operand(
            token, symtab,
        )?)))
    } else if let Some(name) = cleaned
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        if SymbolName::is_user_definable(name) {
            Ok(ParsedLine::Label(SymbolName::from(name)))
        } else {
            Ok(ParsedLine::MalformedLabel(name.to_string()))
        }
    } else {
        parse_compute(cleaned).map(ParsedLine::Instruction)
    }
}
