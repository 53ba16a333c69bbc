use std::error::Error;
use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display, Formatter};
use std::io::Error as IoError;
use std::path::PathBuf;

/// Source line numbers count from 1.
pub type LineNumber = usize;

/// The ways in which a single source line can fail to assemble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineErrorKind {
    /// The operand of an address instruction is neither a
    /// non-negative decimal number nor a symbol.
    InvalidOperand(String),
    /// The operand of an address instruction does not fit into the
    /// 15 bits available for it.
    OperandOutOfRange(String),
    /// The destination part of a compute instruction is not one of
    /// the known combinations of A, M and D.
    UnknownDestination(String),
    /// The computation part of a compute instruction is not a known
    /// mnemonic.
    UnknownMnemonic(String),
    /// The jump part of a compute instruction is not a known
    /// mnemonic.
    UnknownJump(String),
}

impl LineErrorKind {
    /// Malformed address-instruction operands only spoil the line
    /// they occur on.  Mnemonic table misses are fatal unless the
    /// caller asks otherwise (see [`ErrorPolicy`](crate::ErrorPolicy)).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            LineErrorKind::InvalidOperand(_) | LineErrorKind::OperandOutOfRange(_) => true,
            LineErrorKind::UnknownDestination(_)
            | LineErrorKind::UnknownMnemonic(_)
            | LineErrorKind::UnknownJump(_) => false,
        }
    }
}

impl Display for LineErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            LineErrorKind::InvalidOperand(token) => write!(
                f,
                "attempted to set the A register to something other than a symbol or non-negative integer: '{token}'"
            ),
            LineErrorKind::OperandOutOfRange(token) => write!(
                f,
                "operand '{token}' does not fit into the 15 bits of an address instruction"
            ),
            LineErrorKind::UnknownDestination(token) => {
                write!(f, "unknown destination '{token}'")
            }
            LineErrorKind::UnknownMnemonic(token) => {
                write!(f, "unknown computation '{token}'")
            }
            LineErrorKind::UnknownJump(token) => write!(f, "unknown jump '{token}'"),
        }
    }
}

impl Error for LineErrorKind {}

/// A failure to assemble one particular line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line_number: LineNumber,
    /// The line as it appeared in the source file.
    pub text: String,
    pub kind: LineErrorKind,
}

impl LineError {
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

impl Display for LineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "line {} ('{}'): {}",
            self.line_number,
            self.text.trim(),
            self.kind
        )
    }
}

impl Error for LineError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    Write,
}

impl Display for IoAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            IoAction::Read => "read",
            IoAction::Write => "write",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoTarget {
    File(PathBuf),
    Stdout,
}

impl Display for IoTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            IoTarget::File(name) => write_os_string(f, name.as_os_str()),
            IoTarget::Stdout => f.write_str("standard output"),
        }
    }
}

#[derive(Debug)]
pub struct IoFailed {
    pub action: IoAction,
    pub target: IoTarget,
    pub error: IoError,
}

impl Display for IoFailed {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let IoFailed {
            action,
            target,
            error,
        } = self;
        write!(f, "failed to {action} {target}: {error}")
    }
}

impl Error for IoFailed {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

#[derive(Debug)]
pub enum AssemblerFailure {
    /// A line could not be assembled and the error policy says that
    /// this kind of problem stops the assembly.
    LineFailed(LineError),
    /// The program has more instructions than will fit into ROM.
    ProgramTooBig {
        line_number: LineNumber,
        instruction_count: usize,
    },
    Io(IoFailed),
}

fn write_os_string(f: &mut Formatter<'_>, s: &OsStr) -> Result<(), fmt::Error> {
    match s.to_str() {
        Some(unicode_name) => f.write_str(unicode_name),
        None => write!(
            f,
            "{} (some non-Unicode characters changed to make it printable)",
            s.to_string_lossy(),
        ),
    }
}

impl Display for AssemblerFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            AssemblerFailure::LineFailed(e) => write!(f, "error parsing {e}"),
            AssemblerFailure::ProgramTooBig {
                line_number,
                instruction_count,
            } => {
                write!(
                    f,
                    "program does not fit into Hack instruction memory; line {line_number} would be instruction number {instruction_count} but the largest possible address is {}",
                    base::prelude::ROM_SIZE - 1
                )
            }
            AssemblerFailure::Io(e) => Display::fmt(e, f),
        }
    }
}

impl Error for AssemblerFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AssemblerFailure::LineFailed(e) => Some(e),
            AssemblerFailure::ProgramTooBig { .. } => None,
            AssemblerFailure::Io(e) => Some(e),
        }
    }
}

impl From<IoFailed> for AssemblerFailure {
    fn from(e: IoFailed) -> AssemblerFailure {
        AssemblerFailure::Io(e)
    }
}

/// Helper for building an [`IoFailed`] about the input file.
pub(crate) fn input_failure(filename: &OsStr, error: IoError) -> AssemblerFailure {
    AssemblerFailure::Io(IoFailed {
        action: IoAction::Read,
        target: IoTarget::File(PathBuf::from(OsString::from(filename))),
        error,
    })
}
