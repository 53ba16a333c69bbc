//! Drives the assembly of a whole program: feeds the source lines,
//! in order, through the parser while keeping track of the symbol
//! table and of the next free instruction slot.
use std::ffi::OsStr;
use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{event, span, Level};

use base::prelude::*;

use super::listing::{Listing, SymbolReport};
use super::parser::{parse_line, ParsedLine};
use super::source::{normalise, Source, SourceLine};
use super::symbol::SymbolName;
use super::symtab::{LabelDefinition, SymbolKind, SymbolTable};
use super::types::{
    input_failure, AssemblerFailure, IoAction, IoFailed, IoTarget, LineError, LineNumber,
};

mod output;

pub use output::{write_hack, write_hack_file};

/// Decides which line errors stop the assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// A line with a bad address-instruction operand is reported and
    /// left out, but an unknown mnemonic stops the assembly.
    #[default]
    Reference,
    /// Every bad line is reported and left out.
    KeepGoing,
}

impl ErrorPolicy {
    fn continues_after(self, e: &LineError) -> bool {
        match self {
            ErrorPolicy::Reference => e.is_recoverable(),
            ErrorPolicy::KeepGoing => true,
        }
    }
}

/// Decides how references to labels which are defined later in the
/// program are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelScan {
    /// Find all the labels first, so that a label can be used before
    /// the line which defines it.
    #[default]
    TwoPass,
    /// Labels are only known after the line which defines them.  A
    /// reference to a label which has not been defined yet allocates
    /// a variable instead.
    SinglePass,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerOptions {
    pub error_policy: ErrorPolicy,
    pub label_scan: LabelScan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    // TODO: when list is set, offer a way to write the listing to a
    // file instead of stdout.
    pub list: bool,
    pub symbols: bool,
}

/// One instruction of the assembled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledInstruction {
    /// The ROM address this instruction will be loaded at.
    pub slot: usize,
    pub line_number: LineNumber,
    /// The source text, with comments and whitespace removed.
    pub text: String,
    pub instruction: Instruction,
    pub word: Word,
}

/// The result of assembling a program.
#[derive(Debug, Clone)]
pub struct Assembly {
    instructions: Vec<AssembledInstruction>,
    symbols: SymbolTable,
    errors: Vec<LineError>,
}

impl Assembly {
    #[must_use]
    pub fn instructions(&self) -> &[AssembledInstruction] {
        &self.instructions
    }

    pub fn words(&self) -> impl Iterator<Item = Word> + '_ {
        self.instructions.iter().map(|inst| inst.word)
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Errors in lines which were left out of the program.
    #[must_use]
    pub fn errors(&self) -> &[LineError] {
        &self.errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// The state of one pass over the program.
struct Pass {
    symtab: SymbolTable,
    instructions: Vec<AssembledInstruction>,
    errors: Vec<LineError>,
    policy: ErrorPolicy,
    // The label scan is silent; problems are reported by the pass
    // which follows it.
    report: bool,
}

impl Pass {
    fn new(symtab: SymbolTable, policy: ErrorPolicy, report: bool) -> Pass {
        Pass {
            symtab,
            instructions: Vec::new(),
            errors: Vec::new(),
            policy,
            report,
        }
    }

    /// The slot the next instruction will occupy.  Labels do not
    /// occupy a slot.
    fn next_slot(&self) -> usize {
        self.instructions.len()
    }

    fn bind_label(&mut self, line: &SourceLine<'_>, name: &SymbolName) -> Result<(), AssemblerFailure> {
        let slot = self.next_slot();
        let address = Address::try_from(slot).map_err(|_| AssemblerFailure::ProgramTooBig {
            line_number: line.number,
            instruction_count: slot,
        })?;
        match self.symtab.define_label(name.as_str(), address) {
            LabelDefinition::Defined => (),
            LabelDefinition::Replaced {
                previous,
                kind: SymbolKind::Label,
            } => {
                if self.report {
                    event!(
                        Level::WARN,
                        "line {}: label {name} is redefined; it was {previous} but is now {address}",
                        line.number
                    );
                }
            }
            LabelDefinition::Replaced { previous, kind } => {
                if self.report {
                    event!(
                        Level::WARN,
                        "line {}: {name} was used as a {kind} (with address {previous}) before it was defined as a label",
                        line.number
                    );
                }
            }
            LabelDefinition::Predefined(existing) => {
                if self.report {
                    event!(
                        Level::WARN,
                        "line {}: ignoring definition of label {name}, because {name} is predefined (as {existing})",
                        line.number
                    );
                }
            }
        }
        Ok(())
    }

    fn assemble_line(&mut self, line: &SourceLine<'_>) -> Result<(), AssemblerFailure> {
        let cleaned: String = normalise(line.text);
        match parse_line(&cleaned, &mut self.symtab) {
            Ok(ParsedLine::Blank) => Ok(()),
            Ok(ParsedLine::Label(name)) => self.bind_label(line, &name),
            Ok(ParsedLine::MalformedLabel(name)) => {
                if self.report {
                    event!(
                        Level::DEBUG,
                        "line {}: ignoring label '{name}' because its name is not only letters",
                        line.number
                    );
                }
                Ok(())
            }
            Ok(ParsedLine::Instruction(instruction)) => {
                let slot = self.next_slot();
                if slot >= ROM_SIZE {
                    return Err(AssemblerFailure::ProgramTooBig {
                        line_number: line.number,
                        instruction_count: slot + 1,
                    });
                }
                let word = instruction.bits();
                if self.report {
                    event!(
                        Level::DEBUG,
                        "line {}: slot {slot}: {instruction} -> {word}",
                        line.number
                    );
                }
                self.instructions.push(AssembledInstruction {
                    slot,
                    line_number: line.number,
                    text: cleaned,
                    instruction,
                    word,
                });
                Ok(())
            }
            Err(kind) => {
                let e = LineError {
                    line_number: line.number,
                    text: line.text.to_string(),
                    kind,
                };
                if self.policy.continues_after(&e) {
                    if self.report {
                        event!(Level::WARN, "error parsing {e}; the line is left out");
                    }
                    self.errors.push(e);
                    Ok(())
                } else {
                    Err(AssemblerFailure::LineFailed(e))
                }
            }
        }
    }

    fn finish(self) -> Assembly {
        Assembly {
            instructions: self.instructions,
            symbols: self.symtab,
            errors: self.errors,
        }
    }
}

/// Find the value of every label in the program, without reporting
/// any problems.  Where a label is defined more than once, the last
/// definition wins.
#[must_use]
pub fn scan_labels(lines: &[SourceLine<'_>]) -> Vec<(SymbolName, Address)> {
    let span = span!(Level::ERROR, "scan labels");
    let _enter = span.enter();
    let mut pass = Pass::new(SymbolTable::new(), ErrorPolicy::KeepGoing, false);
    for line in lines {
        if let Err(e) = pass.assemble_line(line) {
            // The assembly pass will report this.
            event!(Level::DEBUG, "label scan stopped early: {e}");
            break;
        }
    }
    pass.symtab
        .labels()
        .map(|(name, address)| (name.clone(), address))
        .collect()
}

fn assemble_source_lines(
    lines: &[SourceLine<'_>],
    options: &AssemblerOptions,
) -> Result<Assembly, AssemblerFailure> {
    let symtab = match options.label_scan {
        LabelScan::TwoPass => SymbolTable::with_labels(scan_labels(lines)),
        LabelScan::SinglePass => SymbolTable::new(),
    };
    let mut pass = Pass::new(symtab, options.error_policy, true);
    for line in lines {
        pass.assemble_line(line)?;
    }
    let assembly = pass.finish();
    event!(
        Level::DEBUG,
        "assembled {} instructions; {} lines were left out",
        assembly.instructions.len(),
        assembly.errors.len()
    );
    Ok(assembly)
}

/// Assemble a program given as a sequence of lines (the first of
/// which is line 1).
///
/// # Errors
///
/// Fails if a line has an error which `options.error_policy` does
/// not allow assembly to continue after, or if the program is too
/// large.
pub fn assemble_lines<S: AsRef<str>>(
    lines: &[S],
    options: &AssemblerOptions,
) -> Result<Assembly, AssemblerFailure> {
    let source_lines: Vec<SourceLine<'_>> = lines
        .iter()
        .enumerate()
        .map(|(n, text)| SourceLine {
            number: n + 1,
            text: text.as_ref(),
        })
        .collect();
    assemble_source_lines(&source_lines, options)
}

/// Assemble a program held in a string.
///
/// # Errors
///
/// See [`assemble_lines`].
pub fn assemble_source(
    body: &str,
    options: &AssemblerOptions,
) -> Result<Assembly, AssemblerFailure> {
    let source = Source::new(body);
    let lines: Vec<SourceLine<'_>> = source.lines().collect();
    assemble_source_lines(&lines, options)
}

/// The output file name used when none is specified: the input file
/// name with its extension replaced by `.hack`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("hack")
}

fn read_source_lines(input_file: &OsStr) -> Result<Vec<String>, AssemblerFailure> {
    let input = OpenOptions::new()
        .read(true)
        .open(input_file)
        .map_err(|e| input_failure(input_file, e))?;
    let mut source_lines: Vec<String> = Vec::new();
    for input_item in BufReader::new(input).lines() {
        match input_item {
            Err(e) => {
                return Err(input_failure(input_file, e));
            }
            Ok(source_line) => {
                source_lines.push(source_line);
            }
        }
    }
    Ok(source_lines)
}

fn print_reports(assembly: &Assembly, options: OutputOptions) -> Result<(), AssemblerFailure> {
    let stdout_failure = |error: io::Error| {
        AssemblerFailure::Io(IoFailed {
            action: IoAction::Write,
            target: IoTarget::Stdout,
            error,
        })
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if options.symbols {
        write!(out, "{}", SymbolReport::new(assembly.symbols())).map_err(stdout_failure)?;
    }
    if options.list {
        write!(out, "{}", Listing::new(assembly.instructions())).map_err(stdout_failure)?;
    }
    out.flush().map_err(stdout_failure)
}

/// Assemble the program in `input_file`, writing the binary to
/// `output_file`.
///
/// # Errors
///
/// Fails if the input cannot be read, the output cannot be written,
/// or the program cannot be assembled (see [`assemble_lines`]).
pub fn assemble_file(
    input_file: &OsStr,
    output_file: &Path,
    output_options: OutputOptions,
    options: &AssemblerOptions,
) -> Result<Assembly, AssemblerFailure> {
    let source_lines = read_source_lines(input_file)?;
    event!(
        Level::INFO,
        "beginning assembly of {} ({} lines), will create {}",
        Path::new(input_file).display(),
        source_lines.len(),
        output_file.display()
    );
    let assembly = assemble_lines(&source_lines, options)?;
    print_reports(&assembly, output_options)?;
    write_hack_file(output_file, &assembly)?;
    Ok(assembly)
}
