use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{event, span, Level};

use base::prelude::Word;

use super::super::types::{AssemblerFailure, IoAction, IoFailed, IoTarget};
use super::Assembly;

/// Write `words` in `.hack` format: one word per line, each written
/// as sixteen `0` or `1` characters.
///
/// # Errors
///
/// Fails if `writer` reports an error.  `output_file_name` is only
/// used in the error message.
pub fn write_hack<W, I>(
    writer: &mut W,
    output_file_name: &Path,
    words: I,
) -> Result<(), AssemblerFailure>
where
    W: Write,
    I: IntoIterator<Item = Word>,
{
    let inner = || -> Result<(), std::io::Error> {
        for word in words {
            writeln!(writer, "{word}")?;
        }
        writer.flush()
    };
    inner().map_err(|e| {
        AssemblerFailure::Io(IoFailed {
            action: IoAction::Write,
            target: IoTarget::File(output_file_name.to_path_buf()),
            error: e,
        })
    })
}

/// Write the assembled program to the file `output_file_name`,
/// replacing it if it already exists.
///
/// # Errors
///
/// Fails if the file cannot be created or written.
pub fn write_hack_file(output_file_name: &Path, assembly: &Assembly) -> Result<(), AssemblerFailure> {
    let span = span!(Level::ERROR, "write binary program", output=%output_file_name.display());
    let _enter = span.enter();

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output_file_name)
        .map_err(|e| {
            AssemblerFailure::Io(IoFailed {
                action: IoAction::Write,
                target: IoTarget::File(output_file_name.to_path_buf()),
                error: e,
            })
        })?;
    let mut writer = BufWriter::new(file);
    write_hack(&mut writer, output_file_name, assembly.words())?;
    event!(
        Level::DEBUG,
        "wrote {} words",
        assembly.instructions().len()
    );
    Ok(())
}
