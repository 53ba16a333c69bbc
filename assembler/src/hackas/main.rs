use std::error::Error;
use std::ffi::OsString;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use clap::ArgAction::{Set, SetTrue};
use clap::Parser;
use tracing::{event, span, Level};
use tracing_subscriber::prelude::*;

use assembler::{
    assemble_file, default_output_path, AssemblerFailure, AssemblerOptions, ErrorPolicy,
    LabelScan, OutputOptions,
};

/// Assembler for the Hack computer
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// File from which assembly source is read.
    #[clap(action=Set)]
    input: OsString,

    /// File to which assembler output is written.  By default this
    /// is the input file name with the extension changed to .hack.
    #[clap(action = Set, short = 'o', long)]
    output: Option<OsString>,

    /// When set, list the assembled program on standard output.
    #[clap(action = SetTrue, long)]
    list: bool,

    /// When set, print the user-defined symbols and labels on
    /// standard output.
    #[clap(action = SetTrue, long)]
    symbols: bool,

    /// Leave out every line which cannot be assembled, instead of
    /// stopping at an unknown mnemonic.
    #[clap(action = SetTrue, long)]
    keep_going: bool,

    /// Don't look for labels before assembling.  A label used before
    /// the line which defines it is then taken to be a variable.
    #[clap(action = SetTrue, long)]
    single_pass: bool,
}

#[derive(Debug)]
enum Fail {
    /// We iniitialised the assembler but then it fails.
    AsmFail(AssemblerFailure),
    /// We were not able to correctly initialise the assembler.
    InitialisationFailure(String),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::AsmFail(assembler_failure) => assembler_failure.fmt(f),
            Fail::InitialisationFailure(msg) => f.write_str(msg.as_str()),
        }
    }
}

impl Error for Fail {}

fn run_assembler() -> Result<(), Fail> {
    let cli = Cli::parse();

    // See
    // https://docs.rs/tracing-subscriber/0.3/tracing_subscriber/fmt/index.html#filtering-events-with-environment-variables
    // for instructions on how to select which trace messages get
    // printed.
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            return Err(Fail::InitialisationFailure(format!(
                "failed to initialise tracing filter (perhaps there is a problem with environment variables): {e}"
            )));
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let output_path: PathBuf = match cli.output {
        Some(name) => PathBuf::from(name),
        None => default_output_path(Path::new(&cli.input)),
    };
    let span = span!(Level::ERROR, "assemble", input=?cli.input, output=?output_path);
    let _enter = span.enter();
    let output_options = OutputOptions {
        list: cli.list,
        symbols: cli.symbols,
    };
    let options = AssemblerOptions {
        error_policy: if cli.keep_going {
            ErrorPolicy::KeepGoing
        } else {
            ErrorPolicy::Reference
        },
        label_scan: if cli.single_pass {
            LabelScan::SinglePass
        } else {
            LabelScan::TwoPass
        },
    };
    match assemble_file(&cli.input, &output_path, output_options, &options) {
        Err(e) => {
            event!(Level::ERROR, "assembly failed: {e}");
            Err(Fail::AsmFail(e))
        }
        Ok(assembly) => {
            let skipped = assembly.errors().len();
            if skipped > 0 {
                event!(
                    Level::WARN,
                    "assembly succeeded but {skipped} line(s) could not be assembled and were left out"
                );
            } else {
                event!(
                    Level::INFO,
                    "assembly succeeded; wrote {} instructions",
                    assembly.instructions().len()
                );
            }
            Ok(())
        }
    }
}

fn main() {
    match run_assembler() {
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
