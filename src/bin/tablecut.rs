// Table schema compiler (TABLEC)
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of TABLEC.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! This is the data cutter.
//!
//! `tablecut` removes from each tab-separated data file the columns that a
//!   reader is not permitted to see,
//!     and skips entirely the tables that the reader can not read.
//! The schema definition is the same one given to
//!   [`tablec`](../tablec).

extern crate tablec;

use getopts::{Fail, Options};
use std::{
    env,
    error::Error,
    fmt::{self, Display},
};
use tablec::{
    cut::{self, CutError},
    diagnose::{
        AnnotatedSpan, Diagnostic, FsSpanResolver, Reporter, VisualReporter,
    },
    fs::{self, FsCanonicalizer},
    schema::{self, LoadError},
};
use tracing::info;

/// Types of commands
#[derive(Debug, PartialEq)]
enum Command {
    Cut(CutOptions),
    Usage,
}

#[derive(Debug, PartialEq)]
struct CutOptions {
    define_file: String,
    reader: String,
    input_dir: String,
    output_dir: String,
}

/// Cut every data file readable by the requested reader,
///   returning the number of tables cut.
fn run(opts: &CutOptions) -> Result<usize, TablecutError> {
    if !fs::is_file(&opts.define_file) {
        return Err(TablecutError::DefineFileNotFound(opts.define_file.clone()));
    }

    if !fs::is_dir(&opts.input_dir) {
        return Err(TablecutError::InputDirNotFound(opts.input_dir.clone()));
    }

    if !fs::is_dir(&opts.output_dir) {
        return Err(TablecutError::OutputDirNotFound(opts.output_dir.clone()));
    }

    if fs::same_location::<FsCanonicalizer, _, _>(
        &opts.input_dir,
        &opts.output_dir,
    ) {
        return Err(TablecutError::SameDirectory(opts.input_dir.clone()));
    }

    let desc = schema::load(&opts.define_file)?;
    let count =
        cut::cut_tables(&desc, &opts.reader, &opts.input_dir, &opts.output_dir)?;

    info!(reader = %opts.reader, tables = count, "cut data files");

    Ok(count)
}

/// Entrypoint for the cutter
pub fn main() {
    tablec::log::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("tablecut");
    let opts = get_opts();
    let usage = opts.usage(&format!(
        "Usage: {program} -f FILE -r READER -i DIR -o DIR"
    ));

    match parse_options(opts, args.clone()) {
        Ok(Command::Cut(opts)) => match run(&opts) {
            Ok(_) => std::process::exit(exitcode::OK),
            Err(e) => {
                let mut reporter = VisualReporter::new(FsSpanResolver::default());
                let report = reporter.render(&e).to_string();

                eprint!("{report}");
                eprintln!(
                    "fatal: failed to cut data for reader `{}`",
                    opts.reader
                );

                std::process::exit(1);
            }
        },
        Ok(Command::Usage) => {
            println!("{usage}");
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("{usage}");
            std::process::exit(exitcode::USAGE);
        }
    }
}

/// Get 'Options'
fn get_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("f", "define-file", "schema definition file", "FILE");
    opts.optopt("r", "reader", "reader to cut data for", "READER");
    opts.optopt("i", "input-dir", "directory of source data files", "DIR");
    opts.optopt("o", "output-dir", "directory of cut data files", "DIR");
    opts.optflag("h", "help", "print this help menu");

    opts
}

/// Option parser
fn parse_options(opts: Options, args: Vec<String>) -> Result<Command, Fail> {
    let matches = opts.parse(args.iter().skip(1))?;

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    if let Some(extra) = matches.free.first() {
        return Err(Fail::UnrecognizedOption(extra.clone()));
    }

    let required = |name: &str| {
        matches
            .opt_str(name)
            .ok_or_else(|| Fail::OptionMissing(format!("--{name}")))
    };

    Ok(Command::Cut(CutOptions {
        define_file: required("define-file")?,
        reader: required("reader")?,
        input_dir: required("input-dir")?,
        output_dir: required("output-dir")?,
    }))
}

/// Cutter (`tablecut`) error.
///
/// This represents the aggregation of all possible errors that can occur
///   after the command line has been parsed.
#[derive(Debug)]
pub enum TablecutError {
    DefineFileNotFound(String),
    InputDirNotFound(String),
    OutputDirNotFound(String),
    SameDirectory(String),
    Load(LoadError),
    Cut(CutError),
}

impl From<LoadError> for TablecutError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<CutError> for TablecutError {
    fn from(e: CutError) -> Self {
        Self::Cut(e)
    }
}

impl Display for TablecutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefineFileNotFound(path) => {
                write!(f, "can not find define file `{path}`")
            }
            Self::InputDirNotFound(path) => {
                write!(f, "can not find input directory `{path}`")
            }
            Self::OutputDirNotFound(path) => {
                write!(f, "can not find output directory `{path}`")
            }
            Self::SameDirectory(path) => write!(
                f,
                "input and output directories must differ (both are `{path}`)"
            ),
            Self::Load(e) => Display::fmt(e, f),
            Self::Cut(e) => Display::fmt(e, f),
        }
    }
}

impl Error for TablecutError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Cut(e) => Some(e),
            _ => None,
        }
    }
}

impl Diagnostic for TablecutError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Load(e) => e.describe(),
            Self::Cut(e) => e.describe(),
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, Fail> {
        let args = std::iter::once("program")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();

        parse_options(get_opts(), args)
    }

    #[test]
    fn parse_options_help() {
        assert_eq!(parse(&["-h"]), Ok(Command::Usage));
    }

    #[test]
    fn parse_options_invalid() {
        assert_eq!(
            parse(&["--nope"]),
            Err(Fail::UnrecognizedOption("nope".into()))
        );
    }

    #[test]
    fn parse_options_missing_input_dir() {
        assert_eq!(
            parse(&["-f", "a.xml", "-r", "client", "-o", "out"]),
            Err(Fail::OptionMissing("--input-dir".into())),
        );
    }

    #[test]
    fn parse_options_missing_output_dir() {
        assert_eq!(
            parse(&["-f", "a.xml", "-r", "client", "-i", "in"]),
            Err(Fail::OptionMissing("--output-dir".into())),
        );
    }

    #[test]
    fn parse_options_missing_argument() {
        assert_eq!(
            parse(&["-f"]),
            Err(Fail::ArgumentMissing("f".into())),
        );
    }

    #[test]
    fn parse_options_all() {
        assert_eq!(
            parse(&["-f", "a.xml", "-r", "client", "-i", "in", "-o", "out"]),
            Ok(Command::Cut(CutOptions {
                define_file: "a.xml".into(),
                reader: "client".into(),
                input_dir: "in".into(),
                output_dir: "out".into(),
            })),
        );
    }

    #[test]
    fn parse_options_long_names() {
        assert_eq!(
            parse(&[
                "--define-file",
                "a.xml",
                "--reader",
                "server",
                "--input-dir",
                "in",
                "--output-dir",
                "out",
            ]),
            Ok(Command::Cut(CutOptions {
                define_file: "a.xml".into(),
                reader: "server".into(),
                input_dir: "in".into(),
                output_dir: "out".into(),
            })),
        );
    }
}
