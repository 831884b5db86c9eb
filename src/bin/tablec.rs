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

//! This is the table compiler.
//!
//! `tablec` parses a schema definition and generates target-language
//!   declarations for the tables visible to a single reader.
//! Data files are cut for the same reader using
//!   [`tablecut`](../tablecut).

extern crate tablec;

use getopts::{Fail, Options};
use std::{
    env,
    error::Error,
    fmt::{self, Display},
    path::{Path, PathBuf},
};
use tablec::{
    codegen::{CodegenError, Language, NewLineStyle},
    diagnose::{
        AnnotatedSpan, Diagnostic, FsSpanResolver, Reporter, VisualReporter,
    },
    fs,
    schema::{self, LoadError},
};
use tracing::info;

/// Types of commands
#[derive(Debug, PartialEq)]
enum Command {
    Generate(GenerateOptions),
    Usage,
}

#[derive(Debug, PartialEq)]
struct GenerateOptions {
    define_file: String,
    language: Language,
    reader: String,
    output_dir: String,
    newline: NewLineStyle,
}

/// Generate code as described by `opts`,
///   returning the paths of the files written.
fn generate(opts: &GenerateOptions) -> Result<Vec<PathBuf>, TablecError> {
    if !fs::is_file(&opts.define_file) {
        return Err(TablecError::DefineFileNotFound(opts.define_file.clone()));
    }

    if !fs::is_dir(&opts.output_dir) {
        return Err(TablecError::OutputDirNotFound(opts.output_dir.clone()));
    }

    let desc = schema::load(&opts.define_file)?;

    let written = opts.language.generator().generate(
        &desc,
        &opts.reader,
        Path::new(&opts.output_dir),
        opts.newline,
    )?;

    info!(
        language = %opts.language,
        reader = %opts.reader,
        files = written.len(),
        "generated code"
    );

    Ok(written)
}

/// Entrypoint for the compiler
pub fn main() {
    tablec::log::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("tablec");
    let opts = get_opts();
    let usage = opts.usage(&format!(
        "Usage: {program} -f FILE -l LANG -r READER [-o DIR] [-n STYLE]"
    ));

    match parse_options(opts, args.clone()) {
        Ok(Command::Generate(opts)) => match generate(&opts) {
            Ok(_) => std::process::exit(exitcode::OK),
            Err(e) => {
                // Rendering to a string first ensures that the report is
                //   written as a unit.
                let mut reporter = VisualReporter::new(FsSpanResolver::default());
                let report = reporter.render(&e).to_string();

                eprint!("{report}");
                eprintln!(
                    "fatal: failed to generate code for reader `{}`",
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
    opts.optopt("l", "language", "target language: cpp or csharp", "LANG");
    opts.optopt("r", "reader", "reader to generate code for", "READER");
    opts.optopt("o", "output-dir", "output directory (default: .)", "DIR");
    opts.optopt(
        "n",
        "newline",
        "newline style of generated code: unix or dos (default: unix)",
        "STYLE",
    );
    opts.optflag("h", "help", "print this help menu");

    opts
}

/// Option parser
fn parse_options(opts: Options, args: Vec<String>) -> Result<Command, UsageError> {
    let matches = opts.parse(args.iter().skip(1))?;

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    if let Some(extra) = matches.free.first() {
        return Err(Fail::UnrecognizedOption(extra.clone()).into());
    }

    let define_file = required(&matches, "define-file")?;
    let language_name = required(&matches, "language")?;
    let reader = required(&matches, "reader")?;

    let language = Language::from_name(&language_name)
        .ok_or(UsageError::UnsupportedLanguage(language_name))?;

    let output_dir = matches.opt_str("o").unwrap_or_else(|| ".".into());

    let newline = match matches.opt_str("n") {
        Some(name) => NewLineStyle::from_name(&name)
            .ok_or(UsageError::InvalidNewLineStyle(name))?,
        None => NewLineStyle::default(),
    };

    Ok(Command::Generate(GenerateOptions {
        define_file,
        language,
        reader,
        output_dir,
        newline,
    }))
}

fn required(matches: &getopts::Matches, name: &str) -> Result<String, Fail> {
    matches
        .opt_str(name)
        .ok_or_else(|| Fail::OptionMissing(format!("--{name}")))
}

/// Invalid command line.
#[derive(Debug, PartialEq)]
enum UsageError {
    Getopts(Fail),
    UnsupportedLanguage(String),
    InvalidNewLineStyle(String),
}

impl From<Fail> for UsageError {
    fn from(e: Fail) -> Self {
        Self::Getopts(e)
    }
}

impl Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Getopts(e) => Display::fmt(e, f),
            Self::UnsupportedLanguage(lang) => {
                write!(f, "language `{lang}` is not supported")
            }
            Self::InvalidNewLineStyle(style) => {
                write!(f, "newline style `{style}` is invalid")
            }
        }
    }
}

/// Compiler (`tablec`) error.
///
/// This represents the aggregation of all possible errors that can occur
///   after the command line has been parsed.
#[derive(Debug)]
pub enum TablecError {
    DefineFileNotFound(String),
    OutputDirNotFound(String),
    Load(LoadError),
    Codegen(CodegenError),
}

impl From<LoadError> for TablecError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<CodegenError> for TablecError {
    fn from(e: CodegenError) -> Self {
        Self::Codegen(e)
    }
}

impl Display for TablecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefineFileNotFound(path) => {
                write!(f, "can not find define file `{path}`")
            }
            Self::OutputDirNotFound(path) => {
                write!(f, "can not find output directory `{path}`")
            }
            Self::Load(e) => Display::fmt(e, f),
            Self::Codegen(e) => Display::fmt(e, f),
        }
    }
}

impl Error for TablecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DefineFileNotFound(_) | Self::OutputDirNotFound(_) => None,
            Self::Load(e) => Some(e),
            Self::Codegen(e) => Some(e),
        }
    }
}

impl Diagnostic for TablecError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Load(e) => e.describe(),
            Self::Codegen(e) => e.describe(),

            // Rendered as the error message alone.
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, UsageError> {
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
    fn parse_options_help_long() {
        assert_eq!(parse(&["--help"]), Ok(Command::Usage));
    }

    #[test]
    fn parse_options_help_wins_over_missing() {
        assert_eq!(parse(&["-f", "define.xml", "--help"]), Ok(Command::Usage));
    }

    #[test]
    fn parse_options_invalid() {
        assert!(matches!(
            parse(&["-q"]),
            Err(UsageError::Getopts(Fail::UnrecognizedOption(_)))
        ));
    }

    #[test]
    fn parse_options_free_argument() {
        assert_eq!(
            parse(&["-f", "a.xml", "-l", "cpp", "-r", "client", "extra"]),
            Err(UsageError::Getopts(Fail::UnrecognizedOption("extra".into()))),
        );
    }

    #[test]
    fn parse_options_missing_define_file() {
        assert_eq!(
            parse(&["-l", "cpp", "-r", "client"]),
            Err(UsageError::Getopts(Fail::OptionMissing(
                "--define-file".into()
            ))),
        );
    }

    #[test]
    fn parse_options_missing_language() {
        assert_eq!(
            parse(&["-f", "a.xml", "-r", "client"]),
            Err(UsageError::Getopts(Fail::OptionMissing("--language".into()))),
        );
    }

    #[test]
    fn parse_options_missing_reader() {
        assert_eq!(
            parse(&["-f", "a.xml", "-l", "cpp"]),
            Err(UsageError::Getopts(Fail::OptionMissing("--reader".into()))),
        );
    }

    #[test]
    fn parse_options_unsupported_language() {
        let result = parse(&["-f", "a.xml", "-l", "go", "-r", "client"]);

        assert_eq!(result, Err(UsageError::UnsupportedLanguage("go".into())));
        assert_eq!(
            result.unwrap_err().to_string(),
            "language `go` is not supported"
        );
    }

    #[test]
    fn parse_options_invalid_newline() {
        assert_eq!(
            parse(&["-f", "a.xml", "-l", "cpp", "-r", "client", "-n", "mac"]),
            Err(UsageError::InvalidNewLineStyle("mac".into())),
        );
    }

    #[test]
    fn parse_options_defaults() {
        assert_eq!(
            parse(&["-f", "a.xml", "-l", "csharp", "-r", "client"]),
            Ok(Command::Generate(GenerateOptions {
                define_file: "a.xml".into(),
                language: Language::CSharp,
                reader: "client".into(),
                output_dir: ".".into(),
                newline: NewLineStyle::Unix,
            })),
        );
    }

    #[test]
    fn parse_options_long_names() {
        assert_eq!(
            parse(&[
                "--define-file",
                "a.xml",
                "--language",
                "cpp",
                "--reader",
                "server",
                "--output-dir",
                "out",
                "--newline",
                "dos",
            ]),
            Ok(Command::Generate(GenerateOptions {
                define_file: "a.xml".into(),
                language: Language::Cpp,
                reader: "server".into(),
                output_dir: "out".into(),
                newline: NewLineStyle::Dos,
            })),
        );
    }
}
