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

//! Target-language code generation.
//!
//! A [`CodeGenerator`] emits declarations for the tables that a single
//!   reader sees:
//!     one source file per table containing the table's row type,
//!     its used local structs,
//!     and its row containers;
//!   and,
//!     if any are used,
//!     one source file containing the used global structs.
//! Generated code is placed in the namespace of the reader.
//!
//! Each generator projects its own copy of the descriptor for the reader
//!   (see [`crate::project`]),
//!     so it may be given either a full or an already-projected
//!     descriptor.
//! Structs that are not referenced by any visible column are not emitted.
//!
//! Generators share [`LineWriter`] for newline-aware emission.

mod cpp;
mod csharp;

pub use cpp::CppCodeGenerator;
pub use csharp::CSharpCodeGenerator;

use crate::{
    desc::{ReaderDef, TableDescriptor},
    diagnose::{AnnotatedSpan, Diagnostic},
    fs,
    project::{project_for_reader, ProjectError, UsedStructs},
};
use std::{
    error::Error,
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Newline sequence of generated source files.
///
/// This is independent of the line terminator of data files,
///   which is always `\r\n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NewLineStyle {
    /// `\n`
    #[default]
    Unix,
    /// `\r\n`
    Dos,
}

impl NewLineStyle {
    /// Style named `name` on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "unix" => Some(Self::Unix),
            "dos" => Some(Self::Dos),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unix => "\n",
            Self::Dos => "\r\n",
        }
    }
}

/// Target language of generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Cpp,
    CSharp,
}

impl Language {
    /// Language named `name` on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cpp" => Some(Self::Cpp),
            "csharp" => Some(Self::CSharp),
            _ => None,
        }
    }

    pub fn generator(&self) -> Box<dyn CodeGenerator> {
        match self {
            Self::Cpp => Box::new(CppCodeGenerator),
            Self::CSharp => Box::new(CSharpCodeGenerator),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Cpp => write!(f, "cpp"),
            Self::CSharp => write!(f, "csharp"),
        }
    }
}

pub trait CodeGenerator {
    /// Emit source files for the tables that `reader` sees into
    ///   `output_dir`,
    ///     replacing any existing files of the same name.
    ///
    /// Returns the paths of the files written,
    ///   in the order written.
    fn generate(
        &self,
        desc: &TableDescriptor,
        reader: &str,
        output_dir: &Path,
        newline: NewLineStyle,
    ) -> Result<Vec<PathBuf>, CodegenError>;
}

/// Accumulates lines of generated source.
///
/// Each line is indented by the current indentation level and terminated
///   according to the [`NewLineStyle`].
/// Empty lines are never indented.
#[derive(Debug)]
pub struct LineWriter {
    buf: String,
    newline: NewLineStyle,
    indent: usize,
}

impl LineWriter {
    const INDENT: &'static str = "    ";

    pub fn new(newline: NewLineStyle) -> Self {
        Self {
            buf: String::new(),
            newline,
            indent: 0,
        }
    }

    pub fn line<S: AsRef<str>>(&mut self, text: S) -> &mut Self {
        let text = text.as_ref();

        if !text.is_empty() {
            for _ in 0..self.indent {
                self.buf.push_str(Self::INDENT);
            }
            self.buf.push_str(text);
        }

        self.buf.push_str(self.newline.as_str());
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// A descriptor projected for a single reader,
///   as seen by a generator.
struct ReaderView {
    desc: TableDescriptor,
    used: UsedStructs,
    reader: ReaderDef,
}

impl ReaderView {
    fn new(desc: &TableDescriptor, reader: &str) -> Result<Self, CodegenError> {
        let mut desc = desc.clone();
        let used = project_for_reader(&mut desc, reader)?;

        let reader = desc
            .reader(reader)
            .cloned()
            .ok_or_else(|| ProjectError::UnknownReader(reader.into()))?;

        Ok(Self { desc, used, reader })
    }

    /// Whether any global struct is referenced by a visible column.
    fn uses_global_structs(&self) -> bool {
        self.desc
            .global_structs()
            .iter()
            .any(|def| self.used.contains(def))
    }
}

/// Write `text` to `name` within `output_dir`.
fn write_output(
    output_dir: &Path,
    name: &str,
    text: String,
) -> Result<PathBuf, CodegenError> {
    let path = output_dir.join(name);

    fs::write_all(&path, &text)
        .map_err(|e| CodegenError::Write(e, path.clone()))?;

    debug!(path = %path.display(), bytes = text.len(), "wrote generated file");

    Ok(path)
}

#[derive(Debug)]
pub enum CodegenError {
    /// The descriptor could not be projected for the requested reader.
    Project(ProjectError),

    /// A generated file could not be written.
    Write(io::Error, PathBuf),
}

impl From<ProjectError> for CodegenError {
    fn from(e: ProjectError) -> Self {
        Self::Project(e)
    }
}

impl Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Project(e) => e.fmt(f),
            Self::Write(e, path) => {
                write!(f, "can not write file `{}`: {e}", path.display())
            }
        }
    }
}

impl Error for CodegenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Project(e) => Some(e),
            Self::Write(e, _) => Some(e),
        }
    }
}

impl Diagnostic for CodegenError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Project(e) => e.describe(),
            Self::Write(..) => vec![],
        }
    }
}

#[cfg(test)]
mod test;
