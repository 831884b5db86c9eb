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

//! Errors while cutting data files.

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    span::Span,
};
use std::{error::Error, fmt::Display, io, path::PathBuf};

#[derive(Debug)]
pub enum CutError {
    /// Cutting was requested for a reader that the schema does not define.
    UnknownReader(String),

    /// A data file could not be read.
    Read(io::Error, PathBuf),

    /// A cut data file could not be written.
    Write(io::Error, PathBuf),

    /// A line is not terminated by `\r\n`,
    ///   or contains a stray `\r` or `\n`.
    LineEnding(Span),

    /// The data file lacks the comment line or the column name line.
    MissingHeader(Span),

    /// A line does not have one field per column.
    ColumnCount {
        found: usize,
        expected: usize,
        span: Span,
    },

    /// The column name line disagrees with the schema.
    ///
    /// `position` is 1-based.
    HeaderMismatch {
        position: usize,
        expected: String,
        found: String,
        span: Span,
    },
}

impl Display for CutError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::UnknownReader(name) => {
                write!(f, "reader `{name}` is not defined")
            }
            Self::Read(e, path) => write!(
                f,
                "can not read data file `{}`: {e}",
                path.display()
            ),
            Self::Write(e, path) => write!(
                f,
                "can not write data file `{}`: {e}",
                path.display()
            ),
            Self::LineEnding(span) => write!(
                f,
                "data file `{}` line ending `\\r\\n` is required",
                span.context()
            ),
            Self::MissingHeader(span) => write!(
                f,
                "data file `{}` comment line and name line is required",
                span.context()
            ),
            Self::ColumnCount {
                found,
                expected,
                span,
            } => write!(
                f,
                "data file `{}` line {} has {found} columns, \
                 but {expected} are defined",
                span.context(),
                span.line()
            ),
            Self::HeaderMismatch {
                position, expected, ..
            } => write!(
                f,
                "data file column {position} must be named `{expected}`"
            ),
        }
    }
}

impl Error for CutError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(e, _) | Self::Write(e, _) => Some(e),
            _ => None,
        }
    }
}

impl Diagnostic for CutError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::UnknownReader(_) | Self::Read(..) | Self::Write(..) => vec![],

            Self::LineEnding(span) => span
                .error("expected `\\r\\n` at the end of this line")
                .with_help(
                    "data files must use `\\r\\n` line endings throughout, \
                     including after the last line",
                )
                .into(),

            Self::MissingHeader(span) => span
                .mark_error()
                .with_help(
                    "the first line of a data file is a comment and the \
                     second names each column",
                )
                .into(),

            Self::ColumnCount {
                found, expected, span,
            } => span
                .error(format!("{found} columns, expected {expected}"))
                .into(),

            Self::HeaderMismatch {
                position,
                expected,
                found,
                span,
            } => span
                .error(format!("found `{found}` in column {position}"))
                .with_help(format!("expected `{expected}`"))
                .into(),
        }
    }
}
