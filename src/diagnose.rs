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

//! Reporting of schema and data file errors.
//!
//! Reports are laid out like those of `rustc`.
//! An error type describes itself as a series of [`AnnotatedSpan`]s
//!   (see [`Diagnostic`]),
//!     and a [`Reporter`] renders that description along with the
//!     relevant source lines.
//!
//! Errors that occur in the schema or in data files carry [`Span`]s;
//!   errors that do not
//!     (e.g. I/O errors on a path the user provided)
//!     describe themselves with no spans and are rendered using only their
//!     [`Display`] message.

mod report;
mod resolver;

pub use report::{Report, Reporter, VisualReporter};
pub use resolver::{
    BufSpanResolver, FsSpanResolver, SourceLine, SpanResolver,
    SpanResolverError,
};

use std::{
    borrow::Cow,
    error::Error,
    fmt::{self, Display},
};

use crate::span::Span;

/// An error that can point at the definition or data file lines that
///   caused it.
pub trait Diagnostic: Error + Sized {
    /// Lines to show beneath the error message,
    ///   in the order they are to be rendered.
    ///
    /// Errors without a location yield an empty [`Vec`],
    ///   in which case only the message is reported.
    fn describe(&self) -> Vec<AnnotatedSpan>;
}

/// Severity of an [`AnnotatedSpan`].
///
/// A report takes the most severe level of its spans;
///   lower levels are more severe.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
#[repr(u8)]
pub enum Level {
    /// The offending line.
    #[default]
    Error = 1,

    /// Useful information that supplements other messages,
    ///   such as where a conflicting definition lives.
    Note,

    /// Advice that may help the user fix the problem.
    Help,
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Note => write!(f, "note"),
            Level::Help => write!(f, "help"),
        }
    }
}

/// A label associated with a [`Span`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Label<'a>(Cow<'a, str>);

impl<'a> Display for Label<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<'a> From<String> for Label<'a> {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl<'a> From<&'a str> for Label<'a> {
    fn from(s: &'a str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

/// A line to render in a report,
///   with its severity and an optional label.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AnnotatedSpan<'l>(Span, Level, Option<Label<'l>>);

impl<'l> AnnotatedSpan<'l> {
    /// Follow this span with a help label on the same span.
    pub fn with_help<L: Into<Label<'l>>>(
        self,
        label: L,
    ) -> [AnnotatedSpan<'l>; 2] {
        let help = self.0.clone().help(label);
        [self, help]
    }

    pub fn span(&self) -> &Span {
        &self.0
    }

    pub fn level(&self) -> Level {
        self.1
    }

    pub fn label(&self) -> Option<&Label<'l>> {
        self.2.as_ref()
    }
}

impl<'l> From<AnnotatedSpan<'l>> for Vec<AnnotatedSpan<'l>> {
    fn from(x: AnnotatedSpan<'l>) -> Self {
        vec![x]
    }
}

pub trait Annotate: Sized {
    /// Annotate a [`Span`] with a severity [`Level`] and an optional
    ///   [`Label`] to display alongside of it.
    fn annotate(self, level: Level, label: Option<Label>) -> AnnotatedSpan;

    /// Label the offending line.
    fn error<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Error, Some(label.into()))
    }

    /// Mark the location of an error without a label,
    ///   for when a label would only repeat the error message.
    fn mark_error(self) -> AnnotatedSpan<'static> {
        self.annotate(Level::Error, None)
    }

    /// Point at a related line,
    ///   such as an earlier definition of the same name.
    fn note<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Note, Some(label.into()))
    }

    /// Suggest a fix,
    ///   attached to the line it applies to.
    fn help<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Help, Some(label.into()))
    }
}

impl Annotate for Span {
    fn annotate(self, level: Level, label: Option<Label>) -> AnnotatedSpan {
        AnnotatedSpan(self, level, label)
    }
}

impl Annotate for &Span {
    fn annotate(self, level: Level, label: Option<Label>) -> AnnotatedSpan {
        AnnotatedSpan(self.clone(), level, label)
    }
}
