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

//! Mapping to source input lines.
//!
//! A [`Span`] identifies where some entity originated:
//!   a [`Context`] naming the source file and a 1-based line number
//!   within it.
//! This underpins the diagnostic system
//!   (see [`crate::diagnose`]),
//!     which uses spans both to head a report (`path:line`)
//!     and to read the offending line back from the source file.
//!
//! Spans are attached to every definition in a
//!   [`TableDescriptor`](crate::desc::TableDescriptor) and to data file
//!   errors produced by the [cutter](crate::cut).
//!
//! ```
//! use tablec::span::{Context, Span};
//!
//! let ctx: Context = "define/table.xml".into();
//! let span = ctx.span(12);
//!
//! assert_eq!(12, span.line().get());
//! assert_eq!(&ctx, span.context());
//! assert_eq!("define/table.xml:12", span.to_string());
//! ```
//!
//! Spans have line granularity only;
//!   a line is recovered from its source on demand.

use std::{
    fmt::{self, Display},
    num::NonZeroU32,
    path::Path,
    sync::Arc,
};

/// Source of a [`Span`].
///
/// This is the path of the file as it was provided to the system,
///   which may or may not be absolute.
/// Cloning a context is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Context(Arc<str>);

impl Context {
    /// Produce a [`Span`] for the given 1-based line number.
    ///
    /// A line number of `0` is clamped to `1`,
    ///   since it cannot denote a line.
    pub fn span(&self, line: u32) -> Span {
        Span {
            ctx: self.clone(),
            line: NonZeroU32::new(line).unwrap_or(NonZeroU32::MIN),
        }
    }

    /// The context's path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The context's path.
    pub fn as_path(&self) -> &Path {
        Path::new(&*self.0)
    }
}

impl From<&str> for Context {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<String> for Context {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&Path> for Context {
    fn from(path: &Path) -> Self {
        Self(path.to_string_lossy().into())
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A line within a [`Context`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    ctx: Context,
    line: NonZeroU32,
}

impl Span {
    /// Source of this span.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// 1-based line number.
    pub fn line(&self) -> NonZeroU32 {
        self.line
    }
}

impl Display for Span {
    /// Format as `path:line`,
    ///   which most editors and terminals recognize as a location.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.ctx, self.line)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn span_from_context() {
        let ctx: Context = "foo/bar.xml".into();
        let span = ctx.span(3);

        assert_eq!(&ctx, span.context());
        assert_eq!(3, span.line().get());
    }

    #[test]
    fn zero_line_clamped() {
        let ctx: Context = "foo".into();

        assert_eq!(1, ctx.span(0).line().get());
    }

    #[test]
    fn spans_order_by_context_then_line() {
        let a: Context = "a".into();
        let b: Context = "b".into();

        let mut spans = vec![b.span(1), a.span(9), a.span(2)];
        spans.sort();

        assert_eq!(spans, vec![a.span(2), a.span(9), b.span(1)]);
    }

    #[test]
    fn display_path_line() {
        let ctx: Context = Path::new("x/y.tsv").into();

        assert_eq!("x/y.tsv:42", ctx.span(42).to_string());
    }
}
