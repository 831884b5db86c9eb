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

//! Resolve [`Span`]s into source lines.

use crate::{
    fs,
    span::{Context, Span},
};
use fxhash::FxHashMap;
use memchr::memchr_iter;
use std::{
    error::Error,
    fmt::{self, Display},
    io,
    num::NonZeroU32,
};

/// Resolves [`Span`]s into the text of the line they refer to.
///
/// Spans carry only a path and line number;
///   the text of the line is recovered only when a diagnostic is rendered,
///     which is not the typical happy path of the compiler.
/// This requires that the [`Context`] of a span can be read a second time.
pub trait SpanResolver {
    /// Resolve the provided [`Span`] into its [`SourceLine`].
    fn resolve(&mut self, span: &Span) -> Result<SourceLine, SpanResolverError>;
}

/// A line of source text.
///
/// Any line terminator (`\n` or `\r\n`) is stripped,
///   and bytes that are not valid UTF-8 are replaced with
///   `U+FFFD REPLACEMENT CHARACTER`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SourceLine {
    num: NonZeroU32,
    text: String,
}

impl SourceLine {
    pub fn num(&self) -> NonZeroU32 {
        self.num
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Locate line `num` within `src`.
fn line_of(src: &[u8], num: NonZeroU32) -> Result<SourceLine, SpanResolverError> {
    let want = num.get() as usize - 1;

    let start = match want {
        0 => 0,
        n => match memchr_iter(b'\n', src).nth(n - 1) {
            Some(pos) => pos + 1,
            None => return Err(SpanResolverError::Eof { line: num }),
        },
    };

    if start > src.len() || (start == src.len() && want > 0) {
        return Err(SpanResolverError::Eof { line: num });
    }

    let rest = &src[start..];
    let end = memchr::memchr(b'\n', rest).unwrap_or(rest.len());
    let mut bytes = &rest[..end];

    if let Some(stripped) = bytes.strip_suffix(b"\r") {
        bytes = stripped;
    }

    let text = String::from_utf8_lossy(bytes).into_owned();

    Ok(SourceLine { num, text })
}

/// Resolve spans by reading their [`Context`] from the filesystem.
///
/// Each file is read at most once per resolver,
///   in the same shared mode used to read data files
///   (see [`fs::read_all_shared`]).
#[derive(Debug, Default)]
pub struct FsSpanResolver {
    cache: FxHashMap<Context, Vec<u8>>,
}

impl SpanResolver for FsSpanResolver {
    fn resolve(&mut self, span: &Span) -> Result<SourceLine, SpanResolverError> {
        let ctx = span.context();

        if !self.cache.contains_key(ctx) {
            let src = fs::read_all_shared(ctx.as_path())
                .map_err(|e| SpanResolverError::Io(e.kind()))?;

            self.cache.insert(ctx.clone(), src);
        }

        match self.cache.get(ctx) {
            Some(src) => line_of(src, span.line()),
            None => Err(SpanResolverError::Io(io::ErrorKind::NotFound)),
        }
    }
}

/// Resolve spans against in-memory sources.
///
/// This is useful when the source was never on disk,
///   or for testing.
#[derive(Debug, Default)]
pub struct BufSpanResolver {
    srcs: FxHashMap<Context, Vec<u8>>,
}

impl BufSpanResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide the source for `ctx`,
    ///   replacing any previous source.
    pub fn add_source<S: Into<Vec<u8>>>(&mut self, ctx: Context, src: S) {
        self.srcs.insert(ctx, src.into());
    }
}

impl SpanResolver for BufSpanResolver {
    fn resolve(&mut self, span: &Span) -> Result<SourceLine, SpanResolverError> {
        self.srcs
            .get(span.context())
            .ok_or(SpanResolverError::Io(io::ErrorKind::NotFound))
            .and_then(|src| line_of(src, span.line()))
    }
}

/// Failure to resolve a [`Span`].
///
/// These errors are rendered as part of a report rather than replacing it,
///   so that the original diagnostic is never masked.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SpanResolverError {
    /// The source could not be read.
    Io(io::ErrorKind),

    /// The source has fewer lines than the span requires.
    Eof { line: NonZeroU32 },
}

impl Display for SpanResolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "unable to read source: {kind}"),
            Self::Eof { line } => {
                write!(f, "source ended before line {line}")
            }
        }
    }
}

impl Error for SpanResolverError {}
