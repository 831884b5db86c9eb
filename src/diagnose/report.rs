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

//! Rendering of diagnostic information.

// NB: `write!` together with `\n` is preferred to `writeln!` so that there
//   is only a single sequence of characters to search for while tracking
//   down newlines,
//     rather than using both.

use super::{
    resolver::{SourceLine, SpanResolver, SpanResolverError},
    AnnotatedSpan, Diagnostic, Label, Level,
};
use crate::span::Span;
use std::fmt::{self, Display};
use unicode_width::UnicodeWidthStr;

pub trait Reporter {
    /// Render diagnostic report.
    ///
    /// The provided [`Report`] implements [`Display`].
    /// It is a good idea to render the entire report into a string before
    ///   writing it,
    ///     otherwise reports from concurrent processes
    ///     (e.g. a build system running the compiler for several readers)
    ///     may become interleaved.
    ///
    /// This method never fails.
    /// Errors while resolving spans are rendered into the report itself,
    ///   ensuring that the requested diagnostic is never masked.
    fn render<'d, D: Diagnostic>(&mut self, diagnostic: &'d D)
        -> Report<'d, D>;
}

/// Render diagnostic report in a highly visual way,
///   modeled after Rust's default error reporting.
///
/// Each annotated span is rendered with a heading,
///   the source line it refers to,
///   an underline,
///   and its labels.
pub struct VisualReporter<R: SpanResolver> {
    resolver: R,
}

impl<R: SpanResolver> VisualReporter<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: SpanResolver> Reporter for VisualReporter<R> {
    fn render<'d, D: Diagnostic>(
        &mut self,
        diagnostic: &'d D,
    ) -> Report<'d, D> {
        let secs = diagnostic
            .describe()
            .into_iter()
            .map(|AnnotatedSpan(span, level, olabel)| {
                let line = self.resolver.resolve(&span);
                Section::new(span, level, olabel, line)
            })
            .collect::<Vec<_>>();

        let mut report = Report::empty(diagnostic);
        report.extend(secs);
        report
    }
}

#[derive(Debug)]
pub struct Report<'d, D: Diagnostic> {
    diagnostic: &'d D,
    secs: Vec<Section>,
    level: Level,
}

impl<'d, D: Diagnostic> Report<'d, D> {
    fn empty(diagnostic: &'d D) -> Self {
        Self {
            diagnostic,
            secs: Vec::new(),
            level: Level::default(),
        }
    }
}

impl<'d, D: Diagnostic> Extend<Section> for Report<'d, D> {
    fn extend<T: IntoIterator<Item = Section>>(&mut self, secs: T) {
        for sec in secs {
            self.level = self.level.min(sec.level);

            // Add the section if it cannot be squashed into the previous.
            let remain = sec.maybe_squash_into(self.secs.last_mut());
            self.secs.extend(remain);
        }
    }
}

impl<'d, D: Diagnostic> Display for Report<'d, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{level}: {msg}\n", level = self.level, msg = self.diagnostic)?;
        self.secs.iter().try_for_each(|sec| sec.fmt(f))
    }
}

/// A section of a [`Report`] describing a [`Span`].
///
/// Adjacent sections describing the same [`Span`] are squashed
///   (see [`Section::maybe_squash_into`]),
///   but non-adjacent ones are not,
///     since reports may revisit previous spans while describing what
///     occurred.
#[derive(Debug, PartialEq, Eq)]
struct Section {
    span: Span,
    level: Level,
    line: Result<SourceLine, SpanResolverError>,
    labels: Vec<SpanLabel>,
}

impl Section {
    fn new(
        span: Span,
        level: Level,
        olabel: Option<Label>,
        line: Result<SourceLine, SpanResolverError>,
    ) -> Self {
        let mut labels = Vec::new();

        if let Err(e) = &line {
            labels.push(SpanLabel(
                Level::Help,
                format!(
                    "an error occurred while trying to look up \
                     this line: {e}"
                ),
            ));
        }

        labels.extend(olabel.map(|label| SpanLabel(level, label.to_string())));

        Self {
            span,
            level,
            line,
            labels,
        }
    }

    /// Squash self into the provided [`Section`] if they represent the same
    ///   [`Span`],
    ///     otherwise do nothing.
    ///
    /// If squashed,
    ///   [`None`] is returned.
    /// Otherwise [`Some`] is returned with `self`.
    ///
    /// The term "squash" is borrowed from `git rebase`.
    fn maybe_squash_into(self, extend: Option<&mut Section>) -> Option<Self> {
        match extend {
            Some(extend_sec) if self.span == extend_sec.span => {
                extend_sec.level = extend_sec.level.min(self.level);
                let fresh = self
                    .labels
                    .into_iter()
                    .filter(|label| !extend_sec.labels.contains(label))
                    .collect::<Vec<_>>();

                extend_sec.labels.extend(fresh);
                None
            }

            _ => Some(self),
        }
    }

    /// Width of the line number gutter.
    fn gutter_width(&self) -> usize {
        self.span.line().get().to_string().len()
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gutter = " ".repeat(self.gutter_width());

        write!(f, "{gutter}--> {span}\n", span = self.span)?;

        if let Ok(line) = &self.line {
            let text = line.text();
            let indent = text.len() - text.trim_start().len();
            let content = text.trim();

            write!(f, "{gutter} |\n")?;
            write!(f, "{num} | {text}\n", num = line.num())?;

            if !content.is_empty() {
                write!(
                    f,
                    "{gutter} | {pad}{marks}\n",
                    pad = &text[..indent],
                    marks = "^".repeat(content.width().max(1)),
                )?;
            }
        }

        for label in self.labels.iter() {
            write!(f, "{gutter} = {label}\n")?;
        }

        Ok(())
    }
}

/// A label describing a span.
#[derive(Debug, PartialEq, Eq)]
struct SpanLabel(Level, String);

impl Display for SpanLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(level, label) = self;
        write!(f, "{level}: {label}")
    }
}

#[cfg(test)]
mod test;
