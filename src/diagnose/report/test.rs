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

use super::*;
use crate::{
    diagnose::{Annotate, BufSpanResolver},
    span::Context,
};
use std::error::Error;

/// Diagnostic with a fixed description.
#[derive(Debug)]
struct StubError(String, Vec<AnnotatedSpan<'static>>);

impl Display for StubError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Error for StubError {}

impl Diagnostic for StubError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        self.1.clone()
    }
}

fn ctx() -> Context {
    "define.xml".into()
}

fn resolver() -> BufSpanResolver {
    let mut resolver = BufSpanResolver::new();
    resolver.add_source(
        ctx(),
        "<define>\n  <table name=\"Item\">\n</define>\n",
    );
    resolver
}

#[test]
fn no_spans_renders_message_only() {
    let err = StubError("something failed".into(), vec![]);
    let mut sut = VisualReporter::new(resolver());

    assert_eq!("error: something failed\n", sut.render(&err).to_string());
}

#[test]
fn span_with_source_line_and_label() {
    let err = StubError(
        "bad table".into(),
        vec![ctx().span(2).error("defined here")],
    );
    let mut sut = VisualReporter::new(resolver());

    assert_eq!(
        "error: bad table\n\
         \x20--> define.xml:2\n\
         \x20 |\n\
         2 |   <table name=\"Item\">\n\
         \x20 |   ^^^^^^^^^^^^^^^^^^^\n\
         \x20 = error: defined here\n",
        sut.render(&err).to_string(),
    );
}

#[test]
fn adjacent_same_span_squashed() {
    let err = StubError(
        "bad table".into(),
        ctx().span(2).error("defined here").with_help("rename it").into(),
    );
    let mut sut = VisualReporter::new(resolver());
    let rendered = sut.render(&err).to_string();

    assert_eq!(1, rendered.matches("-->").count());
    assert!(rendered.contains(" = error: defined here\n"));
    assert!(rendered.contains(" = help: rename it\n"));
}

#[test]
fn distinct_spans_not_squashed() {
    let err = StubError(
        "duplicate".into(),
        vec![ctx().span(2).mark_error(), ctx().span(3).note("other")],
    );
    let mut sut = VisualReporter::new(resolver());
    let rendered = sut.render(&err).to_string();

    assert_eq!(2, rendered.matches("-->").count());
    assert!(rendered.contains("3 | </define>\n"));
}

#[test]
fn unresolved_span_does_not_mask_error() {
    let other: Context = "missing.xml".into();
    let err = StubError("oops".into(), vec![other.span(7).mark_error()]);
    let mut sut = VisualReporter::new(resolver());
    let rendered = sut.render(&err).to_string();

    assert!(rendered.starts_with("error: oops\n --> missing.xml:7\n"));
    assert!(rendered.contains("help: an error occurred while trying"));
}
