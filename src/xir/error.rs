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

//! XIR error information.

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    span::Span,
    tpwrap::quick_xml,
};
use std::{fmt::Display, str::Utf8Error};

/// Error attempting to produce a XIR [`Document`](super::Document).
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The XML is malformed.
    QuickXmlError(quick_xml::Error, Span),

    /// A name is not valid UTF-8.
    ///
    /// The raw bytes are retained so that the displayer may determine how
    ///   to handle the invalid encoding.
    InvalidUtf8(Utf8Error, Vec<u8>, Span),

    /// The document ended while an element was still open.
    ///
    /// The span is that of the opening tag.
    UnclosedElement(String, Span),
}

impl Error {
    pub fn span(&self) -> &Span {
        match self {
            Self::QuickXmlError(_, span)
            | Self::InvalidUtf8(.., span)
            | Self::UnclosedElement(_, span) => span,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuickXmlError(inner, _) => {
                write!(f, "malformed XML: {inner}")
            }
            Self::InvalidUtf8(inner, bytes, _) => {
                write!(
                    f,
                    "{} for string `{}`",
                    inner,
                    String::from_utf8_lossy(bytes)
                )
            }
            Self::UnclosedElement(name, _) => {
                write!(f, "element `{name}` is never closed")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::QuickXmlError(inner, _) => Some(inner),
            Self::InvalidUtf8(inner, ..) => Some(inner),
            Self::UnclosedElement(..) => None,
        }
    }
}

impl Diagnostic for Error {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::QuickXmlError(_, span) => {
                span.error("error detected while parsing this line").into()
            }
            Self::InvalidUtf8(_, _, span) => span.mark_error().into(),
            Self::UnclosedElement(_, span) => span
                .error("element opened here")
                .with_help("add a closing tag or make the element self-closing")
                .into(),
        }
    }
}
