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

//! Errors while loading and parsing schema definitions.

use crate::{
    desc::DescError,
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    global,
    span::Span,
    xir,
};
use std::{error::Error, fmt::Display, io, path::PathBuf};

/// A schema definition violates a structural or referential rule.
///
/// Parsing stops at the first violation,
///   so at most one of these errors is produced per definition file.
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// The root element is not `define`,
    ///   or there is no root element at all.
    RootNotDefine(Span),

    /// A node lacks a required attribute.
    MissingAttr(String, &'static str, Span),

    /// An attribute that must be an identifier
    ///   (or sequence of identifiers)
    ///   is not.
    InvalidAttr(String, &'static str, Span),

    /// A `table` node has neither `key` nor `setkey`.
    MissingKeyAttr(Span),

    /// A child node is not one of the nodes permitted by its parent.
    UnexpectedChild {
        expected: &'static str,
        found: String,
        span: Span,
    },

    /// A type name is neither a primitive nor a resolvable struct.
    ///
    /// The type is quoted as written,
    ///   including any `list{...}` wrapper.
    InvalidType(String, Span),

    /// The descriptor rejected a definition.
    Desc(DescError, Span),

    /// A name is defined a second time within its scope.
    ///
    /// The second span locates the first definition.
    Redefined(DescError, Span, Span),
}

impl SchemaError {
    /// Location of the offending node.
    pub fn span(&self) -> &Span {
        match self {
            Self::RootNotDefine(span)
            | Self::MissingAttr(_, _, span)
            | Self::InvalidAttr(_, _, span)
            | Self::MissingKeyAttr(span)
            | Self::UnexpectedChild { span, .. }
            | Self::InvalidType(_, span)
            | Self::Desc(_, span)
            | Self::Redefined(_, span, _) => span,
        }
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::RootNotDefine(_) => {
                write!(f, "root node must be `define` node")
            }
            Self::MissingAttr(node, attr, _) => {
                write!(f, "`{node}` node must contain a `{attr}` attribute")
            }
            Self::InvalidAttr(node, attr, _) => {
                write!(f, "`{node}` node `{attr}` attribute is invalid")
            }
            Self::MissingKeyAttr(_) => write!(
                f,
                "`table` node must contain a `key` or `setkey` attribute"
            ),
            Self::UnexpectedChild { expected, .. } => {
                write!(f, "expect a {expected} node")
            }
            Self::InvalidType(ty, _) => write!(f, "type `{ty}` is invalid"),
            Self::Desc(e, _) | Self::Redefined(e, _, _) => e.fmt(f),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Desc(e, _) | Self::Redefined(e, _, _) => Some(e),
            _ => None,
        }
    }
}

impl Diagnostic for SchemaError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::RootNotDefine(span) => span
                .error("expected `<define>` here")
                .with_help("schema definitions must be enclosed in `define`")
                .into(),

            Self::MissingAttr(_, attr, span) => {
                span.error(format!("missing `{attr}`")).into()
            }

            Self::InvalidAttr(_, "namespace", span) => span
                .error("invalid namespace")
                .with_help(format!(
                    "a namespace is a sequence of identifiers separated \
                     by `{}`",
                    global::NAMESPACE_SEPARATOR
                ))
                .into(),

            Self::InvalidAttr(_, _, span) => span
                .error("invalid identifier")
                .with_help(
                    "identifiers must begin with a letter or `_`, \
                     followed by letters, digits, or `_`",
                )
                .into(),

            Self::MissingKeyAttr(span) => span
                .error("this table has no key")
                .with_help(
                    "use `key` if each key identifies one row, \
                     or `setkey` if a key may identify many rows",
                )
                .into(),

            Self::UnexpectedChild { found, span, .. } => {
                span.error(format!("unexpected `{found}`")).into()
            }

            Self::InvalidType(_, span) => span
                .error("unknown type")
                .with_help(
                    "types are `int`, `string`, a struct name, \
                     or `list{T}` of any of those",
                )
                .into(),

            Self::Desc(DescError::KeyNotScalar(_), span) => span
                .error("table key is not `int` or `string`")
                .into(),

            Self::Desc(DescError::ReservedName(_), span) => span
                .error("reserved name")
                .with_help(
                    "these names are used by types generated for each table",
                )
                .into(),

            Self::Redefined(_, span, first) => vec![
                span.error("defined again here"),
                first.note("first defined here"),
            ],

            Self::Desc(_, span) => span.mark_error().into(),
        }
    }
}

/// Failure to load a schema definition file.
#[derive(Debug)]
pub enum LoadError {
    /// The definition file could not be read.
    Io(io::Error, PathBuf),

    /// The definition file is not well-formed XML.
    Xir(xir::Error),

    /// The definition file is well-formed but not a valid schema.
    Schema(SchemaError),
}

impl From<xir::Error> for LoadError {
    fn from(e: xir::Error) -> Self {
        Self::Xir(e)
    }
}

impl From<SchemaError> for LoadError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Io(e, path) => write!(
                f,
                "can not read define file `{}`: {e}",
                path.display()
            ),
            Self::Xir(e) => e.fmt(f),
            Self::Schema(e) => e.fmt(f),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e, _) => Some(e),
            Self::Xir(e) => Some(e),
            Self::Schema(e) => Some(e),
        }
    }
}

impl Diagnostic for LoadError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Io(..) => vec![],
            Self::Xir(e) => e.describe(),
            Self::Schema(e) => e.describe(),
        }
    }
}
