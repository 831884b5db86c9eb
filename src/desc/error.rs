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

//! Errors resulting from violations of descriptor invariants.
//!
//! These errors carry no [`Span`](crate::span::Span);
//!   the descriptor does not know where its definitions came from beyond
//!   what each definition records about itself.
//! The [schema parser](crate::schema) attaches the span of the offending
//!   element.

use crate::global::RESERVED_LOCAL_STRUCT_NAMES;
use std::{error::Error, fmt::Display};

/// Kind of definition that a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Reader,
    GlobalStruct,
    LocalStruct,
    Field,
    Table,
    Column,
}

impl Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Reader => write!(f, "reader"),
            Self::GlobalStruct => write!(f, "struct"),
            Self::LocalStruct => write!(f, "local struct"),
            Self::Field => write!(f, "field"),
            Self::Table => write!(f, "table"),
            Self::Column => write!(f, "column"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescError {
    /// A name was defined twice within the same scope.
    Duplicate(NameKind, String),

    /// A table or global struct was given a name already used by the
    ///   other within the namespace they share.
    Conflict {
        kind: NameKind,
        name: String,
        existing: NameKind,
    },

    /// Local struct uses a name reserved for generated row types.
    ReservedName(String),

    /// Table was built without a key.
    MissingKey(String),

    /// Table key names a column that has not (yet) been defined.
    KeyNotDefined(String),

    /// Table key names a column that is not `int` or `string`.
    KeyNotScalar(String),

    /// A reader is referenced but never defined.
    UnknownReader(String),

    /// A struct is referenced but cannot be resolved.
    UnknownStruct(String),
}

impl DescError {
    pub(super) fn duplicate<S: Into<String>>(kind: NameKind, name: S) -> Self {
        Self::Duplicate(kind, name.into())
    }
}

impl Display for DescError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Duplicate(kind, name) => {
                write!(f, "{kind} name `{name}` is duplicated")
            }
            Self::Conflict {
                kind,
                name,
                existing,
            } if kind == existing => {
                write!(f, "{kind} name `{name}` is duplicated")
            }
            Self::Conflict {
                kind,
                name,
                existing,
            } => write!(
                f,
                "{kind} name `{name}` is duplicated \
                 (already defined as a {existing})"
            ),
            Self::ReservedName(name) => {
                let [a, b, c, d] = RESERVED_LOCAL_STRUCT_NAMES;

                write!(
                    f,
                    "local struct can not be named as `{a}`, `{b}`, \
                     `{c}` or `{d}` (found `{name}`)"
                )
            }
            Self::MissingKey(table) => write!(
                f,
                "`table` node must contain a `key` or `setkey` attribute \
                 (table `{table}`)"
            ),
            Self::KeyNotDefined(key) => {
                write!(f, "table key `{key}` is not defined")
            }
            Self::KeyNotScalar(key) => write!(
                f,
                "table key can only be `int` or `string` type \
                 (key `{key}`)"
            ),
            Self::UnknownReader(name) => {
                write!(f, "reader `{name}` is not defined")
            }
            Self::UnknownStruct(name) => {
                write!(f, "struct `{name}` is not defined")
            }
        }
    }
}

impl Error for DescError {}
