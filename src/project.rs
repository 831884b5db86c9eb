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

//! Reader projection.
//!
//! A reader sees only those tables whose reader set admits it,
//!   and within those tables only the key column and the columns whose
//!   reader sets admit it.
//! [`project_for_reader`] narrows a [`TableDescriptor`] in place to what
//!   a single reader sees;
//!     the [cutter](crate::cut) applies the same rule to data files.
//!
//! Structs are never removed by projection,
//!   even if no remaining column references them.
//! Instead,
//!   projection yields the [`UsedStructs`] that remain referenced,
//!   and consumers such as [code generators](crate::codegen) skip the
//!   rest.
//! [`used_structs`] recomputes the same set for any descriptor.

use crate::{
    desc::{Named, StructDef, StructRef, StructScope, TableDescriptor},
    diagnose::{AnnotatedSpan, Diagnostic},
};
use fxhash::FxHashSet;
use std::{error::Error, fmt::Display};
use tracing::debug;

/// Identity of a struct within a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum StructKey {
    Global(String),
    Local(String, String),
}

/// Structs referenced by at least one column of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedStructs(FxHashSet<StructKey>);

impl UsedStructs {
    /// Whether `def` is referenced by any column.
    pub fn contains(&self, def: &StructDef) -> bool {
        match def.scope() {
            StructScope::Global => self.contains_global(def.name()),
            StructScope::Local(table) => self.contains_local(table, def.name()),
        }
    }

    pub fn contains_global(&self, name: &str) -> bool {
        self.0.contains(&StructKey::Global(name.into()))
    }

    pub fn contains_local(&self, table: &str, name: &str) -> bool {
        self.0
            .contains(&StructKey::Local(table.into(), name.into()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compute the structs referenced by columns of `desc`,
///   either directly or as list elements.
pub fn used_structs(desc: &TableDescriptor) -> UsedStructs {
    let keys = desc.tables().iter().flat_map(|table| {
        table.columns().iter().filter_map(move |col| {
            col.ty().struct_ref().map(|sref| match sref {
                StructRef::Global(name) => StructKey::Global(name.clone()),
                StructRef::Local(name) => {
                    StructKey::Local(table.name().into(), name.clone())
                }
            })
        })
    });

    UsedStructs(keys.collect())
}

/// Narrow `desc` to the tables and columns visible to `reader`.
///
/// Table key columns are always retained and key indexes are recomputed.
/// Projecting an already-projected descriptor for the same reader has no
///   effect.
pub fn project_for_reader(
    desc: &mut TableDescriptor,
    reader: &str,
) -> Result<UsedStructs, ProjectError> {
    if desc.reader(reader).is_none() {
        return Err(ProjectError::UnknownReader(reader.into()));
    }

    let tables = desc.tables_mut();
    let dropped_tables = tables.retain(|table| table.readable_by(reader));

    for table in tables.iter_mut() {
        let dropped = table.retain_columns(|col| col.readers().admits(reader));

        if dropped > 0 {
            debug!(
                reader,
                table = table.name(),
                dropped_columns = dropped,
                key_index = table.key_column_index(),
                "projected table"
            );
        }
    }

    let used = used_structs(desc);

    debug!(
        reader,
        dropped_tables,
        tables = desc.tables().len(),
        used_structs = used.len(),
        "projected schema"
    );

    Ok(used)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProjectError {
    /// Projection was requested for a reader that the schema does not
    ///   define.
    UnknownReader(String),
}

impl Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::UnknownReader(name) => {
                write!(f, "reader `{name}` is not defined")
            }
        }
    }
}

impl Error for ProjectError {}

impl Diagnostic for ProjectError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        // The reader comes from the command line,
        //   not from a source file.
        vec![]
    }
}
