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

//! Table descriptor model.
//!
//! A [`TableDescriptor`] is the in-memory form of a schema definition:
//!   the readers that may consume tables,
//!   the global structs usable by any table,
//!   and the tables themselves,
//!     each with its columns and table-local structs.
//!
//! Descriptors are populated by the [schema parser](crate::schema),
//!   narrowed for a single reader by [projection](crate::project),
//!   and consumed read-only by the [cutter](crate::cut) and
//!   [code generators](crate::codegen).
//!
//!
//! Ownership
//! =========
//! Every definition is owned by the collection of its parent:
//!   fields by their struct,
//!   columns and local structs by their table,
//!   and readers, global structs, and tables by the descriptor.
//! References between definitions are by name and are resolved by lookup
//!   in the owning scope
//!     (see [`StructRef`] and [`ReaderSet`]),
//!     so there are no reference cycles to break;
//!       dropping the descriptor releases the entire graph.
//!
//!
//! Name Indexes
//! ============
//! Each collection of definitions is a [`NameIndex`],
//!   which keeps definitions in source order
//!     (used for deterministic code generation)
//!   alongside an index by name.
//! [`NameIndex::insert`] is the only way to add to a collection and
//!   rejects duplicate names,
//!     so the order and the index cannot disagree.
//! Collections may later shrink during projection,
//!   which rebuilds the index.
//!
//! Global structs and tables share a namespace:
//!   a table may not have the name of a global struct,
//!   nor a global struct the name of a table.

mod error;
mod object;

pub use error::{DescError, NameKind};
pub use object::{
    is_reserved_local_struct_name, ColumnKind, ColumnType, ElementType,
    FieldType, ReaderDef, ReaderSet, StructDef, StructFieldDef, StructRef,
    StructScope, TableColumnDef, TableDef, TableDefBuilder, TableKeyType,
};

use crate::span::Context;
use fxhash::FxHashMap;
use std::slice;

/// A definition identified by name within its scope.
pub trait Named {
    fn name(&self) -> &str;
}

/// Definitions in source order,
///   indexed by name.
///
/// See the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIndex<T: Named> {
    items: Vec<T>,
    index: FxHashMap<String, usize>,
}

impl<T: Named> Default for NameIndex<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T: Named> NameIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item`,
    ///   unless an item of the same name already exists,
    ///   in which case `item` is returned unchanged as the error.
    pub fn insert(&mut self, item: T) -> Result<&mut T, T> {
        if self.index.contains_key(item.name()) {
            return Err(item);
        }

        let pos = self.items.len();
        self.index.insert(item.name().to_string(), pos);
        self.items.push(item);

        Ok(&mut self.items[pos])
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&pos| &self.items[pos])
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        match self.index.get(name) {
            Some(&pos) => self.items.get_mut(pos),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Ordinal of the item named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Mutable access to items.
    ///
    /// Items' names are immutable,
    ///   so this cannot invalidate the index.
    pub(crate) fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Retain only the items for which `keep` returns `true`,
    ///   preserving order.
    ///
    /// Returns the number of items removed.
    pub(crate) fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) -> usize {
        let before = self.items.len();

        self.items.retain(keep);

        if self.items.len() != before {
            self.index = self
                .items
                .iter()
                .enumerate()
                .map(|(pos, item)| (item.name().to_string(), pos))
                .collect();
        }

        before - self.items.len()
    }
}

impl<'a, T: Named> IntoIterator for &'a NameIndex<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Root of the descriptor graph.
///
/// See the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Schema definition file.
    ctx: Context,
    readers: NameIndex<ReaderDef>,
    global_structs: NameIndex<StructDef>,
    tables: NameIndex<TableDef>,
}

impl TableDescriptor {
    /// An empty descriptor for the schema definition file `ctx`.
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            readers: NameIndex::new(),
            global_structs: NameIndex::new(),
            tables: NameIndex::new(),
        }
    }

    /// Schema definition file from which this descriptor was parsed.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn readers(&self) -> &NameIndex<ReaderDef> {
        &self.readers
    }

    pub fn reader(&self, name: &str) -> Option<&ReaderDef> {
        self.readers.get(name)
    }

    pub fn global_structs(&self) -> &NameIndex<StructDef> {
        &self.global_structs
    }

    pub fn global_struct(&self, name: &str) -> Option<&StructDef> {
        self.global_structs.get(name)
    }

    pub fn tables(&self) -> &NameIndex<TableDef> {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    /// What `name` is defined as in the namespace shared by global structs
    ///   and tables,
    ///     if anything.
    pub fn shared_name_kind(&self, name: &str) -> Option<NameKind> {
        if self.tables.contains(name) {
            Some(NameKind::Table)
        } else if self.global_structs.contains(name) {
            Some(NameKind::GlobalStruct)
        } else {
            None
        }
    }

    /// Resolve a struct referenced by a column of `table`.
    pub fn resolve_struct<'a>(
        &'a self,
        table: &'a TableDef,
        sref: &StructRef,
    ) -> Option<&'a StructDef> {
        match sref {
            StructRef::Local(name) => table.local_struct(name),
            StructRef::Global(name) => self.global_struct(name),
        }
    }

    pub fn add_reader(&mut self, def: ReaderDef) -> Result<&ReaderDef, DescError> {
        self.readers
            .insert(def)
            .map(|def| &*def)
            .map_err(|dup| DescError::duplicate(NameKind::Reader, dup.name()))
    }

    /// Add a global struct.
    ///
    /// The struct's scope becomes [`StructScope::Global`].
    pub fn add_global_struct(
        &mut self,
        mut def: StructDef,
    ) -> Result<&StructDef, DescError> {
        if let Some(existing) = self.shared_name_kind(def.name()) {
            return Err(DescError::Conflict {
                kind: NameKind::GlobalStruct,
                name: def.name().to_string(),
                existing,
            });
        }

        def.set_scope(StructScope::Global);

        self.global_structs
            .insert(def)
            .map(|def| &*def)
            .map_err(|dup| DescError::duplicate(NameKind::GlobalStruct, dup.name()))
    }

    /// Add a table.
    ///
    /// Every reader the table and its columns name must already be defined,
    ///   and every struct its columns reference must resolve within the
    ///   table or the global structs.
    pub fn add_table(&mut self, def: TableDef) -> Result<&TableDef, DescError> {
        if let Some(existing) = self.shared_name_kind(def.name()) {
            return Err(DescError::Conflict {
                kind: NameKind::Table,
                name: def.name().to_string(),
                existing,
            });
        }

        let readers = def
            .readers()
            .iter()
            .chain(def.columns().iter().flat_map(|col| col.readers().iter()));

        for reader in readers {
            if !self.readers.contains(reader) {
                return Err(DescError::UnknownReader(reader.to_string()));
            }
        }

        for col in def.columns() {
            if let Some(sref) = col.ty().struct_ref() {
                if self.resolve_struct(&def, sref).is_none() {
                    return Err(DescError::UnknownStruct(sref.name().to_string()));
                }
            }
        }

        self.tables
            .insert(def)
            .map(|def| &*def)
            .map_err(|dup| DescError::duplicate(NameKind::Table, dup.name()))
    }

    pub(crate) fn tables_mut(&mut self) -> &mut NameIndex<TableDef> {
        &mut self.tables
    }
}
