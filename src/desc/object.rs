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

//! Definitions making up a [`TableDescriptor`](super::TableDescriptor).

use super::{DescError, NameIndex, NameKind, Named};
use crate::{global, span::Span};
use fxhash::FxHashSet;
use std::fmt::Display;

/// A named consumer of tables,
///   such as a client or server build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderDef {
    name: String,
    span: Span,
    namespace: String,
    namespace_parts: Vec<String>,
}

impl ReaderDef {
    /// Define a reader whose generated code lives in `namespace`,
    ///   a sequence of identifiers delimited by
    ///   [`global::NAMESPACE_SEPARATOR`].
    pub fn new<S: Into<String>, N: Into<String>>(
        name: S,
        span: Span,
        namespace: N,
    ) -> Self {
        let namespace = namespace.into();
        let namespace_parts = namespace
            .split(global::NAMESPACE_SEPARATOR)
            .map(String::from)
            .collect();

        Self {
            name: name.into(),
            span,
            namespace,
            namespace_parts,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn namespace_parts(&self) -> &[String] {
        &self.namespace_parts
    }
}

impl Named for ReaderDef {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Readers permitted to see a table or column.
///
/// An empty set admits every reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderSet(FxHashSet<String>);

impl ReaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `reader`,
    ///   returning `false` if it was already present.
    pub fn insert<S: Into<String>>(&mut self, reader: S) -> bool {
        self.0.insert(reader.into())
    }

    /// Whether `reader` may see the owner of this set.
    pub fn admits(&self, reader: &str) -> bool {
        self.0.is_empty() || self.0.contains(reader)
    }

    /// Whether this set names any readers at all.
    pub fn is_restricted(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn contains(&self, reader: &str) -> bool {
        self.0.contains(reader)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ReaderSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Type of a struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int,
    String,
}

impl FieldType {
    /// Resolve a field type from its schema spelling.
    pub fn from_schema(ty: &str) -> Option<Self> {
        match ty {
            "int" => Some(Self::Int),
            "string" => Some(Self::String),
            _ => None,
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::String => write!(f, "string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructFieldDef {
    name: String,
    span: Span,
    ty: FieldType,
    /// Name of the owning struct.
    owner: String,
}

impl StructFieldDef {
    pub fn new<S: Into<String>>(name: S, span: Span, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            span,
            ty,
            owner: String::new(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn ty(&self) -> FieldType {
        self.ty
    }

    /// Name of the struct that owns this field.
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl Named for StructFieldDef {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Where a struct may be referenced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructScope {
    /// Usable by every table.
    Global,
    /// Usable only by columns of the named table.
    Local(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    name: String,
    span: Span,
    scope: StructScope,
    fields: NameIndex<StructFieldDef>,
}

impl StructDef {
    /// A struct with no fields.
    ///
    /// Its scope is determined by where it is added:
    ///   [`TableDescriptor::add_global_struct`](super::TableDescriptor::add_global_struct)
    ///   or [`TableDefBuilder::add_local_struct`].
    pub fn new<S: Into<String>>(name: S, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            scope: StructScope::Global,
            fields: NameIndex::new(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn scope(&self) -> &StructScope {
        &self.scope
    }

    pub(super) fn set_scope(&mut self, scope: StructScope) {
        self.scope = scope;
    }

    pub fn is_global(&self) -> bool {
        matches!(self.scope, StructScope::Global)
    }

    /// Name of the table owning this struct,
    ///   if it is local.
    pub fn owner_table(&self) -> Option<&str> {
        match &self.scope {
            StructScope::Global => None,
            StructScope::Local(table) => Some(table),
        }
    }

    pub fn add_field(
        &mut self,
        mut field: StructFieldDef,
    ) -> Result<&StructFieldDef, DescError> {
        field.owner = self.name.clone();

        self.fields
            .insert(field)
            .map(|field| &*field)
            .map_err(|dup| DescError::duplicate(NameKind::Field, dup.name()))
    }

    pub fn fields(&self) -> &NameIndex<StructFieldDef> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&StructFieldDef> {
        self.fields.get(name)
    }
}

impl Named for StructDef {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Reference from a column to a struct,
///   resolved by name within its scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructRef {
    Global(String),
    Local(String),
}

impl StructRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Global(name) | Self::Local(name) => name,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

/// Type of the elements of a list column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    Int,
    String,
    Struct(StructRef),
}

/// Type of a table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    String,
    Struct(StructRef),
    List(ElementType),
}

/// Discriminant of [`ColumnType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    String,
    Struct,
    List,
}

impl ColumnType {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Int => ColumnKind::Int,
            Self::String => ColumnKind::String,
            Self::Struct(_) => ColumnKind::Struct,
            Self::List(_) => ColumnKind::List,
        }
    }

    /// Whether this type may be used as a table key.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Int | Self::String)
    }

    /// Struct referenced by this type,
    ///   either directly or as the element type of a list.
    pub fn struct_ref(&self) -> Option<&StructRef> {
        match self {
            Self::Struct(sref) | Self::List(ElementType::Struct(sref)) => {
                Some(sref)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumnDef {
    name: String,
    span: Span,
    ty: ColumnType,
    readers: ReaderSet,
}

impl TableColumnDef {
    pub fn new<S: Into<String>>(
        name: S,
        span: Span,
        ty: ColumnType,
        readers: ReaderSet,
    ) -> Self {
        Self {
            name: name.into(),
            span,
            ty,
            readers,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn ty(&self) -> &ColumnType {
        &self.ty
    }

    pub fn readers(&self) -> &ReaderSet {
        &self.readers
    }
}

impl Named for TableColumnDef {
    fn name(&self) -> &str {
        &self.name
    }
}

/// How a table's key identifies its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKeyType {
    /// Each key identifies exactly one row (`key` attribute).
    SingleKey,
    /// Each key groups any number of rows (`setkey` attribute).
    SetKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    name: String,
    span: Span,
    file_name: String,
    key_type: TableKeyType,
    key: String,
    key_index: usize,
    columns: NameIndex<TableColumnDef>,
    local_structs: NameIndex<StructDef>,
    readers: ReaderSet,
}

impl TableDef {
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Name of the data file backing this table.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn key_type(&self) -> TableKeyType {
        self.key_type
    }

    /// Name of the key column.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Ordinal of the key column within [`Self::columns`].
    pub fn key_column_index(&self) -> usize {
        self.key_index
    }

    pub fn key_column(&self) -> &TableColumnDef {
        &self.columns.as_slice()[self.key_index]
    }

    pub fn columns(&self) -> &NameIndex<TableColumnDef> {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&TableColumnDef> {
        self.columns.get(name)
    }

    pub fn local_structs(&self) -> &NameIndex<StructDef> {
        &self.local_structs
    }

    pub fn local_struct(&self, name: &str) -> Option<&StructDef> {
        self.local_structs.get(name)
    }

    pub fn readers(&self) -> &ReaderSet {
        &self.readers
    }

    /// Whether `reader` may see this table at all.
    pub fn readable_by(&self, reader: &str) -> bool {
        self.readers.admits(reader)
    }

    /// Whether `reader` may see `col`.
    ///
    /// The key column is visible to every reader that may see the table.
    pub fn column_visible(&self, col: &TableColumnDef, reader: &str) -> bool {
        col.name() == self.key || col.readers().admits(reader)
    }

    /// Retain only the columns for which `keep` returns `true`,
    ///   preserving order and recomputing the key index.
    ///
    /// The key column is always retained.
    /// Returns the number of columns removed.
    pub(crate) fn retain_columns<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&TableColumnDef) -> bool,
    {
        let key = &self.key;
        let removed = self.columns.retain(|col| col.name() == key || keep(col));

        // The key was retained above,
        //   so this lookup always succeeds.
        self.key_index = self.columns.position(&self.key).unwrap_or_default();

        removed
    }
}

impl Named for TableDef {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Incremental construction of a [`TableDef`].
///
/// A table's key refers to one of its columns and so can only be resolved
///   once columns have been added;
///     the builder holds the table open until then,
///       ensuring that every [`TableDef`] has a valid key.
#[derive(Debug)]
pub struct TableDefBuilder {
    name: String,
    span: Span,
    columns: NameIndex<TableColumnDef>,
    local_structs: NameIndex<StructDef>,
    key: Option<(String, TableKeyType)>,
}

impl TableDefBuilder {
    pub fn new<S: Into<String>>(name: S, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            columns: NameIndex::new(),
            local_structs: NameIndex::new(),
            key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a struct local to this table.
    ///
    /// The struct's scope becomes [`StructScope::Local`].
    pub fn add_local_struct(
        &mut self,
        mut def: StructDef,
    ) -> Result<&StructDef, DescError> {
        if is_reserved_local_struct_name(def.name()) {
            return Err(DescError::ReservedName(def.name().to_string()));
        }

        def.set_scope(StructScope::Local(self.name.clone()));

        self.local_structs
            .insert(def)
            .map(|def| &*def)
            .map_err(|dup| DescError::duplicate(NameKind::LocalStruct, dup.name()))
    }

    pub fn local_struct(&self, name: &str) -> Option<&StructDef> {
        self.local_structs.get(name)
    }

    pub fn add_column(
        &mut self,
        col: TableColumnDef,
    ) -> Result<&TableColumnDef, DescError> {
        if let Some(StructRef::Local(name)) = col.ty().struct_ref() {
            if !self.local_structs.contains(name) {
                return Err(DescError::UnknownStruct(name.clone()));
            }
        }

        self.columns
            .insert(col)
            .map(|col| &*col)
            .map_err(|dup| DescError::duplicate(NameKind::Column, dup.name()))
    }

    pub fn column(&self, name: &str) -> Option<&TableColumnDef> {
        self.columns.get(name)
    }

    /// Key the table by the column `name`,
    ///   which must already have been added and must be scalar.
    pub fn set_key<S: Into<String>>(
        &mut self,
        name: S,
        key_type: TableKeyType,
    ) -> Result<(), DescError> {
        let name = name.into();

        match self.columns.get(&name) {
            None => Err(DescError::KeyNotDefined(name)),
            Some(col) if !col.ty().is_scalar() => {
                Err(DescError::KeyNotScalar(name))
            }
            Some(_) => {
                self.key = Some((name, key_type));
                Ok(())
            }
        }
    }

    /// Complete the table.
    ///
    /// Fails if no key was set.
    pub fn build<F: Into<String>>(
        self,
        file_name: F,
        readers: ReaderSet,
    ) -> Result<TableDef, DescError> {
        let (key, key_type) = match self.key {
            Some(key) => key,
            None => return Err(DescError::MissingKey(self.name)),
        };

        let key_index = self
            .columns
            .position(&key)
            .ok_or_else(|| DescError::KeyNotDefined(key.clone()))?;

        Ok(TableDef {
            name: self.name,
            span: self.span,
            file_name: file_name.into(),
            key_type,
            key,
            key_index,
            columns: self.columns,
            local_structs: self.local_structs,
            readers,
        })
    }
}

/// Whether `name` is reserved for types generated within a table's scope.
pub fn is_reserved_local_struct_name(name: &str) -> bool {
    global::RESERVED_LOCAL_STRUCT_NAMES.contains(&name)
}
