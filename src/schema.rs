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

//! Schema definition parser.
//!
//! A schema definition is an XML document of this form:
//!
//! ```xml
//! <define>
//!   <reader name="client" namespace="Game.Client" />
//!   <reader name="server" namespace="Game.Server" />
//!
//!   <struct name="Cost">
//!     <field name="item" type="int" />
//!     <field name="count" type="int" />
//!   </struct>
//!
//!   <table name="Hero" file="hero.txt" key="id">
//!     <struct name="Skill">
//!       <field name="id" type="int" />
//!       <field name="tag" type="string" />
//!     </struct>
//!
//!     <col name="id" type="int" />
//!     <col name="name" type="string" />
//!     <col name="skills" type="list{Skill}" />
//!     <col name="upgrade" type="list{Cost}" readby="server" />
//!   </table>
//! </define>
//! ```
//!
//! All `reader` nodes are processed first,
//!   followed by all global `struct` nodes,
//!   followed by all `table` nodes,
//!     irrespective of the order in which they appear in the document.
//! Consequently any table may reference any global struct.
//! Within a `table`,
//!   a column may reference only local structs defined before it,
//!   but `key`/`setkey` is resolved after all columns and so may name any
//!   column of the table.
//!
//! Parsing stops at the first error;
//!   see [`SchemaError`].

mod error;

pub use error::{LoadError, SchemaError};

use crate::{
    desc::{
        is_reserved_local_struct_name, ColumnType, DescError, ElementType,
        FieldType, NameKind, Named, ReaderDef, ReaderSet, StructDef,
        StructFieldDef, StructRef, TableColumnDef, TableDefBuilder,
        TableDescriptor, TableKeyType,
    },
    fs::{File, PathFile},
    global, ident,
    span::Span,
    xir::{self, Document, Element},
};
use std::{fs, io::Read, path::Path};
use tracing::{debug, trace};

/// Load and parse the schema definition file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TableDescriptor, LoadError> {
    let path = path.as_ref();

    let PathFile(_, mut file, ctx) = PathFile::<fs::File>::open(path)
        .map_err(|e| LoadError::Io(e, path.to_path_buf()))?;

    let mut src = Vec::new();
    file.read_to_end(&mut src)
        .map_err(|e| LoadError::Io(e, path.to_path_buf()))?;

    let doc = xir::parse_document(&src, ctx)?;

    Ok(parse(&doc)?)
}

/// Produce a [`TableDescriptor`] from a schema definition document.
///
/// See the [module-level documentation](self).
pub fn parse(doc: &Document) -> Result<TableDescriptor, SchemaError> {
    let root = match doc.root() {
        Some(root) if root.name() == "define" => root,
        Some(other) => {
            return Err(SchemaError::RootNotDefine(other.span().clone()))
        }
        None => return Err(SchemaError::RootNotDefine(doc.context().span(1))),
    };

    let mut desc = TableDescriptor::new(doc.context().clone());

    for ele in root.children_named("reader") {
        parse_reader(&mut desc, ele)?;
    }

    for ele in root.children_named("struct") {
        parse_global_struct(&mut desc, ele)?;
    }

    for ele in root.children_named("table") {
        parse_table(&mut desc, ele)?;
    }

    debug!(
        path = %desc.context(),
        readers = desc.readers().len(),
        structs = desc.global_structs().len(),
        tables = desc.tables().len(),
        "parsed schema definition"
    );

    Ok(desc)
}

fn parse_reader(
    desc: &mut TableDescriptor,
    ele: &Element,
) -> Result<(), SchemaError> {
    let name = name_attr(ele)?;

    if let Some(first) = desc.reader(name) {
        return Err(redefined(
            ele,
            DescError::Duplicate(NameKind::Reader, name.into()),
            first.span(),
        ));
    }

    let namespace = required_attr(ele, "namespace")?;

    if !namespace
        .split(global::NAMESPACE_SEPARATOR)
        .all(ident::is_valid_ident)
    {
        return Err(SchemaError::InvalidAttr(
            ele.name().into(),
            "namespace",
            ele.span().clone(),
        ));
    }

    desc.add_reader(ReaderDef::new(name, ele.span().clone(), namespace))
        .map_err(|e| desc_error(ele, e))?;

    Ok(())
}

fn parse_global_struct(
    desc: &mut TableDescriptor,
    ele: &Element,
) -> Result<(), SchemaError> {
    let name = name_attr(ele)?;

    if let Some((existing, first)) = shared_definition(desc, name) {
        return Err(redefined(
            ele,
            DescError::Conflict {
                kind: NameKind::GlobalStruct,
                name: name.into(),
                existing,
            },
            first,
        ));
    }

    let def = parse_struct_fields(StructDef::new(name, ele.span().clone()), ele)?;

    desc.add_global_struct(def).map_err(|e| desc_error(ele, e))?;

    Ok(())
}

fn parse_local_struct(
    builder: &mut TableDefBuilder,
    ele: &Element,
) -> Result<(), SchemaError> {
    let name = name_attr(ele)?;

    if let Some(first) = builder.local_struct(name) {
        return Err(redefined(
            ele,
            DescError::Duplicate(NameKind::LocalStruct, name.into()),
            first.span(),
        ));
    }

    if is_reserved_local_struct_name(name) {
        return Err(desc_error(ele, DescError::ReservedName(name.into())));
    }

    let def = parse_struct_fields(StructDef::new(name, ele.span().clone()), ele)?;

    builder
        .add_local_struct(def)
        .map_err(|e| desc_error(ele, e))?;

    Ok(())
}

/// Populate `def` from the `field` children of `ele`.
fn parse_struct_fields(
    mut def: StructDef,
    ele: &Element,
) -> Result<StructDef, SchemaError> {
    for child in ele.children() {
        if child.name() != "field" {
            return Err(unexpected_child(child, "`field`"));
        }

        let name = name_attr(child)?;

        if let Some(first) = def.field(name) {
            return Err(redefined(
                child,
                DescError::Duplicate(NameKind::Field, name.into()),
                first.span(),
            ));
        }

        let raw_ty = required_attr(child, "type")?;
        let ty = FieldType::from_schema(raw_ty).ok_or_else(|| {
            SchemaError::InvalidType(raw_ty.into(), child.span().clone())
        })?;

        def.add_field(StructFieldDef::new(name, child.span().clone(), ty))
            .map_err(|e| desc_error(child, e))?;
    }

    Ok(def)
}

fn parse_table(
    desc: &mut TableDescriptor,
    ele: &Element,
) -> Result<(), SchemaError> {
    let name = name_attr(ele)?;

    if let Some((existing, first)) = shared_definition(desc, name) {
        return Err(redefined(
            ele,
            DescError::Conflict {
                kind: NameKind::Table,
                name: name.into(),
                existing,
            },
            first,
        ));
    }

    let mut builder = TableDefBuilder::new(name, ele.span().clone());

    for child in ele.children() {
        match child.name() {
            "struct" => parse_local_struct(&mut builder, child)?,
            "col" => parse_column(desc, &mut builder, child)?,
            _ => return Err(unexpected_child(child, "`struct` or `col`")),
        }
    }

    // Resolved only after all columns are known.
    let (key, key_type) = match (ele.attr("key"), ele.attr("setkey")) {
        (Some(key), _) => (key, TableKeyType::SingleKey),
        (None, Some(key)) => (key, TableKeyType::SetKey),
        (None, None) => {
            return Err(SchemaError::MissingKeyAttr(ele.span().clone()))
        }
    };

    builder
        .set_key(key, key_type)
        .map_err(|e| desc_error(ele, e))?;

    let file_name = required_attr(ele, "file")?;
    let readers = parse_readby(desc, ele)?;

    let def = builder
        .build(file_name, readers)
        .map_err(|e| desc_error(ele, e))?;

    debug!(
        table = def.name(),
        file = def.file_name(),
        key = def.key(),
        columns = def.columns().len(),
        local_structs = def.local_structs().len(),
        "parsed table"
    );

    desc.add_table(def).map_err(|e| desc_error(ele, e))?;

    Ok(())
}

fn parse_column(
    desc: &TableDescriptor,
    builder: &mut TableDefBuilder,
    ele: &Element,
) -> Result<(), SchemaError> {
    let name = name_attr(ele)?;

    if let Some(first) = builder.column(name) {
        return Err(redefined(
            ele,
            DescError::Duplicate(NameKind::Column, name.into()),
            first.span(),
        ));
    }

    let raw_ty = required_attr(ele, "type")?;
    let ty = resolve_column_type(desc, builder, raw_ty).ok_or_else(|| {
        SchemaError::InvalidType(raw_ty.into(), ele.span().clone())
    })?;

    let readers = parse_readby(desc, ele)?;

    trace!(table = builder.name(), column = name, ty = raw_ty, "parsed column");

    builder
        .add_column(TableColumnDef::new(name, ele.span().clone(), ty, readers))
        .map_err(|e| desc_error(ele, e))?;

    Ok(())
}

/// Resolve a column type,
///   which may be wrapped in `list{...}`.
fn resolve_column_type(
    desc: &TableDescriptor,
    builder: &TableDefBuilder,
    raw_ty: &str,
) -> Option<ColumnType> {
    match ident::parse_list_type(raw_ty) {
        Some(elem_ty) => {
            resolve_element_type(desc, builder, elem_ty).map(ColumnType::List)
        }
        None => resolve_element_type(desc, builder, raw_ty).map(|elem| {
            match elem {
                ElementType::Int => ColumnType::Int,
                ElementType::String => ColumnType::String,
                ElementType::Struct(sref) => ColumnType::Struct(sref),
            }
        }),
    }
}

/// Resolve a primitive or struct type name.
///
/// Local structs shadow global structs of the same name.
fn resolve_element_type(
    desc: &TableDescriptor,
    builder: &TableDefBuilder,
    ty: &str,
) -> Option<ElementType> {
    match ty {
        "int" => Some(ElementType::Int),
        "string" => Some(ElementType::String),
        _ if builder.local_struct(ty).is_some() => {
            Some(ElementType::Struct(StructRef::Local(ty.into())))
        }
        _ if desc.global_struct(ty).is_some() => {
            Some(ElementType::Struct(StructRef::Global(ty.into())))
        }
        _ => None,
    }
}

/// Readers named by the optional `readby` attribute of `ele`.
///
/// Every named reader must already be defined.
fn parse_readby(
    desc: &TableDescriptor,
    ele: &Element,
) -> Result<ReaderSet, SchemaError> {
    let mut readers = ReaderSet::new();

    if let Some(readby) = ele.attr("readby") {
        for reader in readby.split(global::READBY_SEPARATOR) {
            if desc.reader(reader).is_none() {
                return Err(desc_error(
                    ele,
                    DescError::UnknownReader(reader.into()),
                ));
            }

            readers.insert(reader);
        }
    }

    Ok(readers)
}

fn required_attr<'e>(
    ele: &'e Element,
    attr: &'static str,
) -> Result<&'e str, SchemaError> {
    ele.attr(attr).ok_or_else(|| {
        SchemaError::MissingAttr(ele.name().into(), attr, ele.span().clone())
    })
}

/// The required `name` attribute of `ele`,
///   which must be a valid identifier.
fn name_attr(ele: &Element) -> Result<&str, SchemaError> {
    let name = required_attr(ele, "name")?;

    if ident::is_valid_ident(name) {
        Ok(name)
    } else {
        Err(SchemaError::InvalidAttr(
            ele.name().into(),
            "name",
            ele.span().clone(),
        ))
    }
}

fn desc_error(ele: &Element, e: DescError) -> SchemaError {
    SchemaError::Desc(e, ele.span().clone())
}

fn redefined(ele: &Element, e: DescError, first: &Span) -> SchemaError {
    SchemaError::Redefined(e, ele.span().clone(), first.clone())
}

/// Table or global struct already named `name`,
///   since the two share a namespace.
fn shared_definition<'d>(
    desc: &'d TableDescriptor,
    name: &str,
) -> Option<(NameKind, &'d Span)> {
    desc.table(name)
        .map(|table| (NameKind::Table, table.span()))
        .or_else(|| {
            desc.global_struct(name)
                .map(|def| (NameKind::GlobalStruct, def.span()))
        })
}

fn unexpected_child(child: &Element, expected: &'static str) -> SchemaError {
    SchemaError::UnexpectedChild {
        expected,
        found: child.name().into(),
        span: child.span().clone(),
    }
}
