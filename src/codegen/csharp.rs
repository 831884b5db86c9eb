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

//! C# declarations.
//!
//! Each table `FooBar` produces `TblFooBar.cs` declaring class
//!   `TblFooBar`,
//!     and used global structs are declared in `TableStruct.cs`.
//! Declarations are enclosed in the reader's namespace.

use super::{
    write_output, CodeGenerator, CodegenError, LineWriter, NewLineStyle,
    ReaderView,
};
use crate::desc::{
    ColumnType, ElementType, FieldType, Named, StructDef, TableDef,
    TableDescriptor, TableKeyType,
};
use std::path::{Path, PathBuf};

const GLOBAL_STRUCT_FILE: &str = "TableStruct.cs";

#[derive(Debug, Default)]
pub struct CSharpCodeGenerator;

impl CodeGenerator for CSharpCodeGenerator {
    fn generate(
        &self,
        desc: &TableDescriptor,
        reader: &str,
        output_dir: &Path,
        newline: NewLineStyle,
    ) -> Result<Vec<PathBuf>, CodegenError> {
        let view = ReaderView::new(desc, reader)?;
        let mut written = Vec::new();

        if view.uses_global_structs() {
            let text = global_structs(&view, newline);
            written.push(write_output(output_dir, GLOBAL_STRUCT_FILE, text)?);
        }

        for table in view.desc.tables() {
            let text = table_class(&view, table, newline);
            let name = format!("{}.cs", class_name(table));

            written.push(write_output(output_dir, &name, text)?);
        }

        Ok(written)
    }
}

fn class_name(table: &TableDef) -> String {
    format!("Tbl{}", table.name())
}

fn open_namespace(w: &mut LineWriter, view: &ReaderView) {
    w.line(format!("namespace {}", view.reader.namespace()))
        .line("{")
        .indent();
}

fn close_namespace(w: &mut LineWriter) {
    w.dedent().line("}");
}

fn global_structs(view: &ReaderView, newline: NewLineStyle) -> String {
    let mut w = LineWriter::new(newline);

    w.line("// generated by tablec; do not edit").blank();
    open_namespace(&mut w, view);

    let used = view
        .desc
        .global_structs()
        .iter()
        .filter(|def| view.used.contains(def));

    for (i, def) in used.enumerate() {
        if i > 0 {
            w.blank();
        }
        class_decl(&mut w, def);
    }

    close_namespace(&mut w);
    w.into_string()
}

fn table_class(
    view: &ReaderView,
    table: &TableDef,
    newline: NewLineStyle,
) -> String {
    let mut w = LineWriter::new(newline);

    w.line("// generated by tablec; do not edit")
        .line("using System.Collections.Generic;")
        .blank();
    open_namespace(&mut w, view);

    w.line(format!("public sealed class {}", class_name(table)))
        .line("{")
        .indent();

    let local = table
        .local_structs()
        .iter()
        .filter(|def| view.used.contains(def));

    for def in local {
        class_decl(&mut w, def);
        w.blank();
    }

    w.line("public sealed class Row").line("{").indent();
    for col in table.columns() {
        w.line(format!("public {} {};", column_type(col.ty()), col.name()));
    }
    w.dedent().line("}").blank();

    let key_ty = column_type(table.key_column().ty());

    let (item, container, getter, all_getter, member) = match table.key_type()
    {
        TableKeyType::SingleKey => {
            w.line(format!("public sealed class Rows : Dictionary<{key_ty}, Row>"))
                .line("{")
                .line("}");
            ("Row", "Rows", "GetRow", "GetRows", "rows")
        }
        TableKeyType::SetKey => {
            w.line("public sealed class RowSet : List<Row>")
                .line("{")
                .line("}")
                .blank()
                .line(format!(
                    "public sealed class RowSets : Dictionary<{key_ty}, RowSet>"
                ))
                .line("{")
                .line("}");
            ("RowSet", "RowSets", "GetRowSet", "GetRowSets", "rowSets")
        }
    };

    w.blank()
        .line(format!(
            "private readonly {container} {member} = new {container}();"
        ))
        .blank()
        .line(format!("public {item} {getter}({key_ty} key)"))
        .line("{")
        .indent()
        .line(format!("{item} value;"))
        .line(format!(
            "return this.{member}.TryGetValue(key, out value) ? value : null;"
        ))
        .dedent()
        .line("}")
        .blank()
        .line(format!("public {container} {all_getter}()"))
        .line("{")
        .indent()
        .line(format!("return this.{member};"))
        .dedent()
        .line("}")
        .dedent()
        .line("}");

    close_namespace(&mut w);
    w.into_string()
}

fn class_decl(w: &mut LineWriter, def: &StructDef) {
    w.line(format!("public sealed class {}", def.name()))
        .line("{")
        .indent();

    for field in def.fields() {
        let ty = match field.ty() {
            FieldType::Int => "int",
            FieldType::String => "string",
        };

        w.line(format!("public {ty} {};", field.name()));
    }

    w.dedent().line("}");
}

fn element_type(ty: &ElementType) -> String {
    match ty {
        ElementType::Int => "int".into(),
        ElementType::String => "string".into(),
        ElementType::Struct(sref) => sref.name().into(),
    }
}

fn column_type(ty: &ColumnType) -> String {
    match ty {
        ColumnType::Int => "int".into(),
        ColumnType::String => "string".into(),
        ColumnType::Struct(sref) => sref.name().into(),
        ColumnType::List(elem) => format!("List<{}>", element_type(elem)),
    }
}
