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

//! C++ declarations.
//!
//! Each table `FooBar` produces `tbl_foo_bar.h` declaring class
//!   `TblFooBar`,
//!     and used global structs are declared in `table_struct.h`.
//! Declarations are enclosed in one C++ namespace per segment of the
//!   reader's namespace.

use super::{
    write_output, CodeGenerator, CodegenError, LineWriter, NewLineStyle,
    ReaderView,
};
use crate::{
    desc::{
        ColumnType, ElementType, FieldType, Named, StructDef,
        TableDescriptor, TableDef, TableKeyType,
    },
    ident::camel_to_separated,
};
use std::path::{Path, PathBuf};

const GLOBAL_STRUCT_FILE: &str = "table_struct.h";

#[derive(Debug, Default)]
pub struct CppCodeGenerator;

impl CodeGenerator for CppCodeGenerator {
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
            let text = table_header(&view, table, newline);
            written.push(write_output(output_dir, &file_name(table), text)?);
        }

        Ok(written)
    }
}

/// Header file name for `table`.
pub fn file_name(table: &TableDef) -> String {
    format!("tbl_{}.h", camel_to_separated(table.name(), "_"))
}

fn class_name(table: &TableDef) -> String {
    format!("Tbl{}", table.name())
}

fn include_guard(view: &ReaderView, file_stem: &str) -> String {
    let mut guard = view
        .reader
        .namespace_parts()
        .iter()
        .map(|part| camel_to_separated(part, "_"))
        .collect::<Vec<_>>();

    guard.push(file_stem.to_string());
    guard.push("h".into());

    guard.join("_").to_uppercase()
}

fn open_file(
    w: &mut LineWriter,
    view: &ReaderView,
    guard: &str,
    include: Option<&str>,
) {
    w.line("// generated by tablec; do not edit")
        .line(format!("#ifndef {guard}"))
        .line(format!("#define {guard}"))
        .blank()
        .line("#include <stdint.h>")
        .line("#include <cstddef>")
        .line("#include <map>")
        .line("#include <string>")
        .line("#include <vector>")
        .blank();

    if let Some(include) = include {
        w.line(format!("#include \"{include}\"")).blank();
    }

    for part in view.reader.namespace_parts() {
        w.line(format!("namespace {part} {{"));
    }
    w.blank();
}

fn close_file(w: &mut LineWriter, view: &ReaderView, guard: &str) {
    w.blank();

    for part in view.reader.namespace_parts().iter().rev() {
        w.line(format!("}} // namespace {part}"));
    }

    w.blank().line(format!("#endif // {guard}"));
}

fn global_structs(view: &ReaderView, newline: NewLineStyle) -> String {
    let mut w = LineWriter::new(newline);
    let guard = include_guard(view, "table_struct");

    open_file(&mut w, view, &guard, None);

    let used = view
        .desc
        .global_structs()
        .iter()
        .filter(|def| view.used.contains(def));

    for (i, def) in used.enumerate() {
        if i > 0 {
            w.blank();
        }
        struct_decl(&mut w, def);
    }

    close_file(&mut w, view, &guard);
    w.into_string()
}

fn table_header(
    view: &ReaderView,
    table: &TableDef,
    newline: NewLineStyle,
) -> String {
    let mut w = LineWriter::new(newline);
    let stem = camel_to_separated(table.name(), "_");
    let guard = include_guard(view, &format!("tbl_{stem}"));

    let uses_global = table
        .columns()
        .iter()
        .filter_map(|col| col.ty().struct_ref())
        .any(|sref| !sref.is_local());

    open_file(&mut w, view, &guard, uses_global.then_some(GLOBAL_STRUCT_FILE));

    let class = class_name(table);
    w.line(format!("class {class} {{")).line("public:").indent();

    let local = table
        .local_structs()
        .iter()
        .filter(|def| view.used.contains(def));

    for def in local {
        struct_decl(&mut w, def);
        w.blank();
    }

    w.line("struct Row {").indent();
    for col in table.columns() {
        w.line(format!("{} {};", column_type(col.ty()), col.name()));
    }
    w.dedent().line("};");

    let key_ty = column_type(table.key_column().ty());
    let key_param = match table.key_column().ty() {
        ColumnType::String => format!("const {key_ty} &key"),
        _ => format!("{key_ty} key"),
    };

    let (item, container, getter, all_getter, member) = match table.key_type()
    {
        TableKeyType::SingleKey => {
            w.line(format!("typedef std::map<{key_ty}, Row> Rows;"));
            ("Row", "Rows", "getRow", "getRows", "rows_")
        }
        TableKeyType::SetKey => {
            w.line("typedef std::vector<Row> RowSet;");
            w.line(format!("typedef std::map<{key_ty}, RowSet> RowSets;"));
            ("RowSet", "RowSets", "getRowSet", "getRowSets", "row_sets_")
        }
    };

    w.blank()
        .line(format!("const {item} *{getter}({key_param}) const"))
        .line("{")
        .indent()
        .line(format!("{container}::const_iterator iter = {member}.find(key);"))
        .line(format!("return iter == {member}.end() ? NULL : &iter->second;"))
        .dedent()
        .line("}")
        .blank()
        .line(format!("const {container} &{all_getter}() const"))
        .line("{")
        .indent()
        .line(format!("return {member};"))
        .dedent()
        .line("}")
        .dedent()
        .blank()
        .line("private:")
        .indent()
        .line(format!("{container} {member};"))
        .dedent()
        .line("};");

    close_file(&mut w, view, &guard);
    w.into_string()
}

fn struct_decl(w: &mut LineWriter, def: &StructDef) {
    w.line(format!("struct {} {{", def.name())).indent();

    for field in def.fields() {
        let ty = match field.ty() {
            FieldType::Int => "int32_t",
            FieldType::String => "std::string",
        };

        w.line(format!("{ty} {};", field.name()));
    }

    w.dedent().line("};");
}

fn element_type(ty: &ElementType) -> String {
    match ty {
        ElementType::Int => "int32_t".into(),
        ElementType::String => "std::string".into(),
        ElementType::Struct(sref) => sref.name().into(),
    }
}

fn column_type(ty: &ColumnType) -> String {
    match ty {
        ColumnType::Int => "int32_t".into(),
        ColumnType::String => "std::string".into(),
        ColumnType::Struct(sref) => sref.name().into(),
        ColumnType::List(elem) => format!("std::vector<{}>", element_type(elem)),
    }
}
