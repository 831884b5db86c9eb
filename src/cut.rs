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

//! Reader-scoped cutting of table data files.
//!
//! Each table is backed by a tab-delimited data file named by the table's
//!   `file` attribute:
//!
//! ```text
//! any comment text\r\n
//! id\tname\tsecret\r\n
//! 1\tfoo\tbar\r\n
//! ```
//!
//! The first line is a free-form comment,
//!   the second names each column in schema order,
//!   and every remaining line is a row.
//! Every line,
//!   including the last,
//!   is terminated by `\r\n`,
//!     and every line has exactly one field per column.
//!
//! Cutting a table for a reader writes a copy of its data file containing
//!   only the columns that reader may see,
//!     as determined by the same rule used for
//!     [projection](crate::project):
//!       the key column is always kept,
//!       and any other column is kept if its reader set admits the reader.
//! The data file is validated in full before anything is written.

mod error;

pub use error::CutError;

use crate::{
    desc::{Named, TableDef, TableDescriptor},
    fs, global,
    span::{Context, Span},
};
use fixedbitset::FixedBitSet;
use memchr::{memchr2, memmem};
use std::path::Path;
use tracing::{debug, trace};

/// Column positions of `table` that `reader` may not see.
///
/// The key column is never in this set.
pub fn deletion_set(table: &TableDef, reader: &str) -> FixedBitSet {
    let mut deleted = FixedBitSet::with_capacity(table.columns().len());

    for (i, col) in table.columns().iter().enumerate() {
        if !table.column_visible(col, reader) {
            trace!(table = table.name(), column = col.name(), reader, "cut column");
            deleted.insert(i);
        }
    }

    deleted
}

/// Cut every table that `reader` may see,
///   reading data files from `input_dir` and writing them to `output_dir`.
///
/// Stops at the first table that fails;
///   files written for earlier tables are left in place.
/// Returns the number of tables cut.
pub fn cut_tables<P: AsRef<Path>, Q: AsRef<Path>>(
    desc: &TableDescriptor,
    reader: &str,
    input_dir: P,
    output_dir: Q,
) -> Result<usize, CutError> {
    if desc.reader(reader).is_none() {
        return Err(CutError::UnknownReader(reader.into()));
    }

    let mut count = 0;

    for table in desc.tables().iter().filter(|t| t.readable_by(reader)) {
        cut_table(table, reader, input_dir.as_ref(), output_dir.as_ref())?;
        count += 1;
    }

    debug!(reader, tables = count, "cut tables");

    Ok(count)
}

/// Cut the data file of `table` for `reader`,
///   reading it from `input_dir` and writing it to `output_dir`,
///   replacing any existing file.
pub fn cut_table<P: AsRef<Path>, Q: AsRef<Path>>(
    table: &TableDef,
    reader: &str,
    input_dir: P,
    output_dir: Q,
) -> Result<(), CutError> {
    let in_path = input_dir.as_ref().join(table.file_name());
    let out_path = output_dir.as_ref().join(table.file_name());

    let data = fs::read_all_shared(&in_path)
        .map_err(|e| CutError::Read(e, in_path.clone()))?;

    let ctx = Context::from(in_path.as_path());
    let cut = cut_table_data(table, reader, &ctx, &data)?;

    fs::write_all(&out_path, &cut)
        .map_err(|e| CutError::Write(e, out_path.clone()))?;

    debug!(
        table = table.name(),
        reader,
        input = %in_path.display(),
        output = %out_path.display(),
        "cut table"
    );

    Ok(())
}

/// Validate the contents `data` of the data file of `table` and cut it for
///   `reader`.
///
/// Only line structure and column names are inspected;
///   field contents are copied byte for byte in whatever encoding they
///   were written.
/// `ctx` names the data file in errors.
pub fn cut_table_data(
    table: &TableDef,
    reader: &str,
    ctx: &Context,
    data: &[u8],
) -> Result<Vec<u8>, CutError> {
    let mut lines = split_lines(data);

    // The terminator of the last line leaves an empty segment.
    match lines.pop() {
        Some(last) if last.is_empty() => (),
        _ => return Err(CutError::LineEnding(line_span(ctx, lines.len()))),
    }

    if lines.len() < global::DATA_HEADER_LINES {
        return Err(CutError::MissingHeader(ctx.span(1)));
    }

    let ncols = table.columns().len();

    for (i, line) in lines.iter().enumerate() {
        let span = line_span(ctx, i);

        if memchr2(b'\r', b'\n', line).is_some() {
            return Err(CutError::LineEnding(span));
        }

        let found = fields(line).count();
        if found != ncols {
            return Err(CutError::ColumnCount {
                found,
                expected: ncols,
                span,
            });
        }
    }

    check_header(table, lines[global::DATA_HEADER_LINES - 1], ctx)?;

    let deleted = deletion_set(table, reader);
    let mut out = Vec::with_capacity(data.len());

    for line in lines {
        let kept = fields(line)
            .enumerate()
            .filter(|(i, _)| !deleted.contains(*i))
            .map(|(_, field)| field);

        for (n, field) in kept.enumerate() {
            if n > 0 {
                out.push(global::DATA_FIELD_DELIMITER);
            }
            out.extend_from_slice(field);
        }

        out.extend_from_slice(global::DATA_LINE_TERMINATOR);
    }

    Ok(out)
}

/// Split `data` on each line terminator.
///
/// The segment following the final terminator is always present,
///   and is empty if `data` ends with a terminator.
fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    let term = global::DATA_LINE_TERMINATOR;
    let mut lines = Vec::new();
    let mut start = 0;

    for end in memmem::find_iter(data, term) {
        lines.push(&data[start..end]);
        start = end + term.len();
    }

    lines.push(&data[start..]);
    lines
}

fn fields(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|&b| b == global::DATA_FIELD_DELIMITER)
}

/// Verify that the column name line matches the schema's column names.
fn check_header(
    table: &TableDef,
    header: &[u8],
    ctx: &Context,
) -> Result<(), CutError> {
    for (i, (found, col)) in fields(header).zip(table.columns()).enumerate() {
        if found != col.name().as_bytes() {
            return Err(CutError::HeaderMismatch {
                position: i + 1,
                expected: col.name().into(),
                found: String::from_utf8_lossy(found).into_owned(),
                span: line_span(ctx, global::DATA_HEADER_LINES - 1),
            });
        }
    }

    Ok(())
}

/// Span of the zero-indexed line `i`.
fn line_span(ctx: &Context, i: usize) -> Span {
    ctx.span(u32::try_from(i + 1).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod test;
