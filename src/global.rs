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

//! System-wide static configuration.
//!
//! This module provides a system-wide configuration.
//! Subsystems should reference these values rather than defining their own
//!   and risk incompatibilities or maintenance issues as requirements
//!   change.
//!
//! By convention,
//!   import this entire module rather than individual members and reference
//!   them as `global::foo` to emphasize their nature and risk.

/// Names that a table-local struct may not use.
///
/// Generators emit wrapper types with these names inside of each table's
///   scope,
///     so a local struct of the same name would shadow (or collide with)
///     generated code.
pub const RESERVED_LOCAL_STRUCT_NAMES: [&str; 4] =
    ["Row", "Rows", "RowSet", "RowSets"];

/// Line terminator of table data files.
///
/// This is independent of the newline style chosen for generated source
///   code.
pub const DATA_LINE_TERMINATOR: &[u8] = b"\r\n";

/// Field delimiter of table data files.
pub const DATA_FIELD_DELIMITER: u8 = b'\t';

/// Number of leading data file lines that are not rows:
///   a free-form comment line followed by the column name line.
pub const DATA_HEADER_LINES: usize = 2;

/// Separator between reader names in a `readby` attribute.
pub const READBY_SEPARATOR: char = '|';

/// Separator between segments of a reader `namespace` attribute.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Environment variable holding the log filter directives of the
///   binaries
///     (e.g. `TABLEC_LOG=tablec=debug`).
pub const LOG_ENV_VAR: &str = "TABLEC_LOG";

/// Log filter used when [`LOG_ENV_VAR`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";
