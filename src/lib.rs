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

//! Table schema compiler and data cutter.
//!
//! TABLEC compiles an XML [schema definition](schema) describing keyed
//!   tables of configuration data into a [descriptor](desc),
//!     from which it [generates](codegen) target-language declarations
//!     for a single reader.
//! The same reader-scoped view is applied to each table's delimited data
//!   file by the [cutter](cut),
//!     so that generated code and cut data stay in lock-step.
//!
//! The library is driven by two binaries:
//!   `tablec` generates code
//!   and `tablecut` cuts data files.

// We build docs for private items.
#![allow(rustdoc::private_intra_doc_links)]

pub mod global;

#[macro_use]
extern crate lazy_static;

pub mod codegen;
pub mod cut;
pub mod desc;
pub mod diagnose;
pub mod fs;
pub mod ident;
pub mod log;
pub mod project;
pub mod schema;
pub mod span;
pub mod tpwrap;
pub mod xir;
