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

//! XML IR (XIR).
//!
//! This is the XML tree supplier for the [schema parser](crate::schema).
//! [`reader::parse_document`] uses [`quick_xml`] to parse raw source
//!   bytes into a [`Document`] of [`Element`]s,
//!     each carrying its tag name,
//!     its attributes in source order,
//!     its element children in source order,
//!     and a [`Span`](crate::span::Span) locating the line on which the
//!       element's opening tag begins.
//!
//! Only elements and attributes are retained;
//!   text,
//!   comments,
//!   processing instructions,
//!   and declarations are discarded,
//!     since nothing in a schema definition is expressed with them.

mod error;
pub mod reader;
mod tree;

pub use error::Error;
pub use reader::parse_document;
pub use tree::{Attr, AttrList, Document, Element};
