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


//! Error adapter for [`quick_xml`].

use std::fmt::Display;

/// Error produced by the XML reader underlying [`xir`](crate::xir).
pub type InnerXmlError = quick_xml::Error;

/// [`quick_xml::Error`] carried by [`xir::Error`](crate::xir::Error).
///
/// The inner error has no [`PartialEq`],
///   which [`xir::Error`](crate::xir::Error) derives.
/// Two errors are equal here if they render the same message,
///   which is all that a schema author ever sees of them.
#[derive(Debug)]
pub struct Error(pub InnerXmlError);

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_string() == other.0.to_string()
    }
}

impl From<InnerXmlError> for Error {
    fn from(e: InnerXmlError) -> Self {
        Self(e)
    }
}

// Raised while reading the attributes of a schema element.
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self(e.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}
