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

//! XIR tree (XIRT).
//!
//! A [`Document`] holds the top-level [`Element`]s of a parsed source;
//!   a well-formed XML document has exactly one.

use crate::span::{Context, Span};

/// Element attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    name: String,
    value: String,
}

impl Attr {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value with entities unescaped.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// List of attributes in source order.
///
/// Attribute names are unique within an element;
///   duplicates are rejected while parsing.
/// Lookup is linear,
///   which is faster than hashing for the handful of attributes on a
///   schema element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrList {
    attrs: Vec<Attr>,
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attr: Attr) {
        self.attrs.push(attr)
    }

    /// Search for an attribute of the given `name`.
    pub fn find(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl<const N: usize> From<[Attr; N]> for AttrList {
    fn from(attrs: [Attr; N]) -> Self {
        Self {
            attrs: attrs.into(),
        }
    }
}

/// Element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: AttrList,
    children: Vec<Element>,
    /// Line of the opening tag.
    span: Span,
}

impl Element {
    pub fn new<N: Into<String>>(name: N, span: Span) -> Self {
        Self {
            name: name.into(),
            attrs: AttrList::new(),
            children: vec![],
            span,
        }
    }

    /// Add an attribute,
    ///   builder-style.
    pub fn with_attr<N: Into<String>, V: Into<String>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.attrs.push(Attr::new(name, value));
        self
    }

    /// Add a child element,
    ///   builder-style.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub(super) fn push_attr(&mut self, attr: Attr) {
        self.attrs.push(attr)
    }

    pub(super) fn push_child(&mut self, child: Element) {
        self.children.push(child)
    }

    /// Element (tag) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &AttrList {
        &self.attrs
    }

    /// Value of the attribute `name`,
    ///   if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.find(name).map(Attr::value)
    }

    /// Element children in source order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Direct children whose tag is `name`,
    ///   in source order.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// A parsed source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    ctx: Context,
    elements: Vec<Element>,
}

impl Document {
    pub fn new(ctx: Context, elements: Vec<Element>) -> Self {
        Self { ctx, elements }
    }

    /// Source of the document.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The document (root) element,
    ///   being the first top-level element.
    pub fn root(&self) -> Option<&Element> {
        self.elements.first()
    }

    /// All top-level elements in source order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}
