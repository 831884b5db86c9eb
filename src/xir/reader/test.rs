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

use super::*;

fn ctx() -> Context {
    "test.xml".into()
}

fn parse(src: &str) -> Result<Document> {
    parse_document(src.as_bytes(), ctx())
}

#[test]
fn empty_source_has_no_elements() {
    let doc = parse("").unwrap();

    assert_eq!(None, doc.root());
    assert_eq!(&ctx(), doc.context());
}

#[test]
fn nested_elements_and_attrs() {
    let doc = parse(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <define>\n\
         \x20 <reader name=\"client\" namespace=\"a.b\"/>\n\
         \x20 <table name=\"Item\" key=\"id\">\n\
         \x20   <col name=\"id\" type=\"int\"/>\n\
         \x20 </table>\n\
         </define>\n",
    )
    .unwrap();

    let root = doc.root().unwrap();
    assert_eq!("define", root.name());
    assert_eq!(2, root.span().line().get());
    assert_eq!(2, root.children().len());

    let reader = &root.children()[0];
    assert_eq!("reader", reader.name());
    assert_eq!(Some("client"), reader.attr("name"));
    assert_eq!(Some("a.b"), reader.attr("namespace"));
    assert_eq!(3, reader.span().line().get());

    let table = &root.children()[1];
    assert_eq!(4, table.span().line().get());

    let col = &table.children()[0];
    assert_eq!(Some("int"), col.attr("type"));
    assert_eq!(5, col.span().line().get());
}

#[test]
fn text_and_comments_discarded() {
    let doc = parse("<a>text<!-- c --><b/>more</a>").unwrap();
    let root = doc.root().unwrap();

    assert_eq!(1, root.children().len());
    assert_eq!("b", root.children()[0].name());
}

#[test]
fn attr_values_unescaped() {
    let doc = parse("<a v=\"x &amp; y\"/>").unwrap();

    assert_eq!(Some("x & y"), doc.root().unwrap().attr("v"));
}

#[test]
fn multiline_tag_spans_first_line() {
    let doc = parse("<a>\n<b\n  x=\"1\"\n  y=\"2\"/>\n<c/></a>").unwrap();
    let root = doc.root().unwrap();

    assert_eq!(2, root.children()[0].span().line().get());
    assert_eq!(5, root.children()[1].span().line().get());
}

#[test]
fn attrs_keep_source_order() {
    let doc = parse("<a z=\"1\" a=\"2\" m=\"3\"/>").unwrap();
    let names = doc
        .root()
        .unwrap()
        .attrs()
        .iter()
        .map(|attr| attr.name().to_string())
        .collect::<Vec<_>>();

    assert_eq!(vec!["z", "a", "m"], names);
}

#[test]
fn unclosed_element() {
    match parse("<define>\n  <table>\n") {
        Err(Error::UnclosedElement(name, span)) => {
            // Innermost unclosed element.
            assert_eq!("table", name);
            assert_eq!(2, span.line().get());
        }
        other => panic!("expected unclosed element error, got {other:?}"),
    }
}

#[test]
fn mismatched_closing_tag() {
    assert!(matches!(
        parse("<define>\n<a></b>\n</define>"),
        Err(Error::QuickXmlError(..))
    ));
}

#[test]
fn duplicate_attribute() {
    assert!(matches!(
        parse("<a x=\"1\" x=\"2\"/>"),
        Err(Error::QuickXmlError(..))
    ));
}
