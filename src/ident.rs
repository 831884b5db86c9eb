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

//! Identifier and type grammar.
//!
//! These are the lexical rules shared by the schema parser and the code
//! generators:
//!
//!   - [`is_valid_ident`] decides whether a name may be used for a reader,
//!       struct, field, table, or column;
//!   - [`parse_list_type`] unwraps the `list{T}` column type syntax; and
//!   - [`camel_to_separated`] derives file and symbol names for
//!       generated code.

use regex::{Captures, Regex};

lazy_static! {
    static ref IDENT_RE: Regex = Regex::new(r"^[A-Za-z_](?-u:\w)*$").unwrap();
    static ref LIST_TYPE_RE: Regex = Regex::new(r"^list\{(.+)\}$").unwrap();

    // `ABCDef` => `ABC_Def`
    static ref CAMEL_UPPER_RUN_RE: Regex =
        Regex::new(r"([A-Z][0-9]*)([A-Z][0-9]*[a-z])").unwrap();

    // `abcDef` => `abc_Def`
    static ref CAMEL_LOWER_UPPER_RE: Regex =
        Regex::new(r"([a-z][0-9]*)([A-Z])").unwrap();
}

/// Whether `s` is a valid identifier.
///
/// An identifier begins with an ASCII letter or underscore and is followed
///   by any number of ASCII word characters.
///
/// ```
/// use tablec::ident::is_valid_ident;
///
/// assert!(is_valid_ident("_x9"));
/// assert!(!is_valid_ident("9x"));
/// ```
pub fn is_valid_ident(s: &str) -> bool {
    IDENT_RE.is_match(s)
}

/// Unwrap a `list{T}` type string into `T`.
///
/// Yields [`None`] if `ty` is not list syntax,
///   in which case `ty` names the type directly.
///
/// ```
/// use tablec::ident::parse_list_type;
///
/// assert_eq!(Some("int"), parse_list_type("list{int}"));
/// assert_eq!(None, parse_list_type("int"));
/// ```
pub fn parse_list_type(ty: &str) -> Option<&str> {
    LIST_TYPE_RE
        .captures(ty)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str())
}

/// Convert a camel-case name into lowercase words delimited by `sep`.
///
/// A new word begins before the last capital of an uppercase run that is
///   followed by lowercase (`ABCDef` => `abc_def`)
///   and before a capital that follows a lowercase letter
///   (`abcDef` => `abc_def`).
/// Digits stick to the letter that precedes them.
pub fn camel_to_separated(name: &str, sep: &str) -> String {
    let join = |caps: &Captures| format!("{}{}{}", &caps[1], sep, &caps[2]);

    let upper = CAMEL_UPPER_RUN_RE.replace_all(name, join);
    let lower = CAMEL_LOWER_UPPER_RE.replace_all(&upper, join);

    lower.to_lowercase()
}

#[cfg(test)]
mod test {
    use super::*;

    mod ident {
        use super::*;

        #[test]
        fn accepts_letters_underscore_digits() {
            assert!(is_valid_ident("a"));
            assert!(is_valid_ident("_x9"));
            assert!(is_valid_ident("Row_1"));
            assert!(is_valid_ident("_"));
        }

        #[test]
        fn rejects_empty() {
            assert!(!is_valid_ident(""));
        }

        #[test]
        fn rejects_leading_digit() {
            assert!(!is_valid_ident("1abc"));
        }

        #[test]
        fn rejects_punctuation() {
            assert!(!is_valid_ident("a-b"));
            assert!(!is_valid_ident("a.b"));
            assert!(!is_valid_ident("a b"));
        }

        #[test]
        fn rejects_non_ascii() {
            assert!(!is_valid_ident("caf\u{e9}"));
        }

        #[test]
        fn rejects_trailing_newline() {
            // `$` must not match before a final newline.
            assert!(!is_valid_ident("abc\n"));
        }
    }

    mod list_type {
        use super::*;

        #[test]
        fn unwraps_scalar_element() {
            assert_eq!(Some("int"), parse_list_type("list{int}"));
            assert_eq!(Some("string"), parse_list_type("list{string}"));
        }

        #[test]
        fn unwraps_struct_element() {
            assert_eq!(Some("Hero"), parse_list_type("list{Hero}"));
        }

        #[test]
        fn not_a_list() {
            assert_eq!(None, parse_list_type("int"));
            assert_eq!(None, parse_list_type("list{}"));
            assert_eq!(None, parse_list_type("list{int"));
            assert_eq!(None, parse_list_type("xlist{int}"));
        }

        #[test]
        fn nested_list_keeps_inner_text() {
            // The inner type is not itself unwrapped;
            //   it will fail type resolution later.
            assert_eq!(Some("list{int}"), parse_list_type("list{list{int}}"));
        }
    }

    mod camel {
        use super::*;

        #[test]
        fn simple_words() {
            assert_eq!("skill_level", camel_to_separated("SkillLevel", "_"));
            assert_eq!("item", camel_to_separated("Item", "_"));
            assert_eq!("abc_def", camel_to_separated("abcDef", "_"));
        }

        #[test]
        fn uppercase_run() {
            assert_eq!("abc_def", camel_to_separated("ABCDef", "_"));
            assert_eq!("npc", camel_to_separated("NPC", "_"));
        }

        #[test]
        fn digits_stay_with_preceding_letter() {
            assert_eq!("item2_level", camel_to_separated("Item2Level", "_"));
        }

        #[test]
        fn custom_separator() {
            assert_eq!("match-making", camel_to_separated("MatchMaking", "-"));
        }
    }
}
