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
use crate::{project::project_for_reader, schema, xir};
use std::fs as stdfs;

const SCHEMA: &str = r#"<define>
  <reader name="client" namespace="Client" />
  <reader name="server" namespace="Server" />

  <table name="T" file="t.txt" key="id">
    <col name="id" type="int" />
    <col name="name" type="string" />
    <col name="secret" type="string" readby="server" />
  </table>

  <table name="Hidden" file="hidden.txt" key="id" readby="server">
    <col name="id" type="int" />
  </table>

  <table name="K" file="k.txt" key="key">
    <col name="a" type="string" readby="client" />
    <col name="key" type="string" readby="server" />
    <col name="b" type="string" readby="server" />
    <col name="c" type="string" />
  </table>
</define>"#;

const T_DATA: &str = "comment\t\t\r\nid\tname\tsecret\r\n1\tfoo\tbar\r\n";

lazy_static! {
    static ref DESC: TableDescriptor = {
        let doc = xir::parse_document(
            SCHEMA.as_bytes(),
            Context::from("define.xml"),
        )
        .unwrap();

        schema::parse(&doc).unwrap()
    };
    static ref DATA_CTX: Context = Context::from("in/t.txt");
}

fn table(name: &str) -> &'static TableDef {
    DESC.table(name).unwrap()
}

fn cut_t(reader: &str, text: &str) -> Result<String, CutError> {
    cut_table_data(table("T"), reader, &DATA_CTX, text.as_bytes())
        .map(|out| String::from_utf8(out).unwrap())
}

mod deletion {
    use super::*;

    fn deleted(table_name: &str, reader: &str) -> Vec<usize> {
        deletion_set(table(table_name), reader).ones().collect()
    }

    #[test]
    fn by_reader() {
        assert_eq!(deleted("T", "client"), [2]);
        assert!(deleted("T", "server").is_empty());
    }

    #[test]
    fn never_deletes_key() {
        // `key` is readable only by `server`.
        assert_eq!(deleted("K", "client"), [2]);
        assert_eq!(deleted("K", "server"), [0]);
    }

    #[test]
    fn agrees_with_projection() {
        for reader in ["client", "server"] {
            let mut projected = DESC.clone();
            project_for_reader(&mut projected, reader).unwrap();

            for proj_table in projected.tables() {
                let orig = table(proj_table.name());

                let absent = orig
                    .columns()
                    .iter()
                    .enumerate()
                    .filter(|(_, col)| proj_table.column(col.name()).is_none())
                    .map(|(i, _)| i)
                    .collect::<Vec<_>>();

                let deleted =
                    deletion_set(orig, reader).ones().collect::<Vec<_>>();

                assert_eq!(
                    deleted,
                    absent,
                    "reader `{reader}`, table `{}`",
                    orig.name(),
                );

                assert_eq!(
                    proj_table.columns().position(proj_table.key()),
                    Some(proj_table.key_column_index()),
                );
            }
        }
    }
}

mod text {
    use super::*;

    #[test]
    fn client_loses_secret_column() {
        assert_eq!(
            cut_t("client", T_DATA).unwrap(),
            "comment\t\r\nid\tname\r\n1\tfoo\r\n",
        );
    }

    #[test]
    fn server_sees_everything() {
        assert_eq!(cut_t("server", T_DATA).unwrap(), T_DATA);
    }

    #[test]
    fn header_only() {
        assert_eq!(
            cut_t("client", "\t\t\r\nid\tname\tsecret\r\n").unwrap(),
            "\t\r\nid\tname\r\n",
        );
    }

    #[test]
    fn key_kept_when_restricted_to_other_reader() {
        let data = "#\t\t\t\r\na\tkey\tb\tc\r\n1\t2\t3\t4\r\n";

        assert_eq!(
            cut_table_data(table("K"), "client", &DATA_CTX, data.as_bytes())
                .unwrap(),
            b"#\t\t\r\na\tkey\tc\r\n1\t2\t4\r\n",
        );
    }

    #[test]
    fn fields_need_not_be_utf8() {
        let data = b"comment\t\t\r\nid\tname\tsecret\r\n1\tcaf\xE9\tb\xFFr\r\n";

        assert_eq!(
            cut_table_data(table("T"), "client", &DATA_CTX, data).unwrap(),
            b"comment\t\r\nid\tname\r\n1\tcaf\xE9\r\n",
        );
        assert_eq!(
            cut_table_data(table("T"), "server", &DATA_CTX, data).unwrap(),
            data,
        );
    }

    #[test]
    fn header_mismatch_with_non_utf8_name() {
        let data = b"comment\t\t\r\nid\tn\xE4me\tsecret\r\n";

        assert!(matches!(
            cut_table_data(table("T"), "client", &DATA_CTX, data),
            Err(CutError::HeaderMismatch { position: 2, expected, found, .. })
                if expected == "name" && found == "n\u{FFFD}me",
        ));
    }

    #[test]
    fn missing_trailing_terminator() {
        let result = cut_t("client", "comment\t\t\r\nid\tname\tsecret\r\n1\tfoo\tbar");

        assert!(matches!(
            result,
            Err(CutError::LineEnding(span)) if span == DATA_CTX.span(3),
        ));
    }

    #[test]
    fn unix_line_endings() {
        assert!(matches!(
            cut_t("client", "comment\t\t\nid\tname\tsecret\n"),
            Err(CutError::LineEnding(span)) if span == DATA_CTX.span(1),
        ));
    }

    #[test]
    fn stray_line_feed() {
        assert!(matches!(
            cut_t("client", "comment\t\t\r\nid\tname\tsecret\r\n1\tf\noo\tbar\r\n"),
            Err(CutError::LineEnding(span)) if span == DATA_CTX.span(3),
        ));
    }

    #[test]
    fn stray_carriage_return() {
        assert!(matches!(
            cut_t("client", "comment\t\t\r\nid\tname\tsecret\r\r\n"),
            Err(CutError::LineEnding(span)) if span == DATA_CTX.span(2),
        ));
    }

    #[test]
    fn missing_header_lines() {
        for data in ["", "comment\t\t\r\n"] {
            assert!(
                matches!(
                    cut_t("client", data),
                    Err(CutError::MissingHeader(span)) if span == DATA_CTX.span(1),
                ),
                "data {data:?}",
            );
        }
    }

    #[test]
    fn column_count_mismatch() {
        let err = cut_t(
            "client",
            "comment\t\t\r\nid\tname\tsecret\r\n1\tfoo\r\n",
        )
        .unwrap_err();

        assert!(matches!(
            &err,
            CutError::ColumnCount {
                found: 2,
                expected: 3,
                span,
            } if span == &DATA_CTX.span(3),
        ));
        assert_eq!(
            err.to_string(),
            "data file `in/t.txt` line 3 has 2 columns, but 3 are defined",
        );
    }

    #[test]
    fn comment_line_column_count_checked() {
        assert!(matches!(
            cut_t("client", "comment\r\nid\tname\tsecret\r\n"),
            Err(CutError::ColumnCount { found: 1, expected: 3, .. }),
        ));
    }

    #[test]
    fn header_mismatch() {
        let err = cut_t("client", "comment\t\t\r\nid\tname\tsecrets\r\n")
            .unwrap_err();

        assert!(matches!(
            &err,
            CutError::HeaderMismatch { position: 3, expected, found, span }
                if expected == "secret"
                    && found == "secrets"
                    && span == &DATA_CTX.span(2),
        ));
        assert_eq!(
            err.to_string(),
            "data file column 3 must be named `secret`"
        );
    }

    #[test]
    fn validates_before_cutting_deleted_columns() {
        // The bad line is within a column that `client` would not see.
        assert!(matches!(
            cut_t("client", "comment\t\t\r\nid\tname\tsecret\r\n1\tfoo\t\tx\r\n"),
            Err(CutError::ColumnCount { found: 4, .. }),
        ));
    }
}

mod files {
    use super::*;
    use tempfile::TempDir;

    fn dirs() -> (TempDir, TempDir) {
        (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap())
    }

    const K_DATA: &str = "#\t\t\t\r\na\tkey\tb\tc\r\n1\t2\t3\t4\r\n";

    #[test]
    fn cuts_readable_tables() {
        let (input, output) = dirs();

        stdfs::write(input.path().join("t.txt"), T_DATA).unwrap();
        stdfs::write(input.path().join("k.txt"), K_DATA).unwrap();
        // `hidden.txt` is not read by `client` and so need not exist.

        let count =
            cut_tables(&DESC, "client", input.path(), output.path()).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            stdfs::read_to_string(output.path().join("t.txt")).unwrap(),
            "comment\t\r\nid\tname\r\n1\tfoo\r\n",
        );
        assert_eq!(
            stdfs::read_to_string(output.path().join("k.txt")).unwrap(),
            "#\t\t\r\na\tkey\tc\r\n1\t2\t4\r\n",
        );
        assert!(!output.path().join("hidden.txt").exists());

        // Input is untouched.
        assert_eq!(
            stdfs::read_to_string(input.path().join("t.txt")).unwrap(),
            T_DATA,
        );
    }

    #[test]
    fn cuts_non_utf8_data_file() {
        let (input, output) = dirs();

        stdfs::write(
            input.path().join("t.txt"),
            b"comment\t\t\r\nid\tname\tsecret\r\n1\tcaf\xE9\tbar\r\n",
        )
        .unwrap();

        cut_table(table("T"), "client", input.path(), output.path()).unwrap();

        assert_eq!(
            stdfs::read(output.path().join("t.txt")).unwrap(),
            b"comment\t\r\nid\tname\r\n1\tcaf\xE9\r\n",
        );
    }

    #[test]
    fn overwrites_existing_output() {
        let (input, output) = dirs();

        stdfs::write(input.path().join("t.txt"), T_DATA).unwrap();
        stdfs::write(output.path().join("t.txt"), "stale").unwrap();

        cut_table(table("T"), "server", input.path(), output.path()).unwrap();

        assert_eq!(
            stdfs::read_to_string(output.path().join("t.txt")).unwrap(),
            T_DATA,
        );
    }

    #[test]
    fn unknown_reader() {
        let (input, output) = dirs();

        assert!(matches!(
            cut_tables(&DESC, "editor", input.path(), output.path()),
            Err(CutError::UnknownReader(name)) if name == "editor",
        ));
    }

    #[test]
    fn missing_data_file() {
        let (input, output) = dirs();
        let expected = input.path().join("t.txt");

        assert!(matches!(
            cut_tables(&DESC, "client", input.path(), output.path()),
            Err(CutError::Read(_, path)) if path == expected,
        ));
    }

    #[test]
    fn stops_at_first_failure() {
        let (input, output) = dirs();

        stdfs::write(input.path().join("t.txt"), T_DATA).unwrap();
        stdfs::write(input.path().join("k.txt"), "bad").unwrap();

        let result = cut_tables(&DESC, "client", input.path(), output.path());

        assert!(matches!(result, Err(CutError::LineEnding(_))));

        // Earlier tables were already written.
        assert!(output.path().join("t.txt").exists());
        assert!(!output.path().join("k.txt").exists());
    }

    #[test]
    fn error_span_names_data_file() {
        let (input, output) = dirs();
        let path = input.path().join("t.txt");

        stdfs::write(&path, "comment\t\t\r\nid\tnom\tsecret\r\n").unwrap();

        match cut_table(table("T"), "client", input.path(), output.path()) {
            Err(CutError::HeaderMismatch { span, .. }) => {
                assert_eq!(span.context().as_path(), path.as_path());
                assert_eq!(span.line().get(), 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
