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
use crate::{schema, span::Context, xir};
use std::fs as stdfs;
use tempfile::TempDir;

fn parse_str(src: &str) -> TableDescriptor {
    let doc =
        xir::parse_document(src.as_bytes(), Context::from("define.xml")).unwrap();

    schema::parse(&doc).unwrap()
}

const SIMPLE: &str = r#"<define>
  <reader name="client" namespace="Game.Client" />
  <table name="Item" file="item.txt" key="id">
    <col name="id" type="int" />
    <col name="name" type="string" />
  </table>
</define>"#;

const RICH: &str = r#"<define>
  <reader name="client" namespace="Game.Client" />
  <reader name="server" namespace="Game.Server" />

  <struct name="Cost">
    <field name="item" type="int" />
    <field name="count" type="int" />
  </struct>
  <struct name="Unused">
    <field name="x" type="int" />
  </struct>

  <table name="SkillLevel" file="skill_level.txt" setkey="skill">
    <struct name="Range">
      <field name="p1" type="int" />
      <field name="p2" type="string" />
    </struct>
    <struct name="Hidden">
      <field name="x" type="int" />
    </struct>

    <col name="skill" type="string" />
    <col name="range" type="Range" />
    <col name="hidden" type="list{Hidden}" readby="server" />
    <col name="cost" type="list{Cost}" readby="server" />
  </table>

  <table name="Config" file="config.txt" key="key" readby="server">
    <col name="key" type="string" />
  </table>
</define>"#;

fn generate(
    gen: &dyn CodeGenerator,
    src: &str,
    reader: &str,
    newline: NewLineStyle,
) -> (TempDir, Vec<String>) {
    let dir = tempfile::tempdir().unwrap();
    let desc = parse_str(src);

    let written = gen
        .generate(&desc, reader, dir.path(), newline)
        .unwrap()
        .into_iter()
        .map(|path| {
            assert_eq!(path.parent(), Some(dir.path()));
            path.file_name().unwrap().to_string_lossy().into_owned()
        })
        .collect();

    (dir, written)
}

fn read(dir: &TempDir, name: &str) -> String {
    stdfs::read_to_string(dir.path().join(name)).unwrap()
}

mod line_writer {
    use super::*;

    #[test]
    fn indents_non_empty_lines() {
        let mut sut = LineWriter::new(NewLineStyle::Unix);

        sut.line("a {").indent().line("b").blank().dedent().line("}");

        assert_eq!(sut.into_string(), "a {\n    b\n\n}\n");
    }

    #[test]
    fn dos_newlines() {
        let mut sut = LineWriter::new(NewLineStyle::Dos);

        sut.line("a").blank();

        assert_eq!(sut.into_string(), "a\r\n\r\n");
    }

    #[test]
    fn dedent_saturates() {
        let mut sut = LineWriter::new(NewLineStyle::Unix);

        sut.dedent().line("a");

        assert_eq!(sut.into_string(), "a\n");
    }
}

mod options {
    use super::*;

    #[test]
    fn newline_style_names() {
        assert_eq!(NewLineStyle::from_name("unix"), Some(NewLineStyle::Unix));
        assert_eq!(NewLineStyle::from_name("dos"), Some(NewLineStyle::Dos));
        assert_eq!(NewLineStyle::from_name("mac"), None);
        assert_eq!(NewLineStyle::default(), NewLineStyle::Unix);
    }

    #[test]
    fn language_names() {
        assert_eq!(Language::from_name("cpp"), Some(Language::Cpp));
        assert_eq!(Language::from_name("csharp"), Some(Language::CSharp));
        assert_eq!(Language::from_name("go"), None);
        assert_eq!(Language::CSharp.to_string(), "csharp");
    }
}

mod cpp {
    use super::*;

    #[test]
    fn simple_table() {
        let (dir, written) =
            generate(&CppCodeGenerator, SIMPLE, "client", NewLineStyle::Unix);

        assert_eq!(written, ["tbl_item.h"]);
        assert_eq!(
            read(&dir, "tbl_item.h"),
            "// generated by tablec; do not edit\n\
             #ifndef GAME_CLIENT_TBL_ITEM_H\n\
             #define GAME_CLIENT_TBL_ITEM_H\n\
             \n\
             #include <stdint.h>\n\
             #include <cstddef>\n\
             #include <map>\n\
             #include <string>\n\
             #include <vector>\n\
             \n\
             namespace Game {\n\
             namespace Client {\n\
             \n\
             class TblItem {\n\
             public:\n\
             \x20   struct Row {\n\
             \x20       int32_t id;\n\
             \x20       std::string name;\n\
             \x20   };\n\
             \x20   typedef std::map<int32_t, Row> Rows;\n\
             \n\
             \x20   const Row *getRow(int32_t key) const\n\
             \x20   {\n\
             \x20       Rows::const_iterator iter = rows_.find(key);\n\
             \x20       return iter == rows_.end() ? NULL : &iter->second;\n\
             \x20   }\n\
             \n\
             \x20   const Rows &getRows() const\n\
             \x20   {\n\
             \x20       return rows_;\n\
             \x20   }\n\
             \n\
             private:\n\
             \x20   Rows rows_;\n\
             };\n\
             \n\
             } // namespace Client\n\
             } // namespace Game\n\
             \n\
             #endif // GAME_CLIENT_TBL_ITEM_H\n"
        );
    }

    #[test]
    fn client_projection() {
        let (dir, written) =
            generate(&CppCodeGenerator, RICH, "client", NewLineStyle::Unix);

        // `Cost` is used only by a column `client` cannot see.
        assert_eq!(written, ["tbl_skill_level.h"]);

        let text = read(&dir, "tbl_skill_level.h");

        assert!(text.contains("#ifndef GAME_CLIENT_TBL_SKILL_LEVEL_H\n"));
        assert!(text.contains("class TblSkillLevel {\n"));
        assert!(text.contains("    struct Range {\n        int32_t p1;\n        std::string p2;\n    };\n"));
        assert!(!text.contains("Hidden"));
        assert!(!text.contains("table_struct.h"));
        assert!(text.contains("    typedef std::vector<Row> RowSet;\n"));
        assert!(text.contains("    typedef std::map<std::string, RowSet> RowSets;\n"));
        assert!(text.contains("    const RowSet *getRowSet(const std::string &key) const\n"));
        assert!(text.contains("    RowSets row_sets_;\n"));
    }

    #[test]
    fn server_projection() {
        let (dir, written) =
            generate(&CppCodeGenerator, RICH, "server", NewLineStyle::Unix);

        assert_eq!(
            written,
            ["table_struct.h", "tbl_skill_level.h", "tbl_config.h"]
        );

        let structs = read(&dir, "table_struct.h");
        assert!(structs.contains("#ifndef GAME_SERVER_TABLE_STRUCT_H\n"));
        assert!(structs.contains("struct Cost {\n    int32_t item;\n    int32_t count;\n};\n"));
        assert!(!structs.contains("Unused"));

        let skill = read(&dir, "tbl_skill_level.h");
        assert!(skill.contains("#include \"table_struct.h\"\n"));
        assert!(skill.contains("    struct Hidden {\n"));
        assert!(skill.contains("        std::vector<Hidden> hidden;\n"));
        assert!(skill.contains("        std::vector<Cost> cost;\n"));

        // Does not reference a global struct.
        assert!(!read(&dir, "tbl_config.h").contains("table_struct.h"));
    }

    #[test]
    fn dos_newlines() {
        let (dir, _) =
            generate(&CppCodeGenerator, SIMPLE, "client", NewLineStyle::Dos);

        let text = read(&dir, "tbl_item.h");

        assert!(text.ends_with("#endif // GAME_CLIENT_TBL_ITEM_H\r\n"));
        assert_eq!(text.matches('\n').count(), text.matches("\r\n").count());
    }
}

mod csharp {
    use super::*;

    #[test]
    fn simple_table() {
        let (dir, written) =
            generate(&CSharpCodeGenerator, SIMPLE, "client", NewLineStyle::Unix);

        assert_eq!(written, ["TblItem.cs"]);
        assert_eq!(
            read(&dir, "TblItem.cs"),
            "// generated by tablec; do not edit\n\
             using System.Collections.Generic;\n\
             \n\
             namespace Game.Client\n\
             {\n\
             \x20   public sealed class TblItem\n\
             \x20   {\n\
             \x20       public sealed class Row\n\
             \x20       {\n\
             \x20           public int id;\n\
             \x20           public string name;\n\
             \x20       }\n\
             \n\
             \x20       public sealed class Rows : Dictionary<int, Row>\n\
             \x20       {\n\
             \x20       }\n\
             \n\
             \x20       private readonly Rows rows = new Rows();\n\
             \n\
             \x20       public Row GetRow(int key)\n\
             \x20       {\n\
             \x20           Row value;\n\
             \x20           return this.rows.TryGetValue(key, out value) ? value : null;\n\
             \x20       }\n\
             \n\
             \x20       public Rows GetRows()\n\
             \x20       {\n\
             \x20           return this.rows;\n\
             \x20       }\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn server_projection() {
        let (dir, written) =
            generate(&CSharpCodeGenerator, RICH, "server", NewLineStyle::Unix);

        assert_eq!(
            written,
            ["TableStruct.cs", "TblSkillLevel.cs", "TblConfig.cs"]
        );

        let structs = read(&dir, "TableStruct.cs");
        assert!(structs.contains("namespace Game.Server\n"));
        assert!(structs.contains("    public sealed class Cost\n    {\n        public int item;\n"));
        assert!(!structs.contains("Unused"));

        let skill = read(&dir, "TblSkillLevel.cs");
        assert!(skill.contains("        public sealed class RowSet : List<Row>\n"));
        assert!(skill.contains(
            "        public sealed class RowSets : Dictionary<string, RowSet>\n"
        ));
        assert!(skill.contains("            public List<Cost> cost;\n"));
        assert!(skill.contains("        public RowSet GetRowSet(string key)\n"));
    }

    #[test]
    fn client_projection() {
        let (dir, written) =
            generate(&CSharpCodeGenerator, RICH, "client", NewLineStyle::Unix);

        assert_eq!(written, ["TblSkillLevel.cs"]);

        let skill = read(&dir, "TblSkillLevel.cs");
        assert!(skill.contains("namespace Game.Client\n"));
        assert!(skill.contains("            public Range range;\n"));
        assert!(!skill.contains("Hidden"));
        assert!(!skill.contains("cost"));
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_reader() {
        let dir = tempfile::tempdir().unwrap();
        let desc = parse_str(SIMPLE);

        for gen in [Language::Cpp, Language::CSharp].map(|l| l.generator()) {
            assert!(matches!(
                gen.generate(&desc, "editor", dir.path(), NewLineStyle::Unix),
                Err(CodegenError::Project(ProjectError::UnknownReader(name)))
                    if name == "editor",
            ));
        }

        assert_eq!(stdfs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn unwritable_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let desc = parse_str(SIMPLE);

        assert!(matches!(
            CppCodeGenerator.generate(&desc, "client", &missing, NewLineStyle::Unix),
            Err(CodegenError::Write(_, path)) if path == missing.join("tbl_item.h"),
        ));
    }

    #[test]
    fn input_descriptor_not_modified() {
        let dir = tempfile::tempdir().unwrap();
        let desc = parse_str(RICH);
        let orig = desc.clone();

        CppCodeGenerator
            .generate(&desc, "client", dir.path(), NewLineStyle::Unix)
            .unwrap();

        assert_eq!(desc, orig);
    }
}
