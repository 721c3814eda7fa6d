#![allow(missing_docs)]

use graphdump::{
    DumpOptions, DumpType, Dumpable, Dumper, MemberKind, NullPolicy, RecursePolicy, Visibility,
};
use std::fmt;

#[derive(Dumpable)]
struct Renamed {
    #[dump(rename = "identifier")]
    id: u32,
    #[dump(ignore)]
    cache: Vec<u8>,
    #[dump(skip)]
    password: String,
    #[dump(property)]
    pub size: usize,
}

#[derive(Dumpable)]
struct Unit;

#[derive(Dumpable)]
struct Shape {
    #[dump(overridable)]
    name: String,
    sides: u32,
}

#[derive(Dumpable)]
struct Square {
    #[dump(overrides)]
    name: String,
    #[dump(base)]
    shape: Shape,
}

#[derive(Dumpable)]
struct Parent {
    name: String,
}

#[derive(Dumpable)]
struct Child {
    name: String,
    #[dump(base)]
    parent: Parent,
}

#[derive(Dumpable)]
struct Grandchild {
    #[dump(order = -1)]
    nickname: String,
    #[dump(base)]
    child: Child,
}

#[allow(dead_code)]
#[derive(Dumpable)]
struct CustomerMeta {
    #[dump(skip)]
    secret: (),
    #[dump(label = "Name: ")]
    name: (),
}

#[derive(Dumpable)]
#[dump(metadata = "CustomerMeta")]
struct Customer {
    name: String,
    secret: String,
}

#[derive(Dumpable)]
struct Plain {
    name: String,
    secret: String,
}

#[derive(Dumpable)]
#[dump(recurse = "skip", display)]
struct Token {
    raw: String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.raw.len())
    }
}

#[derive(Dumpable)]
struct Session {
    token: Token,
}

#[derive(Dumpable)]
#[dump(max_depth = 1, nulls = "skip")]
struct Shallow {
    inner: Parent,
    missing: Option<u8>,
}

#[test]
fn test_member_descriptors() {
    let info = Renamed::static_type_info();
    let names: Vec<&str> = info.members().iter().map(|m| m.name()).collect();
    assert_eq!(names, ["identifier", "password", "size"]);

    let size = info.member("size").expect("declared");
    assert_eq!(size.kind(), MemberKind::Property);
    assert_eq!(size.visibility(), Visibility::Public);
    assert_eq!(size.declared_value_type(), Some("usize"));

    let id = info.member("identifier").expect("declared");
    assert_eq!(id.kind(), MemberKind::Field);
    assert_eq!(id.visibility(), Visibility::Private);
    assert!(id.config().is_none());

    let password = info.member("password").expect("declared");
    assert!(password.config().is_some_and(|c| c.skip));
}

#[test]
fn test_rename_ignore_and_skip() -> graphdump::Result<()> {
    let value = Renamed {
        id: 3,
        cache: vec![1, 2, 3],
        password: "hunter2".to_string(),
        size: 10,
    };

    let text = Dumper::new().dump(&value)?;

    assert_eq!(
        text,
        "Renamed (derive_tests::Renamed, derive_tests):\n  identifier = 3\n  size = 10"
    );
    assert_eq!(value.cache.len(), 3);
    Ok(())
}

#[test]
fn test_unit_struct() -> graphdump::Result<()> {
    assert!(Unit::static_type_info().members().is_empty());
    assert_eq!(Dumper::new().dump(&Unit)?, "Unit (derive_tests::Unit, derive_tests):");
    Ok(())
}

#[test]
fn test_override_reads_most_derived_value() -> graphdump::Result<()> {
    let square = Square {
        name: "square".to_string(),
        shape: Shape {
            name: "shape".to_string(),
            sides: 4,
        },
    };

    let text = Dumper::new().dump(&square)?;

    assert_eq!(
        text,
        "Square (derive_tests::Square, derive_tests):\n  name = \"square\"\n  sides = 4"
    );
    Ok(())
}

#[test]
fn test_shadowed_members_render_per_level() -> graphdump::Result<()> {
    let child = Child {
        name: "child".to_string(),
        parent: Parent {
            name: "parent".to_string(),
        },
    };

    let text = Dumper::new().dump(&child)?;

    assert_eq!(
        text,
        "Child (derive_tests::Child, derive_tests):\n  name = \"child\"\n  name = \"parent\""
    );
    Ok(())
}

#[test]
fn test_three_level_chain() -> graphdump::Result<()> {
    let grandchild = Grandchild {
        nickname: "gc".to_string(),
        child: Child {
            name: "child".to_string(),
            parent: Parent {
                name: "parent".to_string(),
            },
        },
    };

    assert_eq!(Grandchild::static_type_info().chain().len(), 3);
    let text = Dumper::new().dump(&grandchild)?;
    let lines: Vec<&str> = text.lines().skip(1).map(str::trim).collect();

    assert_eq!(
        lines,
        ["name = \"child\"", "name = \"parent\"", "nickname = \"gc\""]
    );
    Ok(())
}

#[test]
fn test_metadata_type_supplies_configuration() -> graphdump::Result<()> {
    let customer = Customer {
        name: "Ann".to_string(),
        secret: "s3cr3t".to_string(),
    };

    let text = Dumper::new().dump(&customer)?;

    assert!(text.contains("Name: \"Ann\""));
    assert!(!text.contains("s3cr3t"));
    Ok(())
}

#[test]
fn test_declared_hint_acts_as_root_metadata() -> graphdump::Result<()> {
    let plain = Plain {
        name: "Bo".to_string(),
        secret: "pw".to_string(),
    };
    let dumper = Dumper::new();

    let hinted = dumper.dump_with(&plain, &DumpOptions::new().declared::<CustomerMeta>())?;
    let unhinted = dumper.dump(&plain)?;

    assert!(hinted.contains("Name: \"Bo\""));
    assert!(!hinted.contains("\"pw\""));
    assert!(unhinted.contains("name = \"Bo\""));
    assert!(unhinted.contains("secret = \"pw\""));
    assert_eq!(dumper.cache().len(), 2);
    Ok(())
}

#[test]
fn test_type_level_keys() -> graphdump::Result<()> {
    let token_config = Token::static_type_info().config().cloned().unwrap_or_default();
    assert_eq!(token_config.recurse, RecursePolicy::Skip);

    let session = Session {
        token: Token {
            raw: "abcdef".to_string(),
        },
    };
    let text = Dumper::new().dump(&session)?;
    assert!(text.contains("token = Token(6)"));
    assert!(!text.contains("abcdef"));

    let shallow_config = Shallow::static_type_info().config().cloned().unwrap_or_default();
    assert_eq!(shallow_config.max_depth, 1);
    assert_eq!(shallow_config.null_values, NullPolicy::Skip);

    let shallow = Shallow {
        inner: Parent {
            name: "p".to_string(),
        },
        missing: None,
    };
    let text = Dumper::new().dump(&shallow)?;
    assert!(text.contains("inner = Parent (derive_tests::Parent, derive_tests)"));
    assert!(!text.contains("missing"));
    Ok(())
}
