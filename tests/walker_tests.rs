#![allow(missing_docs)]

use graphdump::{
    AccessError, DumpObject, DumpOptions, DumpSequence, DumpType, Dumpable, Dumper,
    MemberDescriptor, MemberFilter, TypeDumpConfig, TypeInfo, TypeName, Value,
};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Dumpable)]
struct Leaf {
    value: u32,
}

#[derive(Dumpable)]
struct Branch {
    label: String,
    leaf: Leaf,
}

#[derive(Dumpable)]
#[dump(display)]
struct Tagged {
    id: u32,
}

impl fmt::Display for Tagged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag#{}", self.id)
    }
}

#[derive(Dumpable)]
struct Policies {
    #[dump(recurse = "skip")]
    shallow: Leaf,
    #[dump(recurse = "skip")]
    tagged: Tagged,
    #[dump(label = "[{name}] ")]
    framed: u32,
    #[dump(display)]
    plain: String,
    quoted: String,
}

#[derive(Dumpable)]
struct Nulls {
    present: Option<u32>,
    absent: Option<u32>,
    #[dump(nulls = "skip")]
    hidden: Option<String>,
}

#[derive(Dumpable)]
#[dump(nulls = "skip")]
struct Sparse {
    gone: Option<u32>,
    #[dump(nulls = "dump")]
    kept: Option<u32>,
}

#[derive(Dumpable)]
struct Collections {
    #[dump(max_entries = 2)]
    capped: Vec<u32>,
    all: Vec<u32>,
    map: BTreeMap<String, u32>,
    bytes: Vec<u8>,
    #[dump(max_entries = 2)]
    short_bytes: [u8; 3],
    empty: Vec<u32>,
}

#[derive(Dumpable)]
#[dump(max_entries = 1)]
struct CappedByType {
    items: Vec<u32>,
    #[dump(max_entries = 3)]
    more: Vec<u32>,
}

#[derive(Dumpable)]
struct Scalars {
    flag: bool,
    letter: char,
    ratio: f64,
    id: uuid::Uuid,
    wait: Duration,
    handler: fn(u32) -> u32,
    kind: TypeName,
    when: chrono::NaiveDate,
}

#[derive(Dumpable)]
#[dump(default_property = "code")]
struct Currency {
    code: String,
    rate: f64,
}

#[derive(Dumpable)]
struct Price {
    amount: u32,
    currency: Currency,
}

#[derive(Dumpable)]
struct Account {
    pub owner: String,
    pin: u32,
    #[dump(property)]
    pub balance: i64,
}

fn double(x: u32) -> u32 {
    x * 2
}

// A hand-written object with failing and unreadable members.
struct Flaky;

impl DumpType for Flaky {
    fn static_type_info() -> &'static TypeInfo {
        static INFO: OnceLock<TypeInfo> = OnceLock::new();
        INFO.get_or_init(|| {
            TypeInfo::builder::<Flaky>()
                .member(MemberDescriptor::field("ok"))
                .member(MemberDescriptor::property("broken"))
                .member(MemberDescriptor::field("missing"))
                .member(MemberDescriptor::field("secret").write_only())
                .member(MemberDescriptor::property("item").indexer())
                .finish()
        })
    }
}

impl DumpObject for Flaky {
    fn type_info(&self) -> &'static TypeInfo {
        Self::static_type_info()
    }

    fn read_member(&self, member: &MemberDescriptor) -> Option<graphdump::MemberValue<'_>> {
        match member.name() {
            "ok" => Some(Ok(Value::str("fine"))),
            "broken" => Some(Err(AccessError::new("boom"))),
            "secret" | "item" => Some(Ok(Value::str("leaked"))),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Dumpable for Flaky {
    fn dump_value(&self) -> Value<'_> {
        Value::Object(self)
    }
}

// An object that can also be enumerated as a sequence.
struct Bag(Vec<u32>);

impl DumpType for Bag {
    fn static_type_info() -> &'static TypeInfo {
        static INFO: OnceLock<TypeInfo> = OnceLock::new();
        INFO.get_or_init(|| {
            TypeInfo::builder::<Bag>()
                .member(MemberDescriptor::property("size"))
                .finish()
        })
    }
}

impl DumpObject for Bag {
    fn type_info(&self) -> &'static TypeInfo {
        Self::static_type_info()
    }

    fn read_member(&self, member: &MemberDescriptor) -> Option<graphdump::MemberValue<'_>> {
        match member.name() {
            "size" => graphdump::rt::computed(self.0.len()),
            _ => None,
        }
    }

    fn as_sequence(&self) -> Option<&dyn DumpSequence> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DumpSequence for Bag {
    fn type_name(&self) -> TypeName {
        TypeName::of::<Bag>()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = Value<'_>> + '_> {
        Box::new(self.0.iter().map(Dumpable::dump_value))
    }
}

impl Dumpable for Bag {
    fn dump_value(&self) -> Value<'_> {
        Value::Object(self)
    }
}

#[derive(Dumpable)]
struct Holder {
    #[dump(enumerate)]
    listed: Bag,
    plain: Bag,
}

#[test]
fn test_root_scalars_and_collections() -> graphdump::Result<()> {
    let dumper = Dumper::new();

    assert_eq!(dumper.dump(&42_i32)?, "42");
    assert_eq!(dumper.dump(&"hi".to_string())?, "\"hi\"");
    assert_eq!(dumper.dump(&Option::<u8>::None)?, "<null>");
    assert_eq!(dumper.dump(&vec![1, 2])?, "Vec<i32>[2]:\n  1\n  2");
    Ok(())
}

#[test]
fn test_nested_object_is_indented() -> graphdump::Result<()> {
    let branch = Branch {
        label: "x".to_string(),
        leaf: Leaf { value: 1 },
    };

    let text = Dumper::new().dump(&branch)?;

    assert_eq!(
        text,
        "Branch (walker_tests::Branch, walker_tests):\n  label = \"x\"\n  leaf = Leaf (walker_tests::Leaf, walker_tests):\n    value = 1"
    );
    Ok(())
}

#[test]
fn test_depth_limit_renders_leaf() -> graphdump::Result<()> {
    let branch = Branch {
        label: "x".to_string(),
        leaf: Leaf { value: 1 },
    };
    let dumper = Dumper::new();

    let shallow = dumper.dump_with(
        &branch,
        &DumpOptions::new().config(TypeDumpConfig::default().max_depth(1)),
    )?;
    assert!(shallow.contains("leaf = Leaf (walker_tests::Leaf, walker_tests)"));
    assert!(!shallow.contains("value = "));

    let none = dumper.dump_with(
        &branch,
        &DumpOptions::new().config(TypeDumpConfig::default().max_depth(0)),
    )?;
    assert_eq!(none, "Branch (walker_tests::Branch, walker_tests)");
    Ok(())
}

#[test]
fn test_member_policies() -> graphdump::Result<()> {
    let policies = Policies {
        shallow: Leaf { value: 3 },
        tagged: Tagged { id: 4 },
        framed: 5,
        plain: "bare".to_string(),
        quoted: "q".to_string(),
    };

    let text = Dumper::new().dump(&policies)?;

    assert!(text.contains("shallow = Leaf (walker_tests::Leaf, walker_tests)\n"));
    assert!(text.contains("tagged = tag#4"));
    assert!(text.contains("[framed] 5"));
    assert!(text.contains("plain = bare"));
    assert!(text.contains("quoted = \"q\""));
    assert!(!text.contains("value = 3"));
    Ok(())
}

#[test]
fn test_null_policies() -> graphdump::Result<()> {
    let nulls = Nulls {
        present: Some(1),
        absent: None,
        hidden: None,
    };
    let text = Dumper::new().dump(&nulls)?;
    assert!(text.contains("present = 1"));
    assert!(text.contains("absent = <null>"));
    assert!(!text.contains("hidden"));

    let sparse = Sparse {
        gone: None,
        kept: None,
    };
    let text = Dumper::new().dump(&sparse)?;
    assert!(!text.contains("gone"));
    assert!(text.contains("kept = <null>"));
    Ok(())
}

#[test]
fn test_collections_caps_and_bytes() -> graphdump::Result<()> {
    let mut map = BTreeMap::new();
    map.insert("a".to_string(), 1);
    let collections = Collections {
        capped: vec![1, 2, 3],
        all: vec![7],
        map,
        bytes: vec![0x0A, 0xFF, 0x10],
        short_bytes: [1, 2, 3],
        empty: Vec::new(),
    };

    let text = Dumper::new().dump(&collections)?;

    assert!(text.contains("capped = Vec<u32>[3]:\n    1\n    2\n    ... (dumped 2 of 3 entries)"));
    assert!(text.contains("all = Vec<u32>[1]:\n    7"));
    assert!(text.contains("map = BTreeMap<String, u32>[1]:\n    [\"a\"] = 1"));
    assert!(text.contains("bytes = Vec<u8>[3]: 0A-FF-10"));
    assert!(text.contains("short_bytes = [u8; 3][3]: 01-02 ... (dumped 2 of 3 entries)"));
    assert!(text.contains("empty = Vec<u32>[0]:"));
    Ok(())
}

#[test]
fn test_type_level_entry_cap() -> graphdump::Result<()> {
    let capped = CappedByType {
        items: vec![1, 2],
        more: vec![1, 2, 3, 4],
    };

    let text = Dumper::new().dump(&capped)?;

    assert!(text.contains("... (dumped 1 of 2 entries)"));
    assert!(text.contains("... (dumped 3 of 4 entries)"));
    Ok(())
}

#[test]
fn test_scalar_kinds() -> graphdump::Result<()> {
    let scalars = Scalars {
        flag: true,
        letter: 'x',
        ratio: 1.5,
        id: uuid::Uuid::nil(),
        wait: Duration::from_millis(1500),
        handler: double,
        kind: TypeName::of::<u32>(),
        when: chrono::NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date"),
    };

    let text = Dumper::new().dump(&scalars)?;

    assert!(text.contains("flag = true"));
    assert!(text.contains("letter = 'x'"));
    assert!(text.contains("ratio = 1.5"));
    assert!(text.contains("id = 00000000-0000-0000-0000-000000000000"));
    assert!(text.contains("wait = 1.5s"));
    assert!(text.contains("handler = <callable: fn(u32) -> u32>"));
    assert!(text.contains("kind = <type: u32>"));
    assert!(text.contains("when = 2024-02-29"));
    Ok(())
}

#[test]
fn test_default_property_replaces_nested_object() -> graphdump::Result<()> {
    let price = Price {
        amount: 10,
        currency: Currency {
            code: "EUR".to_string(),
            rate: 1.0,
        },
    };
    let dumper = Dumper::new();

    let text = dumper.dump(&price)?;
    assert!(text.contains("currency = \"EUR\""));
    assert!(!text.contains("rate"));

    // The root is always expanded.
    let root = dumper.dump(&price.currency)?;
    assert!(root.contains("rate = 1"));
    Ok(())
}

#[test]
fn test_access_errors_are_embedded() -> graphdump::Result<()> {
    let text = Dumper::new().dump(&Flaky)?;

    assert!(text.contains("ok = \"fine\""));
    assert!(text.contains("broken = <error: boom>"));
    assert!(text.contains("missing = <error: member 'missing' is not readable on walker_tests::Flaky>"));
    assert!(!text.contains("leaked"));
    Ok(())
}

#[test]
fn test_enumerate_custom_sequence() -> graphdump::Result<()> {
    let holder = Holder {
        listed: Bag(vec![1, 2]),
        plain: Bag(vec![3]),
    };

    let text = Dumper::new().dump(&holder)?;

    assert!(text.contains("listed = Bag[2]:\n    1\n    2"));
    assert!(text.contains("plain = Bag (walker_tests::Bag, walker_tests):\n    size = 1"));
    Ok(())
}

#[test]
fn test_member_filter() -> graphdump::Result<()> {
    let account = Account {
        owner: "ann".to_string(),
        pin: 1234,
        balance: -5,
    };
    let dumper = Dumper::new();

    let public = dumper.dump_with(&account, &DumpOptions::new().filter(MemberFilter::public_only()))?;
    assert!(public.contains("owner = \"ann\""));
    assert!(public.contains("balance = -5"));
    assert!(!public.contains("pin"));

    let fields_only = MemberFilter {
        properties: false,
        ..MemberFilter::default()
    };
    let fields = dumper.dump_with(&account, &DumpOptions::new().filter(fields_only))?;
    assert!(fields.contains("pin = 1234"));
    assert!(!fields.contains("balance"));
    Ok(())
}

#[test]
fn test_output_budget_and_indent_unit() -> graphdump::Result<()> {
    let branch = Branch {
        label: "x".to_string(),
        leaf: Leaf { value: 1 },
    };

    let tabbed = Dumper::builder().indent("\t").build().dump(&branch)?;
    assert!(tabbed.contains("\n\tlabel = \"x\""));
    assert!(tabbed.contains("\n\t\tvalue = 1"));

    let bounded = Dumper::builder().max_length(6).build().dump(&branch)?;
    assert_eq!(bounded, "Branch\n... output truncated after 6 characters");
    Ok(())
}

#[test]
fn test_dump_into_appends() -> graphdump::Result<()> {
    let mut buffer = String::from("state: ");
    Dumper::new().dump_into(&Leaf { value: 2 }, &DumpOptions::new(), &mut buffer)?;

    assert_eq!(buffer, "state: Leaf (walker_tests::Leaf, walker_tests):\n  value = 2");
    Ok(())
}
