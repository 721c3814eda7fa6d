#![allow(missing_docs)]

use graphdump::{Dumpable, Dumper, ProcedureInspector, Step};

#[derive(Dumpable)]
struct Item {
    name: String,
    #[dump(nulls = "skip", order = -1)]
    note: Option<String>,
    #[dump(display)]
    code: u32,
}

#[derive(Dumpable)]
struct Basket {
    items: Vec<Item>,
    #[dump(label = "owner: ")]
    owner: String,
}

fn basket() -> Basket {
    Basket {
        items: vec![
            Item {
                name: "a".to_string(),
                note: None,
                code: 1,
            },
            Item {
                name: "b".to_string(),
                note: Some("fragile".to_string()),
                code: 2,
            },
        ],
        owner: "ann".to_string(),
    }
}

#[test]
fn test_report_lists_procedures() -> graphdump::Result<()> {
    let dumper = Dumper::new();
    dumper.dump(&basket())?;

    let report = ProcedureInspector::inspect(&dumper);

    assert_eq!(report.procedure_count, 2);
    assert_eq!(report.installs, 2);
    assert_eq!(report.building, 0);
    assert!(report.resolved_types >= 2);

    let basket = &report.procedures[0];
    assert!(basket.type_name.ends_with("Basket"));
    assert!(!basket.has_metadata);
    let labels: Vec<&str> = basket.members.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, ["items = ", "owner: "]);

    let item = &report.procedures[1];
    assert!(item.type_name.ends_with("Item"));
    let names: Vec<&str> = item.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["code", "name", "note"]);
    assert_eq!(item.members[0].renderer, "display");
    assert!(item.members[2].skip_null);
    assert_eq!(item.members[2].order, -1);
    assert_eq!(item.step_count, item.steps.len());
    Ok(())
}

#[test]
fn test_step_listing() -> graphdump::Result<()> {
    let dumper = Dumper::new();
    dumper.dump(&basket())?;

    let procedures = dumper.cache().snapshot();
    let item = procedures
        .iter()
        .find(|p| p.key().type_name().ends_with("Item"))
        .expect("item procedure");

    assert_eq!(
        item.steps(),
        [
            Step::WriteHeader,
            Step::Indent,
            Step::EnterLevel(0),
            Step::Read(0),
            Step::Label(0),
            Step::Render(0),
            Step::Read(1),
            Step::Label(1),
            Step::Render(1),
            Step::EnterLevel(0),
            Step::Read(2),
            Step::SkipIfNull {
                member: 2,
                resume_at: 14
            },
            Step::Label(2),
            Step::Render(2),
            Step::Outdent,
        ]
    );
    assert_eq!(item.member_count(), 3);
    assert!(item.header().starts_with("Item ("));
    assert_eq!(item.labels().collect::<Vec<_>>(), ["code = ", "name = ", "note = "]);
    Ok(())
}

#[test]
fn test_report_serializes() -> graphdump::Result<()> {
    let dumper = Dumper::new();
    dumper.dump(&basket())?;

    let report = ProcedureInspector::inspect(&dumper);
    let json = serde_json::to_value(&report).expect("report serializes");

    assert_eq!(json["procedure_count"], 2);
    assert_eq!(json["procedures"][1]["members"][2]["name"], "note");
    assert!(json["procedures"][0]["steps"][0] == "header");
    Ok(())
}

#[test]
fn test_report_display() -> graphdump::Result<()> {
    let dumper = Dumper::new();
    dumper.dump(&basket())?;

    let text = ProcedureInspector::inspect(&dumper).to_string();

    assert!(text.starts_with("=== GRAPHDUMP CACHE REPORT ==="));
    assert!(text.contains("Procedures: 2 | Building: 0 | Installs: 2"));
    assert!(text.contains("├── inspector_tests::Basket (10 steps)"));
    assert!(text.contains("└── inspector_tests::Item (15 steps)"));
    assert!(text.contains("└── note [order -1, value, skip nulls] from inspector_tests::Item"));
    Ok(())
}

#[test]
fn test_empty_report() {
    let report = ProcedureInspector::inspect(&Dumper::new());

    assert_eq!(report.procedure_count, 0);
    assert!(report.procedures.is_empty());
    assert!(report.to_string().contains("[PROCEDURES]"));
}
