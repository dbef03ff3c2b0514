use super::*;
use crate::model::{AmendmentStatus, SectionDraft};

fn draft(level: u32, title: &str, content: &str) -> SectionDraft {
    SectionDraft {
        level,
        title: title.to_string(),
        content: content.to_string(),
    }
}

fn seeded_store() -> (Store, String) {
    let mut store = Store::open_in_memory().expect("open in-memory store");
    let manual_id = store
        .insert_manual(
            "Operations Manual",
            "3",
            "ops.md",
            "0123456789abcdef",
            &[
                draft(1, "General", "Scope of the manual."),
                draft(2, "Definitions", "Original definitions.\n\nSecond paragraph."),
                draft(1, "Record of Revisions", ""),
            ],
            None,
        )
        .expect("insert manual");
    (store, manual_id)
}

#[test]
fn schema_records_version() {
    let store = Store::open_in_memory().expect("open in-memory store");
    assert_eq!(
        store.schema_version().expect("schema version").as_deref(),
        Some(DB_SCHEMA_VERSION)
    );
    assert_eq!(store.count_rows("manuals").expect("count"), 0);
}

#[test]
fn insert_manual_links_sections_in_document_order() {
    let (store, manual_id) = seeded_store();
    assert_eq!(manual_id, "manual-0001-01234567");

    let manual = store.load_manual(&manual_id).expect("load manual");
    assert_eq!(manual.title, "Operations Manual");
    assert!(!manual.is_obsolete);

    let sections = store.load_sections(&manual_id).expect("load sections");
    let titles = sections
        .iter()
        .map(|section| section.title.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(titles, vec!["General", "Definitions", "Record of Revisions"]);
    assert_eq!(sections[1].parent_id.as_deref(), Some(sections[0].id.as_str()));
    assert_eq!(sections[2].parent_id, None);
    assert_eq!(store.list_manuals().expect("list manuals").len(), 1);
}

#[test]
fn superseding_import_marks_previous_manual_obsolete() {
    let (mut store, manual_id) = seeded_store();
    let replacement = store
        .insert_manual(
            "Operations Manual",
            "4",
            "ops-v4.md",
            "fedcba9876543210",
            &[draft(1, "General", "Revised scope.")],
            Some(&manual_id),
        )
        .expect("insert replacement");

    assert!(store.load_manual(&manual_id).expect("load old").is_obsolete);
    assert!(!store.load_manual(&replacement).expect("load new").is_obsolete);
}

#[test]
fn missing_superseded_manual_rolls_back_import() {
    let (mut store, _) = seeded_store();
    let err = store
        .insert_manual(
            "Other Manual",
            "1",
            "other.md",
            "aaaaaaaaaaaaaaaa",
            &[draft(1, "Only", "Body.")],
            Some("manual-missing"),
        )
        .expect_err("unknown superseded manual");

    assert!(err.to_string().contains("manual-missing"));
    assert_eq!(store.count_rows("manuals").expect("count manuals"), 1);
    assert_eq!(store.count_rows("sections").expect("count sections"), 3);
}

#[test]
fn load_manual_reports_missing_id() {
    let store = Store::open_in_memory().expect("open in-memory store");
    let err = store.load_manual("manual-9999").expect_err("missing manual");
    assert!(err.to_string().contains("manual-9999"));
}

#[test]
fn amendment_workflow_records_final_revision() {
    let (mut store, manual_id) = seeded_store();
    let sections = store.load_sections(&manual_id).expect("load sections");
    let section_id = sections[1].id.clone();

    let proposed = store
        .propose_amendment(&section_id, "Updated definitions.", "clarify terms", "editor")
        .expect("propose");
    assert_eq!(proposed.status, AmendmentStatus::Pending);
    assert_eq!(
        proposed.original_content,
        "Original definitions.\n\nSecond paragraph."
    );

    let quality = store
        .approve_quality(&proposed.amendment_id, "qa")
        .expect("quality approval");
    assert_eq!(quality.status, AmendmentStatus::Quality);
    assert_eq!(quality.quality_approved_by.as_deref(), Some("qa"));

    let approved = store
        .approve_authority(&proposed.amendment_id, "authority")
        .expect("authority approval");
    assert_eq!(approved.status, AmendmentStatus::Approved);

    let revisions = store.list_final_revisions(&manual_id).expect("final revisions");
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].revision_no, "1");
    assert_eq!(revisions[0].issue_no, "3");
    assert_eq!(revisions[0].affected_pages, "0.1");
    assert_eq!(revisions[0].reason, "clarify terms");
    assert_eq!(revisions[0].inserted_by, "authority");
}

#[test]
fn invalid_transitions_name_current_status() {
    let (mut store, manual_id) = seeded_store();
    let sections = store.load_sections(&manual_id).expect("load sections");
    let amendment = store
        .propose_amendment(&sections[0].id, "New scope.", "scope", "editor")
        .expect("propose");

    let err = store
        .approve_authority(&amendment.amendment_id, "authority")
        .expect_err("authority approval before quality");
    assert!(err.to_string().contains("pending"));

    store
        .reject(&amendment.amendment_id, "qa", "not needed")
        .expect("reject");
    let err = store
        .approve_quality(&amendment.amendment_id, "qa")
        .expect_err("quality approval after rejection");
    assert!(err.to_string().contains("rejected"));

    let err = store
        .review_amendment(
            &amendment.amendment_id,
            &ReviewAction::Reject {
                reason: "again".to_string(),
            },
            "qa",
        )
        .expect_err("second rejection");
    assert!(err.to_string().contains("rejected"));
}

#[test]
fn open_amendment_blocks_new_proposal() {
    let (store, manual_id) = seeded_store();
    let sections = store.load_sections(&manual_id).expect("load sections");
    store
        .propose_amendment(&sections[0].id, "First.", "one", "editor")
        .expect("first proposal");

    let err = store
        .propose_amendment(&sections[0].id, "Second.", "two", "editor")
        .expect_err("second proposal while open");
    assert!(err.to_string().contains("open amendment"));
}

#[test]
fn effective_amendments_skip_rejected_and_chain_approved_content() {
    let (mut store, manual_id) = seeded_store();
    let sections = store.load_sections(&manual_id).expect("load sections");
    let section_id = sections[0].id.clone();

    let first = store
        .propose_amendment(&section_id, "Approved scope.", "update", "editor")
        .expect("propose");
    store.approve_quality(&first.amendment_id, "qa").expect("quality");
    store
        .approve_authority(&first.amendment_id, "authority")
        .expect("authority");

    let second = store
        .propose_amendment(&section_id, "Rejected scope.", "update", "editor")
        .expect("second proposal");
    assert_eq!(second.original_content, "Approved scope.");
    store
        .reject(&second.amendment_id, "qa", "wrong")
        .expect("reject");

    let effective = store.effective_amendments(&manual_id).expect("effective");
    assert_eq!(effective.len(), 1);
    assert_eq!(effective[&section_id].amendment_id, first.amendment_id);
    assert_eq!(effective[&section_id].content, "Approved scope.");
}

#[test]
fn temporary_revisions_are_listed_per_manual() {
    let (store, manual_id) = seeded_store();
    let sections = store.load_sections(&manual_id).expect("load sections");

    let stored = store
        .insert_temporary_revision(NewTemporaryRevision {
            section_id: sections[1].id.clone(),
            revision_number: "TR-1".to_string(),
            description: "Interim definitions".to_string(),
            date_issued: "2024-01-05".to_string(),
            effective_date: "2024-01-06".to_string(),
            expiry_date: None,
            issued_by: "ops".to_string(),
        })
        .expect("insert temporary revision");
    assert_eq!(stored.manual_id, manual_id);

    let listed = store
        .list_temporary_revisions(&manual_id)
        .expect("list temporary revisions");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].revision_number, "TR-1");
    assert_eq!(listed[0].expiry_date, None);
}
