use std::collections::HashMap;

use super::*;
use crate::model::{
    Amendment, AmendmentStatus, ContentBlock, DiffStatus, FinalRevision, ListType, Section,
    SectionDraft, SectionRendering, TableVariant, TemporaryRevision,
};

fn default_blocks() -> ContentBlockParser {
    ContentBlockParser::new(StructureConfig::default()).expect("block parser")
}

fn section(id: &str, title: &str, level: u32, order: i64, parent: Option<&str>) -> Section {
    Section {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("{title} body."),
        level,
        order,
        parent_id: parent.map(str::to_string),
    }
}

fn amendment(section_id: &str, status: AmendmentStatus, original: &str, content: &str) -> Amendment {
    Amendment {
        amendment_id: format!("{section_id}:amendment:001"),
        manual_id: "manual".to_string(),
        section_id: section_id.to_string(),
        title: "Amended".to_string(),
        content: content.to_string(),
        original_content: original.to_string(),
        reason: "update".to_string(),
        status,
        created_by: "editor".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        quality_approved_by: None,
        quality_approved_at: None,
        authority_approved_by: None,
        authority_approved_at: None,
        rejected_by: None,
        rejected_at: None,
        rejection_reason: None,
    }
}

#[test]
fn heading_parser_splits_sections_and_keeps_body_lines() {
    let parser = HeadingParser::new().expect("heading parser");
    let text = "Preface line\n# General\nScope.\n## Definitions\n  indented\n### Terms";

    let sections = parser.parse_sections(text, "ops.md");
    let summary = sections
        .iter()
        .map(|draft| (draft.level, draft.title.as_str(), draft.content.as_str()))
        .collect::<Vec<(u32, &str, &str)>>();
    assert_eq!(
        summary,
        vec![
            (1, "Introduction", "Preface line"),
            (1, "General", "Scope."),
            (2, "Definitions", "  indented"),
            (3, "Terms", ""),
        ]
    );
}

#[test]
fn heading_parser_falls_back_without_headings() {
    let parser = HeadingParser::new().expect("heading parser");

    let sections = parser.parse_sections("plain text\nmore text", "notes.txt");
    assert_eq!(
        sections,
        vec![SectionDraft {
            level: 1,
            title: "Main Content".to_string(),
            content: "plain text\nmore text".to_string(),
        }]
    );

    let empty = parser.parse_sections("  \n ", "empty.txt");
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].title, "Introduction");
    assert_eq!(empty[0].content, "No content found in empty.txt");
}

#[test]
fn heading_parser_rejects_deep_or_bare_markers() {
    let parser = HeadingParser::new().expect("heading parser");
    assert_eq!(parser.detect_heading("###### Six"), Some((6, "Six".to_string())));
    assert_eq!(parser.detect_heading("####### Seven"), None);
    assert_eq!(parser.detect_heading("#NoSpace"), None);
}

#[test]
fn parsing_and_numbering_are_idempotent() {
    let parser = HeadingParser::new().expect("heading parser");
    let text = "# A\nalpha\n## A.1\nbeta\n# B\ngamma";

    let first = parser.parse_sections(text, "doc");
    let second = parser.parse_sections(text, "doc");
    assert_eq!(first, second);

    let levels = first.iter().map(|draft| draft.level).collect::<Vec<u32>>();
    assert_eq!(number_sections(&levels), number_sections(&levels));
}

#[test]
fn link_sections_assigns_parents_from_preceding_levels() {
    let drafts = [(1, "A"), (2, "A.1"), (3, "A.1.a"), (2, "A.2"), (1, "B"), (3, "B.x")]
        .into_iter()
        .map(|(level, title)| SectionDraft {
            level,
            title: title.to_string(),
            content: String::new(),
        })
        .collect::<Vec<SectionDraft>>();

    let sections = link_sections("m", &drafts);
    let parents = sections
        .iter()
        .map(|section| section.parent_id.as_deref())
        .collect::<Vec<Option<&str>>>();
    assert_eq!(
        parents,
        vec![
            None,
            Some("m:section:0001"),
            Some("m:section:0002"),
            Some("m:section:0001"),
            None,
            Some("m:section:0004"),
        ]
    );
    assert_eq!(sections[3].order, 3);
}

#[test]
fn level_jump_without_direct_parent_becomes_root() {
    let drafts = [(1, "A"), (3, "A.x"), (2, "A.1"), (3, "A.1.a")]
        .into_iter()
        .map(|(level, title)| SectionDraft {
            level,
            title: title.to_string(),
            content: String::new(),
        })
        .collect::<Vec<SectionDraft>>();

    let sections = link_sections("m", &drafts);
    assert_eq!(sections[1].parent_id, None);
    assert_eq!(sections[2].parent_id.as_deref(), Some("m:section:0001"));
    assert_eq!(sections[3].parent_id.as_deref(), Some("m:section:0003"));
}

#[test]
fn numbering_uses_zero_based_top_level_sections() {
    assert_eq!(
        number_sections(&[1, 2, 1]),
        vec!["Section 0", "0.1", "Section 1"]
    );
    assert_eq!(
        number_sections(&[1, 2, 3, 2, 1, 2]),
        vec!["Section 0", "0.1", "0.1.1", "0.2", "Section 1", "1.1"]
    );
}

#[test]
fn numbering_skipped_level_leaves_zero_counter() {
    assert_eq!(number_sections(&[1, 3, 2]), vec!["Section 0", "0.0.1", "0.1"]);
}

#[test]
fn numbering_clamps_levels_and_tolerates_missing_parent() {
    assert_eq!(number_sections(&[2]), vec!["-1.1"]);
    assert_eq!(number_sections(&[0, 9]), vec!["Section 0", "0.0.0.0.0.1"]);
}

#[test]
fn list_detector_classifies_marker_families() {
    let lists = ListDetector::new(StructureConfig::default()).expect("list detector");

    let numeric = lists.detect(&["1. First", "2. Second"]).expect("numeric");
    assert_eq!(numeric.list_type, ListType::Numeric);
    let numbers = numeric
        .items
        .iter()
        .map(|item| (item.number.as_str(), item.content.as_str()))
        .collect::<Vec<(&str, &str)>>();
    assert_eq!(numbers, vec![("1", "First"), ("2", "Second")]);

    let star = lists.detect(&["* one", "* two"]).expect("star");
    assert_eq!(star.list_type, ListType::Star);
    assert_eq!(star.items[0].number, "a");
    assert_eq!(star.items[1].number, "b");
    assert_eq!(star.items[1].content, "two");

    let alpha = lists.detect(&["a. apples", "b. pears"]).expect("alphabetic");
    assert_eq!(alpha.list_type, ListType::Alphabetic);

    let roman = lists.detect(&["ii. second", "iii. third"]).expect("roman");
    assert_eq!(roman.list_type, ListType::Roman);
    assert_eq!(roman.items[0].number, "ii");

    assert!(lists.detect(&["1. alone"]).is_none());
    assert!(lists.detect(&["a. apples", "ii. second"]).is_none());
}

#[test]
fn mixed_group_with_numeric_item_is_numeric_list() {
    let lists = ListDetector::new(StructureConfig::default()).expect("list detector");

    let list = lists.detect(&["1. First", "2 Second"]).expect("mixed list");
    assert_eq!(list.list_type, ListType::Numeric);
    let items = list
        .items
        .iter()
        .map(|item| (item.number.as_str(), item.content.as_str()))
        .collect::<Vec<(&str, &str)>>();
    assert_eq!(items, vec![("1", "First"), ("2", "2 Second")]);

    let list = lists
        .detect(&["1. Intro", "a. sub one", "b. sub two"])
        .expect("numeric with lettered lines");
    assert_eq!(list.list_type, ListType::Numeric);
    let items = list
        .items
        .iter()
        .map(|item| (item.number.as_str(), item.content.as_str()))
        .collect::<Vec<(&str, &str)>>();
    assert_eq!(
        items,
        vec![("1", "Intro"), ("2", "a. sub one"), ("3", "b. sub two")]
    );
}

#[test]
fn degenerate_numeric_list_is_renumbered() {
    let lists = ListDetector::new(StructureConfig::default()).expect("list detector");
    let list = lists
        .detect(&["1. first", "1. second", "1. third"])
        .expect("degenerate list");

    assert_eq!(list.list_type, ListType::Numeric);
    let numbers = list
        .items
        .iter()
        .map(|item| item.number.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(numbers, vec!["1", "2", "3"]);
    assert_eq!(list.items[2].content, "third");
}

#[test]
fn numeric_items_collect_star_sub_items() {
    let lists = ListDetector::new(StructureConfig::default()).expect("list detector");
    let list = lists
        .detect(&["1. Preflight", "* fuel", "* oil", "2. Taxi", "3. Takeoff", "* flaps"])
        .expect("nested list");

    assert_eq!(list.list_type, ListType::Numeric);
    assert_eq!(list.items.len(), 3);
    assert_eq!(list.items[0].sub_items.len(), 2);
    assert_eq!(list.items[0].sub_items[1].number, "b");
    assert_eq!(list.items[0].sub_items[1].content, "oil");
    assert!(list.items[1].sub_items.is_empty());
    assert!(list.items[2].sub_items.is_empty());
}

#[test]
fn configured_marker_phrase_switches_star_list_to_roman() {
    let config = StructureConfig {
        roman_marker_phrases: vec!["Following Conditions".to_string()],
    };
    let lists = ListDetector::new(config).expect("list detector");

    let list = lists
        .detect(&["* the following conditions apply", "* daylight", "* visual"])
        .expect("star list");
    assert_eq!(list.list_type, ListType::Star);
    let numbers = list
        .items
        .iter()
        .map(|item| item.number.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(numbers, vec!["i", "ii", "iii"]);
}

#[test]
fn generic_table_takes_short_first_row_as_header() {
    let tables = TableDetector::new().expect("table detector");
    let grid = tables.detect("Name|Age\nAlice|30\nBob|40").expect("table");

    assert_eq!(grid.variant, TableVariant::Generic);
    assert_eq!(
        grid.header,
        Some(vec!["Name".to_string(), "Age".to_string()])
    );
    assert_eq!(grid.rows.len(), 2);
    assert_eq!(grid.rows[1], vec!["Bob".to_string(), "40".to_string()]);
}

#[test]
fn markdown_table_drops_outer_pipes_and_alignment_row() {
    let tables = TableDetector::new().expect("table detector");
    let grid = tables
        .detect("| Item | Limit |\n| --- | :---: |\n| Wind | 25 kt |\n| Gust |")
        .expect("table");

    assert!(grid.rows.iter().all(|row| row.len() == 2));
    assert_eq!(
        grid.header,
        Some(vec!["Item".to_string(), "Limit".to_string()])
    );
    assert_eq!(grid.rows[1], vec!["Gust".to_string(), String::new()]);
}

#[test]
fn tab_separated_rows_without_header() {
    let tables = TableDetector::new().expect("table detector");
    let grid = tables
        .detect("a very long descriptive cell value\t1\nshort\t2")
        .expect("table");

    assert!(!grid.has_header());
    assert_eq!(grid.rows.len(), 2);
}

#[test]
fn abbreviation_table_is_recognized_before_generic() {
    let tables = TableDetector::new().expect("table detector");
    let grid = tables
        .detect("ATC Air Traffic Control\nPIC Pilot In Command")
        .expect("abbreviation table");

    assert_eq!(grid.variant, TableVariant::Abbreviation);
    assert_eq!(
        grid.header,
        Some(vec!["Abbreviation".to_string(), "Definition".to_string()])
    );
    assert_eq!(
        grid.rows,
        vec![
            vec!["ATC".to_string(), "Air Traffic Control".to_string()],
            vec!["PIC".to_string(), "Pilot In Command".to_string()],
        ]
    );
}

#[test]
fn abbreviation_rows_fall_back_to_inner_code_or_whole_line() {
    let tables = TableDetector::new().expect("table detector");
    let grid = tables
        .render_abbreviation_table(&["ATC Air Traffic Control", "Contact the TWR tower", "see above"])
        .expect("abbreviation table");

    assert_eq!(
        grid.rows,
        vec![
            vec!["ATC".to_string(), "Air Traffic Control".to_string()],
            vec!["TWR".to_string(), "tower".to_string()],
            vec!["see above".to_string(), String::new()],
        ]
    );
}

#[test]
fn abbreviation_glossary_tolerates_minority_of_prose_lines() {
    let tables = TableDetector::new().expect("table detector");
    let grid = tables
        .detect(
            "ATC Air Traffic Control\nPIC Pilot In Command\nVFR Visual Flight Rules\nIFR Instrument Flight Rules\nContact the TWR tower",
        )
        .expect("abbreviation table");

    assert_eq!(grid.variant, TableVariant::Abbreviation);
    assert_eq!(grid.rows.len(), 5);
    assert_eq!(grid.rows[4], vec!["TWR".to_string(), "tower".to_string()]);
}

#[test]
fn single_line_is_never_a_table() {
    let tables = TableDetector::new().expect("table detector");
    assert!(tables.detect("ATC Air Traffic Control").is_none());
    assert!(tables.detect("one|two").is_none());
}

#[test]
fn block_parser_mixes_paragraphs_lists_and_tables() {
    let blocks = default_blocks().parse(
        "Intro paragraph.\n\n1. First\n2. Second\n\nName|Age\nAlice|30\nClosing words.",
    );

    assert_eq!(blocks.len(), 4);
    assert!(matches!(&blocks[0], ContentBlock::Paragraph { text } if text == "Intro paragraph."));
    assert!(matches!(&blocks[1], ContentBlock::List(list) if list.items.len() == 2));
    assert!(matches!(&blocks[2], ContentBlock::Table(grid) if grid.rows.len() == 1));
    assert!(matches!(&blocks[3], ContentBlock::Paragraph { text } if text == "Closing words."));
}

#[test]
fn blank_line_splits_list_into_two_blocks() {
    let blocks = default_blocks().parse("1. First\n2. Second\n\n3. Third\n4. Fourth");

    assert_eq!(blocks.len(), 2);
    let ContentBlock::List(second) = &blocks[1] else {
        panic!("expected list block, got {:?}", blocks[1]);
    };
    let numbers = second
        .items
        .iter()
        .map(|item| item.number.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(numbers, vec!["3", "4"]);
    assert!(matches!(&blocks[0], ContentBlock::List(first) if first.items.len() == 2));
}

#[test]
fn block_parser_degrades_lone_list_line_to_paragraph() {
    let blocks = default_blocks().parse("1. Only item\n\nText");
    assert_eq!(
        blocks,
        vec![
            ContentBlock::Paragraph {
                text: "1. Only item".to_string()
            },
            ContentBlock::Paragraph {
                text: "Text".to_string()
            },
        ]
    );
}

#[test]
fn paragraph_changes_flag_edits_and_length_mismatch() {
    let differ = AmendmentDiffer::new().expect("differ");

    assert_eq!(differ.paragraph_changes("A\n\nB", "A\n\nC"), vec![false, true]);
    assert_eq!(
        differ.paragraph_changes("A\n\nB", "A\n  \nB\n\nD"),
        vec![false, false, true]
    );
    assert_eq!(differ.paragraph_changes("A\n\nB\n\nC", "A"), vec![false, true, true]);
    assert_eq!(differ.paragraph_changes(" A ", "A"), vec![false]);

    let diff = differ.diff("", "A");
    assert!(diff.paragraph_changed.is_empty());
    assert!(diff.word_diff.is_empty());
}

#[test]
fn word_diff_reconstructs_both_sides() {
    let original = "The pilot shall check fuel before departure.";
    let proposed = "The captain shall check fuel and oil before departure.";
    let spans = word_diff(original, proposed);

    let rebuilt_original = spans
        .iter()
        .filter(|span| span.status != DiffStatus::Added)
        .map(|span| span.text.as_str())
        .collect::<String>();
    let rebuilt_proposed = spans
        .iter()
        .filter(|span| span.status != DiffStatus::Removed)
        .map(|span| span.text.as_str())
        .collect::<String>();

    assert_eq!(rebuilt_original, original);
    assert_eq!(rebuilt_proposed, proposed);
    assert!(
        spans
            .iter()
            .any(|span| span.status == DiffStatus::Removed && span.text.contains("pilot"))
    );
    assert!(
        spans
            .windows(2)
            .all(|pair| pair[0].status != pair[1].status)
    );
}

#[test]
fn assembler_renders_plain_and_diffed_sections() {
    let mut assembler = ManualAssembler::new(StructureConfig::default()).expect("assembler");

    let plain = assembler.render_section("s1", "Body text.", None);
    assert!(matches!(plain, SectionRendering::Plain { ref blocks } if blocks.len() == 1));

    let empty = assembler.render_section("s2", "   ", None);
    assert!(matches!(
        empty,
        SectionRendering::Plain { ref blocks }
            if blocks == &vec![ContentBlock::Paragraph {
                text: "No content available for this section.".to_string()
            }]
    ));

    let diffed = assembler.render_section("s1", "Body text.\n\nNew paragraph.", Some("Body text."));
    match diffed {
        SectionRendering::Diffed { paragraphs, diff } => {
            assert_eq!(paragraphs.len(), 2);
            assert!(!paragraphs[0].changed);
            assert!(paragraphs[1].changed);
            assert_eq!(diff.changed_paragraph_count(), 1);
        }
        other => panic!("expected diffed rendering, got {other:?}"),
    }

    assert!(assembler.cache().hits() >= 1);
}

#[test]
fn assembler_builds_numbered_tree_with_amendment_override() {
    let sections = vec![
        section("m:1", "General", 1, 0, None),
        section("m:2", "Scope", 2, 1, Some("m:1")),
        section("m:3", "Limits", 1, 2, None),
        section("m:4", "Orphan", 2, 3, Some("missing")),
    ];
    let mut amendments = HashMap::new();
    amendments.insert(
        "m:2".to_string(),
        amendment("m:2", AmendmentStatus::Pending, "Scope body.", "Scope body revised."),
    );

    let mut assembler = ManualAssembler::new(StructureConfig::default()).expect("assembler");
    let view = assembler.assemble(&sections, &amendments);

    let numbers = view
        .sections
        .iter()
        .map(|section| section.number.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(numbers, vec!["Section 0", "0.1", "Section 1", "1.1"]);
    assert!(matches!(
        view.sections[1].rendering,
        SectionRendering::Diffed { .. }
    ));
    assert_eq!(
        view.sections[1].amendment_status,
        Some(AmendmentStatus::Pending)
    );

    assert_eq!(view.tree.len(), 3);
    assert_eq!(view.tree[0].children.len(), 1);
    assert_eq!(view.tree[0].children[0].section_id, "m:2");
    assert_eq!(view.tree[2].section_id, "m:4");
}

#[test]
fn print_document_highlights_unapproved_temporary_revisions() {
    let sections = vec![
        section("m:1", "General", 1, 0, None),
        section("m:2", "Scope", 2, 1, Some("m:1")),
        section("m:3", "Record of Temporary Revisions", 1, 2, None),
        section("m:4", "Record of Revisions", 1, 3, None),
    ];
    let mut amendments = HashMap::new();
    amendments.insert(
        "m:1".to_string(),
        amendment("m:1", AmendmentStatus::Approved, "General body.", "General body v2."),
    );

    let temporary = ["m:1", "m:2"]
        .iter()
        .enumerate()
        .map(|(index, section_id)| TemporaryRevision {
            revision_id: format!("tr-{index}"),
            manual_id: "manual".to_string(),
            section_id: section_id.to_string(),
            revision_number: format!("TR-{}", index + 1),
            description: "interim change".to_string(),
            date_issued: "2024-02-01T10:00:00Z".to_string(),
            effective_date: "2024-02-02".to_string(),
            expiry_date: None,
            issued_by: "ops".to_string(),
        })
        .collect::<Vec<TemporaryRevision>>();
    let records = RevisionRecords {
        temporary,
        final_revisions: vec![FinalRevision {
            revision_id: "rev-1".to_string(),
            manual_id: "manual".to_string(),
            issue_no: "3".to_string(),
            revision_no: "1".to_string(),
            revision_date: "2024-03-01T08:30:00Z".to_string(),
            affected_pages: "0.1".to_string(),
            reason: "clarify".to_string(),
            date_inserted: "2024-03-02T08:30:00Z".to_string(),
            inserted_by: "authority".to_string(),
        }],
    };

    let mut assembler = ManualAssembler::new(StructureConfig::default()).expect("assembler");
    let document = PrintAssembler::new(PrintHeader::default()).build(
        &mut assembler,
        &sections,
        &amendments,
        &records,
    );

    assert_eq!(document.footer, "NOT CONTROLLED ONCE PRINTED");
    assert_eq!(document.entries[0].heading, "Section 0 GENERAL");
    assert_eq!(document.entries[1].heading, "0.1 Scope");

    let highlighted = document
        .entries
        .iter()
        .map(|entry| entry.highlighted)
        .collect::<Vec<bool>>();
    assert_eq!(highlighted, vec![false, true, false, false]);

    match &document.entries[2].body {
        PrintEntryBody::TemporaryRevisionRecord { table, .. } => {
            assert_eq!(table.rows.len(), 2);
            assert_eq!(table.rows[1][1], "Scope");
            assert_eq!(table.rows[0][3], "2024-02-01");
        }
        other => panic!("expected temporary revision record, got {other:?}"),
    }

    match &document.entries[3].body {
        PrintEntryBody::RevisionRecord { table, .. } => {
            assert_eq!(table.rows.len(), 1);
            assert_eq!(table.rows[0][2], "2024-03-01");
            assert_eq!(table.rows[0][3], "0.1");
        }
        other => panic!("expected revision record, got {other:?}"),
    }
}

#[test]
fn structure_config_matches_phrases_case_insensitively() {
    let config = StructureConfig {
        roman_marker_phrases: vec!["  ".to_string(), "Subject To".to_string()],
    };
    assert!(config.has_roman_marker("* approval subject to review"));
    assert!(!config.has_roman_marker("* approval pending"));
    assert!(!StructureConfig::default().has_roman_marker("subject to"));
}
