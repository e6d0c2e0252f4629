use rusqlite::Connection;

use super::*;
use crate::model::Entry;

const LONG_BODY: &str = "இது ஒரு சோதனை வாக்கியம் இருபது எழுத்துக்களுக்கு மேல் உள்ளது.";

fn segmenter() -> Segmenter {
    Segmenter::new().expect("segmenter should build")
}

#[test]
fn end_to_end_sample_yields_single_entry() {
    let text = format!(
        "...ஸஹீஹ் புஹாரி பாகம் 1\nஹதீஸ் : 5\n{LONG_BODY}\nஹதீஸ் : 6\nசிறிய."
    );

    let segmentation = segmenter().segment(&text, 30);

    assert_eq!(segmentation.entries.len(), 1);
    let entry = &segmentation.entries[0];
    assert_eq!(entry.number, 5);
    assert_eq!(entry.book, "பாகம் 1");
    assert_eq!(entry.chapter, "");
    assert_eq!(entry.body, LONG_BODY);
    assert_eq!(entry.resource_path, "");
    assert_eq!(segmentation.stats.markers_seen, 2);
    assert_eq!(segmentation.stats.rejected_short, 1);
}

#[test]
fn book_and_chapter_carry_forward_to_every_entry() {
    let text = format!(
        "பாகம் 3\nஅத்தியாயம் 12\nஹதீஸ் : 1\n{LONG_BODY}\nஹதீஸ் : 2\n{LONG_BODY}"
    );

    let segmentation = segmenter().segment(&text, 30);

    assert_eq!(segmentation.entries.len(), 2);
    for entry in &segmentation.entries {
        assert_eq!(entry.book, "பாகம் 3");
        assert_eq!(entry.chapter, "அத்தியாயம் 12");
    }
    assert_eq!(segmentation.state.book, "பாகம் 3");
    assert_eq!(segmentation.state.chapter, "அத்தியாயம் 12");
}

#[test]
fn entries_without_preceding_book_have_empty_labels() {
    let text = format!("ஹதீஸ் 10\n{LONG_BODY}");

    let segmentation = segmenter().segment(&text, 30);

    assert_eq!(segmentation.entries.len(), 1);
    assert_eq!(segmentation.entries[0].book, "");
    assert_eq!(segmentation.entries[0].chapter, "");
}

#[test]
fn minimum_body_length_filters_short_segments() {
    let short = "அ".repeat(9);
    let exact = "ஆ".repeat(10);
    let longer = "இ".repeat(11);
    let text = format!("ஹதீஸ் : 1\n{short}\nஹதீஸ் : 2\n{exact}\nஹதீஸ் : 3\n{longer}");

    let segmentation = segmenter().segment(&text, 10);
    let numbers = segmentation
        .entries
        .iter()
        .map(|entry| entry.number)
        .collect::<Vec<u32>>();

    assert_eq!(numbers, vec![2, 3]);
    assert_eq!(segmentation.entries[1].body, longer);
    assert_eq!(segmentation.stats.rejected_short, 1);
}

#[test]
fn every_marker_is_accepted_or_rejected_as_short() {
    let text = format!("ஹதீஸ்.99999\n{LONG_BODY}\nஹதீஸ்:12\nசிறிய.\nஹதீஸ் : 1\n{LONG_BODY}");

    let segmentation = segmenter().segment(&text, 30);
    let stats = &segmentation.stats;
    let numbers = segmentation
        .entries
        .iter()
        .map(|entry| entry.number)
        .collect::<Vec<u32>>();

    assert_eq!(numbers, vec![99999, 1]);
    assert_eq!(stats.markers_seen, 3);
    assert_eq!(stats.markers_seen, stats.entries_accepted + stats.rejected_short);
}

#[test]
fn leaked_headers_truncate_body_and_update_book_afterwards() {
    let text = format!(
        "ஹதீஸ் : 7\n{LONG_BODY}\nஸஹீஹ் புஹாரி\nபாகம் 2\nஹதீஸ் : 8\n{LONG_BODY}"
    );

    let segmentation = segmenter().segment(&text, 30);

    assert_eq!(segmentation.entries.len(), 2);
    assert_eq!(segmentation.entries[0].body, LONG_BODY);
    assert_eq!(segmentation.entries[0].book, "");
    assert_eq!(segmentation.entries[1].book, "பாகம் 2");
    assert_eq!(segmentation.stats.bodies_truncated, 1);
}

#[test]
fn duplicate_and_out_of_order_numbers_pass_through() {
    let text = format!(
        "ஹதீஸ் : 3\n{LONG_BODY}\nஹதீஸ் : 2\n{LONG_BODY}\nஹதீஸ் : 2\n{LONG_BODY}"
    );

    let segmentation = segmenter().segment(&text, 30);
    let numbers = segmentation
        .entries
        .iter()
        .map(|entry| entry.number)
        .collect::<Vec<u32>>();

    assert_eq!(numbers, vec![3, 2, 2]);
}

#[test]
fn split_spans_alternates_text_and_markers() {
    let spans = segmenter().split_spans("அ ஹதீஸ்: 1 ஆ ஹதீஸ் 22 இ");

    assert_eq!(
        spans,
        vec![
            Span::Text("அ "),
            Span::Marker("ஹதீஸ்: 1"),
            Span::Text(" ஆ "),
            Span::Marker("ஹதீஸ் 22"),
            Span::Text(" இ"),
        ]
    );
}

#[test]
fn fold_spans_starts_from_supplied_state() {
    let spans = vec![
        Span::Text(""),
        Span::Marker("ஹதீஸ் 9"),
        Span::Text(LONG_BODY),
        Span::Marker("ஹதீஸ் 10"),
    ];
    let initial = SegmentState {
        book: "பாகம் 4".to_string(),
        chapter: "அத்தியாயம் 1".to_string(),
    };

    let segmentation = segmenter().fold_spans(&spans, 30, initial.clone());

    assert_eq!(segmentation.entries.len(), 1);
    assert_eq!(segmentation.entries[0].number, 9);
    assert_eq!(segmentation.entries[0].book, "பாகம் 4");
    assert_eq!(segmentation.state, initial);
    assert_eq!(segmentation.stats.rejected_short, 1);
}

#[test]
fn heading_labels_condense_whitespace() {
    let text = format!("பாகம்\n2\nஹதீஸ் . 4\n{LONG_BODY}");

    let segmentation = segmenter().segment(&text, 30);

    assert_eq!(segmentation.entries.len(), 1);
    assert_eq!(segmentation.entries[0].number, 4);
    assert_eq!(segmentation.entries[0].book, "பாகம் 2");
}

fn sample_entry(number: u32) -> Entry {
    Entry {
        number,
        book: "பாகம் 1".to_string(),
        chapter: "அத்தியாயம் 2".to_string(),
        body: LONG_BODY.to_string(),
        resource_path: String::new(),
    }
}

#[test]
fn insert_entries_writes_every_row() {
    let mut connection = Connection::open_in_memory().expect("in-memory DB should open");
    recreate_schema(&connection).expect("schema should be created");

    let inserted = insert_entries(&mut connection, &[sample_entry(1), sample_entry(1)])
        .expect("entries should insert");
    assert_eq!(inserted, 2);

    let (number, book, audio): (i64, String, String) = connection
        .query_row(
            "SELECT hadith_number, book, audio_path FROM hadiths ORDER BY id LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .expect("row should be readable");
    assert_eq!(number, 1);
    assert_eq!(book, "பாகம் 1");
    assert_eq!(audio, "");
    assert_eq!(
        count_rows(&connection, "SELECT COUNT(*) FROM hadiths").expect("count should work"),
        2
    );
}

#[test]
fn recreate_schema_discards_previous_rows() {
    let mut connection = Connection::open_in_memory().expect("in-memory DB should open");
    recreate_schema(&connection).expect("schema should be created");
    insert_entries(&mut connection, &[sample_entry(5)]).expect("entries should insert");
    write_metadata(&connection, "abc", 1).expect("metadata should write");

    recreate_schema(&connection).expect("schema should be recreated");

    assert_eq!(
        count_rows(&connection, "SELECT COUNT(*) FROM hadiths").expect("count should work"),
        0
    );
    let version: String = connection
        .query_row(
            "SELECT value FROM metadata WHERE key = 'db_schema_version'",
            [],
            |row| row.get(0),
        )
        .expect("metadata should survive");
    assert_eq!(version, DB_SCHEMA_VERSION);
}

#[test]
fn open_database_creates_parent_directory_and_enables_wal() {
    let root = std::env::temp_dir().join(format!("hadith-open-db-{}", std::process::id()));
    let db_path = root.join("nested").join("hadith.sqlite");
    let _ = std::fs::remove_dir_all(&root);

    let connection = open_database(&db_path).expect("database should open");
    let journal_mode: String = connection
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .expect("journal mode should be readable");
    recreate_schema(&connection).expect("schema should be created");

    assert_eq!(journal_mode, "wal");
    assert!(db_path.exists());

    drop(connection);
    let _ = std::fs::remove_dir_all(&root);
}
