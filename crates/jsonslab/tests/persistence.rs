#![allow(missing_docs)]
#![cfg(feature = "std")]

use std::io::Write;

use jsonslab::{Document, LayoutError, ParseOptions, persist};

const INPUT: &[u8] = br#"{"a": [1, true], "b": null, "c": {"d": "e\"f"}}"#;

#[test]
fn parts_survive_a_round_trip_through_bytes() {
    let doc = Document::parse(INPUT).unwrap();
    let (compacted, table) = doc.clone().into_parts();

    let stored_table = persist::encode_table(&table);
    assert_eq!(stored_table.len(), table.len() * 4);

    let reloaded =
        Document::from_parts(compacted, persist::decode_table(&stored_table).unwrap()).unwrap();
    assert_eq!(reloaded, doc);

    let d = reloaded.root_node().get("c").unwrap().unwrap().get("d").unwrap().unwrap();
    assert_eq!(d.string().unwrap(), "e\"f");
}

#[test]
fn truncated_table_bytes_are_rejected() {
    let doc = Document::parse(INPUT).unwrap();
    let bytes = persist::encode_table(doc.table());
    assert_eq!(
        persist::decode_table(&bytes[..bytes.len() - 1]),
        Err(LayoutError::MisalignedBytes(bytes.len() - 1))
    );
}

#[test]
fn odd_tables_are_rejected() {
    let (compacted, mut table) = Document::parse(INPUT).unwrap().into_parts();
    table.pop();
    let len = table.len();
    assert_eq!(
        Document::from_parts(compacted, table),
        Err(LayoutError::OddTableLength(len))
    );
}

#[test]
fn file_and_reader_entry_points_agree() {
    let path = std::env::temp_dir().join(format!("jsonslab-{}.json", std::process::id()));
    std::fs::File::create(&path)
        .and_then(|mut file| file.write_all(INPUT))
        .unwrap();

    let from_file = Document::open(&path).unwrap();
    let from_reader = Document::from_reader(
        std::fs::File::open(&path).unwrap(),
        INPUT.len(),
        &ParseOptions::default(),
    )
    .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(from_file, Document::parse(INPUT).unwrap());
    assert_eq!(from_reader, from_file);
}
