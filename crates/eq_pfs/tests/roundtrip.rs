use miette::{IntoDiagnostic, Result};
use std::io::{Cursor, Read, Write};

use eq_pfs::{
    write::{PfsWriter, PfsWriterOptions},
    PfsArchive, PfsTable,
};
use tracing::info;
use tracing_test::traced_test;

fn build_container(files: &[(&str, &[u8])]) -> Result<Cursor<Vec<u8>>> {
    let mut writer = PfsWriter::new(Cursor::new(Vec::new()), PfsWriterOptions::builder().build());
    for (name, data) in files {
        writer.start_file(*name)?;
        writer.write_all(data).into_diagnostic()?;
    }

    let mut buffer = writer.finish()?;
    buffer.set_position(0);
    Ok(buffer)
}

#[traced_test]
#[test]
fn unmodified_table_round_trips_every_entry() -> Result<()> {
    let files: &[(&str, &[u8])] = &[
        ("ant.mod", b"model bytes"),
        ("zone.ter", b"terrain bytes"),
        ("lava001.dds", &[0u8; 9000]),
        ("readme.txt", b"Hello World"),
    ];

    let mut table = PfsTable::open(build_container(files)?)?;

    let mut encoded = table.encode(Cursor::new(Vec::new()))?;
    encoded.set_position(0);
    let reopened = PfsTable::open(encoded)?;

    assert_eq!(table.len(), reopened.len());
    for (expected, actual) in table.files().zip(reopened.files()) {
        info!("comparing {}", expected.name());
        assert_eq!(expected.name(), actual.name());
        assert_eq!(expected.data(), actual.data());
    }

    Ok(())
}

#[traced_test]
#[test]
fn edit_session_persists_only_explicit_changes() -> Result<()> {
    let files: &[(&str, &[u8])] = &[
        ("a.mod", &[1, 2, 3]),
        ("b.txt", &[52]),
        ("c.wld", &[9, 9]),
    ];

    let mut table = PfsTable::open(build_container(files)?)?;

    table.set("b.txt", vec![7, 8])?;
    table.remove("c.wld")?;

    let mut encoded = table.encode(Cursor::new(Vec::new()))?;
    encoded.set_position(0);
    let reopened = PfsTable::open(encoded)?;

    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get("a.mod")?, &[1, 2, 3]);
    assert_eq!(reopened.get("b.txt")?, &[7, 8]);
    assert!(reopened.get("c.wld").is_err());

    Ok(())
}

#[traced_test]
#[test]
fn empty_entries_keep_their_names_through_a_save_cycle() -> Result<()> {
    let mut table = PfsTable::new();
    table.set("zzz.mod", vec![])?;
    table.set("aaa.txt", vec![1, 2, 3])?;
    table.set("mmm.wld", vec![])?;

    let mut encoded = table.encode(Cursor::new(Vec::new()))?;
    encoded.set_position(0);
    let reopened = PfsTable::open(encoded)?;

    assert_eq!(reopened.len(), 3);
    assert_eq!(reopened.get("zzz.mod")?, &[] as &[u8]);
    assert_eq!(reopened.get("aaa.txt")?, &[1, 2, 3]);
    assert_eq!(reopened.get("mmm.wld")?, &[] as &[u8]);

    Ok(())
}

#[traced_test]
#[test]
fn archive_reader_streams_what_the_writer_wrote() -> Result<()> {
    let payload: Vec<u8> = (0..40_000).map(|i| (i % 199) as u8).collect();
    let container = build_container(&[("big.ter", &payload), ("tiny.txt", b"hi")])?;

    let mut archive = PfsArchive::new(container)?;
    assert_eq!(archive.len(), 2);
    assert_eq!(archive.decompressed_size(), Some(payload.len() as u128 + 2));

    let mut buffer = Vec::new();
    let mut file = archive.by_name("big.ter")?;
    assert_eq!(file.size(), payload.len() as u64);
    file.read_to_end(&mut buffer).into_diagnostic()?;
    assert_eq!(buffer, payload);

    Ok(())
}
