use array_meta::{consolidate_metadata, Array, Datatype, Mode, METADATA_FOLDER};
use std::path::Path;
use test_log::test;

mod common;
use common::{f32_payload, next_millisecond, put_i32, read_i32};

fn fragment_count(path: &Path) -> usize {
    std::fs::read_dir(path.join(METADATA_FOLDER))
        .map(|dir| dir.count())
        .unwrap_or(0)
}

#[test]
fn meta_consolidate_three_fragments() -> array_meta::Result<()> {
    let folder = tempfile::tempdir()?;
    let mut array = Array::new(folder.path());

    array.open(Mode::Write)?;
    put_i32(&mut array, "aaa", 5)?;
    array.put_metadata("bb", Datatype::Float32, 2, &f32_payload(&[1.1, 1.2]))?;
    array.close()?;

    next_millisecond();

    array.open(Mode::Write)?;
    array.delete_metadata("aaa")?;
    put_i32(&mut array, "cccc", 10)?;
    array.close()?;

    next_millisecond();

    array.open(Mode::Write)?;
    put_i32(&mut array, "d", 50)?;
    array.close()?;

    assert_eq!(3, fragment_count(folder.path()));

    array.open(Mode::Read)?;
    assert_eq!(3, array.metadata_num()?);
    array.close()?;

    consolidate_metadata(&array_meta::vfs::StdVfs, folder.path())?;
    assert_eq!(1, fragment_count(folder.path()));

    array.open(Mode::Read)?;
    assert_eq!(3, array.metadata_num()?);
    assert!(array.metadata("aaa")?.is_none());
    assert_eq!(10, read_i32(array.metadata("cccc")?.unwrap()));
    assert_eq!(50, read_i32(array.metadata("d")?.unwrap()));

    let (key, _) = array.metadata_at_index(0)?;
    assert_eq!(*key, "bb");

    array.close()?;
    Ok(())
}

#[test]
fn meta_consolidate_is_idempotent() -> array_meta::Result<()> {
    let folder = tempfile::tempdir()?;
    let mut array = Array::new(folder.path());

    array.open(Mode::Write)?;
    put_i32(&mut array, "b", 1)?;
    put_i32(&mut array, "a", 2)?;
    array.close()?;

    next_millisecond();

    array.open(Mode::Write)?;
    put_i32(&mut array, "c", 3)?;
    array.close()?;

    consolidate_metadata(&array_meta::vfs::StdVfs, folder.path())?;

    array.open(Mode::Read)?;
    let num = array.metadata_num()?;
    let keys: Vec<_> = (0..num)
        .map(|i| array.metadata_at_index(i).map(|(key, _)| key.clone()))
        .collect::<array_meta::Result<_>>()?;
    array.close()?;

    next_millisecond();
    consolidate_metadata(&array_meta::vfs::StdVfs, folder.path())?;
    assert_eq!(1, fragment_count(folder.path()));

    array.open(Mode::Read)?;
    assert_eq!(num, array.metadata_num()?);
    for (i, key) in keys.iter().enumerate() {
        let (enumerated, _) = array.metadata_at_index(i as u64)?;
        assert_eq!(enumerated, key);
    }
    array.close()?;

    Ok(())
}

#[test]
fn meta_consolidate_survives_later_writes() -> array_meta::Result<()> {
    let folder = tempfile::tempdir()?;
    let mut array = Array::new(folder.path());

    array.open(Mode::Write)?;
    put_i32(&mut array, "a", 1)?;
    array.close()?;

    next_millisecond();
    consolidate_metadata(&array_meta::vfs::StdVfs, folder.path())?;
    next_millisecond();

    array.open(Mode::Write)?;
    put_i32(&mut array, "a", 2)?;
    put_i32(&mut array, "b", 3)?;
    array.close()?;

    array.open(Mode::Read)?;
    assert_eq!(2, array.metadata_num()?);
    assert_eq!(2, read_i32(array.metadata("a")?.unwrap()));
    array.close()?;

    Ok(())
}
