use array_meta::{Array, Datatype, Mode};
use test_log::test;

mod common;
use common::{f32_payload, next_millisecond, put_i32, read_f32s};

#[test]
fn meta_delete_and_ghost_delete() -> array_meta::Result<()> {
    let folder = tempfile::tempdir()?;
    let mut array = Array::new(folder.path());

    array.open(Mode::Write)?;
    put_i32(&mut array, "aaa", 5)?;
    array.put_metadata("bb", Datatype::Float32, 2, &f32_payload(&[1.1, 1.2]))?;
    array.close()?;

    next_millisecond();

    array.open(Mode::Write)?;
    array.delete_metadata("aaa")?;
    // Deleting a key that never existed also succeeds
    array.delete_metadata("foo")?;
    array.close()?;

    array.open(Mode::Read)?;
    assert!(array.metadata("aaa")?.is_none());
    assert_eq!(vec![1.1, 1.2], read_f32s(array.metadata("bb")?.unwrap()));
    assert_eq!(1, array.metadata_num()?);

    let (key, _) = array.metadata_at_index(0)?;
    assert_eq!(*key, "bb");

    array.close()?;
    Ok(())
}

#[test]
fn meta_delete_then_rewrite() -> array_meta::Result<()> {
    let folder = tempfile::tempdir()?;
    let mut array = Array::new(folder.path());

    array.open(Mode::Write)?;
    put_i32(&mut array, "aaa", 5)?;
    array.close()?;

    next_millisecond();

    array.open(Mode::Write)?;
    array.delete_metadata("aaa")?;
    array.close()?;

    next_millisecond();

    array.open(Mode::Write)?;
    put_i32(&mut array, "aaa", 9)?;
    array.close()?;

    array.open(Mode::Read)?;
    assert_eq!(9, common::read_i32(array.metadata("aaa")?.unwrap()));
    array.close()?;

    Ok(())
}
