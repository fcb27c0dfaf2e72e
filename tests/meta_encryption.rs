use array_meta::{
    consolidate_metadata, consolidate_metadata_with_key, vfs::StdVfs, Array, Datatype,
    EncryptionKey, EncryptionType, Error, Mode, METADATA_FOLDER,
};
use test_log::test;

mod common;
use common::{f32_payload, put_i32, read_f32s, read_i32};

fn key(fill: u8) -> EncryptionKey {
    EncryptionKey::new(EncryptionType::Aes256Gcm, &[fill; 32]).unwrap()
}

#[test]
fn meta_encryption_round_trip() -> array_meta::Result<()> {
    let folder = tempfile::tempdir()?;
    let mut array = Array::new(folder.path());

    array.open_with_key(Mode::Write, key(7))?;
    put_i32(&mut array, "aaa", 5)?;
    array.put_metadata("bb", Datatype::Float32, 2, &f32_payload(&[1.1, 1.2]))?;
    array.close()?;

    // Without the key the array does not open
    assert!(matches!(
        array.open(Mode::Read),
        Err(Error::EncryptionMismatch(_)),
    ));

    // A wrong key fails the same way
    assert!(matches!(
        array.open_with_key(Mode::Read, key(8)),
        Err(Error::EncryptionMismatch(_)),
    ));

    array.open_with_key(Mode::Read, key(7))?;
    assert_eq!(5, read_i32(array.metadata("aaa")?.unwrap()));
    assert_eq!(vec![1.1, 1.2], read_f32s(array.metadata("bb")?.unwrap()));
    array.close()?;

    Ok(())
}

#[test]
fn meta_encryption_consolidation_requires_key() -> array_meta::Result<()> {
    let folder = tempfile::tempdir()?;
    let mut array = Array::new(folder.path());

    array.open_with_key(Mode::Write, key(7))?;
    put_i32(&mut array, "aaa", 5)?;
    array.put_metadata("bb", Datatype::Float32, 2, &f32_payload(&[1.1, 1.2]))?;
    array.close()?;

    assert!(matches!(
        consolidate_metadata(&StdVfs, folder.path()),
        Err(Error::EncryptionMismatch(_)),
    ));

    consolidate_metadata_with_key(&StdVfs, folder.path(), &key(7))?;

    // Everything under the metadata directory stays ciphertext
    assert!(matches!(
        array.open(Mode::Read),
        Err(Error::EncryptionMismatch(_)),
    ));

    array.open_with_key(Mode::Read, key(7))?;
    assert_eq!(2, array.metadata_num()?);
    assert_eq!(5, read_i32(array.metadata("aaa")?.unwrap()));
    assert_eq!(vec![1.1, 1.2], read_f32s(array.metadata("bb")?.unwrap()));
    array.close()?;

    Ok(())
}

#[test]
fn meta_encryption_key_on_plaintext_array_fails() -> array_meta::Result<()> {
    let folder = tempfile::tempdir()?;
    let mut array = Array::new(folder.path());

    array.open(Mode::Write)?;
    put_i32(&mut array, "aaa", 5)?;
    array.close()?;

    assert!(matches!(
        array.open_with_key(Mode::Read, key(7)),
        Err(Error::EncryptionMismatch(_)),
    ));

    Ok(())
}

#[test]
fn meta_encryption_rejects_bad_key_length() {
    assert!(matches!(
        EncryptionKey::new(EncryptionType::Aes256Gcm, &[7; 16]),
        Err(Error::InvalidArgument(_)),
    ));
    assert!(matches!(
        EncryptionKey::new(EncryptionType::Aes256Gcm, &[]),
        Err(Error::InvalidArgument(_)),
    ));
}

#[test]
fn meta_encryption_fragment_bytes_are_opaque() -> array_meta::Result<()> {
    let folder = tempfile::tempdir()?;
    let mut array = Array::new(folder.path());

    array.open_with_key(Mode::Write, key(7))?;
    array.put_metadata("needle", Datatype::Char, 6, b"haystk")?;
    array.close()?;

    let dir = std::fs::read_dir(folder.path().join(METADATA_FOLDER))?;
    for entry in dir {
        let bytes = std::fs::read(entry?.path())?;
        assert!(!bytes
            .windows(b"needle".len())
            .any(|window| window == b"needle"));
    }

    Ok(())
}
