#![allow(dead_code)]

use array_meta::{Array, Datatype, TypedValue};

pub fn put_i32(array: &mut Array, key: &str, value: i32) -> array_meta::Result<()> {
    array.put_metadata(key, Datatype::Int32, 1, &value.to_le_bytes())
}

pub fn read_i32(value: &TypedValue) -> i32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&value.payload);
    i32::from_le_bytes(buf)
}

pub fn f32_payload(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn read_f32s(value: &TypedValue) -> Vec<f32> {
    value
        .payload
        .chunks_exact(4)
        .map(|chunk| {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(chunk);
            f32::from_le_bytes(buf)
        })
        .collect()
}

/// Sleeps past the current millisecond so the next session gets a fresh
/// fragment timestamp. Test-only; the engine itself orders same-timestamp
/// fragments by their name suffix.
pub fn next_millisecond() {
    std::thread::sleep(std::time::Duration::from_millis(2));
}
