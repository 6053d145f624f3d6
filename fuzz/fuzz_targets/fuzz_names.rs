#![no_main]

use affs_edit::{hash_name_512, names_equal};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mid = data.len() / 2;
    let name1 = &data[..mid];
    let name2 = &data[mid..];

    let _ = hash_name_512(name1);
    let _ = hash_name_512(name2);

    let _ = names_equal(name1, name2);
    let _ = names_equal(name1, name1);
});
