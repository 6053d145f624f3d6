#![no_main]

use affs_edit::{Image, Volume, DD_IMAGE_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Pad/truncate to a DD image size so arbitrary fuzzer input always
    // produces a structurally valid `Image`; the bytes past `data.len()`
    // stay zeroed.
    let mut bytes = vec![0u8; DD_IMAGE_SIZE];
    let take = data.len().min(DD_IMAGE_SIZE);
    bytes[..take].copy_from_slice(&data[..take]);

    let image = Image::from_bytes(bytes).unwrap();
    let volume = Volume::new(image);
    let _ = volume.filesystem_type();

    let root = volume.root_block();
    let Ok(entries) = volume.list_dir(root.header) else {
        return;
    };

    for entry in entries {
        let header = affs_edit::HeaderBlock::new(entry.block);
        let _ = header.name(volume.image());
        let _ = header.comment(volume.image());
        let _ = header.is_directory(volume.image());
        let _ = header.is_file(volume.image());

        if entry.is_directory {
            let _ = volume.list_dir(header);
        } else {
            let path = entry.name.clone();
            let _ = volume.file_data(&path);
        }
    }
});
