#![no_main]

use affs_edit::{BitmapBlock, HeaderBlock, Image};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Drop 512 fuzzed bytes into an otherwise-blank DD image at a fixed
    // block, then exercise every header/bitmap accessor against it. None
    // of these should panic, regardless of how malformed the bytes are.
    if data.len() < 512 {
        return;
    }

    let mut image = Image::new(true);
    let block_num = 10u32;
    {
        let mut sec = image.sector_mut(block_num).unwrap();
        sec.set_bytes_at(0, &data[..512]).unwrap();
    }

    let header = HeaderBlock::new(block_num);
    let _ = header.primary_type(&image);
    let _ = header.secondary_type(&image);
    let _ = header.header_key(&image);
    let _ = header.parent(&image);
    let _ = header.next_hash(&image);
    let _ = header.name(&image);
    let _ = header.comment(&image);
    let _ = header.last_modification_time(&image);
    let _ = header.hashtable_size(&image);
    let _ = header.is_directory(&image);
    let _ = header.is_file(&image);
    let _ = header.is_root(&image);
    let _ = header.is_directory_empty(&image);
    let _ = header.high_seq(&image);
    let _ = header.file_size(&image);
    let _ = header.data_blocks(&image);
    let _ = header.stored_checksum(&image);
    let _ = header.computed_checksum(&image);

    if let Ok(size) = header.hashtable_size(&image) {
        for i in 0..size.min(128) {
            let _ = header.hashtable_entry_at(&image, i);
        }
    }

    let bitmap = BitmapBlock::new(block_num);
    let _ = bitmap.stored_checksum(&image);
    let _ = bitmap.computed_checksum(&image);
    for n in [2u32, 33, 1000] {
        let _ = bitmap.is_free(&image, n);
    }
});
