#![no_main]

use affs_edit::{bitmap_checksum, boot_checksum, header_checksum};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() >= 512 {
        let block_buf: &[u8; 512] = data[..512].try_into().unwrap();

        for offset in [0, 4, 8, 12, 16, 20, 24, 508] {
            let _ = header_checksum(block_buf, offset);
        }

        let _ = bitmap_checksum(block_buf);
    }

    if data.len() >= 1024 {
        let boot_buf: &[u8; 1024] = data[..1024].try_into().unwrap();
        let _ = boot_checksum(boot_buf);
    }
});
