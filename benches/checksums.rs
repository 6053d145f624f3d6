//! Benchmarks for checksum calculations.

use affs_edit::{bitmap_checksum, boot_checksum, header_checksum};

fn main() {
    divan::main();
}

#[divan::bench]
fn bench_header_checksum_512(bencher: divan::Bencher) {
    let buf = [0u8; 512];
    bencher.bench_local(|| divan::black_box(header_checksum(divan::black_box(&buf), 20)));
}

#[divan::bench]
fn bench_boot_checksum(bencher: divan::Bencher) {
    let buf = [0u8; 1024];
    bencher.bench_local(|| divan::black_box(boot_checksum(divan::black_box(&buf))));
}

#[divan::bench]
fn bench_bitmap_checksum(bencher: divan::Bencher) {
    let mut buf = [0u8; 512];
    for (i, b) in buf.iter_mut().enumerate() {
        *b = (i % 251) as u8;
    }
    bencher.bench_local(|| divan::black_box(bitmap_checksum(divan::black_box(&buf))));
}

#[divan::bench]
fn bench_header_checksum_varied_data(bencher: divan::Bencher) {
    let mut buf = [0u8; 512];
    // Fill with varied data to prevent optimization
    for (i, b) in buf.iter_mut().enumerate() {
        *b = (i % 256) as u8;
    }
    bencher.bench_local(|| divan::black_box(header_checksum(divan::black_box(&buf), 20)));
}

#[divan::bench]
fn bench_boot_checksum_varied_data(bencher: divan::Bencher) {
    let mut buf = [0u8; 1024];
    // Fill with varied data
    for (i, b) in buf.iter_mut().enumerate() {
        *b = ((i * 7 + 13) % 256) as u8;
    }
    bencher.bench_local(|| divan::black_box(boot_checksum(divan::black_box(&buf))));
}
