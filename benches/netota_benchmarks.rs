//! Performance benchmarks for payload preparation
//!
//! Text sketches are rewritten in memory before upload, so stripping has to
//! stay cheap for multi-megabyte images.

use criterion::{Criterion, criterion_group, criterion_main};
use netota::models::{FirmwareImage, strip_line_terminators};
use netota::utils::network::{InterfaceAddress, select_local_ip};
use std::hint::black_box;
use std::net::{IpAddr, Ipv4Addr};

/// Build an Intel HEX style sketch of roughly `lines * 45` bytes
fn hex_sketch(lines: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(lines * 45);
    for i in 0..lines {
        data.extend_from_slice(format!(":10{:04X}00FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00", i).as_bytes());
        if i % 2 == 0 {
            data.extend_from_slice(b"\r\n");
        } else {
            data.push(b'\n');
        }
    }
    data
}

fn benchmark_strip_line_terminators(c: &mut Criterion) {
    let sketch = hex_sketch(40_000);

    c.bench_function("strip_line_terminators_1_8mb", |b| {
        b.iter(|| {
            let stripped = strip_line_terminators(black_box(&sketch));
            black_box(stripped);
        });
    });
}

fn benchmark_payload_modes(c: &mut Criterion) {
    let image = FirmwareImage::from_bytes("blink.ino.hex", hex_sketch(10_000));

    c.bench_function("payload_text_mode", |b| {
        b.iter(|| black_box(image.payload(black_box(false))));
    });

    c.bench_function("payload_binary_mode", |b| {
        b.iter(|| black_box(image.payload(black_box(true))));
    });
}

fn benchmark_local_ip_selection(c: &mut Criterion) {
    let interfaces: Vec<InterfaceAddress> = (0..64u8)
        .map(|i| {
            InterfaceAddress::new(
                format!("veth{}", i),
                IpAddr::V4(Ipv4Addr::new(172, 16, i, 1)),
                IpAddr::V4(Ipv4Addr::new(255, 255, 255, 0)),
            )
        })
        .collect();
    let target = IpAddr::V4(Ipv4Addr::new(172, 16, 63, 40));

    c.bench_function("select_local_ip_64_interfaces", |b| {
        b.iter(|| black_box(select_local_ip(black_box(target), &interfaces)));
    });
}

criterion_group!(
    benches,
    benchmark_strip_line_terminators,
    benchmark_payload_modes,
    benchmark_local_ip_selection
);
criterion_main!(benches);
