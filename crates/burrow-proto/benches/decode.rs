use burrow_proto::{DecodeOutcome, Name, Query, RecordType, Response};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::str::FromStr;

/// A referral response: question, 4 NS records in authority, 4 glue A
/// records in additional, all names compressed against the question.
fn referral_message(id: u16) -> Vec<u8> {
    #[rustfmt::skip]
    let mut message = vec![
        (id >> 8) as u8, (id & 0xFF) as u8,
        0x80, 0x00,
        0x00, 0x01,
        0x00, 0x00,
        0x00, 0x04,
        0x00, 0x04,
        // question at 12: www.example.com A
        3, b'w', b'w', b'w',
        7, b'e', b'x', b'a', b'm', b'p', b'l', b'e',
        3, b'c', b'o', b'm',
        0,
        0x00, 0x01, 0x00, 0x01,
    ];

    let mut glue_offsets = Vec::new();
    for i in 0..4u8 {
        // NS example.com -> ns<i>.example.com
        message.extend_from_slice(&[0xC0, 16]);
        message.extend_from_slice(&[0, 2, 0, 1, 0, 1, 0x51, 0x80, 0, 6]);
        glue_offsets.push(message.len() as u8);
        message.extend_from_slice(&[3, b'n', b's', b'0' + i, 0xC0, 16]);
    }
    for (i, offset) in glue_offsets.into_iter().enumerate() {
        message.extend_from_slice(&[0xC0, offset]);
        message.extend_from_slice(&[0, 1, 0, 1, 0, 1, 0x51, 0x80, 0, 4]);
        message.extend_from_slice(&[192, 0, 2, 10 + i as u8]);
    }

    message
}

fn bench_decode_referral(c: &mut Criterion) {
    let message = referral_message(0x4242);

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(message.len() as u64));
    group.bench_function("referral_response", |b| {
        b.iter(|| {
            let outcome = Response::decode(black_box(&message), 0x4242);
            assert!(matches!(outcome, DecodeOutcome::Valid(_)));
            outcome
        })
    });
    group.finish();
}

fn bench_encode_query(c: &mut Criterion) {
    let query = Query::with_id(
        0x4242,
        Name::from_str("www.example.com.").unwrap(),
        RecordType::A,
    );

    c.bench_function("encode/query", |b| {
        b.iter(|| black_box(&query).encode().unwrap())
    });
}

criterion_group!(benches, bench_decode_referral, bench_encode_query);
criterion_main!(benches);
