use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use hex_literal::hex;
use pcap_layers::{parse_sctp_segment, parse_trace, TraceReader};

const TRACE_HDR_LE: &[u8] = &hex!(
    "
D4 C3 B2 A1 02 00 04 00 00 00 00 00 00 00 00 00
FF FF 00 00 01 00 00 00"
);

// Ethernet, IPv4, TCP with timestamp options
const FRAME_TCP: &[u8] = &hex!(
    "
fa 4f ef 44 64 fd 09 00 60 00 00 00 60 00 00 00
00 16 e3 19 27 15 00 04 76 96 7b da 08 00 45 00
00 52 76 ed 40 00 40 06 56 cf c0 a8 01 02 d4 cc
d6 72 0b 20 1a 0b 4d c8 4e ed 54 f1 10 72 80 18
1f 4b 6d 2e 00 00 01 01 08 0a 00 d8 ea 48 82 e4
da b0 49 53 4f 4e 20 54 68 75 6e 66 69 73 63 68
20 53 6d 69 6c 65 79 20 53 6d 69 6c 65 79 47 0a"
);

const SCTP_INIT: &[u8] = &hex!(
    "
0b 59 0b 59 00 00 0e 50 53 82 8c 3e 01 00 00 24
a1 b2 c3 d4 00 01 00 00 00 0a 00 05 00 00 00 01
00 05 00 08 c0 a8 00 01 00 09 00 08 00 00 0e 10
c1 00 00 06 ab cd 00 00"
);

fn synthetic_trace(frames: usize) -> Vec<u8> {
    let mut v = TRACE_HDR_LE.to_vec();
    for _ in 0..frames {
        v.extend_from_slice(FRAME_TCP);
    }
    v
}

fn bench_parse_trace(c: &mut Criterion) {
    let bytes = synthetic_trace(1000);
    let mut group = c.benchmark_group("trace");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("parse_trace tcp", |b| b.iter(|| parse_trace(&bytes[..])));
    group.bench_function("TraceReader tcp", |b| {
        b.iter(|| {
            let reader = TraceReader::new(4096, &bytes[..]).unwrap();
            reader.filter(Result::is_ok).count()
        })
    });
    group.finish();
}

fn bench_parse_sctp(c: &mut Criterion) {
    c.bench_function("parse_sctp_segment init", |b| {
        b.iter(|| parse_sctp_segment(SCTP_INIT))
    });
}

criterion_group!(benches, bench_parse_trace, bench_parse_sctp);
criterion_main!(benches);
