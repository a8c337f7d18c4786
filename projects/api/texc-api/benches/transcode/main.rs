use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use texc_api::{ColorSpace, CompressionLevel, CompressionType, PixelFormat, Texture};

// Helper to generate an RGBA image with smooth gradients and varying alpha
fn generate_test_image(size: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let i = y * size + x;
            data.extend_from_slice(&[x as u8, y as u8, 255 - i as u8, i as u8]);
        }
    }
    data
}

fn criterion_benchmark(c: &mut Criterion) {
    let size = 256;
    let input = generate_test_image(size);
    let base = Texture::new(
        size,
        size,
        PixelFormat::R8G8B8A8,
        ColorSpace::Linear,
        &input,
    )
    .expect("valid benchmark texture");

    let mut group = c.benchmark_group("Transcode");
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("gen_mip_maps", |b| {
        b.iter(|| {
            let mut texture = base.clone();
            texture.gen_mip_maps().expect("rgba8 supports mips");
            black_box(texture)
        })
    });

    let targets = [
        PixelFormat::L8,
        PixelFormat::R5G6B5,
        PixelFormat::RgbEtc1,
        PixelFormat::RgbaPvrtc4Bpp,
        PixelFormat::RgbaPvrtc2Bpp,
    ];
    for format in targets {
        group.bench_with_input(
            BenchmarkId::new("convert", format.name()),
            &format,
            |b, &format| {
                b.iter(|| {
                    let mut texture = base.clone();
                    texture
                        .transcode(
                            format,
                            ColorSpace::Linear,
                            CompressionLevel::Fast,
                            CompressionType::Default,
                        )
                        .expect("supported conversion");
                    black_box(texture)
                })
            },
        );
    }

    for kind in [CompressionType::WebP, CompressionType::WebPLossy] {
        group.bench_with_input(
            BenchmarkId::new("envelope", format!("{kind:?}")),
            &kind,
            |b, &kind| {
                b.iter(|| {
                    let mut texture = base.clone();
                    texture
                        .transcode(
                            PixelFormat::R8G8B8A8,
                            ColorSpace::Linear,
                            CompressionLevel::Fast,
                            kind,
                        )
                        .expect("envelope applies");
                    black_box(texture)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
