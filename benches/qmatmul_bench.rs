use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qmatmul::{quantized_matmul_with, DequantizeFallback, QuantizationDescriptor, QuantizedMatrix};

fn make_matrix(rows: usize, cols: usize, mut seed: u64, zp: i64) -> QuantizedMatrix {
    let data: Vec<i8> = (0..rows * cols)
        .map(|_| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((seed >> 32) as i32 % 128) as i8
        })
        .collect();
    let qp = QuantizationDescriptor::affine(0.02, zp).expect("descriptor");
    QuantizedMatrix::new(data, &[rows, cols], qp).expect("matrix")
}

fn bench_qmatmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("qmatmul_i8");
    for size in [64usize, 128, 256] {
        let a = make_matrix(size, size, 0x1234_5678_9abc_def0, 2);
        let b = make_matrix(size, size, 0x0fed_cba9_8765_4321, -3);
        let out_scale = 0.02 * 0.02 * 64.0;

        group.bench_with_input(BenchmarkId::new("fallback", size), &size, |ben, _| {
            ben.iter(|| {
                quantized_matmul_with(&DequantizeFallback, black_box(&a), black_box(&b), out_scale, 0)
                    .expect("fallback")
            })
        });

        #[cfg(feature = "int-gemm")]
        {
            use qmatmul::{IntegerGemm, KernelConfig};

            let serial = IntegerGemm::new(KernelConfig::serial());
            group.bench_with_input(BenchmarkId::new("int_gemm", size), &size, |ben, _| {
                ben.iter(|| {
                    quantized_matmul_with(&serial, black_box(&a), black_box(&b), out_scale, 0)
                        .expect("int gemm")
                })
            });

            let parallel = IntegerGemm::new(KernelConfig {
                single_thread_ops: 0,
                min_rows_per_thread: 16,
                ..KernelConfig::default()
            });
            group.bench_with_input(BenchmarkId::new("int_gemm_mt", size), &size, |ben, _| {
                ben.iter(|| {
                    quantized_matmul_with(&parallel, black_box(&a), black_box(&b), out_scale, 0)
                        .expect("int gemm mt")
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_qmatmul);
criterion_main!(benches);
