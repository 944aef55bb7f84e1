//! Benchmark runner for the quantized matmul paths.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
#[cfg(feature = "int-gemm")]
use qmatmul::IntegerGemm;
use qmatmul::{
    quantized_matmul_with, DequantizeFallback, KernelConfig, MatmulPath, QuantizationDescriptor,
    QuantizedMatrix,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Benchmark quantized 8-bit matmul paths")]
struct Args {
    /// Square matrix sizes to run
    #[arg(long, value_delimiter = ',', default_values_t = vec![64, 256, 512])]
    sizes: Vec<usize>,

    /// Timed runs per size (after one warmup)
    #[arg(long, default_value_t = 3)]
    iterations: usize,

    /// Maximum worker threads for the integer kernel (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Use unsigned 8-bit operands instead of signed
    #[arg(long)]
    unsigned: bool,
}

type Timing = (f64, f64);

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = KernelConfig::from_env();
    if let Some(t) = args.threads {
        config.num_threads = t.max(1);
    }
    info!("kernel config: {:?}", config);

    println!("=== Quantized MatMul Benchmark ===\n");

    let mut all_results = Vec::new();

    for &size in &args.sizes {
        println!("Matrix: {}×{}", size, size);
        println!("{}", "-".repeat(50));

        let (a, b) = make_operands(size, args.unsigned)?;
        let (out_scale, out_zp) = output_domain(size, args.unsigned);

        #[cfg_attr(not(feature = "int-gemm"), allow(unused_variables))]
        let (fallback_timing, reference) = bench_path(
            &DequantizeFallback,
            &a,
            &b,
            out_scale,
            out_zp,
            args.iterations,
        )?;
        #[cfg_attr(not(feature = "int-gemm"), allow(unused_mut))]
        let mut results: Vec<(&str, Timing, i64)> =
            vec![(DequantizeFallback::NAME, fallback_timing, 0)];

        #[cfg(feature = "int-gemm")]
        {
            let path = IntegerGemm::new(config.clone());
            let (timing, out) = bench_path(&path, &a, &b, out_scale, out_zp, args.iterations)?;
            results.push((IntegerGemm::NAME, timing, max_abs_diff(&reference, &out)));
        }

        let baseline_time = results[0].1.0;
        for (i, (name, (time_ms, gops), diff)) in results.iter().enumerate() {
            println!(
                "{}. {:20} {:8.2} ms  {:6.2} GOPS  ({:.1}×)  max |Δ| = {}",
                i + 1,
                name,
                time_ms,
                gops,
                baseline_time / time_ms,
                diff
            );
        }
        println!();

        all_results.push((size, results));
    }

    print_summary_table(&all_results);
    Ok(())
}

// Deterministic codes spread over the whole 8-bit range
fn make_operands(size: usize, unsigned: bool) -> Result<(QuantizedMatrix, QuantizedMatrix)> {
    let len = size * size;
    let shape = [size, size];
    let (a, b) = if unsigned {
        let qa = QuantizationDescriptor::affine(0.02, 128)?;
        let qb = QuantizationDescriptor::affine(0.03, 120)?;
        let a: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
        let b: Vec<u8> = (0..len).map(|i| (i * 91 % 256) as u8).collect();
        (
            QuantizedMatrix::new(a, &shape, qa)?,
            QuantizedMatrix::new(b, &shape, qb)?,
        )
    } else {
        let qa = QuantizationDescriptor::affine(0.02, 3)?;
        let qb = QuantizationDescriptor::affine(0.03, -5)?;
        let a: Vec<i8> = (0..len).map(|i| ((i * 37 % 256) as i32 - 128) as i8).collect();
        let b: Vec<i8> = (0..len).map(|i| ((i * 91 % 256) as i32 - 128) as i8).collect();
        (
            QuantizedMatrix::new(a, &shape, qa)?,
            QuantizedMatrix::new(b, &shape, qb)?,
        )
    };
    Ok((a, b))
}

// Output scale wide enough that most cells don't saturate
fn output_domain(size: usize, unsigned: bool) -> (f64, i64) {
    let scale = 0.02 * 0.03 * 128.0 * 128.0 * (size as f64).sqrt() / 64.0;
    (scale, if unsigned { 128 } else { 0 })
}

fn bench_path<P: MatmulPath>(
    path: &P,
    a: &QuantizedMatrix,
    b: &QuantizedMatrix,
    out_scale: f64,
    out_zp: i64,
    iterations: usize,
) -> Result<(Timing, QuantizedMatrix)> {
    // Warmup
    let out = quantized_matmul_with(path, a, b, out_scale, out_zp)
        .with_context(|| format!("{} failed", P::NAME))?;

    let mut total = 0.0;
    for _ in 0..iterations {
        let start = Instant::now();
        quantized_matmul_with(path, a, b, out_scale, out_zp)?;
        total += start.elapsed().as_secs_f64();
    }

    let avg = total / iterations.max(1) as f64;
    let (m, k) = (a.rows(), a.cols());
    let n = b.cols();
    let gops = 2.0 * (m * n * k) as f64 / avg / 1e9;
    Ok(((avg * 1000.0, gops), out))
}

#[cfg(feature = "int-gemm")]
fn max_abs_diff(x: &QuantizedMatrix, y: &QuantizedMatrix) -> i64 {
    x.buffer()
        .to_i64_vec()
        .into_iter()
        .zip(y.buffer().to_i64_vec())
        .map(|(p, q)| (p - q).abs())
        .max()
        .unwrap_or(0)
}

fn print_summary_table(all_results: &[(usize, Vec<(&str, Timing, i64)>)]) {
    if all_results.is_empty() {
        return;
    }
    println!("\n{}", "=".repeat(70));
    println!("SUMMARY");
    println!("{}", "=".repeat(70));

    print!("\n{:<22}", "Method");
    for (size, _) in all_results {
        print!(" {:>14}", format!("{}×{}", size, size));
    }
    println!(" {:>10}", "Speedup");
    println!("{}", "-".repeat(70));

    let num_methods = all_results[0].1.len();

    for method_idx in 0..num_methods {
        let method_name = all_results[0].1[method_idx].0;
        print!("{:<22}", method_name);

        let mut speedups = Vec::new();
        for (_, results) in all_results {
            let (time_ms, gops) = results[method_idx].1;
            let baseline_time = results[0].1.0;
            print!(" {:>11.2} GO", gops);
            speedups.push(baseline_time / time_ms);
        }

        let avg_speedup: f64 = speedups.iter().sum::<f64>() / speedups.len() as f64;
        println!(" {:>9.1}×", avg_speedup);
    }

    println!("{}", "=".repeat(70));
    println!("\nGO = GOPS (billion integer or float operations per second)");
    println!("Speedup relative to the dequantize fallback. Higher is better.\n");
}
