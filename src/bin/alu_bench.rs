//! Тестирование производительности операций N-ALU
use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use n_alu::matrix::compare_results;
use n_alu::utils::{init_tracing, measure_time};
use n_alu::{Matrix, MatrixType, NAlu, Opcode, Operands, Outputs};
use ndarray::Array2;
use prettytable::{row, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DIM: usize = 4;

#[derive(Parser)]
#[command(name = "alu_bench", about = "Замер скорости операций N-ALU на случайных матрицах")]
struct Args {
    /// Число итераций на операцию
    #[arg(long, default_value = "100000")]
    iterations: u32,

    /// Зерно генератора случайных чисел
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Сверить умножение с ndarray
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing("warn");

    let mut rng = StdRng::seed_from_u64(args.seed);
    let a = Matrix::<DIM>::generate(MatrixType::Random, &mut rng);
    let b = Matrix::<DIM>::generate(MatrixType::Random, &mut rng);
    let operands = Operands::new(a).with_b(b).with_alpha(1.5);
    let alu = NAlu::<DIM>::new();

    println!("Тестирование производительности N-ALU");
    println!("Размер матриц: {}x{}, итераций: {}", DIM, DIM, args.iterations);

    if args.verify {
        let lhs: Array2<f32> = a.into();
        let rhs: Array2<f32> = b.into();
        let expected = lhs.dot(&rhs);
        let actual = a.matmul(&b);
        let expected_flat: Vec<f32> = expected.iter().copied().collect();
        if !compare_results(actual.as_slice(), &expected_flat, 1e-5) {
            bail!("Результаты N-ALU и ndarray расходятся");
        }
        println!("Умножение совпадает с ndarray");
    }

    let progress = ProgressBar::new(Opcode::ALL.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut table = Table::new();
    table.add_row(row!["Операция", "Всего, мс", "На вызов, нс"]);
    for opcode in Opcode::ALL {
        progress.set_message(opcode.name());
        let mut outputs = Outputs::default();
        let (result, duration) = measure_time(|| -> n_alu::Result<()> {
            for _ in 0..args.iterations {
                alu.execute(opcode, &operands, &mut outputs)?;
            }
            Ok(())
        });
        result?;
        let per_call = duration.as_nanos() as f64 / args.iterations.max(1) as f64;
        table.add_row(row![
            opcode.name(),
            format!("{:.3}", duration.as_secs_f64() * 1000.0),
            format!("{:.1}", per_call)
        ]);
        progress.inc(1);
    }
    progress.finish_with_message("готово");

    table.printstd();
    Ok(())
}
