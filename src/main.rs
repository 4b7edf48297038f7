//! Консольный интерфейс к N-ALU

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use n_alu::harness::{AluRequest, AluService, ServiceConfig};
use n_alu::{Matrix, MatrixType, NAlu, Opcode, Operands, Outputs, DEFAULT_DIM};
use prettytable::{row, Table};
use std::fs;
use std::path::PathBuf;

const DIM: usize = DEFAULT_DIM;

#[derive(Parser)]
#[command(name = "n_alu", about = "Арифметическое устройство для матриц 4x4", version)]
struct Cli {
    /// Уровень логов, если не задан RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Выполнить одну операцию
    Run {
        /// JSON-файл заявки: {"opcode": ..., "a": [[..]], "b": [[..]], "alpha": ..}
        #[arg(long, conflicts_with_all = ["op", "a", "b", "alpha"])]
        request: Option<PathBuf>,

        /// Операция: имя (det, trace, matmul, ...) или числовой селектор
        #[arg(long)]
        op: Option<String>,

        /// Матрица A: 16 чисел через запятую, построчно
        #[arg(long)]
        a: Option<String>,

        /// Матрица B: 16 чисел через запятую, построчно
        #[arg(long)]
        b: Option<String>,

        #[arg(long)]
        alpha: Option<f32>,

        /// Вывести результат в JSON
        #[arg(long)]
        json: bool,
    },

    /// Прогнать все операции на эталонных матрицах
    Demo {
        #[arg(long, default_value = "2.5")]
        alpha: f32,
    },

    /// Выполнить последовательность заявок (JSON-массив) через сервис start/done
    Replay {
        file: PathBuf,

        #[arg(long, default_value = "16")]
        queue_depth: usize,
    },

    /// Список кодов операций
    Opcodes,
}

fn parse_matrix(text: &str) -> Result<Matrix<DIM>> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Не удалось разобрать матрицу: {}", text))?;
    Ok(Matrix::try_from(values.as_slice())?)
}

fn load_request(
    request: Option<PathBuf>,
    op: Option<String>,
    a: Option<String>,
    b: Option<String>,
    alpha: Option<f32>,
) -> Result<AluRequest<DIM>> {
    if let Some(path) = request {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Не удалось прочитать файл {}", path.display()))?;
        return serde_json::from_str(&text)
            .with_context(|| format!("Некорректная заявка в {}", path.display()));
    }

    let opcode: Opcode = op.context("Не задана операция (--op или --request)")?.parse()?;
    let a = parse_matrix(&a.context("Не задана матрица A (--a)")?)?;
    let mut operands = Operands::new(a);
    if let Some(b) = b {
        operands = operands.with_b(parse_matrix(&b)?);
    }
    if let Some(alpha) = alpha {
        operands = operands.with_alpha(alpha);
    }
    Ok(AluRequest { opcode, operands })
}

fn print_outputs(opcode: Opcode, outputs: &Outputs<DIM>) {
    println!("\nОперация: {} (код {})", opcode, opcode.code());
    if opcode.yields_scalar() {
        println!("Результат: {}", outputs.scalar);
    } else {
        println!("Результирующая матрица C ({}x{}):", DIM, DIM);
        outputs.matrix.to_table().printstd();
        if matches!(opcode, Opcode::Unknown(_)) {
            println!("Скаляр: {}", outputs.scalar);
        }
    }
}

fn run_demo(alpha: f32) -> Result<()> {
    let mut rng = rand::thread_rng();
    let a = Matrix::<DIM>::generate(MatrixType::Sequential, &mut rng);
    let b = Matrix::<DIM>::generate(MatrixType::Reversed, &mut rng);
    let operands = Operands::new(a).with_b(b).with_alpha(alpha);
    let alu = NAlu::<DIM>::new();

    println!("Входная матрица A ({}x{}):", DIM, DIM);
    a.to_table().printstd();
    println!("Входная матрица B ({}x{}):", DIM, DIM);
    b.to_table().printstd();
    println!("alpha = {}", alpha);

    let opcodes = Opcode::ALL.into_iter().chain(std::iter::once(Opcode::Unknown(6)));
    for opcode in opcodes {
        let mut outputs = Outputs::default();
        alu.execute(opcode, &operands, &mut outputs)?;
        print_outputs(opcode, &outputs);
    }
    Ok(())
}

async fn run_replay(file: PathBuf, queue_depth: usize) -> Result<()> {
    let text = fs::read_to_string(&file)
        .with_context(|| format!("Не удалось прочитать файл {}", file.display()))?;
    let requests: Vec<AluRequest<DIM>> = serde_json::from_str(&text)
        .with_context(|| format!("Некорректный список заявок в {}", file.display()))?;

    let handle = AluService::spawn::<DIM>(ServiceConfig { queue_depth });
    for request in requests {
        let response = handle.submit(request).await?;
        println!("\nТакт {}:", response.cycle);
        print_outputs(request.opcode, &response.outputs);
    }
    handle.shutdown().await?;
    Ok(())
}

fn print_opcodes() {
    let mut table = Table::new();
    table.add_row(row!["Код", "Имя", "Результат"]);
    for opcode in Opcode::ALL {
        let kind = if opcode.yields_scalar() { "скаляр" } else { "матрица" };
        table.add_row(row![opcode.code(), opcode.name(), kind]);
    }
    table.add_row(row!["6..255", "unknown", "обнуление"]);
    table.printstd();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    n_alu::utils::init_tracing(&cli.log_level);

    match cli.command {
        Commands::Run { request, op, a, b, alpha, json } => {
            let request = load_request(request, op, a, b, alpha)?;
            let mut outputs = Outputs::default();
            NAlu::<DIM>::new().execute(request.opcode, &request.operands, &mut outputs)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outputs)?);
            } else {
                print_outputs(request.opcode, &outputs);
            }
        }
        Commands::Demo { alpha } => run_demo(alpha)?,
        Commands::Replay { file, queue_depth } => run_replay(file, queue_depth).await?,
        Commands::Opcodes => print_opcodes(),
    }

    Ok(())
}
