//! Протокол start/done через асинхронный сервис

use n_alu::harness::{codec, AluRequest, AluService, ServiceConfig};
use n_alu::{AluError, Matrix, MatrixType, Opcode, Operands};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn reference_operands() -> Operands<4> {
    let mut rng = StdRng::seed_from_u64(0);
    Operands::new(Matrix::generate(MatrixType::Sequential, &mut rng))
        .with_b(Matrix::generate(MatrixType::Reversed, &mut rng))
        .with_alpha(2.5)
}

#[tokio::test]
async fn requests_complete_in_order_with_cycle_count() {
    let handle = AluService::spawn::<4>(ServiceConfig::default());
    let ops = reference_operands();

    let first = handle.submit(AluRequest { opcode: Opcode::MatrixMultiply, operands: ops }).await.unwrap();
    assert_eq!(first.cycle, 1);
    assert_eq!(first.outputs.matrix.rows()[0], [80.0, 70.0, 60.0, 50.0]);

    let second = handle.submit(AluRequest { opcode: Opcode::Trace, operands: ops }).await.unwrap();
    assert_eq!(second.cycle, 2);
    assert_eq!(second.outputs.scalar, 34.0);
    // Матричный регистр сохраняет результат предыдущей заявки
    assert_eq!(second.outputs.matrix, first.outputs.matrix);
}

#[tokio::test]
async fn reset_clears_registers() {
    let handle = AluService::spawn::<4>(ServiceConfig::default());
    let outputs = handle.execute(Opcode::ScalarMultiply, reference_operands()).await.unwrap();
    assert_eq!(outputs.matrix[(0, 0)], 2.5);

    let response = handle.reset().await.unwrap();
    assert_eq!(response.outputs.matrix, Matrix::zeros());
    assert_eq!(response.outputs.scalar, 0.0);
}

#[tokio::test]
async fn missing_operand_is_reported_and_registers_survive() {
    let handle = AluService::spawn::<4>(ServiceConfig { queue_depth: 1 });
    let ops = reference_operands();
    let before = handle.execute(Opcode::Transpose, ops).await.unwrap();

    let err = handle
        .execute(Opcode::MatrixMultiply, Operands::new(ops.a))
        .await
        .unwrap_err();
    assert!(matches!(err, AluError::MissingOperand { operand: "b", .. }));

    let after = handle.execute(Opcode::Determinant, ops).await.unwrap();
    assert_eq!(after.matrix, before.matrix);
}

#[tokio::test]
async fn concurrent_handles_share_one_unit() {
    let handle = AluService::spawn::<4>(ServiceConfig::default());
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            handle.execute(Opcode::Trace, reference_operands()).await
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap().scalar, 34.0);
    }
}

#[tokio::test]
async fn submit_after_shutdown_fails() {
    let handle = AluService::spawn::<4>(ServiceConfig::default());
    let other = handle.clone();
    handle.shutdown().await.unwrap();

    let err = other.execute(Opcode::Trace, reference_operands()).await.unwrap_err();
    assert_eq!(err, AluError::ServiceStopped);
}

#[tokio::test]
async fn request_json_matches_cli_format() {
    let json = r#"{
        "opcode": "determinant",
        "a": [[1, 0, 0, 0], [0, 2, 0, 0], [0, 0, 3, 0], [0, 0, 0, 4]]
    }"#;
    let request: AluRequest<4> = serde_json::from_str(json).unwrap();
    let handle = AluService::spawn::<4>(ServiceConfig::default());
    let response = handle.submit(request).await.unwrap();
    assert_eq!(response.outputs.scalar, 24.0);

    let bad = r#"{"opcode": "trace", "a": [[1, 0], [0, 1]]}"#;
    assert!(serde_json::from_str::<AluRequest<4>>(bad).is_err());
}

#[tokio::test]
async fn encoded_operands_round_trip_through_service() {
    let ops = reference_operands();
    let words = codec::encode(&ops.a);
    assert_eq!(words[0][0], 1.0f32.to_bits());

    let handle = AluService::spawn::<4>(ServiceConfig::default());
    let decoded = Operands::new(codec::decode(&words)).with_alpha(2.0);
    let outputs = handle.execute(Opcode::ScalarDivide, decoded).await.unwrap();
    assert_eq!(codec::encode(&outputs.matrix)[0][1], 1.0f32.to_bits());
}
