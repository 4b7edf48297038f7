//! N-ALU: диспетчер матричных операций по коду операции
//!
//! Устройство не хранит состояния: каждый вызов читает только свои операнды
//! и пишет ровно один выход. Неизвестный код операции не является ошибкой,
//! он обнуляет оба выхода.

mod opcode;

pub use opcode::Opcode;

use crate::error::Result;
use crate::matrix::Matrix;
use crate::require_operand;
use serde::{Deserialize, Serialize};

/// Входные операнды одного вызова
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Operands<const N: usize> {
    pub a: Matrix<N>,
    /// Нужен только для MatrixMultiply
    #[serde(default)]
    pub b: Option<Matrix<N>>,
    /// Нужен только для ScalarMultiply / ScalarDivide
    #[serde(default)]
    pub alpha: Option<f32>,
}

impl<const N: usize> Operands<N> {
    pub fn new(a: Matrix<N>) -> Self {
        Self { a, b: None, alpha: None }
    }

    pub fn with_b(mut self, b: Matrix<N>) -> Self {
        self.b = Some(b);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }
}

/// Выходные регистры: матрица C и скаляр
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Outputs<const N: usize> {
    pub matrix: Matrix<N>,
    pub scalar: f32,
}

/// Результат одной операции
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<const N: usize> {
    Matrix(Matrix<N>),
    Scalar(f32),
    /// Неизвестный код: оба выхода обнуляются
    Cleared,
}

impl<const N: usize> Outcome<N> {
    /// Записывает результат в выходы; невыбранный выход не меняется
    pub fn apply(self, outputs: &mut Outputs<N>) {
        match self {
            Outcome::Matrix(m) => outputs.matrix = m,
            Outcome::Scalar(s) => outputs.scalar = s,
            Outcome::Cleared => {
                outputs.matrix = Matrix::zeros();
                outputs.scalar = 0.0;
            }
        }
    }

    pub fn matrix(&self) -> Option<&Matrix<N>> {
        match self {
            Outcome::Matrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn scalar(&self) -> Option<f32> {
        match self {
            Outcome::Scalar(s) => Some(*s),
            _ => None,
        }
    }
}

/// Арифметическое устройство для матриц N x N.
///
/// Не имеет полей, поэтому `Copy + Send + Sync`: независимые вызовы можно
/// выполнять параллельно без блокировок. Определитель считается за O(N!),
/// устройство рассчитано на малые N (по умолчанию 4, разумно до 6).
#[derive(Debug, Clone, Copy, Default)]
pub struct NAlu<const N: usize = { crate::matrix::DEFAULT_DIM }>;

impl<const N: usize> NAlu<N> {
    pub fn new() -> Self {
        Self
    }

    /// Выполняет одну операцию и возвращает её результат
    pub fn dispatch(&self, opcode: Opcode, operands: &Operands<N>) -> Result<Outcome<N>> {
        tracing::debug!(%opcode, dim = N, "выполнение операции");
        let a = &operands.a;

        let outcome = match opcode {
            Opcode::MatrixMultiply => {
                let b = require_operand!(operands.b.as_ref(), opcode, "b");
                Outcome::Matrix(a.matmul(b))
            }
            Opcode::ScalarMultiply => {
                let alpha = require_operand!(operands.alpha, opcode, "alpha");
                Outcome::Matrix(a.scale(alpha))
            }
            Opcode::ScalarDivide => {
                let alpha = require_operand!(operands.alpha, opcode, "alpha");
                Outcome::Matrix(a.divide(alpha))
            }
            Opcode::Transpose => Outcome::Matrix(a.transpose()),
            Opcode::Determinant => Outcome::Scalar(a.determinant()),
            Opcode::Trace => Outcome::Scalar(a.trace()),
            Opcode::Unknown(code) => {
                tracing::warn!(code, "неизвестный код операции, выходы обнулены");
                Outcome::Cleared
            }
        };
        Ok(outcome)
    }

    /// Выполняет операцию и записывает результат в выходные регистры.
    ///
    /// При ошибке (не хватает операнда) выходы не меняются.
    pub fn execute(
        &self,
        opcode: Opcode,
        operands: &Operands<N>,
        outputs: &mut Outputs<N>,
    ) -> Result<()> {
        self.dispatch(opcode, operands)?.apply(outputs);
        Ok(())
    }

    /// Вариант с числовым селектором op_sel
    pub fn execute_code(
        &self,
        op_sel: u8,
        operands: &Operands<N>,
        outputs: &mut Outputs<N>,
    ) -> Result<()> {
        self.execute(Opcode::from(op_sel), operands, outputs)
    }
}
