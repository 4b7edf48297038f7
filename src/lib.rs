//! Арифметическое устройство для квадратных матриц фиксированного размера (N-ALU)

// Реэкспортируем макросы на уровень крейта
#[macro_use]
mod macros {
    /// Макрос для проверки длины плоского буфера матрицы (size x size)
    #[macro_export]
    macro_rules! ensure_len {
        ($buf:expr, $size:expr) => {{
            let size: usize = $size;
            let len = $buf.len();
            if size == 0 {
                return Err($crate::error::AluError::EmptyMatrix);
            }
            let expected = match size.checked_mul(size) {
                Some(expected) => expected,
                None => return Err($crate::error::AluError::SizeOverflow { size }),
            };
            if len != expected {
                return Err($crate::error::AluError::DimensionMismatch { expected, found: len });
            }
        }};
    }

    /// Макрос для проверки обязательного операнда опкода
    #[macro_export]
    macro_rules! require_operand {
        ($operand:expr, $opcode:expr, $name:literal) => {
            match $operand {
                Some(value) => value,
                None => {
                    return Err($crate::error::AluError::MissingOperand {
                        opcode: $opcode,
                        operand: $name,
                    })
                }
            }
        };
    }
}

pub mod alu;
pub mod error;
pub mod harness;
pub mod matrix;
pub mod utils;

// Реэкспорт основных типов для удобства
pub use alu::{NAlu, Opcode, Operands, Outcome, Outputs};
pub use error::{AluError, Result};
pub use matrix::{Matrix, MatrixType, DEFAULT_DIM};
