//! Ошибки арифметического устройства

use crate::alu::Opcode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AluError {
    /// Плоский буфер не соответствует размеру size x size
    #[error("неверная размерность: ожидалось {expected} элементов, получено {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("неверное число строк: ожидалось {expected}, получено {found}")]
    RowCount { expected: usize, found: usize },

    /// Строка матрицы имеет неверную длину
    #[error("строка {row}: ожидалось {expected} элементов, получено {found}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    /// Минор вне матрицы (или матрица 1x1, у которой миноров нет)
    #[error("минор ({row}, {col}) не существует для матрицы {size}x{size}")]
    IndexOutOfRange { row: usize, col: usize, size: usize },

    /// size * size не помещается в usize
    #[error("размер {size}x{size} слишком велик")]
    SizeOverflow { size: usize },

    #[error("матрица размера 0x0 не поддерживается")]
    EmptyMatrix,

    #[error("для операции {opcode:?} требуется операнд {operand}")]
    MissingOperand { opcode: Opcode, operand: &'static str },

    #[error("неизвестное имя операции: {0}")]
    UnknownOpcodeName(String),

    #[error("сервис ALU остановлен")]
    ServiceStopped,
}

pub type Result<T> = std::result::Result<T, AluError>;
