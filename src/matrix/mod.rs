//! Модуль для работы с матрицами
//! 
//! Предоставляет:
//! - Тип матрицы фиксированного размера
//! - Операции над матрицами (плоские буферы с явным размером)
//! - Вывод матриц в консоль

mod display;
mod types;
pub mod operations;

pub use types::{Matrix, MatrixType, DEFAULT_DIM};
pub use operations::{compare_results, max_abs_diff};
