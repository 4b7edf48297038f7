//! Упаковка f32 в 32-битные слова для транспорта (sc_lv<32> в симуляторе)

use crate::matrix::Matrix;

/// Кодирует матрицу в битовые образы IEEE-754 binary32
pub fn encode<const N: usize>(m: &Matrix<N>) -> [[u32; N]; N] {
    m.rows().map(|row| row.map(f32::to_bits))
}

/// Восстанавливает матрицу из битовых образов, биты сохраняются точно
pub fn decode<const N: usize>(words: &[[u32; N]; N]) -> Matrix<N> {
    Matrix::from_rows(words.map(|row| row.map(f32::from_bits)))
}
