//! Операции над матрицами
//!
//! Все функции работают с плоскими буферами в построчном порядке и явным
//! размером `size`, как и ядра для GPU. Публичные функции проверяют длину
//! буферов на входе; внутренние `*_into` считают её уже проверенной.

use crate::error::{AluError, Result};
use crate::ensure_len;

/// Умножение матриц: C[i][j] = sum_k A[i][k] * B[k][j]
pub fn matrix_multiply(a: &[f32], b: &[f32], c: &mut [f32], size: usize) -> Result<()> {
    ensure_len!(a, size);
    ensure_len!(b, size);
    ensure_len!(c, size);
    multiply_into(a, b, c, size);
    Ok(())
}

pub(crate) fn multiply_into(a: &[f32], b: &[f32], c: &mut [f32], size: usize) {
    for i in 0..size {
        for j in 0..size {
            let mut sum = 0.0f32;
            for k in 0..size {
                sum += a[i * size + k] * b[k * size + j];
            }
            c[i * size + j] = sum;
        }
    }
}

/// Поэлементное умножение на скаляр
pub fn scalar_multiply(a: &[f32], alpha: f32, c: &mut [f32], size: usize) -> Result<()> {
    ensure_len!(a, size);
    ensure_len!(c, size);
    scale_into(a, alpha, c);
    Ok(())
}

pub(crate) fn scale_into(a: &[f32], alpha: f32, c: &mut [f32]) {
    for (dst, &src) in c.iter_mut().zip(a) {
        *dst = src * alpha;
    }
}

/// Поэлементное деление на скаляр.
///
/// Деление на 0.0 не отклоняется: результат содержит ±Inf или NaN по
/// правилам IEEE-754. Если нужны конечные значения, проверяет вызывающий.
pub fn scalar_divide(a: &[f32], alpha: f32, c: &mut [f32], size: usize) -> Result<()> {
    ensure_len!(a, size);
    ensure_len!(c, size);
    divide_into(a, alpha, c);
    Ok(())
}

pub(crate) fn divide_into(a: &[f32], alpha: f32, c: &mut [f32]) {
    if alpha == 0.0 {
        tracing::warn!("деление матрицы на ноль, результат содержит Inf/NaN");
    }
    for (dst, &src) in c.iter_mut().zip(a) {
        *dst = src / alpha;
    }
}

/// Транспонирование в отдельный буфер: C[j][i] = A[i][j]
pub fn transpose(a: &[f32], c: &mut [f32], size: usize) -> Result<()> {
    ensure_len!(a, size);
    ensure_len!(c, size);
    transpose_into(a, c, size);
    Ok(())
}

pub(crate) fn transpose_into(a: &[f32], c: &mut [f32], size: usize) {
    for i in 0..size {
        for j in 0..size {
            c[j * size + i] = a[i * size + j];
        }
    }
}

/// Транспонирование на месте обменом пар (i, j) <-> (j, i) для i < j
pub fn transpose_in_place(m: &mut [f32], size: usize) -> Result<()> {
    ensure_len!(m, size);
    swap_pairs(m, size);
    Ok(())
}

pub(crate) fn swap_pairs(m: &mut [f32], size: usize) {
    for i in 0..size {
        for j in (i + 1)..size {
            m.swap(i * size + j, j * size + i);
        }
    }
}

/// Извлекает минор: матрицу (size-1)x(size-1) без строки `row` и столбца `col`
pub fn submatrix(m: &[f32], size: usize, row: usize, col: usize, out: &mut [f32]) -> Result<()> {
    ensure_len!(m, size);
    if size < 2 || row >= size || col >= size {
        return Err(AluError::IndexOutOfRange { row, col, size });
    }
    ensure_len!(out, size - 1);
    minor_into(m, size, row, col, out);
    Ok(())
}

pub(crate) fn minor_into(m: &[f32], size: usize, row: usize, col: usize, out: &mut [f32]) {
    let mut dst = 0;
    for i in (0..size).filter(|&i| i != row) {
        for j in (0..size).filter(|&j| j != col) {
            out[dst] = m[i * size + j];
            dst += 1;
        }
    }
}

/// Определитель разложением Лапласа по первой строке.
///
/// Рекурсия идёт по текущему размеру минора, от `size` до 1. Сложность
/// O(size!), поэтому функция предназначена для малых матриц (size <= 6).
pub fn determinant(m: &[f32], size: usize) -> Result<f32> {
    ensure_len!(m, size);
    Ok(laplace(m, size))
}

pub(crate) fn laplace(m: &[f32], size: usize) -> f32 {
    if size == 1 {
        return m[0];
    }
    tracing::trace!(size, "разложение по первой строке");

    let mut minor = vec![0.0f32; (size - 1) * (size - 1)];
    let mut det = 0.0f32;
    for j in 0..size {
        minor_into(m, size, 0, j, &mut minor);
        let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
        det += sign * m[j] * laplace(&minor, size - 1);
    }
    det
}

/// След матрицы: сумма диагональных элементов
pub fn trace(m: &[f32], size: usize) -> Result<f32> {
    ensure_len!(m, size);
    Ok(trace_of(m, size))
}

pub(crate) fn trace_of(m: &[f32], size: usize) -> f32 {
    (0..size).map(|i| m[i * size + i]).sum()
}

/// Максимальная поэлементная разница двух буферов одинаковой длины
pub fn max_abs_diff(lhs: &[f32], rhs: &[f32]) -> f32 {
    lhs.iter()
        .zip(rhs)
        .map(|(l, r)| (l - r).abs())
        .fold(0.0f32, f32::max)
}

/// Сравнивает два результата с заданной погрешностью
pub fn compare_results(lhs: &[f32], rhs: &[f32], epsilon: f32) -> bool {
    if lhs.len() != rhs.len() {
        tracing::debug!(lhs = lhs.len(), rhs = rhs.len(), "разная длина результатов");
        return false;
    }

    let diff_count = lhs
        .iter()
        .zip(rhs)
        .filter(|(l, r)| !((*l - *r).abs() <= epsilon || l == r))
        .count();

    if diff_count > 0 {
        tracing::debug!(
            diff_count,
            max_diff = max_abs_diff(lhs, rhs),
            "обнаружены расхождения"
        );
        false
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f32; 16] = [
        1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
    ];

    #[test]
    fn test_multiply_2x2() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        let mut c = [0.0; 4];
        matrix_multiply(&a, &b, &mut c, 2).unwrap();
        assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_multiply_rejects_short_buffer() {
        let a = [1.0; 16];
        let b = [1.0; 15];
        let mut c = [0.0; 16];
        let err = matrix_multiply(&a, &b, &mut c, 4).unwrap_err();
        assert_eq!(err, AluError::DimensionMismatch { expected: 16, found: 15 });
        assert_eq!(c, [0.0; 16]);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(determinant(&[], 0), Err(AluError::EmptyMatrix));
        assert_eq!(trace(&[], 0), Err(AluError::EmptyMatrix));
    }

    #[test]
    fn test_overflowing_size_rejected() {
        // (2^63 + 1)^2 по модулю 2^64 равно 1
        let size = (1usize << 63) + 1;
        assert_eq!(trace(&[7.0], size), Err(AluError::SizeOverflow { size }));
        assert_eq!(determinant(&[7.0], size), Err(AluError::SizeOverflow { size }));
        let mut c = [0.0];
        assert_eq!(transpose(&[7.0], &mut c, size), Err(AluError::SizeOverflow { size }));
        assert_eq!(
            matrix_multiply(&[7.0], &[7.0], &mut c, usize::MAX),
            Err(AluError::SizeOverflow { size: usize::MAX })
        );
    }

    #[test]
    fn test_wrong_length_rejected_by_every_kernel() {
        let short = [1.0f32; 8];
        let mismatch = Err(AluError::DimensionMismatch { expected: 9, found: 8 });
        assert_eq!(determinant(&short, 3), mismatch);
        assert_eq!(trace(&short, 3), mismatch);

        let mut c = [0.0f32; 9];
        assert_eq!(transpose(&short, &mut c, 3), Err(AluError::DimensionMismatch { expected: 9, found: 8 }));
        let mut small_out = [0.0f32; 8];
        assert_eq!(
            transpose(&A[..9], &mut small_out, 3),
            Err(AluError::DimensionMismatch { expected: 9, found: 8 })
        );
        assert_eq!(c, [0.0; 9]);

        let mut in_place = short;
        assert_eq!(
            transpose_in_place(&mut in_place, 3),
            Err(AluError::DimensionMismatch { expected: 9, found: 8 })
        );
        assert_eq!(in_place, short);
    }

    #[test]
    fn test_scalar_divide_by_zero_propagates() {
        let a = [1.0, -1.0, 0.0, 2.0];
        let mut c = [0.0; 4];
        scalar_divide(&a, 0.0, &mut c, 2).unwrap();
        assert_eq!(c[0], f32::INFINITY);
        assert_eq!(c[1], f32::NEG_INFINITY);
        assert!(c[2].is_nan());
        assert_eq!(c[3], f32::INFINITY);
    }

    #[test]
    fn test_transpose_in_place_matches_copy() {
        let mut in_place = A;
        transpose_in_place(&mut in_place, 4).unwrap();
        let mut copied = [0.0; 16];
        transpose(&A, &mut copied, 4).unwrap();
        assert_eq!(in_place, copied);
        assert_eq!(&in_place[0..4], &[1.0, 5.0, 9.0, 13.0]);
    }

    #[test]
    fn test_submatrix_drops_row_and_column() {
        let mut out = [0.0; 9];
        submatrix(&A, 4, 0, 1, &mut out).unwrap();
        assert_eq!(out, [5.0, 7.0, 8.0, 9.0, 11.0, 12.0, 13.0, 15.0, 16.0]);
    }

    #[test]
    fn test_submatrix_rejects_out_of_range() {
        let mut out = [0.0; 9];
        assert_eq!(
            submatrix(&A, 4, 4, 0, &mut out),
            Err(AluError::IndexOutOfRange { row: 4, col: 0, size: 4 })
        );
        let mut small = [0.0; 4];
        assert!(submatrix(&A, 4, 0, 0, &mut small).is_err());
    }

    #[test]
    fn test_determinant_small_sizes() {
        assert_eq!(determinant(&[7.0], 1).unwrap(), 7.0);
        assert_eq!(determinant(&[1.0, 2.0, 3.0, 4.0], 2).unwrap(), -2.0);
        let m3 = [2.0, 0.0, 1.0, 1.0, 3.0, 2.0, 1.0, 1.0, 2.0];
        assert_eq!(determinant(&m3, 3).unwrap(), 6.0);
    }

    #[test]
    fn test_determinant_5x5_diagonal() {
        let mut m = [0.0f32; 25];
        for i in 0..5 {
            m[i * 5 + i] = (i + 1) as f32;
        }
        assert_eq!(determinant(&m, 5).unwrap(), 120.0);
    }

    #[test]
    fn test_determinant_row_swap_flips_sign() {
        let m = [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        assert_eq!(determinant(&m, 3).unwrap(), -1.0);
    }

    #[test]
    fn test_singular_sequence_matrix() {
        assert_eq!(determinant(&A, 4).unwrap(), 0.0);
    }

    #[test]
    fn test_trace() {
        assert_eq!(trace(&A, 4).unwrap(), 34.0);
    }

    #[test]
    fn test_compare_results() {
        assert!(compare_results(&[1.0, 2.0], &[1.0, 2.000001], 1e-5));
        assert!(!compare_results(&[1.0, 2.0], &[1.0, 2.1], 1e-5));
        assert!(!compare_results(&[1.0], &[1.0, 2.0], 1e-5));
        assert!(compare_results(&[f32::INFINITY], &[f32::INFINITY], 1e-5));
        assert_eq!(max_abs_diff(&[1.0, 5.0], &[2.0, 5.5]), 1.0);
    }
}
