//! Типы матриц и связанные структуры

use crate::error::{AluError, Result};
use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::operations;

/// Размерность матриц по умолчанию (4x4)
pub const DEFAULT_DIM: usize = 4;

/// Способ заполнения матриц
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixType {
    /// Все элементы равны нулю
    Zeros,
    /// Единичная матрица
    Identity,
    /// Значения 1, 2, ..., N*N построчно
    Sequential,
    /// Значения N*N, ..., 2, 1 построчно
    Reversed,
    /// Равномерное распределение на [-1, 1)
    Random,
    /// Нормальное распределение N(0, 1)
    Gaussian,
}

/// Квадратная матрица N x N из f32 в построчном порядке
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct Matrix<const N: usize = { DEFAULT_DIM }> {
    data: [[f32; N]; N],
}

impl<const N: usize> Matrix<N> {
    const NON_EMPTY: () = assert!(N > 0, "размерность матрицы должна быть больше нуля");

    pub fn zeros() -> Self {
        Self::from_rows([[0.0; N]; N])
    }

    pub fn identity() -> Self {
        Self::from_fn(|i, j| if i == j { 1.0 } else { 0.0 })
    }

    pub fn from_rows(data: [[f32; N]; N]) -> Self {
        let () = Self::NON_EMPTY;
        Self { data }
    }

    /// Строит матрицу по функции от (строка, столбец)
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = [[0.0; N]; N];
        for (i, row) in data.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = f(i, j);
            }
        }
        Self::from_rows(data)
    }

    /// Заполняет матрицу заданного типа
    pub fn generate<R: Rng>(matrix_type: MatrixType, rng: &mut R) -> Self {
        let count = (N * N) as f32;
        match matrix_type {
            MatrixType::Zeros => Self::zeros(),
            MatrixType::Identity => Self::identity(),
            MatrixType::Sequential => Self::from_fn(|i, j| (i * N + j + 1) as f32),
            MatrixType::Reversed => Self::from_fn(|i, j| count - (i * N + j) as f32),
            MatrixType::Random => Self::from_fn(|_, _| rng.gen_range(-1.0..1.0)),
            MatrixType::Gaussian => Self::from_fn(|_, _| StandardNormal.sample(&mut *rng)),
        }
    }

    pub const fn dim(&self) -> usize {
        N
    }

    pub fn rows(&self) -> &[[f32; N]; N] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Плоское представление в построчном порядке
    pub fn as_slice(&self) -> &[f32] {
        self.data.as_flattened()
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        self.data.as_flattened_mut()
    }

    pub fn matmul(&self, rhs: &Self) -> Self {
        let mut out = Self::zeros();
        operations::multiply_into(self.as_slice(), rhs.as_slice(), out.as_mut_slice(), N);
        out
    }

    pub fn scale(&self, alpha: f32) -> Self {
        let mut out = Self::zeros();
        operations::scale_into(self.as_slice(), alpha, out.as_mut_slice());
        out
    }

    /// Деление на скаляр; при alpha == 0.0 результат содержит Inf/NaN
    pub fn divide(&self, alpha: f32) -> Self {
        let mut out = Self::zeros();
        operations::divide_into(self.as_slice(), alpha, out.as_mut_slice());
        out
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros();
        operations::transpose_into(self.as_slice(), out.as_mut_slice(), N);
        out
    }

    pub fn transpose_in_place(&mut self) {
        operations::swap_pairs(self.as_mut_slice(), N);
    }

    /// Определитель разложением Лапласа, O(N!)
    pub fn determinant(&self) -> f32 {
        operations::laplace(self.as_slice(), N)
    }

    pub fn trace(&self) -> f32 {
        operations::trace_of(self.as_slice(), N)
    }

    /// Сравнение с погрешностью; совпадающие бесконечности считаются равными
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        operations::compare_results(self.as_slice(), other.as_slice(), epsilon)
    }
}

impl<const N: usize> Default for Matrix<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> Index<(usize, usize)> for Matrix<N> {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.data[row][col]
    }
}

impl<const N: usize> IndexMut<(usize, usize)> for Matrix<N> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.data[row][col]
    }
}

impl<const N: usize> From<[[f32; N]; N]> for Matrix<N> {
    fn from(data: [[f32; N]; N]) -> Self {
        Self::from_rows(data)
    }
}

/// Плоский буфер длины N*N в построчном порядке
impl<const N: usize> TryFrom<&[f32]> for Matrix<N> {
    type Error = AluError;

    fn try_from(flat: &[f32]) -> Result<Self> {
        crate::ensure_len!(flat, N);
        Ok(Self::from_fn(|i, j| flat[i * N + j]))
    }
}

impl<const N: usize> TryFrom<Vec<Vec<f32>>> for Matrix<N> {
    type Error = AluError;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self> {
        if rows.len() != N {
            return Err(AluError::RowCount { expected: N, found: rows.len() });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != N) {
            return Err(AluError::RaggedRow { row, expected: N, found: r.len() });
        }
        Ok(Self::from_fn(|i, j| rows[i][j]))
    }
}

impl<const N: usize> From<Matrix<N>> for Vec<Vec<f32>> {
    fn from(m: Matrix<N>) -> Self {
        m.data.iter().map(|row| row.to_vec()).collect()
    }
}

impl<const N: usize> TryFrom<&Array2<f32>> for Matrix<N> {
    type Error = AluError;

    fn try_from(array: &Array2<f32>) -> Result<Self> {
        let (rows, cols) = array.dim();
        if rows != N || cols != N {
            return Err(AluError::DimensionMismatch { expected: N * N, found: rows * cols });
        }
        Ok(Self::from_fn(|i, j| array[[i, j]]))
    }
}

impl<const N: usize> From<Matrix<N>> for Array2<f32> {
    fn from(m: Matrix<N>) -> Self {
        Array2::from_shape_fn((N, N), |(i, j)| m.data[i][j])
    }
}
