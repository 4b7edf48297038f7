//! Вывод матриц в консоль

use super::types::Matrix;
use prettytable::{Cell, Row, Table};
use std::fmt;

impl<const N: usize> Matrix<N> {
    /// Таблица для вывода через `printstd()`
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        for row in self.rows() {
            table.add_row(Row::new(
                row.iter().map(|v| Cell::new(&format!("{:.3}", v))).collect(),
            ));
        }
        table
    }
}

impl<const N: usize> fmt::Display for Matrix<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(1);
        for row in self.rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{:>10.*}", precision, v)).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
