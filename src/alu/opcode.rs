//! Коды операций N-ALU

use crate::error::AluError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Селектор операции
///
/// В JSON принимаются имена в snake_case и короткие имена (`det`, `matmul`, ...).
/// Числовой селектор понимает только `FromStr` и `From<u8>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    /// 0: C = A x B
    #[serde(alias = "matmul")]
    #[serde(alias = "mul")]
    MatrixMultiply,
    /// 1: C = A * alpha
    #[serde(alias = "scale")]
    #[serde(alias = "smul")]
    ScalarMultiply,
    /// 2: C = A / alpha
    #[serde(alias = "divide")]
    #[serde(alias = "sdiv")]
    ScalarDivide,
    /// 3: C = A^T
    #[serde(alias = "t")]
    Transpose,
    /// 4: scalar = det(A)
    #[serde(alias = "det")]
    Determinant,
    /// 5: scalar = tr(A)
    #[serde(alias = "tr")]
    Trace,
    /// Любой другой селектор: выходы обнуляются
    Unknown(u8),
}

impl Opcode {
    pub const ALL: [Opcode; 6] = [
        Opcode::MatrixMultiply,
        Opcode::ScalarMultiply,
        Opcode::ScalarDivide,
        Opcode::Transpose,
        Opcode::Determinant,
        Opcode::Trace,
    ];

    /// Числовой селектор, как на входе op_sel
    pub fn code(self) -> u8 {
        match self {
            Opcode::MatrixMultiply => 0,
            Opcode::ScalarMultiply => 1,
            Opcode::ScalarDivide => 2,
            Opcode::Transpose => 3,
            Opcode::Determinant => 4,
            Opcode::Trace => 5,
            Opcode::Unknown(code) => code,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::MatrixMultiply => "matmul",
            Opcode::ScalarMultiply => "scale",
            Opcode::ScalarDivide => "divide",
            Opcode::Transpose => "transpose",
            Opcode::Determinant => "det",
            Opcode::Trace => "trace",
            Opcode::Unknown(_) => "unknown",
        }
    }

    /// Результат операции - скаляр (иначе матрица)
    pub fn yields_scalar(self) -> bool {
        matches!(self, Opcode::Determinant | Opcode::Trace)
    }
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Self {
        match code {
            0 => Opcode::MatrixMultiply,
            1 => Opcode::ScalarMultiply,
            2 => Opcode::ScalarDivide,
            3 => Opcode::Transpose,
            4 => Opcode::Determinant,
            5 => Opcode::Trace,
            other => Opcode::Unknown(other),
        }
    }
}

impl FromStr for Opcode {
    type Err = AluError;

    /// Принимает короткое имя, имя в snake_case или числовой селектор
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u8>() {
            return Ok(Opcode::from(code));
        }
        match s.to_ascii_lowercase().as_str() {
            "matmul" | "mul" | "matrix_multiply" => Ok(Opcode::MatrixMultiply),
            "scale" | "smul" | "scalar_multiply" => Ok(Opcode::ScalarMultiply),
            "divide" | "sdiv" | "scalar_divide" => Ok(Opcode::ScalarDivide),
            "transpose" | "t" => Ok(Opcode::Transpose),
            "det" | "determinant" => Ok(Opcode::Determinant),
            "trace" | "tr" => Ok(Opcode::Trace),
            _ => Err(AluError::UnknownOpcodeName(s.to_string())),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Unknown(code) => write!(f, "unknown({})", code),
            op => f.write_str(op.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from(op.code()), op);
        }
        assert_eq!(Opcode::from(6), Opcode::Unknown(6));
        assert_eq!(Opcode::from(255).code(), 255);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("det".parse::<Opcode>().unwrap(), Opcode::Determinant);
        assert_eq!("Matrix_Multiply".parse::<Opcode>().unwrap(), Opcode::MatrixMultiply);
        assert_eq!("2".parse::<Opcode>().unwrap(), Opcode::ScalarDivide);
        assert_eq!("9".parse::<Opcode>().unwrap(), Opcode::Unknown(9));
        assert!(matches!("inverse".parse::<Opcode>(), Err(AluError::UnknownOpcodeName(_))));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Opcode::ScalarDivide).unwrap(), "\"scalar_divide\"");
        let op: Opcode = serde_json::from_str("{\"unknown\":7}").unwrap();
        assert_eq!(op, Opcode::Unknown(7));
    }

    #[test]
    fn test_json_accepts_short_names() {
        for op in Opcode::ALL {
            let json = format!("\"{}\"", op.name());
            assert_eq!(serde_json::from_str::<Opcode>(&json).unwrap(), op);
            assert_eq!(json.trim_matches('"').parse::<Opcode>().unwrap(), op);
        }
        assert_eq!(serde_json::from_str::<Opcode>("\"tr\"").unwrap(), Opcode::Trace);
        assert!(serde_json::from_str::<Opcode>("\"4\"").is_err());
    }
}
