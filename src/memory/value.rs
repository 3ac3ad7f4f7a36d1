//! Tagged scalar values
//!
//! This module defines [`ScalarValue`], the runtime representation of a single
//! element of a simulated variable. Unlike raw byte copies, values are tagged
//! with their type, so writes pattern-match on the variable's declared
//! [`DataType`] instead of trusting an untyped pointer and a width.
//!
//! Values are stored in the physical buffer as little-endian bytes, one
//! element at a time; [`ScalarValue::to_le_bytes`] and
//! [`ScalarValue::from_le_bytes`] are the two ends of that encoding.

use super::DataType;
use std::fmt;

/// One element of a simulated variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Char(u8),
    Short(i16),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
}

impl ScalarValue {
    /// The declared type this value belongs to
    pub fn data_type(&self) -> DataType {
        match self {
            ScalarValue::Char(_) => DataType::Char,
            ScalarValue::Short(_) => DataType::Short,
            ScalarValue::Int(_) => DataType::Int,
            ScalarValue::Float(_) => DataType::Float,
            ScalarValue::Long(_) => DataType::Long,
            ScalarValue::Double(_) => DataType::Double,
        }
    }

    /// Parse a command token according to the variable's declared type.
    ///
    /// `char` takes the first byte of the token; the numeric types go through
    /// the usual string parsers.
    pub fn parse(data_type: DataType, token: &str) -> Result<Self, String> {
        match data_type {
            DataType::Char => token
                .bytes()
                .next()
                .map(ScalarValue::Char)
                .ok_or_else(|| "empty char value".to_string()),
            DataType::Short => token
                .parse::<i16>()
                .map(ScalarValue::Short)
                .map_err(|_| format!("invalid short value '{}'", token)),
            DataType::Int => token
                .parse::<i32>()
                .map(ScalarValue::Int)
                .map_err(|_| format!("invalid int value '{}'", token)),
            DataType::Float => token
                .parse::<f32>()
                .map(ScalarValue::Float)
                .map_err(|_| format!("invalid float value '{}'", token)),
            DataType::Long => token
                .parse::<i64>()
                .map(ScalarValue::Long)
                .map_err(|_| format!("invalid long value '{}'", token)),
            DataType::Double => token
                .parse::<f64>()
                .map(ScalarValue::Double)
                .map_err(|_| format!("invalid double value '{}'", token)),
        }
    }

    /// Encode this value as little-endian bytes, `width()` bytes long
    pub fn to_le_bytes(self) -> Vec<u8> {
        match self {
            ScalarValue::Char(b) => vec![b],
            ScalarValue::Short(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Int(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Float(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Long(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Double(v) => v.to_le_bytes().to_vec(),
        }
    }

    /// Decode a value of `data_type` from little-endian bytes.
    ///
    /// `bytes` must hold at least `data_type.width()` bytes; short input
    /// decodes as if zero-padded.
    pub fn from_le_bytes(data_type: DataType, bytes: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        let width = (data_type.width() as usize).min(bytes.len());
        buf[..width].copy_from_slice(&bytes[..width]);
        match data_type {
            DataType::Char => ScalarValue::Char(buf[0]),
            DataType::Short => ScalarValue::Short(i16::from_le_bytes([buf[0], buf[1]])),
            DataType::Int => {
                ScalarValue::Int(i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]))
            }
            DataType::Float => {
                ScalarValue::Float(f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]))
            }
            DataType::Long => ScalarValue::Long(i64::from_le_bytes(buf)),
            DataType::Double => ScalarValue::Double(f64::from_le_bytes(buf)),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Char(b) => write!(f, "{}", *b as char),
            ScalarValue::Short(v) => write!(f, "{}", v),
            ScalarValue::Int(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{:.6}", v),
            ScalarValue::Long(v) => write!(f, "{}", v),
            ScalarValue::Double(v) => write!(f, "{:.6}", v),
        }
    }
}
