//! Error types for MintLedger

use crate::ledger::{Amount, ClassId};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    NotAdministrator,
    UnknownTokenClass(ClassId),
    InsufficientBalance {
        class_id: ClassId,
        requested: Amount,
        available: Amount,
    },
    ArrayLengthMismatch {
        left: usize,
        right: usize,
    },
    ArithmeticOverflow,
    TransfersDisabled,
    EmptyName,
    InvalidAddress(String),
    IoError(String),
    SerializationError(String),
    ConfigError(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::NotAdministrator => write!(f, "Caller is not the administrator"),
            LedgerError::UnknownTokenClass(class_id) => {
                write!(f, "Unknown token class: {}", class_id)
            }
            LedgerError::InsufficientBalance {
                class_id,
                requested,
                available,
            } => write!(
                f,
                "Insufficient balance for class {}: requested {}, available {}",
                class_id, requested, available
            ),
            LedgerError::ArrayLengthMismatch { left, right } => {
                write!(f, "Batch array length mismatch: {} vs {}", left, right)
            }
            LedgerError::ArithmeticOverflow => write!(f, "Balance arithmetic overflow"),
            LedgerError::TransfersDisabled => write!(f, "Transfers are disabled"),
            LedgerError::EmptyName => write!(f, "Ledger name cannot be empty"),
            LedgerError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            LedgerError::IoError(msg) => write!(f, "IO error: {}", msg),
            LedgerError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            LedgerError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::IoError(err.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for LedgerError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        LedgerError::SerializationError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
