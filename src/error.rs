use thiserror::Error;

use crate::types::PieceId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("piece '{name}' is invalid: {reason}")]
    InvalidPiece { name: String, reason: String },
    #[error("piece '{name}' too wide: {width} with kerf exceeds usable sheet width {usable_width}")]
    PieceTooWide {
        name: String,
        width: f64,
        usable_width: f64,
    },
    #[error("piece '{id}' fits nowhere: {reason}")]
    PieceUnplaceable { id: PieceId, reason: String },
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid job file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PackError>;
