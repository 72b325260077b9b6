//! Defines the `Error` type for the pearl library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PearlError>;

#[derive(Debug, Error)]
pub enum PearlError {
    /// Represents an incomplete assignment where a complete assignment was required.
    #[error("missing assignments to the required variables")]
    IncompleteAssignment,

    /// Represents an error where a certain constraint on a scope was not satisfied
    #[error("provided scope did not satisfy constraints")]
    InvalidScope,

    /// Represents an error where there was a parent variable expected, but not found
    #[error("missing a parent from the model")]
    MissingParent,

    /// Represents a variable that was present multiple times in a situation where it should
    /// only have been present once
    #[error("a variable was encountered twice")]
    DuplicateVariable,

    /// Represents the situation when we expected a CPD but did not receive one
    #[error("requires a conditional probability distribution")]
    NotACpd,

    /// Exactly what it sounds like
    #[error("encountered division by zero")]
    DivideByZero,

    /// There is not enough data provided
    #[error("not enough data has been provided")]
    NotEnoughData,

    /// An edge operation would have made the structure cyclic
    #[error("edge {0} -> {1} would create a cycle")]
    CyclicStructure(String, String),

    /// A column or node name that is not part of the dataset, structure or model
    #[error("unknown column or node `{0}`")]
    UnknownVariable(String),

    /// A value that was never observed for the column during training
    #[error("value `{value}` was never observed for column `{column}`")]
    UnknownState { column: String, value: String },

    /// Predicted and actual sequences must be the same length
    #[error("length mismatch: {predicted} predicted values, {actual} actual values")]
    LengthMismatch { predicted: usize, actual: usize },

    #[error("failed to read tabular input: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize or deserialize the model: {0}")]
    Serde(#[from] serde_json::Error),

    /// A general error with the given description
    #[error("{0}")]
    General(String),
}
