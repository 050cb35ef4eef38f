use thiserror::Error;

use crate::parameter::ParameterKind;
use crate::property::Property;

#[derive(Error, Debug)]
pub enum Error {
    /// A native handle was used after it was released, or a context after it was closed.
    #[error("Native reference no longer valid")]
    NullHandle,
    #[error("Factory error: {0}")]
    Factory(String),
    #[error("No object for code \"{code}\" in the \"{authority}\" authority")]
    NoSuchAuthorityCode { authority: String, code: String },
    #[error("Parameter \"{name}\" does not store a {requested:?} value")]
    InvalidParameterType { name: String, requested: ParameterKind },
    #[error("Index {index} is out of bounds (size {size})")]
    OutOfBounds { index: usize, size: usize },
    #[error("{property:?} is not a {shape} property")]
    PropertyMismatch { property: Property, shape: &'static str },
    #[error("Object cannot be exported in the requested format: {0}")]
    Unformattable(String),
    #[error("Text cannot be parsed: {0}")]
    Unparsable(String),
    #[error("Operation is not invertible: {0}")]
    NonInvertible(String),
    #[error("Transform failed: {0}")]
    Transform(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
    #[error("Invalid string: {0}")]
    InvalidString(#[from] std::ffi::NulError),
}
