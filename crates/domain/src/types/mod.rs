//! Domain types and models

pub mod operator;

pub use operator::{HashType, Operator, OperatorKind};
