//! Core type definitions used across the crate.

mod enums;
mod timestamp;
mod value;

pub use enums::*;
pub use timestamp::*;
pub use value::*;

pub use rust_decimal::Decimal;
pub use uuid::Uuid as Guid;
