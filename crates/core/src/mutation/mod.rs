pub mod types;

pub use types::{FieldUpdate, PageWrite, WriteOperation};
