pub mod file;
pub mod transformation;

pub use file::{File, MediaType};
pub use transformation::Transformation;
