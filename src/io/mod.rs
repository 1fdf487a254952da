pub mod file;

pub use file::{load_dataset, DatasetError};
