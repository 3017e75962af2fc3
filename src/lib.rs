pub mod alignment;
pub mod errors;
mod runner;
pub mod seq;

pub use crate::alignment::{Alignment, DEFAULT_GAP_CHARS};
pub use crate::errors::StockholmError;
pub use crate::seq::stockholm::{parse, parse_all, sniff, validate, ParseOptions};
pub use crate::seq::writer::{FastaOptions, WriteOptions};

pub fn run() -> Result<(), StockholmError> {
    runner::run()
}
