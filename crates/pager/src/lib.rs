pub mod codec;
pub mod config;
pub mod error;
pub mod paginator;
pub mod position;
pub mod sort;

pub use config::{HasMoreStrategy, PagerConfig, SharedConfig};
pub use error::{CursorDecodeError, PagerError};
pub use paginator::Paginator;
