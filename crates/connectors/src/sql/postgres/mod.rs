pub mod executor;
pub mod metadata;
pub mod params;
pub mod row;
pub(crate) mod utils;
