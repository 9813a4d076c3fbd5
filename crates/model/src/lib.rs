pub mod core;
pub mod entity;
pub mod pagination;
pub mod records;
