pub mod build;
pub mod format;
