/// File manipulation utilities.
pub mod file;
