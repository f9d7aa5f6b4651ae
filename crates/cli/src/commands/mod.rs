//! CLI Commands

pub mod cases;
pub mod generate;
pub mod run;
pub mod summary;
