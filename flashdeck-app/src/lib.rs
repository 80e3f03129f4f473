pub mod cli;
pub mod config;
pub mod logging;
pub mod shell;
pub mod transfer;
