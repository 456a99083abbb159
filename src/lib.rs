pub mod cli;
pub mod clipboard;
pub mod config;
pub mod errors;
pub mod form;
pub mod generate;
pub mod log;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod schema;
pub mod session;
pub mod settings;
pub mod storage;
pub mod ux;
pub mod wizard;
