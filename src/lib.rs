pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod interactive;
pub mod report;
pub mod service;
pub mod summary;
pub mod workbook;
