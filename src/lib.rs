pub mod auth;
pub mod browser;
pub mod cli;
pub mod common;
pub mod config;
pub mod course;
pub mod downloader;
pub mod parser;
