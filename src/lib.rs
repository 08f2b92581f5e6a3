//! idscan library: capture, extraction, and rendering of identity card fields.

pub mod cli;
pub mod config;
pub mod extraction;
pub mod models;
pub mod server;
pub mod utils;
