//! Command handlers

pub mod config;
pub mod entry;
pub mod status;
pub mod tag;
pub mod theme;
pub mod transfer;
