//! HTTP handlers

pub mod status;
pub mod upload;
