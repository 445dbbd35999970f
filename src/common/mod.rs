//! Shared helpers used across lifecycle components

pub mod fs;
