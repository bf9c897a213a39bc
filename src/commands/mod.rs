//! Command implementations for the gropack CLI

pub mod pack;
