//! Command-line front end for TaxDesk authentication.

pub mod commands;
pub mod config;
pub mod logging;
