//! Command-line front end for Ignition.
//!
//! The binary is a thin layer over the `ignition` crate: it resolves the
//! workspace, layers configuration, drives one request and reports the result.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;
