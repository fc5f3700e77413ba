//! Core library for filemover.
//!
//! This crate holds everything the `filemover` CLI drives:
//! - `keywords` and `name_format` for picking and naming event folders
//! - `archive` and `ingest` for getting files into those folders
//! - `calendar` and `suggest` for asking a calendar provider which events exist
//! - `config` for the JSON settings files

pub mod archive;
pub mod calendar;
pub mod config;
pub mod constants;
pub mod error;
pub mod ingest;
pub mod keywords;
pub mod name_format;
pub mod paths;
pub mod suggest;

pub use error::{FileMoverError, FileMoverResult};
