#![forbid(unsafe_code)]

//! yaap: argument declaration shorthand over clap.
//!
//! Arguments declared with [`ValueKind::Path`] come back from a parse as
//! absolute paths, resolved against the directory of the `--config` file
//! that supplied them (or the working directory). Groups, mutually exclusive
//! groups and switch sets are declared through [`ArgumentDeclarer`], which the
//! parser and every group implement alike.

pub mod config;
pub mod declare;
pub mod error;
pub mod parsed;
pub mod parser;
pub mod resolve;

// Public API
pub use config::{ParserOptions, CONFIG_DEST};
pub use declare::{
    Argument, ArgumentDeclarer, ArgumentGroup, Cardinality, MutexGroup, MutexSwitch, SwitchOption,
    ValueKind,
};
pub use error::{Result, YaapError};
pub use parsed::{ParsedArgs, Value};
pub use parser::ArgParser;
