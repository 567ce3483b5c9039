//! Command-line client for the NFT program.
//!
//! - Address and payload input parsing
//! - Persisted configuration (program id, signer, network)
//! - Workflow service over a transaction submitter
//! - Interactive menu and one-shot subcommands

pub mod cli;
pub mod config;
pub mod hex;
pub mod inspect;
pub mod menu;
pub mod metadata;
pub mod parse;
pub mod service;
pub mod submit;
