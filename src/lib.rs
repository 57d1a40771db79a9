//! Sigex - a process runner with layered environments and secret injection.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── mod           # Flag definitions and top-level execute
//! │   └── output        # Terminal output helpers
//! ├── env               # Environment composition (batches, merge rules)
//! ├── resolvers/        # Secret token resolution
//! │   ├── mod           # Resolver trait, chain dispatch, driver
//! │   ├── gcp           # GCP Secret Manager backend
//! │   ├── aws           # AWS Secrets Manager backend
//! │   ├── rot13         # ROT13 demo backend
//! │   └── default       # Pass-through terminal resolver
//! ├── exec              # Executable lookup and process replacement
//! └── error             # Error types
//! ```
//!
//! # Features
//!
//! - Layered environment composition: process env, `.env` files, CLI literals
//! - Tokenized secret values (`sigex-secret-<platform>://...`) resolved
//!   in-memory, never written to disk
//! - Pluggable resolver chain with GCP, AWS, and ROT13 backends
//! - True process replacement on Unix: the target command takes over the pid

pub mod cli;
pub mod env;
pub mod error;
pub mod exec;
pub mod resolvers;
