//! Deployment sequencer for the device-ingest stack.
//!
//! Mirrors a working tree into the production directory, installs its Python
//! dependencies, restarts the API and worker services, and proves the result
//! end to end with a health fetch and a dry-run ingest request. An optional
//! smoke step writes one synthetic record through the real ingest path.

pub mod config;
pub mod constants;
pub mod epoch;
pub mod error;
pub mod exec;
pub mod http;
pub mod lock;
pub mod paths;
pub mod retry;
pub mod sequencer;
pub mod steps;
