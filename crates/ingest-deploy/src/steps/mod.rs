//! The individual deployment steps, in run order.

pub mod sync;
pub mod envfile;
pub mod install;
pub mod services;
pub mod health;
pub mod ingest;
pub mod logs;
