//! Choria: Orchestrator Command Line
//!
//! Front-end for the Choria orchestrator. Resolves an agent/action pair from the
//! command line, lists installed agents from their DDL files, reports the resolved
//! configuration and SSL state, and hands requests to an RPC dispatcher.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod ddl;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod resolver;
