//! Integration tests for the Choria command line

mod cli_main;
mod show_config;
