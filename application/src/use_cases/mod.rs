//! Use case implementations

pub mod run_job;
