// src/jobs/mod.rs

//! Background jobs: tracking, opportunistic reaping and the shutdown drain.

pub mod tracker;

pub use tracker::{JobReport, JobTracker};
