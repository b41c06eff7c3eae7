//! Scenario-based verification of the retry engine

pub mod report;
pub mod runner;
pub mod scenarios;
pub mod service;
