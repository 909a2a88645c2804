//! Integration tests for the LEO CDN simulation
//!
//! These tests run complete simulations over temporary workload directories
//! and check the artifacts that downstream tools consume.

#[path = "integration/fixture.rs"]
mod fixture;

#[path = "integration/end_to_end.rs"]
mod end_to_end;
#[path = "integration/fatal_inputs.rs"]
mod fatal_inputs;
#[path = "integration/reproducibility.rs"]
mod reproducibility;
