//! Service backing the job application lifecycle: eligibility checks,
//! status transitions, document expiry sweeps, and the notifications they
//! derive.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
