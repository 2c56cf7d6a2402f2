//! Distribution Engine for payroll cost allocation
//!
//! This crate distributes each profile's recorded wage, employer contribution
//! and hours across the projects it is allocated to, per calendar month,
//! and reports the unallocated remainder and free capacity.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
