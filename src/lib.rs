//! Tuition ledger engine for school fee management.
//!
//! This crate derives each guardian's monthly obligation from the students
//! they are responsible for and the tariff of the school year, reconciles it
//! against approved payments, and reports months covered, per-child
//! coverage and arrears. It also carries the administrator dashboard, form
//! validation, roster code handling, CSV import/export, printable HTML
//! reports and an HTTP API over all of it.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod calculation;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod reports;
pub mod roster;
pub mod validation;
