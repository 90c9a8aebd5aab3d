//! Branford: content API, upload service and admin gate for the gym website.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
