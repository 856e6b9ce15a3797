//! LeanERP Inventory Backend Library
//!
//! A small inventory/ERP backend: items, stock movements, purchase orders,
//! a simulated day counter, and a naive reorder-planning heuristic, exposed
//! over HTTP and backed by SQLite.

pub mod application;
pub mod config;
pub mod domain;
pub mod persistence;
