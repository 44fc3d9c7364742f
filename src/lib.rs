//! Library exports for the short-link service
//!
//! This module exposes internal components for the binary and for testing.

pub mod config;
pub mod database;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod resolver;
pub mod route;
pub mod service;
pub mod store;
pub mod tools;
