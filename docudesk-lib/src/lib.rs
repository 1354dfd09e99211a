//! Document console client library
//!
//! An async client for the folders / documents / call-logs administration
//! API, plus the headless pieces of the console built on it:
//!
//! - [`table`] - generic table model with selection, search and pagination
//! - [`query`] - pagination, sort and URL-synchronized list parameters
//! - [`polling`] - status polling for document processing jobs
//! - [`page`] - list pages, the documents page and call notes

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod page;
pub mod polling;
pub mod query;
pub mod retry;
pub mod table;

mod client;

pub use client::*;
