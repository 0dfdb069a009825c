//! Thin integration layer over the 2Chat WhatsApp API: list groups for a
//! phone number, walk paginated message history, and run resilient
//! title-filtered searches across many numbers.

pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod export;
pub mod history;
pub mod models;
pub mod search;
pub mod server;
