//! Core of the property marketplace: listing search, the access guard, moderation, and
//! messaging, plus the HTTP routers that expose them.

pub mod access;
pub mod accounts;
pub mod config;
pub mod error;
pub mod hub;
pub mod listings;
pub mod memory;
pub mod messaging;
pub mod moderation;
pub mod repository;
pub mod snapshot;
pub mod telemetry;

#[cfg(test)]
mod fixtures;

pub use hub::{api_router, Backend, PropertyHub};
