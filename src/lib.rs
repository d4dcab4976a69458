//! Phone-Address API Library
//!
//! Maps phone numbers to postal addresses behind a small HTTP interface
//! backed by a key-value store. Phones are normalized to E.164 before they
//! reach the store, and each phone holds at most one record.
//!
//! # Modules
//!
//! - `api`: HTTP-layer components.
//! - `core`: Normalization, repository and service logic.
//! - `integrations`: Store backends.
//! - `circuit_breaker`: Circuit breaker guarding backend calls.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Request/response and domain models.
//! - `phone`: Phone number normalization.
//! - `redis_store`: Redis store backend.
//! - `repository`: Phone record repository.
//! - `routes`: Router assembly and OpenAPI document.
//! - `service`: Phone → address service.
//! - `store`: Key-value store adapter and in-memory backend.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod circuit_breaker;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod phone;
pub mod redis_store;
pub mod repository;
pub mod routes;
pub mod service;
pub mod store;
