// SPDX-License-Identifier: MIT

//! Readstack: backend API for a personal book collection.
//!
//! Authenticated users register, log in, and manage private book records
//! (title, author, notes, rating, reading status, optional cover image).
//! Every book operation is scoped to the owning user.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod validation;

use config::Config;
use db::FirestoreDb;
use services::CoverStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub covers: CoverStore,
}
