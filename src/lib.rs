// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TripKo - member authentication for the travel-booking backend
//!
//! Issues HS256 access/refresh token pairs, verifies bearer tokens and
//! resolves them into member principals loaded from the credential store.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, validation and member resolution
//! - `config` - Environment configuration
//! - `storage` - File-backed member store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod telemetry;
