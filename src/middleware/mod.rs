// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View guards (authentication, race scoping).

pub mod auth;
pub mod race_scope;

pub use auth::{require_auth, Mount, ProtectedView};
pub use race_scope::scope_to_race;
