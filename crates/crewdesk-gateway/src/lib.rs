// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Crewdesk support service.
//!
//! Serves the stateless REST API (FAQ management, CRM lookup, popular
//! searches) and the per-connection WebSocket channel that carries the typed
//! session protocol. All state lives behind the [`Store`] and
//! [`CompletionProvider`] trait objects in [`AppState`].
//!
//! [`Store`]: crewdesk_core::Store
//! [`CompletionProvider`]: crewdesk_core::CompletionProvider
//! [`AppState`]: server::AppState

pub mod handlers;
pub mod server;
pub mod session;
pub mod ws;

pub use server::{start_server, AppState, ServerConfig};
pub use session::SessionHandler;
