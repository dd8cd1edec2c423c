// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the Crewdesk component seams.
//!
//! The HTTP API and the session protocol handler depend only on these traits,
//! so the in-memory store can be swapped for a durable backend and the hosted
//! completion provider can be stubbed in tests without touching callers.

pub mod completion;
pub mod store;

pub use completion::CompletionProvider;
pub use store::Store;
