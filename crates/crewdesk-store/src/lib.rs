// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`Store`] implementation for the Crewdesk support service.
//!
//! Nothing here survives a process restart; the [`Store`] trait exists so a
//! durable backend can replace [`MemoryStore`] without touching the gateway.
//!
//! [`Store`]: crewdesk_core::Store

pub mod memory;

pub use memory::MemoryStore;
