//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `TransferService`, the single entry point used by
//! both the HTTP API and the CLI. It talks to storage only through the domain
//! ports, so the same logic runs against any storage adapter.

pub mod transfer_service;
