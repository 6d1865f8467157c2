//! Shared helpers for the Gemini adapter tests.

pub mod mock_server;
