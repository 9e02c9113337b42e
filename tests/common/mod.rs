//! Common test utilities shared by the integration tests
//!
//! - `stub_transport`: an in-memory `Transport` that records every call
//! - `mock_server`: a scripted remote console server on a loopback port

#![allow(dead_code)]

pub mod mock_server;
pub mod stub_transport;
