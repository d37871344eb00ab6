//! Test Utilities and Mocks
//!
//! A scripted HTTP backend, recording platform fakes and project fixtures
//! shared by the integration tests.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

// Re-exports for convenience
pub use fixtures::{credentials, unused_port, ProjectFixture};
pub use mock_backend::{MockBackend, RecordedRequest};
pub use mock_platform::{SpawnRecord, TestPlatform};
