//! Testing utilities for viewbridge-core.
//!
//! This module provides recording doubles for the collaborator seams so
//! sync behavior can be asserted without a real resource host or remote
//! session.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use viewbridge_core::testing::mocks::{RecordingHost, StaticConnectionProvider};
//!
//! let host = Arc::new(RecordingHost::new());
//! let provider = Arc::new(StaticConnectionProvider::new());
//! // ... construct a ResourceSync against the doubles and assert host.ops()
//! ```

pub mod mocks;

pub use mocks::*;
