//! Integration test support with mock HTTP server

pub mod mock_server;
