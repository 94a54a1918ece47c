//! # Web API Integration Tests
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`;
//! no sockets are opened.
