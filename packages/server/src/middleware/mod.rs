//! Request extractors that run before a handler body.

pub mod auth;
