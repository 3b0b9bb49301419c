//! Integration tests: real providers against a local mock upstream.

mod service;
