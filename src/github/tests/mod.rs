//! Unit tests for reference parsing in the GitHub module.
