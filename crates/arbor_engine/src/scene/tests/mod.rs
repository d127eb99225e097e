//! Integration tests for full scene frames
