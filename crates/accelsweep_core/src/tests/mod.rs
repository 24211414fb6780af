//! Integration tests for the simulation-invocation pipeline.
//!
//! Component-level tests live next to their modules; these exercise the
//! runner end-to-end against a fake simulator harness built from shell
//! scripts in a temp directory.
