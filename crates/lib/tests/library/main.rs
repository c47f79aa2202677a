//! Library integration tests.
//!
//! These drive a shell-script stand-in for the analyzer, so they only run on Unix.

#![cfg(unix)]

mod common;

mod capture_tests;
