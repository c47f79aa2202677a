//! cxxcap-lib: analyzer capture of C-family translation units
//!
//! This crate runs a static analyzer's capture front-end over one compiler
//! invocation and reports which files the result depends on:
//! - `flags`: ordered assembly of preprocessor, search-path and compiler flags
//! - `argfile`: escaped `@file` argument lists, written atomically
//! - `step`: the fail-fast step sequence that drives the analyzer
//! - `depfile`: parsing of compiler-emitted make dependency files
//! - `headers`: normalization and verification of reported headers
//! - `relevance`: the cache-relevance predicate built from verified headers
//! - `capture`: the build rule tying all of the above together

pub mod argfile;
pub mod capture;
pub mod config;
pub mod consts;
pub mod depfile;
pub mod flags;
pub mod headers;
pub mod relevance;
pub mod step;
pub mod target;
pub mod util;
