//! Common test utilities for choropleth.
//!
//! This module provides shared utilities for the end-to-end map tests.

#![allow(dead_code)]

pub mod assertions;
pub mod image_utils;
pub mod test_data;
