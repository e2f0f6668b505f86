//! Cross-module pipeline tests

mod fixtures;
