//! Integration test modules

mod lifecycle;
mod roundtrip;
pub mod test_utils;
