#[path = "../common/mod.rs"]
mod common;

mod aero_tests;
