// Library target for integration tests in tests/.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can drive the game core via `pocketpr::session::*` / `pocketpr::catalog::*`.
// Most host code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: the game core
pub mod catalog;
pub mod config;
pub mod engine;
pub mod session;

// Private: host modules, compiled here so their unit tests run under the lib target too
mod app;
mod event;
mod telemetry;
mod ui;
