//! Mode routing
//!
//! 目前只有 HTTP server 一种运行模式，`config generate` 在 main 中直接处理。

pub mod server;

pub use server::run_server;
