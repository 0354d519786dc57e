//! # Blog Shared
//!
//! Wire types shared by the server and its HTTP clients (including the test harness).

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
