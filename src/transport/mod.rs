//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! Request<Bytes> (+ RequestOptions extension)
//!     → client.rs (reqwest execute, buffer body)
//!     → Response<Bytes>
//!       or TransportError (Status carries the response)
//! ```

pub mod client;
pub mod error;
pub mod options;

pub use client::ReqwestTransport;
pub use error::TransportError;
pub use options::RequestOptions;
