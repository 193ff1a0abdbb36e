//! HTTP request descriptor and the transport the load-testing engine drives.
mod client;
mod request;
mod transport;


pub use client::ClientSettings;
pub use request::RequestSpec;
pub use transport::{ReqwestTransport, Transport};
