//! Ecosystem adapters - clients for the external service mesh plus the
//! local standalone suite

mod client;
mod event_stream;
mod local;

pub use client::{EcosystemClient, EcosystemError};
pub use event_stream::{HttpEventSink, LoggingEventSink};
pub use local::LocalEcosystemSuite;
