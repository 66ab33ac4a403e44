// twinview-api: Async Rust client for the iTwin Platform iModels API

pub mod client;
pub mod environment;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ITwinClient;
pub use environment::ServerEnvironment;
pub use error::Error;
pub use models::{IModel, NamedVersion};
pub use transport::TransportConfig;
