mod default_client;
mod error;
mod page;
mod transport;

pub use crate::default_client::SearchHttpClient;
pub use crate::default_client::SearchRequestBuilder;
pub use crate::error::TransportError;
pub use crate::page::SearchPage;
pub use crate::transport::DEFAULT_BASE_URL;
pub use crate::transport::HttpSearchTransport;
pub use crate::transport::SearchTransport;
