//! Infrastructure - ports, external service adapters, and the session store.

pub mod completion;
pub mod gateway;
pub mod ports;
pub mod sessions;

pub use completion::{CompletionClient, CompletionConfig};
pub use gateway::GatewayClient;
pub use ports::{CompletionError, CompletionPort, DispatchError, DispatchPort};
pub use sessions::SessionStore;
