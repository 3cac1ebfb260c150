pub mod answerer;
pub mod client;
pub mod config;
pub mod llm;
pub mod logging;
pub mod provider;
pub mod search;
pub mod server;
pub mod session;
pub mod tui;
pub mod utils;

pub use answerer::{Answer, SearchAnswerer, ServiceError};
pub use client::{ClientError, ServiceConnection};
pub use provider::{ErrorKind, ProviderError};
pub use session::{ChatTurn, Session, SubmitOutcome};
