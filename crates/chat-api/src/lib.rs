//! Dreambot Chat API
//!
//! Inbound boundary of the bot: receives already-parsed chat command
//! events over JSON-RPC and routes them through an explicit dispatch
//! table. Connection lifecycle and payload parsing live in the external
//! chat connector, not here.

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use dispatch::{CommandHandler, CommandRegistry};
pub use handler::ImagineHandler;
pub use server::{RpcServer, RpcServerConfig};
