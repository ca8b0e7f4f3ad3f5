mod common;
mod config;
mod logging;
pub mod oracle;
pub mod orchestrator;
mod player;
mod player_ai;
mod player_cli;
pub mod player_node;
pub mod projection;
pub mod protocol;
pub mod readiness;
pub mod relay;
pub mod selection;
pub mod transport;

pub use common::*;
pub use config::*;
pub use logging::init_logging;
pub use oracle::*;
pub use orchestrator::*;
pub use player::*;
pub use player_ai::*;
pub use player_cli::*;
pub use player_node::*;
pub use projection::*;
pub use protocol::*;
pub use readiness::*;
pub use relay::*;
pub use selection::*;
pub use transport::in_memory::InMemoryTransport;
pub use transport::tcp::TcpTransport;
pub use transport::{ClientTransport, RelayTransport, Transport};
