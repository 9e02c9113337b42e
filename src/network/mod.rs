pub mod connection;
pub mod transport;

pub use connection::{Connection, ConnectionError};
pub use transport::Transport;
