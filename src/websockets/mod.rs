// Push side of the service: read-only viewer sockets fed by the broadcast hub.

pub use handler::{live_socket_handler, match_socket_handler};
pub use socket::{SocketError, SocketWrapper, ViewerConnection};

mod handler;
mod socket;
