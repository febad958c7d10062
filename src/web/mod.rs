//! HTTP surface for the battle service.
//!
//! Exposes the two battle operations as JSON endpoints:
//!
//! - `POST /battle/start`  with `{character, monster, clientId}`
//! - `POST /battle/action` with `{clientId, action}`
//! - `GET  /health`
//!
//! ## Usage
//!
//! ```sh
//! ./target/debug/knave-battle --serve        # PORT env var or 3000
//! ./target/debug/knave-battle --serve=8080   # Custom port
//! ```

mod error;
mod routes;
mod server;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use server::{Server, ServerConfig};
