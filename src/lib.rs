pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod http;
pub mod kv;
pub mod logging;
pub mod maintenance;
pub mod middleware;
pub mod notification;
pub mod router;
pub mod sidecar;
pub mod supabase;
pub mod ui;

pub use config::Config;
pub use error::AdventError;
pub use router::{AdventState, advent_router};
