//! The alarm decision engine and its observers.

pub mod listener;
pub mod security_service;


pub use listener::{LoggingListener, StatusListener};
pub use security_service::{DEFAULT_CAT_CONFIDENCE_THRESHOLD, SecurityService};
