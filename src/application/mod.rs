//! Application layer - use cases on top of the domain
//!
//! Services here talk to the outside world only through the ports in
//! [`ports`], so the HTTP layer and tests can plug in their own adapters.

pub mod dto;
pub mod ports;
pub mod services;
