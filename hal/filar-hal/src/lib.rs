//! Filar Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the Filar serial core is written
//! against. Chip-specific implementations wrap their interrupt-driven UART
//! peripheral and tick source; the core never touches a register.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (mainline tasks)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  filar-core (channels, queues, bridge)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  filar-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!        chip UART driver + tick source
//! ```
//!
//! # Traits
//!
//! - [`transport::Transport`] - asynchronous single-byte serial transfers
//! - [`clock::Clock`] - monotonic millisecond time source

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod transport;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use transport::{PortId, StartError, Transport};
