#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # embedded-onewire
//! A no-std implementation of the 1-Wire protocol.
//!
//! This crate provides a trait-based interface for 1-Wire communication, allowing you to implement the protocol on various platforms.
//! [OneWire] trait defines the basic operations required for 1-Wire communication, such as resetting the bus, writing and reading bytes, and writing and reading bits.
//!
//! The crate also provides the ROM search algorithm for discovering devices on the 1-Wire bus, implemented in
//! [OneWireSearch] on top of a caller-owned [SearchState], and the CRC-8 used to verify ROM codes and data
//! frames, [OneWireCrc].

pub mod consts;
mod error;
mod search;
mod traits;
mod utils;
pub use consts::{ONEWIRE_MATCH_ROM_CMD, ONEWIRE_SEARCH_CMD, ONEWIRE_SKIP_ROM_CMD};
pub use error::OneWireError;
pub use search::{OneWireSearch, SearchState};
pub use traits::{OneWire, OneWireStatus};
pub use utils::OneWireCrc;

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
