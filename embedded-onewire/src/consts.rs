//! Command constants for 1-Wire communication.

/// Command to match a specific ROM address in 1-Wire communication
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Command to skip ROM address in 1-Wire communication.
///
/// Every device on the bus treats the following function command as
/// addressed to itself, so reads are only meaningful with a single device.
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;

/// Command to search for devices on the 1-Wire bus
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;
