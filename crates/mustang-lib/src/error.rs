//! Unified error type for the mustang-lib crate.
//!
//! [`MustangError`] wraps module-specific errors (`DeviceError`,
//! `PacketError`, `IdError`) and protocol-level error kinds
//! (`Communication`, `InvalidArgument`, `Config`). `From` impls allow `?` to
//! propagate across module boundaries.

use std::fmt;

use crate::device::DeviceError;
use crate::ids::IdError;
use crate::packet::PacketError;

/// Unified error type for mustang-lib operations.
#[derive(Debug)]
pub enum MustangError {
    /// Transport error (enumeration, open, interrupt transfer).
    Device(DeviceError),
    /// Malformed frame from the amp.
    Packet(PacketError),
    /// Model byte missing from the ID tables.
    Id(IdError),
    /// Operation attempted without an open connection, or the amp's answer
    /// didn't have the expected shape.
    Communication(String),
    /// Caller passed values the protocol can't express.
    InvalidArgument(String),
    /// Standard I/O error (config and settings files).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
}

impl fmt::Display for MustangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MustangError::Device(e) => write!(f, "{e}"),
            MustangError::Packet(e) => write!(f, "Decode error: {e}"),
            MustangError::Id(e) => write!(f, "Decode error: {e}"),
            MustangError::Communication(e) => write!(f, "Communication error: {e}"),
            MustangError::InvalidArgument(e) => write!(f, "Invalid argument: {e}"),
            MustangError::Io(e) => write!(f, "I/O error: {e}"),
            MustangError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for MustangError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MustangError::Device(e) => Some(e),
            MustangError::Packet(e) => Some(e),
            MustangError::Id(e) => Some(e),
            MustangError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeviceError> for MustangError {
    fn from(e: DeviceError) -> Self {
        MustangError::Device(e)
    }
}

impl From<PacketError> for MustangError {
    fn from(e: PacketError) -> Self {
        MustangError::Packet(e)
    }
}

impl From<IdError> for MustangError {
    fn from(e: IdError) -> Self {
        MustangError::Id(e)
    }
}

impl From<std::io::Error> for MustangError {
    fn from(e: std::io::Error) -> Self {
        MustangError::Io(e)
    }
}

/// Crate-level Result alias using [`MustangError`].
pub type Result<T> = std::result::Result<T, MustangError>;
