//! Mustang — USB control protocol for Fender Mustang amplifiers.

pub mod config;
pub mod device;
pub mod error;
pub mod ids;
pub mod models;
pub mod mustang;
pub mod packet;
pub mod protocol;
pub mod serializer;
pub mod settings;

pub use error::MustangError;
pub use mustang::{Mustang, connect};
