//! This crate provides an interface for communicating with and controlling the BK Precision 168xB series of
//! switching DC power supplies.
//!
//! It supports `no-std` environments by use of the `no_std` feature flag.
//!
//! PSU models which this works with:
//! * 1685B
//! * 1687B
//! * 1688B
//!
//! The supplies speak a fixed-width ASCII protocol over their USB virtual COM port. Every command and every
//! reply line is terminated by a carriage return. Set and output commands get a single `OK` line back, queries
//! get a payload line followed by an `OK` confirmation line.
//!
//! The serial port used for PSU comms should be configured like so:
//! * Baud rate: 9600
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None
//!
//! See [`config::SerialConfig`], which defaults to exactly that. With the `serialport` feature enabled,
//! `serial::SerialTransport` opens a host serial port using it.

#![cfg_attr(feature = "no_std", no_std)]

pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod psu;
pub mod scaling;
#[cfg(all(feature = "serialport", not(feature = "no_std")))]
pub mod serial;
pub mod supply;
pub mod telemetry;
pub mod transport;
pub mod types;

#[cfg(test)]
mod mock_serial;
