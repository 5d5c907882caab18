//! DHIS2 destination adapter

pub mod client;

pub use client::Dhis2Client;
