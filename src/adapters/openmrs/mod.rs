//! OpenMRS source adapter

pub mod client;

pub use client::OpenMrsClient;
