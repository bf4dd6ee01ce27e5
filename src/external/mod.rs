//! Shared clients for outbound provider calls

pub mod client;

pub use client::HTTP_CLIENT;
