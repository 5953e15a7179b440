//! Integration test crate for Sonic Forge.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every sonicforge library crate to verify they work together.

#[cfg(test)]
mod session;

#[cfg(test)]
mod playback;

#[cfg(test)]
mod library;

#[cfg(test)]
mod media;
