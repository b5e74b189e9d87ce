//! # iconsync-figma
//!
//! Blocking HTTP implementation of [`iconsync_core::IconSource`] for the
//! Figma REST API.
//!
//! Construct a [`FigmaClient`] from the resolved settings and hand it to the
//! snapshot builder in `iconsync-sync`.

pub mod client;
pub mod response;

pub use client::FigmaClient;
