//! parcel-notify library
//!
//! Outbound notification dispatch for ParcelForward: business events are
//! rendered per channel and delivered over email, SMS and push.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod notifications;

pub use notifications::Notifier;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
