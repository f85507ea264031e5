//! Core decision logic and local collaborators

pub mod channel;
pub mod error;
pub mod manifest;
pub mod options;
pub mod package_manager;
pub mod ports;
pub mod propagate;
pub mod resolver;
pub mod vcs;
pub mod version;
