//! Git operations abstraction

pub mod system_git;

pub use system_git::SystemGit;
