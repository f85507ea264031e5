//! GitHub repository host: REST for refs and merges, GraphQL for branch
//! protection and ref listing

pub mod client;
pub mod protection;

pub use client::GitHubClient;
