//! Integration tests driving the channel-bump binary in dry mode

mod helpers;

mod merge_tests;
mod protect_tests;
mod resolve_tests;
