//! Integration tests for the daily folder hierarchy and navigator

mod goto_flow;
mod navigation;
mod persistence;
mod sessions;
mod support;
