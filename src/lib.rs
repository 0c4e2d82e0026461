// ABOUTME: Library crate for merged-branches exposing the discovery pipeline, tree cache and TUI

#![allow(missing_docs)]

pub mod actions;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod git;
pub mod tree;
