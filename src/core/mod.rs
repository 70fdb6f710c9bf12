//! Core module - Content model, store and queries

pub mod backend;
pub mod content;
pub mod error;
pub mod prefs;
pub mod query;
pub mod search;
pub mod snippet;
pub mod store;
