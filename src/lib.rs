//! Marquee - movie lookup with type-ahead search
//!
//! A small HTTP backend that proxies title searches to OMDb and aggregates
//! full records with TMDB cast photos, plus a terminal client that searches
//! as you type.
//!
//! # Modules
//!
//! - `models` - Wire types shared by server and client
//! - `api` - Provider clients (OMDb, TMDB) and the backend client
//! - `service` - Search proxy and detail aggregator
//! - `server` - axum router, handlers and API errors
//! - `app` - Typeahead controller and terminal app state
//! - `ui` - ratatui rendering
//! - `cli` / `commands` - argument parsing and one-shot handlers

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod server;
pub mod service;
pub mod ui;

// Re-export commonly used types
pub use models::{ActorRef, MovieDetail, Pong, SearchResponse, SpikeReport, SuggestionItem};

pub use api::{BackendClient, LookupKey, MovieBackend, OmdbClient, TmdbClient};
pub use app::{Action, App, Message, Typeahead};
pub use config::Config;
pub use server::{create_router, AppContext};
