//! # Recipebook Architecture
//!
//! Recipebook is the **host-independent core of a recipe book app**. It keeps
//! recipes in a local store, mirrors them in memory for rendering, and models
//! the screen (cards, modals, forms, listeners) as plain Rust state. A host,
//! be it a browser shell, a terminal or a test, renders that state and feeds
//! user input back as raw events.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host (main.rs for the CLI, tests/ for scenarios)           │
//! │  - Turns user input into RawEvents, renders ViewState       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Controller (controller.rs) + View (view/)                  │
//! │  - Listener registry maps RawEvents to typed Intents        │
//! │  - Intents become repository mutations and view updates     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repository (repository/) + Cache (cache.rs)                │
//! │  - Cache first, synchronously; store writes queued behind   │
//! │  - Cache change notifications drive view reconciliation     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Async PersistentStore trait                              │
//! │  - FileStore (production), MemoryStore (testing)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Below the host, code never writes to stdout/stderr, never exits the
//! process and never assumes a terminal. Diagnostics go through `tracing`.
//!
//! ## Testing Strategy
//!
//! 1. **Units**: cache, repository, validation, view and listener logic are
//!    tested in place against [`store::memory::MemoryStore`].
//! 2. **Scenarios** (`tests/end_to_end.rs`): whole user flows driven through
//!    [`controller::Controller::handle_event`].
//! 3. **CLI** (`tests/cli.rs`): the binary against a temporary data dir.
//!
//! ## Module Overview
//!
//! - [`app`]: Startup: connect, restore, render
//! - [`controller`]: Intent routing
//! - [`view`]: Screen state, events, listeners, object URLs
//! - [`repository`]: Mutation entry point and write-behind worker
//! - [`cache`]: In-memory recipe collection with change notification
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Recipe`, `Photo`, `RecipeId`)
//! - [`validation`]: Form drafts and their validation
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod app;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod repository;
pub mod store;
pub mod validation;
pub mod view;
