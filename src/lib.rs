//! QuickNode infrastructure provider.
//!
//! Manages QuickNode endpoints, their security options and whitelisted IPs
//! through the QuickNode REST API, and exposes chains and endpoints as read-only
//! data sources.
//!
//! # Overview
//!
//! - **ProviderService trait**: the host-facing contract (schema, configure,
//!   plan, CRUD, import, data sources)
//! - **QuickNodeProvider**: the implementation, dispatching to a registry of
//!   resource and data source kinds
//! - **Client**: a thin REST client for the QuickNode API
//! - **Mapper**: security options and endpoint translation, with defaults
//! - **Schema & validation**: attribute schemas, defaults and diagnostics
//! - **Logging**: integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use quicknode_provider::{init_logging, ProviderService, QuickNodeProvider};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!
//!     let provider = QuickNodeProvider::new(env!("CARGO_PKG_VERSION"));
//!     let diagnostics = provider
//!         .configure(json!({"endpoint": "https://api.quicknode.com/v0"}))
//!         .await?;
//!     assert!(diagnostics.is_empty(), "set QUICKNODE_API_KEY");
//!
//!     let plan = provider
//!         .plan(
//!             "quicknode_endpoint",
//!             None,
//!             json!({"chain": "eth", "network": "mainnet", "label": "primary"}),
//!             json!({}),
//!         )
//!         .await?;
//!     let state = provider.create("quicknode_endpoint", plan.planned_state).await?;
//!     println!("{}", state["http_url"]);
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! | Attribute  | Environment variable  |
//! |------------|-----------------------|
//! | `endpoint` | `QUICKNODE_ENDPOINT`  |
//! | `api_key`  | `QUICKNODE_API_KEY`   |
//!
//! Explicit configuration wins over the environment. Both values are required.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod models;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use client::Client;
pub use config::{ProviderConfig, ResolvedConfig};
pub use data_sources::{DataSource, DataSourceKind};
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{QuickNodeProvider, TYPE_NAME};
pub use resources::{Resource, ResourceKind};
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{AttributeChange, ImportedResource, PlanResult, ProviderMetadata};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
