//! wikidex - clustered index builder for markdown wikis
//!
//! Reads a folder of markdown pages, turns each page into a feature vector
//! (outbound link membership plus TF-IDF weights of its paragraphs), groups
//! the pages with hierarchical agglomerative clustering and renders a
//! markdown index of the groups.
//!
//! # Main Modules
//!
//! - [`parser`] - markdown pages to [`parser::Document`]
//! - [`vectorizer`] - link vocabulary, text model and the feature snapshot
//! - [`cluster`] - normalization, linkage and flat cuts
//! - [`index`] - grouped markdown listing
//! - [`pipeline`] - the two batch stages end to end
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wikidex::config::AppConfig;
//! use wikidex::pipeline::{index_from_features, vectorize_wiki};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = AppConfig::default();
//! vectorize_wiki(Path::new("/home/me/wiki"), &config.features_path)?;
//! let report = index_from_features(
//!     &config.features_path,
//!     &config.cluster_options(),
//!     config.index_level,
//!     &config.render_options(),
//! )?;
//! println!("{}", report.markdown);
//! # Ok(())
//! # }
//! ```

pub mod cluster;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod vectorizer;

pub use config::AppConfig;
pub use error::{Result, WikidexError};
pub use parser::Document;
pub use vectorizer::{FeatureTable, Featurizer, TextModel, Vocabulary};
