// National Park Explorer - Core Library
// Catalog pipeline (fetch/cache, visitor normalization, join), filter engine,
// selection tree and the interactive shell state machine.

pub mod error;
pub mod config;
pub mod source;         // Park API model + HTTP client
pub mod cache;          // Local snapshot of the API response
pub mod visitors;       // Visitor table + name normalization rules
pub mod catalog;        // Park entities + catalog builder
pub mod filter;         // Progressive filter engine
pub mod tree;           // Selection tree recorder
pub mod loader;         // Cache + visitors + builder in one call
pub mod shell;          // Selection game as a state machine
pub mod views;          // Map/chart data and the browser opener
pub mod plain;          // Line-mode front-end

// Only compile the terminal UI when the TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use error::{ParkError, ParkResult};
pub use config::{Cli, Command, Config};
pub use source::{decode_response, NamedItem, NpsClient, ParkResponse, ParkSource, RawPark};
pub use cache::{CacheStatus, CacheStore};
pub use visitors::{
    load_visitor_table, parse_count, NormalizationRule, Normalizer, RawVisitorRow,
    VisitorCounts, NPS_NAME_RULES,
};
pub use catalog::{build_catalog, Catalog, CatalogBuild, DroppedRecord, Location, Park};
pub use filter::{
    available_activities, available_topics, filter_by_activities, filter_by_state,
    filter_by_topics, StageOutcome,
};
pub use tree::{SelectionStep, SelectionTree, StepId};
pub use loader::{load_catalog, load_catalog_from, LoadedCatalog};
pub use shell::{Effect, Shell, ShellState, Stage};
pub use views::{visitor_ranking, SystemBrowser, UrlOpener};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
