// 📦 Catalog Loader - cache/fetch + visitor table + join
//
// Any fatal error aborts before a catalog exists, so the filter engine never
// sees a partial catalog.

use crate::cache::{CacheStatus, CacheStore};
use crate::catalog::{build_catalog, Catalog, DroppedRecord};
use crate::config::Config;
use crate::source::{NpsClient, ParkResponse, ParkSource};
use crate::visitors::{load_visitor_table, Normalizer, VisitorCounts};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Everything produced while loading, for the caller to report on
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub visitors: VisitorCounts,
    pub dropped: Vec<DroppedRecord>,
    pub cache_status: CacheStatus,
}

impl LoadedCatalog {
    pub fn unmatched_names(&self) -> Vec<&str> {
        self.catalog.unmatched_names(&self.visitors)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} parks ({} dropped), {} visitor names ({} unmatched, {} rows skipped), {} visitors in 2022",
            self.catalog.len(),
            self.dropped.len(),
            self.visitors.len(),
            self.unmatched_names().len(),
            self.visitors.skipped.len(),
            self.catalog.total_visitors()
        )
    }
}

/// Source that only builds the HTTP client when a fetch is actually needed,
/// so a cached run works without an API key.
struct LazyClient<'a> {
    config: &'a Config,
}

impl ParkSource for LazyClient<'_> {
    fn fetch(&self) -> crate::error::ParkResult<ParkResponse> {
        NpsClient::from_config(self.config)?.fetch()
    }
}

/// Load with the HTTP client as the source
pub fn load_catalog(config: &Config, force_refresh: bool) -> Result<LoadedCatalog> {
    load_catalog_from(config, &LazyClient { config }, force_refresh)
}

/// Load with an explicit source
pub fn load_catalog_from(
    config: &Config,
    source: &dyn ParkSource,
    force_refresh: bool,
) -> Result<LoadedCatalog> {
    let cache = CacheStore::new(&config.cache_path);

    let (response, cache_status) = if force_refresh {
        let response = cache
            .refresh(source)
            .context("Failed to refresh park data")?;
        (response, CacheStatus::Fetched)
    } else {
        cache
            .load_or_fetch(source)
            .context("Failed to load park data")?
    };

    let normalizer = match &config.rules_path {
        Some(path) => Normalizer::from_file(path).context("Failed to load rule table")?,
        None => Normalizer::builtin(),
    };

    let rows = load_visitor_table(&config.visitor_path).context("Failed to load visitor table")?;
    let visitors = normalizer.normalize(&rows);

    let build = build_catalog(&response.data, &visitors);
    let loaded = LoadedCatalog {
        catalog: build.catalog,
        visitors,
        dropped: build.dropped,
        cache_status,
    };

    let unmatched = loaded.unmatched_names().len();
    if unmatched > 0 {
        warn!(unmatched, "Visitor names with no matching park");
    }
    info!(summary = %loaded.summary(), "Catalog ready");

    Ok(loaded)
}

// ============================================================================
// TESTS
// ============================================================================
