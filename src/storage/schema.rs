//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Site-Atlas database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs (one invocation, one or more sites)
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- One finalized site map per crawled site
CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    domain TEXT NOT NULL,
    main_url TEXT NOT NULL,
    total_pages INTEGER NOT NULL,
    total_links INTEGER NOT NULL,
    crawl_depth_reached INTEGER NOT NULL,
    complexity TEXT NOT NULL,
    maps_status TEXT NOT NULL,
    primary_map_link TEXT,
    crawled_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sites_domain ON sites(domain);

-- Successfully fetched pages
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id INTEGER NOT NULL REFERENCES sites(id),
    url TEXT NOT NULL,
    status_code INTEGER NOT NULL,
    depth INTEGER NOT NULL,
    title TEXT,
    description TEXT,
    word_count INTEGER NOT NULL,
    page_type TEXT NOT NULL,
    is_about_page INTEGER NOT NULL,
    is_contact_page INTEGER NOT NULL,
    fetch_latency_ms INTEGER NOT NULL,
    fetched_at TEXT NOT NULL,
    UNIQUE(site_id, url)
);

CREATE INDEX IF NOT EXISTS idx_pages_site ON pages(site_id);

-- Classified links, one row per occurrence
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id INTEGER NOT NULL REFERENCES sites(id),
    source_page TEXT NOT NULL,
    url TEXT NOT NULL,
    anchor_text TEXT NOT NULL,
    depth INTEGER NOT NULL,
    link_type TEXT NOT NULL,
    menu_type TEXT NOT NULL,
    is_navigation INTEGER NOT NULL,
    is_footer INTEGER NOT NULL,
    is_contact INTEGER NOT NULL,
    is_about INTEGER NOT NULL,
    is_google_maps INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_links_site ON links(site_id);
CREATE INDEX IF NOT EXISTS idx_links_type ON links(link_type);

-- Map resources per detection channel
CREATE TABLE IF NOT EXISTS map_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id INTEGER NOT NULL REFERENCES sites(id),
    channel TEXT NOT NULL,
    url TEXT NOT NULL,
    is_primary INTEGER NOT NULL DEFAULT 0,
    UNIQUE(site_id, channel, url)
);

-- URLs skipped after their fetch failed for good
CREATE TABLE IF NOT EXISTS failed_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id INTEGER NOT NULL REFERENCES sites(id),
    url TEXT NOT NULL,
    depth INTEGER NOT NULL,
    error_message TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
