//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::crawler::CrawlOutcome;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus, SiteRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

const SITE_COLUMNS: &str = "id, run_id, domain, main_url, total_pages, total_links, \
     crawl_depth_reached, complexity, maps_status, primary_map_link, crawled_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?).unwrap_or(RunStatus::Running),
    })
}

fn site_from_row(row: &Row<'_>) -> rusqlite::Result<SiteRecord> {
    Ok(SiteRecord {
        id: row.get(0)?,
        run_id: row.get(1)?,
        domain: row.get(2)?,
        main_url: row.get(3)?,
        total_pages: row.get::<_, i64>(4)? as u64,
        total_links: row.get::<_, i64>(5)? as u64,
        crawl_depth_reached: row.get(6)?,
        complexity: row.get(7)?,
        maps_status: row.get(8)?,
        primary_map_link: row.get(9)?,
        crawled_at: row.get(10)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Site Results =====

    fn save_site(&mut self, run_id: i64, outcome: &CrawlOutcome) -> StorageResult<i64> {
        let map = &outcome.site_map;
        let info = &map.maps_info;
        let now = Utc::now().to_rfc3339();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO sites (run_id, domain, main_url, total_pages, total_links,
             crawl_depth_reached, complexity, maps_status, primary_map_link, crawled_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                run_id,
                map.domain,
                map.main_url,
                map.total_pages as i64,
                map.total_links as i64,
                map.crawl_depth_reached,
                map.complexity.as_str(),
                info.integration_status.as_str(),
                info.primary_link,
                now
            ],
        )?;
        let site_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO pages (site_id, url, status_code, depth, title, description,
                 word_count, page_type, is_about_page, is_contact_page, fetch_latency_ms, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for page in &outcome.pages {
                stmt.execute(params![
                    site_id,
                    page.url.as_str(),
                    page.status,
                    page.depth,
                    page.title,
                    page.description,
                    page.word_count as i64,
                    page.page_type.as_str(),
                    page.is_about_page,
                    page.is_contact_page,
                    page.fetch_latency_ms as i64,
                    page.fetched_at.to_rfc3339()
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO links (site_id, source_page, url, anchor_text, depth, link_type,
                 menu_type, is_navigation, is_footer, is_contact, is_about, is_google_maps)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            let links = map
                .internal_links
                .iter()
                .chain(&map.external_links)
                .chain(&map.social_links)
                .chain(&map.contact_links)
                .chain(&map.maps_links);
            for link in links {
                stmt.execute(params![
                    site_id,
                    link.source_page,
                    link.url.as_str(),
                    link.anchor_text,
                    link.depth,
                    link.link_type.as_str(),
                    link.menu_type.as_str(),
                    link.is_navigation,
                    link.is_footer,
                    link.is_contact,
                    link.is_about,
                    link.is_google_maps
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO map_links (site_id, channel, url, is_primary)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            let channels = [
                ("direct", &info.direct),
                ("iframe", &info.iframe),
                ("script", &info.script),
                ("structured_data", &info.structured_data),
                ("contact_page", &info.contact_page),
            ];
            for (channel, urls) in channels {
                for url in urls {
                    let is_primary = info.primary_link.as_deref() == Some(url.as_str());
                    stmt.execute(params![site_id, channel, url, is_primary])?;
                }
            }

            let mut stmt = tx.prepare(
                "INSERT INTO failed_urls (site_id, url, depth, error_message) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for failure in &outcome.failures {
                stmt.execute(params![
                    site_id,
                    failure.url.as_str(),
                    failure.depth,
                    failure.error.to_string()
                ])?;
            }
        }

        tx.commit()?;
        Ok(site_id)
    }

    fn get_site(&self, site_id: i64) -> StorageResult<SiteRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM sites WHERE id = ?1", SITE_COLUMNS),
                params![site_id],
                site_from_row,
            )
            .optional()?
            .ok_or(StorageError::SiteNotFound(site_id))
    }

    fn get_sites_for_run(&self, run_id: i64) -> StorageResult<Vec<SiteRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM sites WHERE run_id = ?1 ORDER BY id",
            SITE_COLUMNS
        ))?;

        let sites = stmt
            .query_map(params![run_id], site_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sites)
    }

    // ===== Statistics =====

    fn count_pages(&self, site_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE site_id = ?1",
            params![site_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_links_by_type(&self, site_id: i64) -> StorageResult<HashMap<String, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT link_type, COUNT(*) FROM links WHERE site_id = ?1 GROUP BY link_type",
        )?;

        let counts = stmt
            .query_map(params![site_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(counts)
    }

    fn get_map_links(&self, site_id: i64) -> StorageResult<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT channel, url FROM map_links WHERE site_id = ?1 ORDER BY id")?;

        let links = stmt
            .query_map(params![site_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }
}
