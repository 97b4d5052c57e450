//! JSON export of site maps and page metadata

use crate::output::OutputResult;
use crate::page::PageRecord;
use crate::sitemap::SiteMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Longest page file stem before the index suffix is appended
const MAX_STEM_LEN: usize = 96;

/// Writes the site map as pretty-printed JSON
///
/// Repeated URLs within each link category are dropped, keeping the first
/// occurrence.
pub fn write_sitemap_json(site_map: &SiteMap, output_path: &Path) -> OutputResult<()> {
    write_json(&site_map.deduplicated(), output_path)
}

/// Writes the metadata of one page as pretty-printed JSON
///
/// The raw page content is not part of the export.
pub fn write_page_json(page: &PageRecord, output_path: &Path) -> OutputResult<()> {
    write_json(page, output_path)
}

fn write_json<T: serde::Serialize + ?Sized>(value: &T, output_path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Builds a file-system safe name for a page export
///
/// The name is `<domain>_<path>_<index>` with path separators and other
/// punctuation replaced by `_`, or `<domain>_page_<index>` for the root page.
/// The index is zero-padded to three digits and keeps names unique.
pub fn page_file_name(domain: &str, page: &PageRecord, index: usize) -> String {
    let domain = sanitize(domain);
    let mut path = page.url.path().trim_matches('/').to_string();
    if let Some(query) = page.url.query() {
        path.push('_');
        path.push_str(query);
    }

    let mut stem = if path.is_empty() {
        format!("{}_page", domain)
    } else {
        format!("{}_{}", domain, sanitize(&path))
    };
    if stem.len() > MAX_STEM_LEN {
        let mut cut = MAX_STEM_LEN;
        while !stem.is_char_boundary(cut) {
            cut -= 1;
        }
        stem.truncate(cut);
    }

    format!("{}_{:03}", stem, index)
}

/// Replaces everything but ASCII alphanumerics, `.` and `-` with `_`
pub(crate) fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
