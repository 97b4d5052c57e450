//! Default values for every configurable knob and rule list

pub const MAX_WORKERS: u32 = 20;
pub const MAX_PAGES_PER_SITE: usize = 1000;
pub const MAX_CRAWL_DEPTH: u32 = 45;
pub const MIN_HTML_LENGTH: usize = 1000;
pub const MAX_RETRIES: u32 = 3;
pub const BACKOFF_BASE_MS: u64 = 1000;
pub const REQUEST_TIMEOUT_SECS: u64 = 50;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DATABASE_PATH: &str = "./site-atlas.db";
pub const SUMMARY_DIR: &str = "./analyzed";

pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".rar", ".tar", ".gz",
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".mp4", ".avi", ".mov", ".mp3",
];

pub const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "linkedin.com",
    "youtube.com",
    "tiktok.com",
    "pinterest.com",
    "tumblr.com",
    "reddit.com",
    "snapchat.com",
    "whatsapp.com",
    "t.me",
    "weibo.com",
    "vk.com",
];

pub const CONTACT_KEYWORDS: &[&str] = &[
    "contact",
    "call us",
    "call",
    "reach us",
    "reach",
    "email",
    "phone",
    "tel",
    "mail",
    "contact us",
];

pub const ABOUT_KEYWORDS: &[&str] = &[
    "about",
    "about us",
    "about the company",
    "about our",
    "who we are",
    "our story",
    "our team",
    "about the team",
];

/// Block, challenge and soft-404 signatures, matched case-insensitively
pub const BLOCK_SIGNATURES: &[&str] = &[
    "520: web server is returning an unknown error",
    "just a moment...",
    "access denied",
    "service unavailable",
    "cloudflare",
    "captcha",
    "security check",
    "page not found",
    "404 error",
    "503 service unavailable",
    "not found",
];

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
