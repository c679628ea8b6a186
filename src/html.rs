//! # HTML Asset Checker
//!
//! Quick structural sanity check of a landing page: local asset references that do
//! not exist, block tags that do not balance, pictographs left in the markup and
//! identifiers from removed features that are still referenced.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::HtmlCheckConfig;
use crate::error::{AssetError, Result};

static OPEN_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:div|section|header|footer|main|nav|article)[\s>]").expect("valid regex")
});
static CLOSE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:div|section|header|footer|main|nav|article)>").expect("valid regex")
});
static ASSET_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:src|poster)=["'](assets/[^"']+)["']"#).expect("valid regex")
});

/// Findings for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlReport {
    pub line_count: usize,
    pub pictographs: Vec<char>,
    pub open_blocks: usize,
    pub close_blocks: usize,
    /// Unique `assets/...` references, sorted.
    pub assets: BTreeSet<String>,
    pub missing_assets: Vec<String>,
    /// `(pattern, occurrences)` for leftover identifiers that still appear.
    pub leftovers: Vec<(String, usize)>,
}

impl HtmlReport {
    pub fn is_balanced(&self) -> bool {
        self.open_blocks == self.close_blocks
    }

    /// Missing assets and unbalanced block tags fail the check; the rest is informational.
    pub fn is_ok(&self) -> bool {
        self.missing_assets.is_empty() && self.is_balanced()
    }
}

/// Analyse `html` without touching the filesystem; `exists` decides whether a reference resolves.
pub fn analyze(html: &str, leftover_patterns: &[String], exists: impl Fn(&str) -> bool) -> HtmlReport {
    let assets: BTreeSet<String> = ASSET_ATTR
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect();
    let missing_assets = assets.iter().filter(|a| !exists(a.as_str())).cloned().collect();

    let leftovers = leftover_patterns
        .iter()
        .map(|p| (p.clone(), html.matches(p.as_str()).count()))
        .filter(|(_, n)| *n > 0)
        .collect();

    HtmlReport {
        line_count: html.matches('\n').count() + 1,
        pictographs: html.chars().filter(|c| is_pictograph(*c)).collect(),
        open_blocks: OPEN_BLOCK.find_iter(html).count(),
        close_blocks: CLOSE_BLOCK.find_iter(html).count(),
        assets,
        missing_assets,
        leftovers,
    }
}

/// Emoji and other-symbol characters that should not appear in the page copy.
///
/// Approximates Unicode category `So` with the blocks page copy actually picks
/// symbols up from; a stray `So` code point outside them (e.g. in Braille or
/// CJK symbol blocks) is not counted.
fn is_pictograph(c: char) -> bool {
    matches!(c as u32,
        0x00A9 | 0x00AE        // (c) (r)
        | 0x2122 | 0x2139      // trade mark, information source
        | 0x2300..=0x23FF      // misc technical (watch, hourglass, alarm clock)
        | 0x25A0..=0x25FF      // geometric shapes
        | 0x2600..=0x27BF      // misc symbols, dingbats
        | 0x2B00..=0x2BFF      // arrows & symbols
        | 0x1F000..=0x1FAFF)   // emoji planes
}

/// Read the configured page and check it against the site root.
pub fn check_html(config: &HtmlCheckConfig) -> Result<HtmlReport> {
    config.validate()?;
    let html = fs::read_to_string(&config.html_path)
        .map_err(|e| AssetError::io_at("reading page", &config.html_path, e))?;
    let root: PathBuf = config.site_root.clone();
    Ok(analyze(&html, &config.leftover_patterns, |asset| root.join(asset).exists()))
}
