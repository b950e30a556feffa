//! JSON book manifests.
//!
//! A manifest describes one book: its metadata, the wiki it comes from, the
//! pages that may be included and how they are grouped into sections. Page
//! markup lives either inline or in files next to the manifest.
//!
//! ```json
//! {
//!   "metadata": { "title": "Tales", "authors": ["Editor"] },
//!   "site": "http://www.scp-wiki.net",
//!   "pages": [
//!     { "url": "http://www.scp-wiki.net/a", "title": "Alpha", "file": "a.html", "author": "Alice" }
//!   ],
//!   "sections": [
//!     { "title": "Intro", "urls": ["http://www.scp-wiki.net/a"] }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::book::{BookBuilder, Uid};
use crate::error::{Error, Result};
use crate::export::Metadata;
use crate::source::{Page, PageSource};
use crate::util::{decode_text, extract_encoding_hint};

/// A parsed book manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub metadata: ManifestMetadata,
    /// Site origin prefixed to relative links.
    pub site: String,
    #[serde(default)]
    pub pages: Vec<PageRecord>,
    /// URLs eligible for inclusion. Defaults to every page URL.
    #[serde(default)]
    pub heap: Option<Vec<String>>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    /// URLs added at the top level after all sections.
    #[serde(default)]
    pub root_urls: Vec<String>,
    /// Directory page files are relative to.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestMetadata {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}

/// One page known to the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    /// Markup file, relative to the manifest.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Inline markup, used when no file is given.
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub rewrite_author: Option<String>,
}

/// A section header with its pages and nested sections.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    pub title: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

impl Manifest {
    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut manifest = Self::from_json(&text)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    /// Parse and validate manifest JSON. Page files resolve against the
    /// current directory until `base_dir` is set.
    pub fn from_json(text: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.site.is_empty() {
            return Err(Error::InvalidManifest("site must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for record in &self.pages {
            if record.file.is_none() && record.html.is_none() {
                return Err(Error::InvalidManifest(format!(
                    "page {} has neither file nor html",
                    record.url
                )));
            }
            if !seen.insert(record.url.as_str()) {
                return Err(Error::InvalidManifest(format!(
                    "page {} is listed twice",
                    record.url
                )));
            }
        }
        Ok(())
    }

    pub fn book_metadata(&self) -> Metadata {
        let meta = &self.metadata;
        let mut metadata = Metadata::new(meta.title.as_str())
            .with_language(meta.language.as_str())
            .with_identifier(meta.identifier.as_str());
        for author in &meta.authors {
            metadata = metadata.with_author(author.as_str());
        }
        if let Some(description) = &meta.description {
            metadata = metadata.with_description(description.as_str());
        }
        metadata
    }

    /// Lay out the book structure: sections in order, then root URLs.
    pub fn assemble(&self) -> BookBuilder {
        let mut builder = match &self.heap {
            Some(heap) => BookBuilder::new(heap.iter().cloned()),
            None => BookBuilder::new(self.pages.iter().map(|p| p.url.clone())),
        };
        for section in &self.sections {
            add_section(&mut builder, section, None);
        }
        for url in &self.root_urls {
            builder.add_url(url, None);
        }
        builder
    }

    /// Page source backed by this manifest's records.
    pub fn source(&self) -> ManifestSource {
        ManifestSource {
            base_dir: self.base_dir.clone(),
            records: self
                .pages
                .iter()
                .map(|p| (p.url.clone(), p.clone()))
                .collect(),
        }
    }
}

// A section whose own URLs were all placed elsewhere is skipped, and its
// subsections attach to its parent instead.
fn add_section(builder: &mut BookBuilder, section: &SectionSpec, parent: Option<Uid>) {
    let header = builder.new_section(&section.title, &section.urls, parent);
    if header.is_none() {
        log::debug!("Skipping empty section {:?}", section.title);
    }
    for sub in &section.sections {
        add_section(builder, sub, header.or(parent));
    }
}

/// Serves pages from manifest records, reading markup files on demand.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    base_dir: PathBuf,
    records: HashMap<String, PageRecord>,
}

impl PageSource for ManifestSource {
    fn fetch(&self, url: &str) -> Result<Page> {
        let record = self
            .records
            .get(url)
            .ok_or_else(|| Error::PageNotFound(url.to_string()))?;

        let html = match (&record.file, &record.html) {
            (Some(file), _) => {
                let bytes = std::fs::read(self.base_dir.join(file))?;
                decode_text(&bytes, extract_encoding_hint(&bytes)).into_owned()
            }
            (None, Some(html)) => html.clone(),
            (None, None) => return Err(Error::PageNotFound(url.to_string())),
        };

        Ok(Page {
            url: record.url.clone(),
            title: record.title.clone(),
            html,
            author: record.author.clone(),
            rewrite_author: record.rewrite_author.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "metadata": { "title": "Tales", "authors": ["Editor"] },
        "site": "https://site",
        "pages": [
            { "url": "https://site/a", "title": "Alpha", "html": "<p>a</p>", "author": "Alice" },
            { "url": "https://site/b", "title": "Beta", "file": "b.html" },
            { "url": "https://site/c", "title": "Gamma", "html": "<p>c</p>" },
            { "url": "https://site/d", "title": "Delta", "html": "<p>d</p>" }
        ],
        "sections": [
            { "title": "Intro", "urls": ["https://site/a", "https://site/b"],
              "sections": [ { "title": "Deeper", "urls": ["https://site/c"] } ] },
            { "title": "Repeat", "urls": ["https://site/a"] }
        ],
        "root_urls": ["https://site/d", "https://site/a"]
    }"#;

    #[test]
    fn test_parse_defaults() {
        let manifest = Manifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.metadata.language, "en");
        assert!(manifest.heap.is_none());

        let metadata = manifest.book_metadata();
        assert_eq!(metadata.title, "Tales");
        assert_eq!(metadata.authors, vec!["Editor"]);
    }

    #[test]
    fn test_assemble_layout() {
        let builder = Manifest::from_json(MANIFEST).unwrap().assemble();
        let tree = builder.tree();

        let titles: Vec<_> = tree
            .flatten()
            .into_iter()
            .map(|uid| tree.node(uid).unwrap().title.clone())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Intro",
                "https://site/a",
                "https://site/b",
                "Deeper",
                "https://site/c",
                "https://site/d",
            ]
        );
        assert_eq!(tree.roots().len(), 2);
        assert!(builder.pending().is_empty());
    }

    #[test]
    fn test_explicit_heap_limits_pages() {
        let json = MANIFEST.replace(
            r#""root_urls""#,
            r#""heap": ["https://site/c"], "root_urls""#,
        );
        let builder = Manifest::from_json(&json).unwrap().assemble();
        let tree = builder.tree();

        // Intro has no eligible URL of its own, so Deeper moves to the top.
        let root = tree.node(tree.roots()[0]).unwrap();
        assert_eq!(root.title, "Deeper");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_rejects_page_without_markup() {
        let json = r#"{ "metadata": { "title": "T" }, "site": "https://site",
            "pages": [ { "url": "https://site/a", "title": "A" } ] }"#;
        assert!(matches!(
            Manifest::from_json(json),
            Err(Error::InvalidManifest(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Manifest::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_source_reads_files_relative_to_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, MANIFEST).unwrap();
        // "café" in Windows-1252
        std::fs::write(dir.path().join("b.html"), b"<p>caf\xe9</p>").unwrap();

        let source = Manifest::load(&path).unwrap().source();
        let page = source.fetch("https://site/b").unwrap();
        assert_eq!(page.title, "Beta");
        assert_eq!(page.html, "<p>café</p>");

        let page = source.fetch("https://site/a").unwrap();
        assert_eq!(page.html, "<p>a</p>");
        assert_eq!(page.author.as_deref(), Some("Alice"));

        assert!(matches!(
            source.fetch("https://site/zzz"),
            Err(Error::PageNotFound(_))
        ));
    }
}
