//! Pages and where they come from.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A page fetched from the wiki.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub title: String,
    /// Full page markup as served by the site.
    pub html: String,
    pub author: Option<String>,
    /// Author of a rewrite, when the current text replaced an older one.
    pub rewrite_author: Option<String>,
}

impl Page {
    pub fn new(url: impl Into<String>, title: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_rewrite_author(mut self, author: impl Into<String>) -> Self {
        self.rewrite_author = Some(author.into());
        self
    }
}

/// Looks up pages by absolute URL.
///
/// Failures (typically [`Error::PageNotFound`]) are not retried by the
/// book builder; they abort the operation that needed the page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<Page>;
}

impl PageSource for HashMap<String, Page> {
    fn fetch(&self, url: &str) -> Result<Page> {
        self.get(url)
            .cloned()
            .ok_or_else(|| Error::PageNotFound(url.to_string()))
    }
}

impl<F> PageSource for F
where
    F: Fn(&str) -> Result<Page>,
{
    fn fetch(&self, url: &str) -> Result<Page> {
        self(url)
    }
}
