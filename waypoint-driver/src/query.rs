//! Locator value types.
//!
//! Queries identify nodes by strategy + string and carry no node identity of
//! their own: the DOM node a query resolves to may be destroyed and recreated
//! between calls, so callers re-resolve on every use instead of caching
//! handles across scroll/click/navigation boundaries.

use std::fmt;

/// Locator strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum By {
    Css,
    XPath,
    Id,
    LinkText,
}

/// A re-resolvable element descriptor: strategy + locator string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementQuery {
    pub by: By,
    pub locator: String,
}

impl ElementQuery {
    pub fn css(locator: impl Into<String>) -> Self {
        Self {
            by: By::Css,
            locator: locator.into(),
        }
    }

    pub fn xpath(locator: impl Into<String>) -> Self {
        Self {
            by: By::XPath,
            locator: locator.into(),
        }
    }

    pub fn id(locator: impl Into<String>) -> Self {
        Self {
            by: By::Id,
            locator: locator.into(),
        }
    }

    pub fn link_text(locator: impl Into<String>) -> Self {
        Self {
            by: By::LinkText,
            locator: locator.into(),
        }
    }
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match self.by {
            By::Css => "css",
            By::XPath => "xpath",
            By::Id => "id",
            By::LinkText => "link-text",
        };
        write!(f, "{strategy}:{}", self.locator)
    }
}
