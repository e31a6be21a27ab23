//! Browser capability boundary and the resilient interaction layer.
//!
//! The [`Browser`] trait abstracts the element-query/click/script primitives
//! of a WebDriver session; [`WebDriverBrowser`] is the fantoccini-backed
//! implementation. On top of it sit [`ElementWaiter`] (bounded condition
//! polling) and [`InteractionExecutor`] (actions with scripted fallback),
//! which every page façade composes.

pub mod browser;
pub mod error;
pub mod executor;
pub mod query;
pub mod waiter;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

pub use browser::Browser;
pub use error::DriverError;
pub use executor::{InteractionExecutor, InteractionResult};
pub use query::{By, ElementQuery};
pub use waiter::{ElementWaiter, WaitCondition, WaitOutcome, WaitTimings};
pub use webdriver::WebDriverBrowser;
