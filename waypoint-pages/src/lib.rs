//! Page façades and the journey orchestrator.
//!
//! Each page is an independent value object composed from the waiter and
//! executor primitives plus page-specific query constants, with no
//! inheritance chain. The journey sequences page assertions strictly in order and
//! short-circuits on the first failure, since each step assumes the page
//! state left by its predecessor.

pub mod careers;
pub mod home;
pub mod journey;
pub mod listing;

#[cfg(test)]
pub(crate) mod testutil;

pub use careers::CareersPage;
pub use home::HomePage;
pub use journey::{Journey, JourneyState, JourneyStep};
pub use listing::JobListingPage;

use waypoint_driver::Browser;

/// Accessibility heuristic shared by the page façades: true when the page
/// title or URL contains any of the markers, case-insensitively. Advisory,
/// not an assertion by itself: ambiguity and driver errors yield false,
/// never an error.
pub(crate) async fn url_or_title_contains<B: Browser>(browser: &B, markers: &[&str]) -> bool {
    let title = match browser.page_title().await {
        Ok(title) => title.to_lowercase(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read page title");
            String::new()
        }
    };
    let url = match browser.current_url().await {
        Ok(url) => url.to_lowercase(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read current url");
            String::new()
        }
    };

    markers.iter().any(|marker| {
        let marker = marker.to_lowercase();
        title.contains(&marker) || url.contains(&marker)
    })
}
