use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info, warn};
use waypoint_common::observability::{init_logging, LogConfig};
use waypoint_common::{TestOutcome, TestStatus};
use waypoint_config::{WaypointConfig, WaypointConfigLoader};
use waypoint_driver::{WaitTimings, WebDriverBrowser};
use waypoint_pages::{CareersPage, HomePage, JobListingPage, Journey, JourneyState, JourneyStep};
use waypoint_telemetry::{InfluxSink, OutcomeReporter, SnapshotWriter};

/// End-to-end verification of the careers journey, from the landing page
/// through the filtered job listing to the external application redirect.
#[derive(Parser)]
#[command(name = "waypoint", version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "waypoint.yaml")]
    config: PathBuf,

    /// Run the browser without a visible window.
    #[arg(long)]
    headless: bool,

    /// Name the outcome record is tagged with.
    #[arg(long, default_value = "insider_career_journey")]
    test_name: String,

    /// Skip the telemetry write even when the config enables it.
    #[arg(long)]
    no_telemetry: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first (env wins over file), then logging per the resolved config.
    let cfg: WaypointConfig = WaypointConfigLoader::new().with_file(&cli.config).load()?;
    init_logging(LogConfig {
        emit_stderr: true,
        ..LogConfig::default()
    })?;

    let headless = cli.headless || cfg.webdriver.headless;
    let browser = WebDriverBrowser::connect(&cfg.webdriver.endpoint, headless).await?;
    info!(endpoint = %cfg.webdriver.endpoint, headless, "webdriver session established");

    let timings = WaitTimings {
        default_timeout: Duration::from_secs(cfg.waits.default_timeout_secs),
        poll_interval: Duration::from_millis(cfg.waits.poll_interval_ms),
    };

    let started_at = Utc::now();
    let state = run_journey(&browser, &cfg, timings).await;
    let completed_at = Utc::now();

    let status = if state.passed() {
        TestStatus::Passed
    } else {
        TestStatus::Failed
    };
    let outcome = TestOutcome::new(cli.test_name.clone(), status, started_at, completed_at);

    if let JourneyState::Failed { step, name, reason } = &state {
        error!(step = step + 1, name = *name, reason = %reason, "journey failed");
        SnapshotWriter::new(&cfg.screenshots.dir)
            .capture(&browser, &cli.test_name)
            .await;
    }

    if cfg.telemetry.enabled && !cli.no_telemetry {
        match InfluxSink::new(&cfg.telemetry.endpoint, &cfg.telemetry.database) {
            Ok(sink) => OutcomeReporter::new(sink).report(&outcome).await,
            Err(e) => warn!(error = %e, "telemetry sink unavailable, outcome not recorded"),
        }
    }

    if let Err(e) = browser.close().await {
        warn!(error = %e, "browser session did not close cleanly");
    }

    if outcome.passed() {
        info!(duration_secs = outcome.duration_secs, "journey passed");
        Ok(())
    } else {
        // Telemetry or snapshot trouble never changes the exit code; only
        // the journey verdict does.
        std::process::exit(1);
    }
}

/// Assemble and run the scripted journey. Steps execute strictly in order
/// and the first failure short-circuits the rest.
async fn run_journey(
    browser: &WebDriverBrowser,
    cfg: &WaypointConfig,
    timings: WaitTimings,
) -> JourneyState {
    let home = HomePage::new(browser.clone(), timings, cfg.journey.home_url.clone());
    let careers = CareersPage::new(browser.clone(), timings);
    let listing = JobListingPage::new(browser.clone(), timings);
    let journey_cfg = &cfg.journey;

    let steps = vec![
        JourneyStep::new("home page is accessible", async {
            home.open().await?;
            home.accept_cookies().await;
            Ok(home.is_accessible().await)
        }),
        JourneyStep::new("careers page reached via the company menu", async {
            home.navigate_to_careers().await?;
            Ok(careers.is_accessible().await)
        }),
        JourneyStep::new("careers sections are present", async {
            Ok(careers.verify_sections().await)
        }),
        JourneyStep::new("team listing reached", async {
            careers.open_team_listing().await?;
            Ok(listing.is_accessible().await)
        }),
        JourneyStep::new("department and location filters applied", async {
            listing.open_all_jobs().await?;
            Ok(listing
                .select_filter_if_label_matches(
                    &journey_cfg.expected_department,
                    &journey_cfg.target_location,
                    journey_cfg.filter_attempts,
                )
                .await)
        }),
        JourneyStep::new("filtered job cards rendered", async {
            Ok(listing.wait_for_content_replacement().await)
        }),
        JourneyStep::new("listings match the required terms", async {
            listing
                .extract_and_validate_listings(&journey_cfg.required_listing_terms)
                .await
        }),
        JourneyStep::new("view role redirects to the application site", async {
            listing
                .verify_external_redirect(&journey_cfg.redirect_marker)
                .await
        }),
    ];

    Journey::new(steps).run().await
}
