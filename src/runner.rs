//! Sequential check driver and console report

use std::io::Write;

use tracing::{info, warn};

use crate::check::{CheckResult, EndpointCheck};
use crate::config::Config;
use crate::network::{build_uri, HttpClient};
use crate::Result;

/// Counts for one pass over the configured checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Checks that produced a result
    pub completed: usize,
    /// Checks that ended in an error line
    pub failed: usize,
}

impl RunSummary {
    /// True when no check failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Runs checks one at a time against a single server
pub struct SmokeRunner {
    config: Config,
    client: HttpClient,
    headers: Vec<(String, String)>,
}

impl SmokeRunner {
    /// Create a runner for a validated configuration
    #[must_use]
    pub fn new(config: Config) -> Self {
        let client = HttpClient::new(&config.limits);
        let headers = config
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Self {
            config,
            client,
            headers,
        }
    }

    /// Configuration this runner was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Query one endpoint and summarize its body
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, times out or the body is not JSON
    pub async fn check(&self, check: &EndpointCheck) -> Result<CheckResult> {
        let query = self.config.query_for(check);
        let uri = build_uri(&self.config.base_url, &check.path, &query)?;

        let response = self.client.get(uri, &self.headers).await?;
        CheckResult::from_body(check, response.status, &response.body)
    }

    /// Run one check and write its report lines
    ///
    /// A failed check writes a single `Error:` line and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns error only if writing to `out` fails
    pub async fn run_check<W: Write>(
        &self,
        check: &EndpointCheck,
        out: &mut W,
    ) -> std::io::Result<Option<CheckResult>> {
        match self.check(check).await {
            Ok(result) => {
                info!(
                    "{}: status {}, {} items",
                    check.path, result.status, result.item_count
                );
                for line in result.report_lines(check) {
                    writeln!(out, "{line}")?;
                }
                Ok(Some(result))
            }
            Err(e) => {
                warn!("{}: {e}", check.path);
                writeln!(out, "Error: {e}")?;
                Ok(None)
            }
        }
    }

    /// Run every configured check in order
    ///
    /// # Errors
    ///
    /// Returns error only if writing to `out` fails
    pub async fn run_all<W: Write>(&self, out: &mut W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (i, check) in self.config.checks.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "Testing {} endpoint...", check.path)?;

            match self.run_check(check, out).await? {
                Some(_) => summary.completed += 1,
                None => summary.failed += 1,
            }
        }

        out.flush()?;
        info!(
            "Finished {} checks ({} failed)",
            summary.completed + summary.failed,
            summary.failed
        );
        Ok(summary)
    }
}
