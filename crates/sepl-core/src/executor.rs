//! Sequential statement execution against one browser session.
//!
//! The [`StatementExecutor`] runs a [`CompiledScript`]'s statements strictly
//! in order. Each statement completes, including any variable write-back,
//! before the next begins, and the first driver failure stops the run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::compiler::CompiledScript;
use crate::config::SeplConfig;
use crate::driver::{BrowserDriver, DriverError};
use crate::error::SeplError;
use crate::statement::{Action, Statement};
use crate::variables::VariableStore;

/// Caller choices for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Close the driver session when the run ends, on success or failure.
    pub close_on_exit: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { close_on_exit: true }
    }
}

impl From<&SeplConfig> for ExecuteOptions {
    fn from(config: &SeplConfig) -> Self {
        Self { close_on_exit: config.close_on_exit }
    }
}

/// Timing for one executed statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// 1-based position in the script.
    pub index: usize,
    pub action: Action,
    pub elapsed_ms: u64,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub steps: Vec<StepReport>,
}

/// Runs compiled scripts against a [`BrowserDriver`].
pub struct StatementExecutor {
    driver: Arc<dyn BrowserDriver>,
    options: ExecuteOptions,
}

impl StatementExecutor {
    pub fn new(driver: Arc<dyn BrowserDriver>, options: ExecuteOptions) -> Self {
        Self { driver, options }
    }

    /// Returns a reference to the underlying driver.
    pub fn driver(&self) -> &Arc<dyn BrowserDriver> {
        &self.driver
    }

    pub fn options(&self) -> ExecuteOptions {
        self.options
    }

    /// Executes every statement of `script` in order.
    ///
    /// GET_TEXT and GET_HTML results are written into `script`'s variable
    /// store, which the caller can read afterwards. When
    /// [`close_on_exit`](ExecuteOptions::close_on_exit) is set the session is
    /// closed on both paths; a close failure after a statement failure is
    /// logged and the statement failure is returned.
    pub async fn execute(&self, script: &mut CompiledScript) -> Result<ExecutionReport, SeplError> {
        let result = self.run(script).await;
        if !self.options.close_on_exit {
            return result;
        }

        let closed = self.driver.close().await;
        match (result, closed) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(e)) => Err(SeplError::Close(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(error = %close_err, "failed to close browser session after error");
                Err(e)
            }
        }
    }

    async fn run(&self, script: &mut CompiledScript) -> Result<ExecutionReport, SeplError> {
        let started_at = Utc::now();
        let run_start = Instant::now();
        let (statements, variables) = script.parts_mut();
        let mut steps = Vec::with_capacity(statements.len());

        for (i, statement) in statements.iter().enumerate() {
            let index = i + 1;
            let action = statement.action();
            let span = info_span!("statement", index, action = action.keyword());
            let elapsed_ms = async {
                let start = Instant::now();
                self.execute_statement(statement, variables)
                    .await
                    .map_err(|source| SeplError::Driver { index, action, source })?;
                let elapsed_ms = start.elapsed().as_millis() as u64;
                debug!(elapsed_ms, "statement complete");
                Ok::<_, SeplError>(elapsed_ms)
            }
            .instrument(span)
            .await?;
            steps.push(StepReport { index, action, elapsed_ms });
        }

        Ok(ExecutionReport {
            started_at,
            elapsed_ms: run_start.elapsed().as_millis() as u64,
            steps,
        })
    }

    async fn execute_statement(
        &self,
        statement: &Statement,
        variables: &mut VariableStore,
    ) -> Result<(), DriverError> {
        let driver = self.driver.as_ref();
        match statement {
            Statement::Goto { value } => {
                info!(url = value.resolved(), "navigating");
                driver.navigate(value.resolved()).await
            }
            Statement::Click { location } => location.locate(driver).await?.click().await,
            Statement::SendKeys { location, value } => {
                location.locate(driver).await?.send_keys(value.resolved()).await
            }
            Statement::GetText { location, destination } => {
                let text = location.locate(driver).await?.text().await?;
                info!(variable = %destination.name, "stored element text");
                variables.set(destination.slot, text);
                Ok(())
            }
            Statement::GetHtml { location, destination } => {
                let html = location.locate(driver).await?.inner_html().await?;
                info!(variable = %destination.name, "stored element html");
                variables.set(destination.slot, html);
                Ok(())
            }
            Statement::Wait { millis } => {
                tokio::time::sleep(Duration::from_millis(*millis)).await;
                Ok(())
            }
        }
    }
}
