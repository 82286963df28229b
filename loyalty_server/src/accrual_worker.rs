//! Accrual reconciliation worker.
//!
//! Once per tick the worker asks the accrual service about every order that has not reached a final state yet, and
//! records whatever it learns through [`AccrualFlowApi`]. Failures never stop the worker: the order stays pending and
//! is retried on a later tick. Orders that keep failing are retried less and less often (1, 2, 4, ... ticks, capped
//! at [`WorkerConfig::max_backoff_ticks`]).
//!
//! When the service rate-limits us, the rest of the batch is dropped and no queries are made until the cooldown it
//! asked for has passed.
use std::{collections::HashMap, time::Duration};

use accrual_tools::{AccrualApi, AccrualOracle, AccrualResponse, OracleReply, OracleStatus};
use log::*;
use loyalty_engine::{
    db_types::{Order, OrderNumber, OrderStatusType},
    traits::{AccrualStore, OutcomeApplied},
    AccrualFlowApi,
    SqliteDatabase,
};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{config::WorkerConfig, errors::AccrualWorkerError};

/// Starts the accrual worker. The task runs until `shutdown` is cancelled.
pub fn start_accrual_worker(
    db: SqliteDatabase,
    oracle: AccrualApi,
    config: WorkerConfig,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let worker = AccrualWorker::new(db, oracle, config);
        worker.run(shutdown).await;
    })
}

pub struct AccrualWorker<B, O> {
    api: AccrualFlowApi<B>,
    oracle: O,
    config: WorkerConfig,
    backoff: OrderBackoff,
}

impl<B, O> AccrualWorker<B, O>
where
    B: AccrualStore,
    O: AccrualOracle,
{
    pub fn new(db: B, oracle: O, config: WorkerConfig) -> Self {
        let backoff = OrderBackoff::new(config.max_backoff_ticks);
        Self { api: AccrualFlowApi::new(db), oracle, config, backoff }
    }

    /// Runs reconciliation passes until `shutdown` is cancelled. An in-flight pass is abandoned on cancellation; any
    /// outcome that was being recorded at that moment is rolled back with its transaction.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut timer = tokio::time::interval(self.config.poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("🕰️ Accrual worker started. Polling every {}s", self.config.poll_interval.as_secs_f32());
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = timer.tick() => {},
            }
            let summary = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                summary = self.run_once(&shutdown) => summary,
            };
            summary.log();
            if let Some(cooldown) = summary.rate_limited {
                warn!("🕰️ Accrual service is rate limiting us. Pausing for {}s", cooldown.as_secs_f32());
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(cooldown) => {},
                }
                timer.reset();
            }
        }
        info!("🕰️ Accrual worker stopped");
    }

    /// A single reconciliation pass over the pending orders, in store order.
    pub async fn run_once(&mut self, shutdown: &CancellationToken) -> TickSummary {
        self.backoff.advance();
        let mut summary = TickSummary::default();
        let orders = match self.api.pending_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                error!("🕰️ Could not fetch pending orders. {e}");
                return summary;
            },
        };
        summary.pending = orders.len();
        self.backoff.retain(&orders);
        for order in orders {
            if shutdown.is_cancelled() {
                debug!("🕰️ Shutdown requested. Abandoning the rest of this pass");
                break;
            }
            if !self.backoff.should_query(&order.number) {
                trace!("🕰️ Order {} is backing off", order.number);
                summary.deferred += 1;
                continue;
            }
            summary.queried += 1;
            match self.oracle.fetch_accrual(order.number.as_str()).await {
                Ok(OracleReply::Accrual(response)) => match self.apply(&order, response).await {
                    Ok(true) => {
                        summary.updated += 1;
                        self.backoff.record_success(&order.number);
                    },
                    Ok(false) => {
                        summary.unchanged += 1;
                        self.backoff.record_success(&order.number);
                    },
                    Err(e) => {
                        error!("🕰️ Could not record accrual for order {}. {e}", order.number);
                        summary.failed += 1;
                        self.backoff.record_failure(&order.number);
                    },
                },
                Ok(OracleReply::NoData) => {
                    debug!("🕰️ Accrual service has no data for order {} yet", order.number);
                    summary.unchanged += 1;
                    self.backoff.record_success(&order.number);
                },
                Ok(OracleReply::RateLimited(cooldown)) => {
                    summary.rate_limited = Some(cooldown);
                    break;
                },
                Ok(OracleReply::Unexpected(code)) => {
                    warn!("🕰️ Accrual service answered {code} for order {}. Skipping it", order.number);
                    summary.failed += 1;
                    self.backoff.record_failure(&order.number);
                },
                Err(e) => {
                    if e.is_transient() {
                        warn!("🕰️ Could not query accrual for order {}. {e}", order.number);
                    } else {
                        error!("🕰️ Could not query accrual for order {}. {e}", order.number);
                    }
                    summary.failed += 1;
                    self.backoff.record_failure(&order.number);
                },
            }
        }
        summary
    }

    /// Returns `Ok(true)` if the order changed.
    async fn apply(&self, order: &Order, response: AccrualResponse) -> Result<bool, AccrualWorkerError> {
        if response.order != order.number.as_str() {
            return Err(AccrualWorkerError::OrderMismatch {
                requested: order.number.to_string(),
                answered: response.order,
            });
        }
        let status = local_status(response.status);
        if status == order.status {
            trace!("🕰️ Order {} is still {status}", order.number);
            return Ok(false);
        }
        let outcome = self.api.apply_outcome(&order.number, status, response.accrual).await?;
        match outcome {
            OutcomeApplied::Updated(o) if o.status.is_terminal() => {
                info!("🕰️ Order {} is final: {} (accrual: {:?})", o.number, o.status, o.accrual);
                Ok(true)
            },
            OutcomeApplied::Updated(o) => {
                debug!("🕰️ Order {} moved from {} to {}", o.number, order.status, o.status);
                Ok(true)
            },
            OutcomeApplied::AlreadyFinal(_) => Ok(false),
        }
    }
}

fn local_status(status: OracleStatus) -> OrderStatusType {
    match status {
        OracleStatus::Registered => OrderStatusType::Registered,
        OracleStatus::Invalid => OrderStatusType::Invalid,
        OracleStatus::Processing => OrderStatusType::Processing,
        OracleStatus::Processed => OrderStatusType::Processed,
    }
}

//--------------------------------------      TickSummary      ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub pending: usize,
    pub queried: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Orders skipped because they are backing off after earlier failures.
    pub deferred: usize,
    pub rate_limited: Option<Duration>,
}

impl TickSummary {
    fn log(&self) {
        if self.pending == 0 {
            trace!("🕰️ No pending orders");
            return;
        }
        info!(
            "🕰️ Accrual pass complete. {} pending, {} queried, {} updated, {} unchanged, {} failed, {} deferred",
            self.pending, self.queried, self.updated, self.unchanged, self.failed, self.deferred
        );
    }
}

//--------------------------------------     OrderBackoff      ---------------------------------------------------------
/// Per-order exponential backoff, counted in ticks. State lives only as long as the worker does.
#[derive(Debug, Default)]
struct OrderBackoff {
    max_ticks: u32,
    tick: u64,
    entries: HashMap<OrderNumber, BackoffEntry>,
}

#[derive(Debug, Clone, Copy)]
struct BackoffEntry {
    failures: u32,
    next_tick: u64,
}

impl OrderBackoff {
    fn new(max_ticks: u32) -> Self {
        Self { max_ticks, ..Default::default() }
    }

    fn advance(&mut self) {
        self.tick += 1;
    }

    fn should_query(&self, number: &OrderNumber) -> bool {
        self.entries.get(number).map(|e| e.next_tick <= self.tick).unwrap_or(true)
    }

    /// Returns the number of ticks until the order is tried again.
    fn record_failure(&mut self, number: &OrderNumber) -> u64 {
        if self.max_ticks == 0 {
            return 1;
        }
        let tick = self.tick;
        let max = u64::from(self.max_ticks);
        let entry = self.entries.entry(number.clone()).or_insert(BackoffEntry { failures: 0, next_tick: tick });
        entry.failures = entry.failures.saturating_add(1);
        let delay = 1u64.checked_shl(entry.failures - 1).unwrap_or(u64::MAX).min(max).max(1);
        entry.next_tick = tick + delay;
        if delay > 1 {
            debug!("🕰️ Order {number} has failed {} times in a row. Next attempt in {delay} ticks", entry.failures);
        }
        delay
    }

    fn record_success(&mut self, number: &OrderNumber) {
        self.entries.remove(number);
    }

    /// Forgets orders that are no longer pending.
    fn retain(&mut self, pending: &[Order]) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.retain(|number, _| pending.iter().any(|o| &o.number == number));
    }
}
