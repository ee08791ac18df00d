//! Shared test doubles and file fixtures.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use cardlink_core::orchestration::{
    ExecutionOrder, OrchestratedExecutionResult, OrchestratedJob, OrchestratedTask,
};
use cardlink_core::records::FieldWriter;

/// Task returning a scripted result and counting its executions.
pub struct ScriptedTask {
    name: String,
    result: OrchestratedExecutionResult,
    executions: Arc<AtomicUsize>,
}

impl ScriptedTask {
    pub fn new(name: &str, result: OrchestratedExecutionResult) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            result,
            executions: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrchestratedTask for ScriptedTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self) -> OrchestratedExecutionResult {
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}

/// Task that records how many peers are inside their execution body at
/// once. Used to assert the throttler bound.
pub struct ConcurrencyProbeTask {
    name: String,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl ConcurrencyProbeTask {
    pub fn new(name: &str, in_flight: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            in_flight,
            peak,
        })
    }
}

#[async_trait]
impl OrchestratedTask for ConcurrencyProbeTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self) -> OrchestratedExecutionResult {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        OrchestratedExecutionResult::Success
    }
}

/// Fully scripted job: execution mode, phase order, tasks, children, and
/// startup/teardown results, with call counters and the teardown input
/// captured for assertions.
pub struct ScriptedJob {
    asynchronous: bool,
    order: ExecutionOrder,
    tasks: Vec<Arc<dyn OrchestratedTask>>,
    children: Vec<Arc<dyn OrchestratedJob>>,
    startup_result: OrchestratedExecutionResult,
    teardown_result: OrchestratedExecutionResult,
    startup_calls: AtomicUsize,
    teardown_calls: AtomicUsize,
    teardown_input: Mutex<Option<OrchestratedExecutionResult>>,
}

impl ScriptedJob {
    pub fn synchronous(order: ExecutionOrder) -> Self {
        Self {
            asynchronous: false,
            order,
            tasks: Vec::new(),
            children: Vec::new(),
            startup_result: OrchestratedExecutionResult::Success,
            teardown_result: OrchestratedExecutionResult::Success,
            startup_calls: AtomicUsize::new(0),
            teardown_calls: AtomicUsize::new(0),
            teardown_input: Mutex::new(None),
        }
    }

    pub fn asynchronous() -> Self {
        let mut job = Self::synchronous(ExecutionOrder::TasksFirst);
        job.asynchronous = true;
        job
    }

    pub fn with_task(mut self, task: Arc<dyn OrchestratedTask>) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn with_child(mut self, child: Arc<dyn OrchestratedJob>) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_startup(mut self, result: OrchestratedExecutionResult) -> Self {
        self.startup_result = result;
        self
    }

    pub fn with_teardown(mut self, result: OrchestratedExecutionResult) -> Self {
        self.teardown_result = result;
        self
    }

    pub fn startup_calls(&self) -> usize {
        self.startup_calls.load(Ordering::SeqCst)
    }

    pub fn teardown_calls(&self) -> usize {
        self.teardown_calls.load(Ordering::SeqCst)
    }

    pub fn teardown_input(&self) -> Option<OrchestratedExecutionResult> {
        *self.teardown_input.lock()
    }
}

#[async_trait]
impl OrchestratedJob for ScriptedJob {
    fn asynchronous(&self) -> bool {
        self.asynchronous
    }

    fn execution_order(&self) -> ExecutionOrder {
        self.order
    }

    fn tasks(&self) -> Vec<Arc<dyn OrchestratedTask>> {
        self.tasks.clone()
    }

    fn child_jobs(&self) -> Vec<Arc<dyn OrchestratedJob>> {
        self.children.clone()
    }

    async fn start_up(&self) -> OrchestratedExecutionResult {
        self.startup_calls.fetch_add(1, Ordering::SeqCst);
        self.startup_result
    }

    async fn tear_down(
        &self,
        execution_result: OrchestratedExecutionResult,
    ) -> OrchestratedExecutionResult {
        self.teardown_calls.fetch_add(1, Ordering::SeqCst);
        *self.teardown_input.lock() = Some(execution_result);
        self.teardown_result
    }
}

// ---------------------------------------------------------------------------
// File fixtures
// ---------------------------------------------------------------------------

pub fn clearing_header_line(file_date: NaiveDate, member_ica: &str) -> String {
    let mut writer = FieldWriter::with_capacity(200);
    writer
        .push_literal("H")
        .push_date(Some(file_date), "%Y%m%d", 8)
        .push_alpha(member_ica, 11)
        .push_filler(180, ' ');
    writer.finish()
}

pub fn clearing_data_line(sequence: i64, account: &str, amount_cents: i64) -> String {
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let mut writer = FieldWriter::with_capacity(200);
    writer
        .push_literal("D")
        .push_numeric(sequence, 13)
        .push_alpha(account, 19)
        .push_numeric(amount_cents, 13)
        .push_date(Some(date), "%m%d%y", 6)
        .push_alpha("JOES DINER", 60)
        .push_alpha("MERCH0001", 22)
        .push_alpha("LOC000001", 9)
        .push_alpha("012345", 6)
        .push_literal("1430")
        .push_alpha("BNREF0001", 9)
        .push_alpha("CUST00000001", 30)
        .push_alpha("AGG001", 6)
        .push_filler(2, ' ');
    writer.finish()
}

/// Correct length but a non-numeric amount field, so field validation
/// fails while the line still dispatches as a data record.
pub fn clearing_data_line_bad_amount(sequence: i64) -> String {
    let mut line = clearing_data_line(sequence, "ACCT", 0);
    line.replace_range(33..46, "00000000000XX");
    line
}

pub fn clearing_trailer_line(record_count: i64, member_ica: &str) -> String {
    let mut writer = FieldWriter::with_capacity(200);
    writer
        .push_literal("T")
        .push_numeric(record_count, 12)
        .push_alpha(member_ica, 11)
        .push_filler(176, ' ');
    writer.finish()
}

pub fn reward_network_header_line(creation_date: NaiveDate, sequence: i64) -> String {
    let mut writer = FieldWriter::with_capacity(300);
    writer
        .push_literal("H")
        .push_literal("RESTAURANT DATA")
        .push_date(Some(creation_date), "%Y%m%d", 8)
        .push_numeric(sequence, 5)
        .push_filler(271, ' ');
    writer.finish()
}

pub fn reward_network_detail_line(merchant_id: &str, name: &str) -> String {
    let mut writer = FieldWriter::with_capacity(300);
    writer
        .push_literal("D")
        .push_alpha(merchant_id, 9)
        .push_alpha(name, 68)
        .push_alpha("100 MAIN ST", 30)
        .push_alpha("SEATTLE", 20)
        .push_alpha("WA", 2)
        .push_alpha("98101", 5)
        .push_alpha("https://example.com/menu", 75)
        .push_alpha("VMID000001", 10)
        .push_alpha("VSID000001", 10)
        .push_alpha("MCL000001", 9)
        .push_alpha("MCACQ0000000001", 15)
        .push_alpha("RNACQ000000000000001", 20)
        .push_filler(26, ' ');
    writer.finish()
}

pub fn reward_network_trailer_line(
    creation_date: NaiveDate,
    sequence: i64,
    record_count: i64,
) -> String {
    let mut writer = FieldWriter::with_capacity(300);
    writer
        .push_literal("T")
        .push_literal("RESTAURANT DATA")
        .push_date(Some(creation_date), "%Y%m%d", 8)
        .push_numeric(sequence, 5)
        .push_numeric(record_count, 7)
        .push_filler(264, ' ');
    writer.finish()
}
