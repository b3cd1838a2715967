//! Shared test fixtures: an in-memory [`RemoteCrm`] fake with call
//! counters, plus wire-record builders.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use leadline_client::{Catalog, CrmApiError, RecordPage, RemoteCrm, RESOURCE_CONTACTS};
use leadline_core::query::LeadQuery;
use leadline_core::types::DbId;
use serde_json::{json, Map, Value};

/// Scripted stand-in for the CRM backend.
///
/// Serves whatever records were seeded, counts every call, and can be
/// told to fail reads or writes. Created records are appended so a
/// refetch after create sees them, like the real backend.
pub struct MockRemote {
    pub leads: Mutex<Vec<Value>>,
    pub todos: Mutex<Vec<Value>>,
    pub lead_page_calls: AtomicUsize,
    pub todo_page_calls: AtomicUsize,
    pub fetch_one_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    /// Body of the most recent update, for asserting what went on the wire.
    pub last_update_body: Mutex<Option<Map<String, Value>>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    fetch_delay: Duration,
    next_id: AtomicI64,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            leads: Mutex::new(Vec::new()),
            todos: Mutex::new(Vec::new()),
            lead_page_calls: AtomicUsize::new(0),
            todo_page_calls: AtomicUsize::new(0),
            fetch_one_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            last_update_body: Mutex::new(None),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fetch_delay: Duration::ZERO,
            next_id: AtomicI64::new(1000),
        }
    }

    /// Hold every page fetch open for `delay`, so concurrent callers
    /// genuinely overlap.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn seed_lead(&self, record: Value) {
        self.leads.lock().expect("mock lock").push(record);
    }

    pub fn seed_todo(&self, record: Value) {
        self.todos.lock().expect("mock lock").push(record);
    }

    fn records_for(&self, resource: &str) -> &Mutex<Vec<Value>> {
        if resource == RESOURCE_CONTACTS {
            &self.leads
        } else {
            &self.todos
        }
    }
}

#[async_trait]
impl RemoteCrm for MockRemote {
    async fn fetch_page(
        &self,
        resource: &str,
        _query: &LeadQuery,
    ) -> Result<RecordPage, CrmApiError> {
        let counter = if resource == RESOURCE_CONTACTS {
            &self.lead_page_calls
        } else {
            &self.todo_page_calls
        };
        counter.fetch_add(1, Ordering::SeqCst);

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CrmApiError::Rejected("backend down".to_string()));
        }
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }

        let data = self.records_for(resource).lock().expect("mock lock").clone();
        let total = data.len() as i64;
        Ok(RecordPage { data, total })
    }

    async fn fetch_one(&self, resource: &str, id: DbId) -> Result<Option<Value>, CrmApiError> {
        self.fetch_one_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CrmApiError::Rejected("backend down".to_string()));
        }
        Ok(self
            .records_for(resource)
            .lock()
            .expect("mock lock")
            .iter()
            .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
            .cloned())
    }

    async fn create(&self, resource: &str, body: Map<String, Value>) -> Result<DbId, CrmApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CrmApiError::Rejected("write refused".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut record = body;
        record.insert("id".to_string(), json!(id));
        self.records_for(resource)
            .lock()
            .expect("mock lock")
            .push(Value::Object(record));
        Ok(id)
    }

    async fn update(
        &self,
        _resource: &str,
        _id: DbId,
        body: Map<String, Value>,
    ) -> Result<(), CrmApiError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CrmApiError::Rejected("write refused".to_string()));
        }
        *self.last_update_body.lock().expect("mock lock") = Some(body);
        Ok(())
    }

    async fn delete(&self, resource: &str, id: DbId) -> Result<(), CrmApiError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CrmApiError::Rejected("write refused".to_string()));
        }
        self.records_for(resource)
            .lock()
            .expect("mock lock")
            .retain(|r| r.get("id").and_then(Value::as_i64) != Some(id));
        Ok(())
    }

    async fn fetch_catalog(&self) -> Result<Catalog, CrmApiError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CrmApiError::Rejected("backend down".to_string()));
        }
        Ok(Catalog {
            tags: vec!["vip".to_string(), "repeat".to_string()],
            assigned_to: vec![json!({"id": 1, "name": "Rita"})],
            lists: vec!["Q3 walk-ins".to_string()],
        })
    }
}

/// A lead record as the backend would serve it.
pub fn wire_lead(id: i64, name: &str, stage: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "phone": "9999999999",
        "stage": stage,
        "priority": "warm",
        "source": "website",
        "labels": "vip,repeat",
        "budget": "250000",
        "created_at": "2026-07-01T10:00:00Z",
        "updated_at": "2026-07-15T09:30:00Z",
    })
}

/// A todo record as the backend would serve it.
pub fn wire_todo(id: i64, lead_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "lead_id": lead_id,
        "type": "Activity",
        "status": status,
        "description": format!("follow up {id}"),
        "participants": "4,12",
    })
}

/// Route store logs through the test harness once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("leadline_store=debug")
        .with_test_writer()
        .try_init();
}
