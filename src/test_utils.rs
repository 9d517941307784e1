use crate::page::Page;
use crate::record::UserRecord;
use crate::store::{StoreError, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory store that records every save.
#[derive(Clone, Debug, Default)]
pub struct MockUserStore {
    saves: Arc<Mutex<Vec<(Option<u64>, UserRecord)>>>,
    users: Arc<Mutex<HashMap<u64, UserRecord>>>,
    fail: bool,
}

impl MockUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_user(self, id: u64, record: UserRecord) -> Self {
        self.users.lock().expect("users lock").insert(id, record);
        self
    }

    pub fn saves(&self) -> Vec<(Option<u64>, UserRecord)> {
        self.saves.lock().expect("saves lock").clone()
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn save(&self, id: Option<u64>, record: &UserRecord) -> Result<(), StoreError> {
        self.saves
            .lock()
            .expect("saves lock")
            .push((id, record.clone()));
        if self.fail {
            return Err(StoreError::Status {
                status: 500,
                body: "mock failure".to_string(),
            });
        }
        Ok(())
    }

    async fn fetch(&self, id: u64) -> Result<UserRecord, StoreError> {
        self.users
            .lock()
            .expect("users lock")
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::Status {
                status: 404,
                body: format!("user {} not found", id),
            })
    }
}

/// Page that records alerts and redirects instead of showing them.
#[derive(Clone, Debug, Default)]
pub struct RecordingPage {
    alerts: Arc<Mutex<Vec<String>>>,
    redirects: Arc<Mutex<Vec<String>>>,
}

impl RecordingPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("alerts lock").clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().expect("redirects lock").clone()
    }
}

impl Page for RecordingPage {
    fn alert(&self, message: &str) {
        self.alerts.lock().expect("alerts lock").push(message.to_string());
    }

    fn redirect(&self, url: &str) {
        self.redirects.lock().expect("redirects lock").push(url.to_string());
    }
}
