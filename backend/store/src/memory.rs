use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use wacapture_core::{CaptureError, MessageRecord, MessageStore};

/// Process-local store. Records are stamped on insert like the document store would.
#[derive(Default)]
pub struct InMemoryMessageStore {
    records: Mutex<Vec<MessageRecord>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order.
    pub async fn records(&self) -> Vec<MessageRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, record: MessageRecord) -> Result<String, CaptureError> {
        let id = Uuid::new_v4().to_string();
        let record = if record.created_at.is_none() {
            record.stamped()
        } else {
            record
        };
        self.records.lock().await.push(record);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_stamps_and_keeps_order() {
        let store = InMemoryMessageStore::new();
        let first = store
            .insert(MessageRecord {
                body: Some("one".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let second = store
            .insert(MessageRecord {
                body: Some("two".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let records = store.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].body.as_deref(), Some("two"));
        assert!(records[0].created_at.is_some());
        assert_eq!(records[0].body.as_deref(), Some("one"));
        assert_ne!(first, second);
    }
}
