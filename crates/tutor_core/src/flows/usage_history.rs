//! crates/tutor_core/src/flows/usage_history.rs
//!
//! Aggregate feature usage.

use crate::domain::UsageRecord;
use crate::ports::UsageHistoryService;
use async_trait::async_trait;

/// The fixed weekly usage table. Nothing records real events yet.
pub struct StaticUsageHistory;

#[async_trait]
impl UsageHistoryService for StaticUsageHistory {
    async fn usage_history(&self) -> Vec<UsageRecord> {
        vec![
            UsageRecord::new("Mon", 4, 3, 2, 1),
            UsageRecord::new("Tue", 3, 2, 4, 2),
            UsageRecord::new("Wed", 2, 2, 1, 3),
            UsageRecord::new("Thu", 5, 4, 3, 2),
            UsageRecord::new("Fri", 6, 3, 2, 1),
        ]
    }
}

pub async fn usage_history(source: &dyn UsageHistoryService) -> Vec<UsageRecord> {
    source.usage_history().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_table() {
        let records = usage_history(&StaticUsageHistory).await;
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert_eq!(records[3], UsageRecord::new("Thu", 5, 4, 3, 2));
    }

    #[test]
    fn test_usage_record_wire_shape() {
        let value = serde_json::to_value(UsageRecord::new("Mon", 4, 3, 2, 1)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "name": "Mon", "qa": 4, "summarize": 3, "imagine": 2, "translate": 1 })
        );
    }
}
