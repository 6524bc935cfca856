//! Monitoring (telemetry) service: alarms and meters.
//!
//! Meters are read-only. Their samples and statistics are sub-resources of a
//! meter name rather than of an id.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::client::{ClientError, HttpClient};
use crate::manager::{ResourceKind, ResourceManager};
use crate::resource::{Resource, ResourceList};

pub const SERVICE_TYPE: &str = "monitoring";

pub const ALARMS: ResourceKind = ResourceKind {
    service_type: SERVICE_TYPE,
    collection: "v2/alarms",
    singular: "alarm",
    plural: "alarms",
    list_columns: &["id", "name", "state", "enabled"],
};

pub const METERS: ResourceKind = ResourceKind {
    service_type: SERVICE_TYPE,
    collection: "v2/meters",
    singular: "meter",
    plural: "meters",
    list_columns: &["name", "type", "unit", "resource_id", "project_id"],
};

pub const SAMPLE_COLUMNS: &[&str] = &["resource_id", "volume", "unit", "timestamp"];
pub const STATISTICS_COLUMNS: &[&str] = &[
    "period",
    "period_start",
    "period_end",
    "count",
    "min",
    "max",
    "avg",
    "sum",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlarmFilters {
    pub name: Option<String>,
    pub state: Option<String>,
    pub enabled: Option<bool>,
}

impl AlarmFilters {
    fn pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", self.name.clone()),
            ("state", self.state.clone()),
            ("enabled", self.enabled.map(|enabled| enabled.to_string())),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlarmCreate {
    pub name: String,
    pub meter_name: String,
    pub threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_periods: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alarm_actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlarmUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Copy)]
pub struct AlarmManager {
    manager: ResourceManager,
}

impl Default for AlarmManager {
    fn default() -> Self {
        Self {
            manager: ResourceManager::new(ALARMS),
        }
    }
}

impl AlarmManager {
    pub async fn list(
        &self,
        client: &mut HttpClient,
        filters: &AlarmFilters,
        paginate: bool,
    ) -> Result<ResourceList, ClientError> {
        self.manager.list(client, &filters.pairs(), paginate).await
    }

    pub async fn get(&self, client: &mut HttpClient, id: &str) -> Result<Resource, ClientError> {
        self.manager.get(client, id).await
    }

    pub async fn create(
        &self,
        client: &mut HttpClient,
        alarm: &AlarmCreate,
    ) -> Result<Resource, ClientError> {
        self.manager.create(client, alarm).await
    }

    pub async fn update(
        &self,
        client: &mut HttpClient,
        id: &str,
        update: &AlarmUpdate,
    ) -> Result<Option<Resource>, ClientError> {
        self.manager.update(client, id, update).await
    }

    pub async fn delete(&self, client: &mut HttpClient, id: &str) -> Result<(), ClientError> {
        self.manager.delete(client, id).await
    }

    /// Current evaluation state of an alarm (`ok`, `alarm` or
    /// `insufficient data`).
    pub async fn state(&self, client: &mut HttpClient, id: &str) -> Result<String, ClientError> {
        match self.manager.get_path(client, &[id, "state"], BTreeMap::new()).await? {
            Value::String(state) => Ok(state),
            Value::Object(map) => match map.get("state").and_then(Value::as_str) {
                Some(state) => Ok(state.to_string()),
                None => Err(unexpected("expected an alarm state")),
            },
            _ => Err(unexpected("expected an alarm state")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeterFilters {
    pub resource_id: Option<String>,
    pub project_id: Option<String>,
    pub name: Option<String>,
}

impl MeterFilters {
    fn pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("resource_id", self.resource_id.clone()),
            ("project_id", self.project_id.clone()),
            ("name", self.name.clone()),
        ]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MeterManager {
    manager: ResourceManager,
}

impl Default for MeterManager {
    fn default() -> Self {
        Self {
            manager: ResourceManager::new(METERS),
        }
    }
}

impl MeterManager {
    pub async fn list(
        &self,
        client: &mut HttpClient,
        filters: &MeterFilters,
        paginate: bool,
    ) -> Result<ResourceList, ClientError> {
        self.manager.list(client, &filters.pairs(), paginate).await
    }

    /// Raw samples recorded for a meter, newest first.
    pub async fn samples(
        &self,
        client: &mut HttpClient,
        meter: &str,
        limit: Option<u32>,
    ) -> Result<ResourceList, ClientError> {
        let mut query = BTreeMap::new();
        if let Some(limit) = limit {
            query.insert("limit".to_string(), limit.to_string());
        }
        let body = self.manager.get_path(client, &[meter], query).await?;
        ResourceList::from_value(body, SAMPLE_COLUMNS)
            .ok_or_else(|| unexpected("expected a list of samples"))
    }

    /// Aggregates of a meter, bucketed by `period` seconds when given.
    pub async fn statistics(
        &self,
        client: &mut HttpClient,
        meter: &str,
        period: Option<u32>,
    ) -> Result<ResourceList, ClientError> {
        let mut query = BTreeMap::new();
        if let Some(period) = period {
            query.insert("period".to_string(), period.to_string());
        }
        let body = self
            .manager
            .get_path(client, &[meter, "statistics"], query)
            .await?;
        ResourceList::from_value(body, STATISTICS_COLUMNS)
            .ok_or_else(|| unexpected("expected a list of statistics"))
    }
}

fn unexpected(reason: &str) -> ClientError {
    ClientError::UnexpectedResponse {
        service_type: SERVICE_TYPE.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alarm_filters() {
        let filters = AlarmFilters {
            enabled: Some(false),
            ..AlarmFilters::default()
        };
        assert!(filters.pairs().contains(&("enabled", Some("false".to_string()))));
    }

    #[test]
    fn test_alarm_create_body() {
        let alarm = AlarmCreate {
            name: "cpu-high".to_string(),
            meter_name: "cpu_util".to_string(),
            threshold: 90.0,
            comparison_operator: Some("gt".to_string()),
            ..AlarmCreate::default()
        };
        assert_eq!(
            serde_json::to_value(&alarm).unwrap(),
            json!({
                "name": "cpu-high",
                "meter_name": "cpu_util",
                "threshold": 90.0,
                "comparison_operator": "gt"
            })
        );
    }

    #[test]
    fn test_meter_filters_keep_order() {
        let keys: Vec<&str> = MeterFilters::default()
            .pairs()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, ["resource_id", "project_id", "name"]);
    }
}
