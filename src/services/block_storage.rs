//! Block storage service: volumes.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::{ClientError, HttpClient};
use crate::manager::{ResourceKind, ResourceManager};
use crate::resource::{Resource, ResourceList};

pub const SERVICE_TYPE: &str = "volume";

pub const VOLUMES: ResourceKind = ResourceKind {
    service_type: SERVICE_TYPE,
    collection: "volumes",
    singular: "volume",
    plural: "volumes",
    list_columns: &["id", "name", "status", "size", "volume_type"],
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeFilters {
    pub name: Option<String>,
    pub status: Option<String>,
    /// Include the volumes of every tenant (admin only)
    pub all_tenants: bool,
}

impl VolumeFilters {
    fn pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", self.name.clone()),
            ("status", self.status.clone()),
            ("all_tenants", self.all_tenants.then(|| "1".to_string())),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeCreate {
    /// Size in GiB
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct VolumeManager {
    manager: ResourceManager,
}

impl Default for VolumeManager {
    fn default() -> Self {
        Self {
            manager: ResourceManager::new(VOLUMES),
        }
    }
}

impl VolumeManager {
    pub async fn list(
        &self,
        client: &mut HttpClient,
        filters: &VolumeFilters,
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
        volume: &VolumeCreate,
    ) -> Result<Resource, ClientError> {
        self.manager.create(client, volume).await
    }

    pub async fn update(
        &self,
        client: &mut HttpClient,
        id: &str,
        update: &VolumeUpdate,
    ) -> Result<Option<Resource>, ClientError> {
        self.manager.update(client, id, update).await
    }

    pub async fn delete(&self, client: &mut HttpClient, id: &str) -> Result<(), ClientError> {
        self.manager.delete(client, id).await
    }

    /// Grow a volume to `new_size` GiB.
    pub async fn extend(
        &self,
        client: &mut HttpClient,
        id: &str,
        new_size: u64,
    ) -> Result<Value, ClientError> {
        self.manager
            .action(client, id, json!({"os-extend": {"new_size": new_size}}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tenants_filter() {
        let filters = VolumeFilters {
            all_tenants: true,
            ..VolumeFilters::default()
        };
        assert!(filters.pairs().contains(&("all_tenants", Some("1".to_string()))));
        assert!(VolumeFilters::default()
            .pairs()
            .contains(&("all_tenants", None)));
    }

    #[test]
    fn test_create_body() {
        let volume = VolumeCreate {
            size: 10,
            name: Some("data".to_string()),
            ..VolumeCreate::default()
        };
        assert_eq!(
            serde_json::to_value(&volume).unwrap(),
            json!({"size": 10, "name": "data"})
        );
    }
}
