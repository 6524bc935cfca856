//! Bare-metal provisioning service.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};
use strum::{Display, EnumString};

use crate::client::{ClientError, HttpClient};
use crate::manager::{ResourceKind, ResourceManager};
use crate::resource::{Resource, ResourceList};

pub const SERVICE_TYPE: &str = "baremetal";

pub const SERVERS: ResourceKind = ResourceKind {
    service_type: SERVICE_TYPE,
    collection: "servers",
    singular: "server",
    plural: "servers",
    list_columns: &["id", "name", "status", "host"],
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerFilters {
    pub name: Option<String>,
    pub status: Option<String>,
    pub host: Option<String>,
}

impl ServerFilters {
    fn pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", self.name.clone()),
            ("status", self.status.clone()),
            ("host", self.host.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerCreate {
    pub name: String,
    #[serde(rename = "imageRef", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "flavorRef", skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RebootType {
    #[default]
    Soft,
    Hard,
}

#[derive(Debug, Clone, Copy)]
pub struct ServerManager {
    manager: ResourceManager,
}

impl Default for ServerManager {
    fn default() -> Self {
        Self {
            manager: ResourceManager::new(SERVERS),
        }
    }
}

impl ServerManager {
    pub async fn list(
        &self,
        client: &mut HttpClient,
        filters: &ServerFilters,
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
        server: &ServerCreate,
    ) -> Result<Resource, ClientError> {
        self.manager.create(client, server).await
    }

    pub async fn update(
        &self,
        client: &mut HttpClient,
        id: &str,
        update: &ServerUpdate,
    ) -> Result<Option<Resource>, ClientError> {
        self.manager.update(client, id, update).await
    }

    pub async fn delete(&self, client: &mut HttpClient, id: &str) -> Result<(), ClientError> {
        self.manager.delete(client, id).await
    }

    pub async fn start(&self, client: &mut HttpClient, id: &str) -> Result<Value, ClientError> {
        self.manager.action(client, id, json!({"os-start": null})).await
    }

    pub async fn stop(&self, client: &mut HttpClient, id: &str) -> Result<Value, ClientError> {
        self.manager.action(client, id, json!({"os-stop": null})).await
    }

    pub async fn reboot(
        &self,
        client: &mut HttpClient,
        id: &str,
        reboot_type: RebootType,
    ) -> Result<Value, ClientError> {
        self.manager
            .action(client, id, reboot_body(reboot_type))
            .await
    }
}

fn reboot_body(reboot_type: RebootType) -> Value {
    json!({"reboot": {"type": reboot_type.to_string()}})
}
