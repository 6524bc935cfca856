//! Identity service: users and tenants.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{ClientError, HttpClient};
use crate::manager::{ResourceKind, ResourceManager};
use crate::resource::{Resource, ResourceList};

pub const SERVICE_TYPE: &str = "identity";

pub const USERS: ResourceKind = ResourceKind {
    service_type: SERVICE_TYPE,
    collection: "users",
    singular: "user",
    plural: "users",
    list_columns: &["id", "name", "email", "enabled"],
};

pub const TENANTS: ResourceKind = ResourceKind {
    service_type: SERVICE_TYPE,
    collection: "tenants",
    singular: "tenant",
    plural: "tenants",
    list_columns: &["id", "name", "enabled"],
};

/// Attribute under which a resolved tenant is attached to a user
pub const USER_TENANT: &str = "tenant";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilters {
    pub tenant_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "tenantId", skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TenantFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Copy)]
pub struct UserManager {
    manager: ResourceManager,
}

impl Default for UserManager {
    fn default() -> Self {
        Self {
            manager: ResourceManager::new(USERS),
        }
    }
}

impl UserManager {
    pub async fn list(
        &self,
        client: &mut HttpClient,
        filters: &UserFilters,
        paginate: bool,
    ) -> Result<ResourceList, ClientError> {
        let pairs = [
            ("tenant_id", filters.tenant_id.clone()),
            ("name", filters.name.clone()),
        ];
        self.manager.list(client, &pairs, paginate).await
    }

    pub async fn get(&self, client: &mut HttpClient, id: &str) -> Result<Resource, ClientError> {
        self.manager.get(client, id).await
    }

    /// Fetch a user and attach its tenant under [`USER_TENANT`].
    ///
    /// The tenant is fetched with a second request. A user without a tenant,
    /// or whose tenant no longer exists, is returned as is.
    pub async fn get_with_tenant(
        &self,
        client: &mut HttpClient,
        id: &str,
    ) -> Result<Resource, ClientError> {
        let mut user = self.get(client, id).await?;
        let tenant_id = match tenant_id_of(&user) {
            Some(tenant_id) => tenant_id,
            None => {
                debug!("User {} has no tenant", id);
                return Ok(user);
            }
        };

        match TenantManager::default().get(client, &tenant_id).await {
            Ok(tenant) => {
                user.insert(USER_TENANT, Value::Object(tenant.attributes().clone()));
                Ok(user)
            }
            Err(e) if e.is_not_found() => {
                warn!("Tenant {} of user {} was not found", tenant_id, id);
                Ok(user)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn create(
        &self,
        client: &mut HttpClient,
        user: &UserCreate,
    ) -> Result<Resource, ClientError> {
        self.manager.create(client, user).await
    }

    pub async fn update(
        &self,
        client: &mut HttpClient,
        id: &str,
        update: &UserUpdate,
    ) -> Result<Option<Resource>, ClientError> {
        self.manager.update(client, id, update).await
    }

    pub async fn delete(&self, client: &mut HttpClient, id: &str) -> Result<(), ClientError> {
        self.manager.delete(client, id).await
    }
}

fn tenant_id_of(user: &Resource) -> Option<String> {
    ["tenantId", "tenant_id"]
        .iter()
        .find_map(|key| user.get_str(key))
        .filter(|tenant_id| !tenant_id.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Copy)]
pub struct TenantManager {
    manager: ResourceManager,
}

impl Default for TenantManager {
    fn default() -> Self {
        Self {
            manager: ResourceManager::new(TENANTS),
        }
    }
}

impl TenantManager {
    pub async fn list(
        &self,
        client: &mut HttpClient,
        name: Option<String>,
        paginate: bool,
    ) -> Result<ResourceList, ClientError> {
        self.manager.list(client, &[("name", name)], paginate).await
    }

    pub async fn get(&self, client: &mut HttpClient, id: &str) -> Result<Resource, ClientError> {
        self.manager.get(client, id).await
    }

    pub async fn create(
        &self,
        client: &mut HttpClient,
        tenant: &TenantFields,
    ) -> Result<Resource, ClientError> {
        self.manager.create(client, tenant).await
    }

    pub async fn update(
        &self,
        client: &mut HttpClient,
        id: &str,
        update: &TenantFields,
    ) -> Result<Option<Resource>, ClientError> {
        self.manager.update(client, id, update).await
    }

    pub async fn delete(&self, client: &mut HttpClient, id: &str) -> Result<(), ClientError> {
        self.manager.delete(client, id).await
    }
}
