//! Service catalog lookups.
//!
//! The catalog is the JSON document handed out by the identity service at
//! authentication time. It is kept as-is and only ever read; a new token
//! brings a new catalog which replaces the old one entirely.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter};
use tracing::trace;

use crate::client::error::ClientError;

/// Endpoint interface (visibility) of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    #[default]
    #[strum(serialize = "public")]
    Public,
    #[strum(serialize = "internal")]
    Internal,
    #[strum(serialize = "admin")]
    Admin,
}

impl Interface {
    /// Names accepted on the command line
    pub fn names() -> Vec<&'static str> {
        vec![
            "public",
            "internal",
            "admin",
            "publicURL",
            "internalURL",
            "adminURL",
        ]
    }

    /// The catalog key holding the URL for this interface.
    pub fn catalog_key(&self) -> &'static str {
        match self {
            Interface::Public => "publicURL",
            Interface::Internal => "internalURL",
            Interface::Admin => "adminURL",
        }
    }
}

impl FromStr for Interface {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim_end_matches("URL").to_lowercase().as_str() {
            "public" => Ok(Interface::Public),
            "internal" => Ok(Interface::Internal),
            "admin" => Ok(Interface::Admin),
            _ => Err(format!("invalid endpoint type '{}'", value)),
        }
    }
}

/// Criteria used to pick exactly one endpoint from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointFilter {
    pub service_type: String,
    pub service_name: Option<String>,
    pub region: Option<String>,
    pub interface: Interface,
}

impl EndpointFilter {
    pub fn new(service_type: &str) -> EndpointFilter {
        EndpointFilter {
            service_type: service_type.to_string(),
            service_name: None,
            region: None,
            interface: Interface::default(),
        }
    }

    pub fn with_service_name(mut self, service_name: Option<String>) -> Self {
        self.service_name = service_name;
        self
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interface = interface;
        self
    }
}

/// One flattened catalog entry, used for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub service_type: String,
    pub service_name: String,
    pub region: String,
    pub interface: Interface,
    pub url: String,
}

/// Read-only index over the service catalog returned by the identity service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCatalog {
    services: Vec<Value>,
}

impl ServiceCatalog {
    /// Wrap a catalog document; it must be a list of service objects.
    pub fn new(catalog: Value) -> Result<ServiceCatalog, ClientError> {
        match catalog {
            Value::Array(services) if services.iter().all(Value::is_object) => {
                Ok(ServiceCatalog { services })
            }
            _ => Err(ClientError::AuthorizationFailure(
                "malformed service catalog in authentication response".to_string(),
            )),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Resolve the URL of the single endpoint matching the filter.
    pub fn url_for(&self, filter: &EndpointFilter) -> Result<String, ClientError> {
        trace!("Resolving endpoint for {:?}...", filter);

        let key = filter.interface.catalog_key();
        let matches: Vec<String> = self
            .matching_services(filter)
            .flat_map(|service| endpoints_of(service))
            .filter(|endpoint| match &filter.region {
                Some(region) => endpoint.get("region").and_then(Value::as_str) == Some(region),
                None => true,
            })
            .filter_map(|endpoint| endpoint.get(key).and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        match matches.len() {
            0 => Err(ClientError::EndpointNotFound {
                service_type: filter.service_type.clone(),
            }),
            1 => Ok(matches.into_iter().next().unwrap_or_default()),
            _ => Err(ClientError::AmbiguousEndpoints {
                service_type: filter.service_type.clone(),
                endpoints: matches,
            }),
        }
    }

    /// Every endpoint URL in the catalog, one entry per interface.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut entries = Vec::new();
        for service in &self.services {
            let service_type = text_field(service, "type");
            let service_name = text_field(service, "name");
            for endpoint in endpoints_of(service) {
                let region = text_field(endpoint, "region");
                for interface in [Interface::Public, Interface::Internal, Interface::Admin] {
                    if let Some(url) = endpoint.get(interface.catalog_key()).and_then(Value::as_str) {
                        entries.push(CatalogEntry {
                            service_type: service_type.clone(),
                            service_name: service_name.clone(),
                            region: region.clone(),
                            interface,
                            url: url.to_string(),
                        });
                    }
                }
            }
        }
        entries
    }

    fn matching_services<'a>(
        &'a self,
        filter: &'a EndpointFilter,
    ) -> impl Iterator<Item = &'a Value> + 'a {
        self.services.iter().filter(move |service| {
            let type_matches =
                service.get("type").and_then(Value::as_str) == Some(filter.service_type.as_str());
            let name_matches = match &filter.service_name {
                Some(name) => service.get("name").and_then(Value::as_str) == Some(name.as_str()),
                None => true,
            };
            type_matches && name_matches
        })
    }
}

fn endpoints_of(service: &Value) -> impl Iterator<Item = &Value> {
    service
        .get("endpoints")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new(json!([
            {
                "type": "baremetal",
                "name": "metal",
                "endpoints": [
                    {
                        "region": "RegionOne",
                        "publicURL": "http://metal.one/v1",
                        "internalURL": "http://metal.one.internal/v1",
                        "adminURL": "http://metal.one.admin/v1"
                    }
                ]
            },
            {
                "type": "volume",
                "name": "blocks",
                "endpoints": [
                    {"region": "RegionOne", "publicURL": "http://volume.one/v2"},
                    {"region": "RegionTwo", "publicURL": "http://volume.two/v2"}
                ]
            },
            {
                "type": "volume",
                "name": "legacy-blocks",
                "endpoints": [
                    {"region": "RegionOne", "publicURL": "http://legacy.one/v1"}
                ]
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_single_match_returns_url() {
        let url = catalog().url_for(&EndpointFilter::new("baremetal")).unwrap();
        assert_eq!(url, "http://metal.one/v1");
    }

    #[test]
    fn test_interface_selects_catalog_key() {
        let filter = EndpointFilter::new("baremetal").with_interface(Interface::Admin);
        assert_eq!(catalog().url_for(&filter).unwrap(), "http://metal.one.admin/v1");
    }

    #[test]
    fn test_no_match_is_endpoint_not_found() {
        let error = catalog().url_for(&EndpointFilter::new("monitoring")).unwrap_err();
        assert!(matches!(error, ClientError::EndpointNotFound { .. }));

        let filter = EndpointFilter::new("baremetal").with_region(Some("RegionTwo".to_string()));
        assert!(matches!(
            catalog().url_for(&filter),
            Err(ClientError::EndpointNotFound { .. })
        ));
    }

    #[test]
    fn test_multiple_matches_are_ambiguous() {
        match catalog().url_for(&EndpointFilter::new("volume")) {
            Err(ClientError::AmbiguousEndpoints { endpoints, .. }) => {
                assert_eq!(endpoints.len(), 3);
            }
            other => panic!("expected ambiguous endpoints, got {:?}", other),
        }
    }

    #[test]
    fn test_region_and_name_disambiguate() {
        let filter = EndpointFilter::new("volume").with_region(Some("RegionTwo".to_string()));
        assert_eq!(catalog().url_for(&filter).unwrap(), "http://volume.two/v2");

        let filter = EndpointFilter::new("volume")
            .with_region(Some("RegionOne".to_string()))
            .with_service_name(Some("legacy-blocks".to_string()));
        assert_eq!(catalog().url_for(&filter).unwrap(), "http://legacy.one/v1");
    }

    #[test]
    fn test_entries_flatten_every_interface() {
        let entries = catalog().entries();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].service_type, "baremetal");
        assert_eq!(entries[0].interface, Interface::Public);
        assert_eq!(entries[2].url, "http://metal.one.admin/v1");
    }

    #[test]
    fn test_malformed_catalog_is_rejected() {
        assert!(ServiceCatalog::new(json!({"type": "volume"})).is_err());
        assert!(ServiceCatalog::new(json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_interface_parsing() {
        assert_eq!("publicURL".parse::<Interface>().unwrap(), Interface::Public);
        assert_eq!("internal".parse::<Interface>().unwrap(), Interface::Internal);
        assert_eq!("ADMIN".parse::<Interface>().unwrap(), Interface::Admin);
        assert!("private".parse::<Interface>().is_err());
    }
}
