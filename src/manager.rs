//! Generic CRUD over a REST collection.
//!
//! Every service resource is described by a [`ResourceKind`]; a
//! [`ResourceManager`] turns it into URLs and request bodies and unwraps the
//! JSON envelopes the services answer with.

use std::collections::{BTreeMap, HashSet};

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};
use url::Url;

use crate::client::{ApiRequest, ClientError, HttpClient};
use crate::resource::{Resource, ResourceList};

const NEXT: &str = "next";

/// Static description of a resource collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    /// Catalog service type hosting the collection
    pub service_type: &'static str,
    /// Collection path below the service endpoint, `/` separated
    pub collection: &'static str,
    /// Envelope key of a single resource
    pub singular: &'static str,
    /// Envelope key of a list
    pub plural: &'static str,
    /// Columns shown when listing as a table
    pub list_columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceManager {
    kind: ResourceKind,
}

impl ResourceManager {
    pub const fn new(kind: ResourceKind) -> ResourceManager {
        ResourceManager { kind }
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    fn path(&self, segments: &[&str]) -> Vec<String> {
        self.kind
            .collection
            .split('/')
            .filter(|segment| !segment.is_empty())
            .chain(segments.iter().copied())
            .map(str::to_string)
            .collect()
    }

    fn unexpected(&self, reason: &str) -> ClientError {
        ClientError::UnexpectedResponse {
            service_type: self.kind.service_type.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Fetch one resource by id.
    pub async fn get(&self, client: &mut HttpClient, id: &str) -> Result<Resource, ClientError> {
        let request = ApiRequest::get(self.kind.service_type, self.path(&[id]));
        let body = client.request(&request).await?;
        self.unwrap_one(body)
    }

    /// List the collection.
    ///
    /// Filters without a value are left out of the query. With `paginate` set
    /// every `next` link is followed and the pages are concatenated.
    pub async fn list(
        &self,
        client: &mut HttpClient,
        filters: &[(&str, Option<String>)],
        paginate: bool,
    ) -> Result<ResourceList, ClientError> {
        let query = build_query(filters);
        let mut request = ApiRequest::get(self.kind.service_type, self.path(&[])).with_query(query);
        let mut resources = Vec::new();
        let mut visited = HashSet::new();

        loop {
            let body = client.request(&request).await?;
            let (page, next) = self.unwrap_page(body)?;
            trace!("Received {} {}", page.len(), self.kind.plural);
            resources.extend(page);

            let next = match next {
                Some(next) if paginate => next,
                _ => break,
            };
            let url = self.resolve_link(client, &next).await?;
            if !visited.insert(url.clone()) {
                debug!("Pagination link {} was already visited", url);
                break;
            }
            debug!("Following pagination link {}", url);
            request = ApiRequest::absolute(Method::GET, self.kind.service_type, url);
        }

        Ok(ResourceList::new(resources, self.kind.list_columns))
    }

    /// Create a resource from the non-null fields of `fields`.
    pub async fn create<T: Serialize>(
        &self,
        client: &mut HttpClient,
        fields: &T,
    ) -> Result<Resource, ClientError> {
        let fields = supplied_fields(fields)?;
        let request = ApiRequest::post(self.kind.service_type, self.path(&[]))
            .with_body(self.envelope(fields));
        let body = client.request(&request).await?;
        self.unwrap_one(body)
    }

    /// Update the supplied fields of a resource.
    ///
    /// Returns `None`, without contacting the service, when no field is given.
    pub async fn update<T: Serialize>(
        &self,
        client: &mut HttpClient,
        id: &str,
        fields: &T,
    ) -> Result<Option<Resource>, ClientError> {
        let fields = supplied_fields(fields)?;
        if fields.is_empty() {
            debug!("Nothing to update on {} {}", self.kind.singular, id);
            return Ok(None);
        }

        let request = ApiRequest::put(self.kind.service_type, self.path(&[id]))
            .with_body(self.envelope(fields));
        match client.request(&request).await? {
            Value::Null => self.get(client, id).await.map(Some),
            body => self.unwrap_one(body).map(Some),
        }
    }

    pub async fn delete(&self, client: &mut HttpClient, id: &str) -> Result<(), ClientError> {
        let request = ApiRequest::delete(self.kind.service_type, self.path(&[id]));
        client.request(&request).await?;
        Ok(())
    }

    /// POST an action body to `/<collection>/<id>/action`.
    pub async fn action(
        &self,
        client: &mut HttpClient,
        id: &str,
        body: Value,
    ) -> Result<Value, ClientError> {
        let request =
            ApiRequest::post(self.kind.service_type, self.path(&[id, "action"])).with_body(body);
        client.request(&request).await
    }

    /// GET a path below the collection, returning the raw body.
    pub async fn get_path(
        &self,
        client: &mut HttpClient,
        segments: &[&str],
        query: BTreeMap<String, String>,
    ) -> Result<Value, ClientError> {
        let request = ApiRequest::get(self.kind.service_type, self.path(segments))
            .with_query(query);
        client.request(&request).await
    }

    fn envelope(&self, fields: Map<String, Value>) -> Value {
        let mut body = Map::new();
        body.insert(self.kind.singular.to_string(), Value::Object(fields));
        Value::Object(body)
    }

    fn unwrap_one(&self, body: Value) -> Result<Resource, ClientError> {
        let value = match body {
            Value::Object(mut map) => match map.remove(self.kind.singular) {
                Some(inner) => inner,
                None => Value::Object(map),
            },
            other => other,
        };
        Resource::from_value(value)
            .ok_or_else(|| self.unexpected(&format!("expected a {} object", self.kind.singular)))
    }

    fn unwrap_page(&self, body: Value) -> Result<(Vec<Resource>, Option<String>), ClientError> {
        let (items, next) = match body {
            Value::Array(items) => (items, None),
            Value::Object(mut map) => {
                let next = next_link(&map, self.kind.plural);
                match map.remove(self.kind.plural) {
                    Some(Value::Array(items)) => (items, next),
                    _ => {
                        return Err(
                            self.unexpected(&format!("expected a list of {}", self.kind.plural))
                        )
                    }
                }
            }
            _ => return Err(self.unexpected(&format!("expected a list of {}", self.kind.plural))),
        };

        let resources = items
            .into_iter()
            .map(|item| {
                Resource::from_value(item)
                    .ok_or_else(|| self.unexpected(&format!("expected {} objects", self.kind.singular)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((resources, next))
    }

    async fn resolve_link(&self, client: &mut HttpClient, href: &str) -> Result<Url, ClientError> {
        match Url::parse(href) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let endpoint = client.endpoint(self.kind.service_type).await?;
                Ok(endpoint.join(href)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Query parameters from the filters that carry a non-empty value.
pub fn build_query(filters: &[(&str, Option<String>)]) -> BTreeMap<String, String> {
    filters
        .iter()
        .filter_map(|(key, value)| match value {
            Some(value) if !value.is_empty() => Some((key.to_string(), value.clone())),
            _ => None,
        })
        .collect()
}

fn supplied_fields<T: Serialize>(fields: &T) -> Result<Map<String, Value>, ClientError> {
    match serde_json::to_value(fields)? {
        Value::Object(map) => Ok(map.into_iter().filter(|(_, value)| !value.is_null()).collect()),
        Value::Null => Ok(Map::new()),
        other => Err(ClientError::InvalidRequest(format!(
            "request fields must be an object, got {}",
            other
        ))),
    }
}

fn next_link(map: &Map<String, Value>, plural: &str) -> Option<String> {
    let from_links = [format!("{}_links", plural), "links".to_string()]
        .iter()
        .filter_map(|key| map.get(key).and_then(Value::as_array))
        .flatten()
        .find(|link| link.get("rel").and_then(Value::as_str) == Some(NEXT))
        .and_then(|link| link.get("href").and_then(Value::as_str))
        .map(str::to_string);

    from_links.or_else(|| {
        map.get(NEXT)
            .and_then(Value::as_str)
            .filter(|next| !next.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WIDGETS: ResourceKind = ResourceKind {
        service_type: "widget",
        collection: "v1/widgets",
        singular: "widget",
        plural: "widgets",
        list_columns: &["id", "name"],
    };

    #[derive(Serialize)]
    struct WidgetUpdate {
        name: Option<String>,
        size: Option<u32>,
    }

    #[test]
    fn test_build_query_drops_empty_values() {
        let query = build_query(&[
            ("status", None),
            ("name", Some("foo".to_string())),
            ("host", Some(String::new())),
        ]);
        assert_eq!(query.len(), 1);
        assert_eq!(query.get("name").map(String::as_str), Some("foo"));
    }

    #[test]
    fn test_path_splits_collection() {
        let manager = ResourceManager::new(WIDGETS);
        assert_eq!(manager.path(&["w-1", "action"]), ["v1", "widgets", "w-1", "action"]);
        assert_eq!(manager.path(&[]), ["v1", "widgets"]);
    }

    #[test]
    fn test_supplied_fields_skip_nulls() {
        let fields = supplied_fields(&WidgetUpdate {
            name: None,
            size: Some(3),
        })
        .unwrap();
        assert_eq!(Value::Object(fields), json!({"size": 3}));

        let fields = supplied_fields(&WidgetUpdate { name: None, size: None }).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_unwrap_one_accepts_envelope_and_bare_object() {
        let manager = ResourceManager::new(WIDGETS);
        let resource = manager.unwrap_one(json!({"widget": {"id": "w-1"}})).unwrap();
        assert_eq!(resource.id().as_deref(), Some("w-1"));
        let resource = manager.unwrap_one(json!({"id": "w-2"})).unwrap();
        assert_eq!(resource.id().as_deref(), Some("w-2"));
        assert!(manager.unwrap_one(Value::Null).is_err());
    }

    #[test]
    fn test_unwrap_page_shapes() {
        let manager = ResourceManager::new(WIDGETS);
        let (page, next) = manager.unwrap_page(json!([{"id": "a"}, {"id": "b"}])).unwrap();
        assert_eq!(page.len(), 2);
        assert!(next.is_none());

        let (page, next) = manager
            .unwrap_page(json!({
                "widgets": [{"id": "a"}],
                "widgets_links": [{"rel": "next", "href": "http://cloud/v1/widgets?marker=a"}]
            }))
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(next.as_deref(), Some("http://cloud/v1/widgets?marker=a"));

        assert!(manager.unwrap_page(json!({"gadgets": []})).is_err());
        assert!(manager.unwrap_page(json!({"widgets": [1, 2]})).is_err());
    }

    #[test]
    fn test_next_link_sources() {
        let map = json!({"links": [{"rel": "self", "href": "s"}, {"rel": "next", "href": "n"}]});
        assert_eq!(next_link(map.as_object().unwrap(), "widgets").as_deref(), Some("n"));

        let map = json!({"next": "/v1/widgets?marker=z"});
        assert_eq!(
            next_link(map.as_object().unwrap(), "widgets").as_deref(),
            Some("/v1/widgets?marker=z")
        );

        let map = json!({"next": ""});
        assert!(next_link(map.as_object().unwrap(), "widgets").is_none());
    }

    #[test]
    fn test_envelope() {
        let manager = ResourceManager::new(WIDGETS);
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("w"));
        assert_eq!(manager.envelope(fields), json!({"widget": {"name": "w"}}));
    }
}
