//! Resources returned by the cloud services.
//!
//! A [`Resource`] is the attribute bag the service sent back, kept in the
//! order the attributes arrived.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format::{to_csv, to_json, to_table, Formattable, FormattingError, OutputFormat};
use crate::format_utils::{format_links, format_value};

const LINKS: &str = "links";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource {
    attributes: Map<String, Value>,
}

impl Resource {
    pub fn new(attributes: Map<String, Value>) -> Resource {
        Resource { attributes }
    }

    /// Wrap a JSON object; anything else yields `None`.
    pub fn from_value(value: Value) -> Option<Resource> {
        match value {
            Value::Object(attributes) => Some(Resource { attributes }),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The `id` attribute; numeric ids are returned in their decimal form.
    pub fn id(&self) -> Option<String> {
        match self.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    fn property_cell(key: &str, value: &Value) -> String {
        if key == LINKS {
            format_links(value).into_cell()
        } else {
            format_value(value, true).into_cell()
        }
    }
}

impl Formattable for Resource {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        match f {
            OutputFormat::Table(_) => {
                let rows = self
                    .attributes
                    .iter()
                    .map(|(key, value)| vec![key.clone(), Self::property_cell(key, value)])
                    .collect();
                Ok(to_table(&["Property", "Value"], rows))
            }
            OutputFormat::Json(options) => to_json(&self.attributes, options),
            OutputFormat::Csv(options) => {
                let header: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
                let row = self
                    .attributes
                    .values()
                    .map(|value| format_value(value, false).into_cell())
                    .collect();
                to_csv(&header, vec![row], options)
            }
        }
    }
}

/// Resources from a list call, with the columns shown in tables
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceList {
    resources: Vec<Resource>,
    columns: Vec<String>,
}

impl ResourceList {
    pub fn new(resources: Vec<Resource>, columns: &[&str]) -> ResourceList {
        ResourceList {
            resources,
            columns: columns.iter().map(|column| column.to_string()).collect(),
        }
    }

    /// A list from a bare JSON array of objects.
    pub fn from_value(value: Value, columns: &[&str]) -> Option<ResourceList> {
        let resources = match value {
            Value::Array(items) => items
                .into_iter()
                .map(Resource::from_value)
                .collect::<Option<Vec<_>>>()?,
            _ => return None,
        };
        Some(ResourceList::new(resources, columns))
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn into_inner(self) -> Vec<Resource> {
        self.resources
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.resources
            .iter()
            .map(|resource| {
                self.columns
                    .iter()
                    .map(|column| match resource.get(column) {
                        Some(value) => format_value(value, false).into_cell(),
                        None => String::new(),
                    })
                    .collect()
            })
            .collect()
    }
}

impl IntoIterator for ResourceList {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl Formattable for ResourceList {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        match f {
            OutputFormat::Table(_) => Ok(to_table(&self.columns, self.rows())),
            OutputFormat::Json(options) => to_json(&self.resources, options),
            OutputFormat::Csv(options) => to_csv(&self.columns, self.rows(), options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormatOptions;
    use serde_json::json;

    fn resource(value: Value) -> Resource {
        Resource::from_value(value).unwrap()
    }

    #[test]
    fn test_accessors() {
        let server = resource(json!({"id": "s-1", "name": "web", "status": "ACTIVE"}));
        assert_eq!(server.id().as_deref(), Some("s-1"));
        assert_eq!(server.name(), Some("web"));
        assert_eq!(server.get_str("status"), Some("ACTIVE"));
        assert!(server.get("host").is_none());

        let numbered = resource(json!({"id": 7}));
        assert_eq!(numbered.id().as_deref(), Some("7"));
        assert!(Resource::from_value(json!(["not", "an", "object"])).is_none());
    }

    #[test]
    fn test_attribute_order_is_preserved() {
        let volume = resource(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&String> = volume.attributes().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_show_table_renders_nested_values_and_links() {
        let server = resource(json!({
            "id": "s-1",
            "addresses": {"private": ["10.0.0.5"]},
            "links": [{"rel": "self", "href": "http://cloud/servers/s-1"}]
        }));
        let table = server.format(&OutputFormat::default()).unwrap();
        assert!(table.contains("private: 10.0.0.5"));
        assert!(table.contains("self-> http://cloud/servers/s-1"));
    }

    #[test]
    fn test_list_csv_uses_columns() {
        let list = ResourceList::new(
            vec![
                resource(json!({"id": "a", "name": "one", "extra": true})),
                resource(json!({"id": "b"})),
            ],
            &["id", "name"],
        );
        let options = OutputFormatOptions {
            with_headers: true,
            pretty: false,
        };
        let csv = list.format(&OutputFormat::Csv(options)).unwrap();
        assert_eq!(csv, "ID,NAME\na,one\nb,\n");
    }

    #[test]
    fn test_list_json_keeps_all_attributes() {
        let list = ResourceList::new(vec![resource(json!({"id": "a", "extra": 1}))], &["id"]);
        let json = list
            .format(&OutputFormat::Json(OutputFormatOptions::default()))
            .unwrap();
        assert_eq!(json, r#"[{"id":"a","extra":1}]"#);
    }
}
