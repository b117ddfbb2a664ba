//! Backend-shaped response envelopes.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A list response.
///
/// Serializes as `{"success": true, "data": [...]}`. An alias repeats the
/// items under a resource-specific name (`"items"`, `"wishlist"`), and
/// extras add sibling fields such as `pagination` or `summary`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListEnvelope {
    items: Vec<Value>,
    alias: Option<String>,
    extras: Map<String, Value>,
}

impl ListEnvelope {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Build from typed records.
    pub fn from_records<T: Serialize>(
        records: impl IntoIterator<Item = T>,
    ) -> Result<Self, serde_json::Error> {
        let items = records
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(items))
    }

    /// Also expose the items under `name`.
    pub fn with_alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    /// Add a sibling field.
    pub fn with_extra<T: Serialize>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        self.extras.insert(name.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn data(&self) -> &[Value] {
        &self.items
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Items by field name: `data`, or the alias.
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        if name == "data" || self.alias.as_deref() == Some(name) {
            Some(&self.items)
        } else {
            None
        }
    }

    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.extras.get(name)
    }

    pub fn success(&self) -> bool {
        true
    }

    /// Decode the items into a typed record.
    pub fn items_as<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.items
            .iter()
            .map(|item| T::deserialize(item))
            .collect()
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl Deref for ListEnvelope {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.items
    }
}

impl Serialize for ListEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &true)?;
        map.serialize_entry("data", &self.items)?;
        if let Some(alias) = &self.alias {
            map.serialize_entry(alias, &self.items)?;
        }
        for (name, value) in &self.extras {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// What a handled request returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    List(ListEnvelope),
    Object {
        data: Value,
        message: Option<String>,
    },
    Failure {
        status: u16,
        message: String,
    },
}

impl Reply {
    pub fn list(envelope: ListEnvelope) -> Self {
        Reply::List(envelope)
    }

    /// A single-record reply.
    pub fn object<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Reply::Object {
            data: serde_json::to_value(data)?,
            message: None,
        })
    }

    /// Attach a message to an object reply. Other replies are unchanged.
    pub fn with_message(self, text: impl Into<String>) -> Self {
        match self {
            Reply::Object { data, .. } => Reply::Object {
                data,
                message: Some(text.into()),
            },
            other => other,
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Reply::Failure {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(404, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::failure(400, message)
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Reply::Failure { .. })
    }

    /// HTTP-like status code.
    pub fn status(&self) -> u16 {
        match self {
            Reply::Failure { status, .. } => *status,
            _ => 200,
        }
    }

    pub fn as_list(&self) -> Option<&ListEnvelope> {
        match self {
            Reply::List(list) => Some(list),
            _ => None,
        }
    }

    /// The `data` of an object reply.
    pub fn as_object(&self) -> Option<&Value> {
        match self {
            Reply::Object { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Reply::Object { message, .. } => message.as_deref(),
            Reply::Failure { message, .. } => Some(message),
            Reply::List(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Serialize for Reply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reply::List(list) => list.serialize(serializer),
            Reply::Object { data, message } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                if let Some(message) = message {
                    map.serialize_entry("message", message)?;
                }
                map.end()
            }
            Reply::Failure { message, .. } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
                map.end()
            }
        }
    }
}

/// Result of offering a request to the router.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Handled(Reply),
    /// No route matched; the caller should go to the network.
    Unhandled,
}

impl RouteOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, RouteOutcome::Handled(_))
    }

    pub fn reply(&self) -> Option<&Reply> {
        match self {
            RouteOutcome::Handled(reply) => Some(reply),
            RouteOutcome::Unhandled => None,
        }
    }

    pub fn into_reply(self) -> Option<Reply> {
        match self {
            RouteOutcome::Handled(reply) => Some(reply),
            RouteOutcome::Unhandled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_envelope_shape() {
        let list = ListEnvelope::new(vec![json!({"id": 1}), json!({"id": 2})])
            .with_alias("items")
            .with_extra("summary", &json!({"item_count": 3}))
            .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], 1);
        assert_eq!(list.get("items").unwrap().len(), 2);
        assert!(list.get("other").is_none());

        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": [{"id": 1}, {"id": 2}],
                "items": [{"id": 1}, {"id": 2}],
                "summary": {"item_count": 3}
            })
        );
    }

    #[test]
    fn test_items_as() {
        #[derive(serde::Deserialize)]
        struct Row {
            id: u32,
        }
        let list = ListEnvelope::from_records([json!({"id": 5})]).unwrap();
        let rows: Vec<Row> = list.items_as().unwrap();
        assert_eq!(rows[0].id, 5);
    }

    #[test]
    fn test_object_and_failure_shapes() {
        let ok = Reply::object(&json!({"id": 1})).unwrap().with_message("Added");
        assert_eq!(
            ok.to_json().unwrap(),
            json!({"success": true, "data": {"id": 1}, "message": "Added"})
        );
        assert_eq!(ok.status(), 200);

        let missing = Reply::not_found("Product not found: 9");
        assert_eq!(missing.status(), 404);
        assert!(!missing.is_success());
        assert_eq!(
            missing.to_json().unwrap(),
            json!({"success": false, "message": "Product not found: 9"})
        );
    }

    #[test]
    fn test_route_outcome() {
        assert!(!RouteOutcome::Unhandled.is_handled());
        assert!(RouteOutcome::Unhandled.into_reply().is_none());
        let outcome = RouteOutcome::Handled(Reply::bad_request("nope"));
        assert_eq!(outcome.reply().map(Reply::status), Some(400));
    }
}
