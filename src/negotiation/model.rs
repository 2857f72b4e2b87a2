//! Handler-produced domain objects.
//!
//! A [`Model`] is opaque to routing and negotiation; representers only look
//! at its [`ModelShape`] to decide whether they apply.

use serde::Serialize;
use serde_json::Value;

/// Shape classification used by representers to claim models.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelShape {
    Null,
    Boolean,
    Integer,
    Double,
    String,
    /// Ordered sequence.
    List,
    /// Untagged key/value map.
    Map,
    /// Key/value map tagged with a class name.
    Object(String),
}

impl ModelShape {
    /// Short label, e.g. `integer` or `object:User`.
    pub fn label(&self) -> String {
        match self {
            ModelShape::Null => "null".into(),
            ModelShape::Boolean => "boolean".into(),
            ModelShape::Integer => "integer".into(),
            ModelShape::Double => "double".into(),
            ModelShape::String => "string".into(),
            ModelShape::List => "list".into(),
            ModelShape::Map => "map".into(),
            ModelShape::Object(class) => format!("object:{}", class),
        }
    }
}

/// The business object returned by a route handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    value: Value,
    class: Option<String>,
}

impl Model {
    /// Wrap a plain value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            class: None,
        }
    }

    /// Wrap a value tagged with a class name.
    pub fn object(class: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            class: Some(class.into()),
        }
    }

    /// Serialize any `Serialize` type into an untagged model.
    pub fn from_serialize<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::to_value(data)?))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn shape(&self) -> ModelShape {
        if let Some(class) = &self.class {
            return ModelShape::Object(class.clone());
        }
        match &self.value {
            Value::Null => ModelShape::Null,
            Value::Bool(_) => ModelShape::Boolean,
            Value::Number(n) if n.is_f64() => ModelShape::Double,
            Value::Number(_) => ModelShape::Integer,
            Value::String(_) => ModelShape::String,
            Value::Array(_) => ModelShape::List,
            Value::Object(_) => ModelShape::Map,
        }
    }
}

impl From<Value> for Model {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shapes() {
        assert_eq!(Model::new(json!(null)).shape(), ModelShape::Null);
        assert_eq!(Model::new(json!(3)).shape(), ModelShape::Integer);
        assert_eq!(Model::new(json!(3.5)).shape(), ModelShape::Double);
        assert_eq!(Model::new(json!([1, 2])).shape(), ModelShape::List);
        assert_eq!(Model::new(json!({"a": 1})).shape(), ModelShape::Map);
        assert_eq!(
            Model::object("User", json!({"id": 1})).shape(),
            ModelShape::Object("User".into())
        );
        assert_eq!(ModelShape::Object("User".into()).label(), "object:User");
    }
}
