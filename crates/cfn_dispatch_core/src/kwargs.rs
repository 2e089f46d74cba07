use std::collections::BTreeMap;

use serde_json::{Map, Value};

const TOP_LEVEL_SCOPE: &str = "input";

/// Keyword arguments taken from the `Properties` mapping of a resource.
///
/// Each accessor consumes its key; [`Kwargs::finish`] then rejects whatever
/// is left over, so a call never silently drops a misspelled parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Kwargs {
    scope: String,
    values: Map<String, Value>,
    accepted: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KwargsError {
    NotAMapping {
        found: &'static str,
    },
    Missing {
        scope: String,
        name: String,
    },
    Unknown {
        scope: String,
        name: String,
        valid: Vec<String>,
    },
    InvalidType {
        name: String,
        value: String,
        found: &'static str,
        expected: &'static str,
    },
}

impl std::fmt::Display for KwargsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAMapping { found } => {
                write!(f, "Properties must be a mapping, got {found}")
            }
            Self::Missing { scope, name } => {
                write!(f, "Missing required parameter in {scope}: \"{name}\"")
            }
            Self::Unknown { scope, name, valid } => write!(
                f,
                "Unknown parameter in {scope}: \"{name}\", must be one of: {}",
                valid.join(", ")
            ),
            Self::InvalidType {
                name,
                value,
                found,
                expected,
            } => write!(
                f,
                "Invalid type for parameter {name}, value: {value}, type: {found}, valid types: {expected}"
            ),
        }
    }
}

impl std::error::Error for KwargsError {}

impl Kwargs {
    pub fn from_value(value: &Value) -> Result<Self, KwargsError> {
        Self::scoped(TOP_LEVEL_SCOPE, value)
    }

    fn scoped(scope: &str, value: &Value) -> Result<Self, KwargsError> {
        let Some(values) = value.as_object() else {
            return Err(KwargsError::NotAMapping {
                found: json_type_name(value),
            });
        };

        Ok(Self {
            scope: scope.to_string(),
            values: values.clone(),
            accepted: Vec::new(),
        })
    }

    fn take(&mut self, name: &'static str) -> Option<Value> {
        self.accepted.push(name);
        match self.values.remove(name) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    fn missing(&self, name: &str) -> KwargsError {
        KwargsError::Missing {
            scope: self.scope.clone(),
            name: name.to_string(),
        }
    }

    pub fn required_str(&mut self, name: &'static str) -> Result<String, KwargsError> {
        self.optional_str(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn optional_str(&mut self, name: &'static str) -> Result<Option<String>, KwargsError> {
        match self.take(name) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(other) => Err(invalid_type(name, &other, "<class 'str'>")),
        }
    }

    /// Integers arrive either as JSON numbers or, from CloudFormation, as
    /// their string rendering.
    pub fn optional_i32(&mut self, name: &'static str) -> Result<Option<i32>, KwargsError> {
        let Some(value) = self.take(name) else {
            return Ok(None);
        };

        let parsed = match &value {
            Value::Number(number) => number.as_i64().and_then(|raw| i32::try_from(raw).ok()),
            Value::String(text) => text.trim().parse::<i32>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| invalid_type(name, &value, "<class 'int'>"))
    }

    pub fn optional_bool(&mut self, name: &'static str) -> Result<Option<bool>, KwargsError> {
        let Some(value) = self.take(name) else {
            return Ok(None);
        };

        let parsed = match &value {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => match text.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| invalid_type(name, &value, "<class 'bool'>"))
    }

    /// Nested structure such as `CreateBucketConfiguration`. The returned
    /// arguments must be finished by the caller like the top level.
    pub fn optional_structure(
        &mut self,
        name: &'static str,
    ) -> Result<Option<Kwargs>, KwargsError> {
        match self.take(name) {
            None => Ok(None),
            Some(value @ Value::Object(_)) => Self::scoped(name, &value).map(Some),
            Some(other) => Err(invalid_type(name, &other, "<class 'dict'>")),
        }
    }

    pub fn required_structure(&mut self, name: &'static str) -> Result<Kwargs, KwargsError> {
        self.optional_structure(name)?
            .ok_or_else(|| self.missing(name))
    }

    pub fn optional_string_map(
        &mut self,
        name: &'static str,
    ) -> Result<Option<BTreeMap<String, String>>, KwargsError> {
        let Some(value) = self.take(name) else {
            return Ok(None);
        };
        let Some(entries) = value.as_object() else {
            return Err(invalid_type(name, &value, "<class 'dict'>"));
        };

        let mut map = BTreeMap::new();
        for (key, entry) in entries {
            let Some(text) = entry.as_str() else {
                return Err(invalid_type(
                    &format!("{name}.{key}"),
                    entry,
                    "<class 'str'>",
                ));
            };
            map.insert(key.clone(), text.to_string());
        }
        Ok(Some(map))
    }

    /// Blob parameters: strings pass through, any other JSON value is sent
    /// as its serialized text.
    pub fn optional_blob(&mut self, name: &'static str) -> Result<Option<Vec<u8>>, KwargsError> {
        Ok(self.take(name).map(|value| match value {
            Value::String(text) => text.into_bytes(),
            other => other.to_string().into_bytes(),
        }))
    }

    pub fn finish(self) -> Result<(), KwargsError> {
        let Some(name) = self.values.keys().next() else {
            return Ok(());
        };

        Err(KwargsError::Unknown {
            scope: self.scope,
            name: name.clone(),
            valid: self.accepted.iter().map(|value| value.to_string()).collect(),
        })
    }
}

fn invalid_type(name: &str, value: &Value, expected: &'static str) -> KwargsError {
    KwargsError::InvalidType {
        name: name.to_string(),
        value: value.to_string(),
        found: json_type_name(value),
        expected,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "<class 'NoneType'>",
        Value::Bool(_) => "<class 'bool'>",
        Value::Number(number) if number.is_f64() => "<class 'float'>",
        Value::Number(_) => "<class 'int'>",
        Value::String(_) => "<class 'str'>",
        Value::Array(_) => "<class 'list'>",
        Value::Object(_) => "<class 'dict'>",
    }
}
