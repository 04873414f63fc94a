// spec.rs - Declaration of one argument or flag

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::ParameterType;
use super::value::{coerce_default, ParamValue};

/// Static declaration of an argument or flag.
///
/// `default` stays untyped until the description is bound; `bind` rejects
/// defaults that cannot be coerced to `ty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,

    #[serde(rename = "type", default)]
    pub ty: ParameterType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub default: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Single-character alias, only used for flags (`-H` for `--host`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
}

impl ParameterSpec {
    pub fn new(name: &str, ty: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            required: false,
            default: Value::Null,
            help: None,
            short: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_null()
    }

    /// Value used when the parameter is absent: the coerced default, or the
    /// type's zero value when none is declared.
    pub fn default_value(&self, now: DateTime<Utc>) -> Result<Option<ParamValue>, String> {
        if self.has_default() {
            coerce_default(self.ty, &self.default, now).map(Some)
        } else {
            Ok(ParamValue::zero(self.ty))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Wrapper {
        arguments: Vec<ParameterSpec>,
    }

    #[test]
    fn test_builder() {
        let spec = ParameterSpec::new("ids", ParameterType::IntegerList)
            .with_default(json!([1, 2]))
            .with_help("row ids");
        assert!(!spec.required);
        assert!(spec.has_default());
        assert_eq!(spec.help.as_deref(), Some("row ids"));
        assert_eq!(
            spec.default_value(Utc::now()).unwrap(),
            Some(ParamValue::IntegerList(vec![1, 2]))
        );
    }

    #[test]
    fn test_zero_values_without_default() {
        let now = Utc::now();
        assert_eq!(
            ParameterSpec::new("a", ParameterType::String).default_value(now).unwrap(),
            Some(ParamValue::from(""))
        );
        assert_eq!(
            ParameterSpec::new("a", ParameterType::Integer).default_value(now).unwrap(),
            Some(ParamValue::Integer(0))
        );
        assert_eq!(
            ParameterSpec::new("a", ParameterType::Date).default_value(now).unwrap(),
            None
        );
    }

    #[test]
    fn test_deserialize_from_toml() {
        let wrapper: Wrapper = toml::from_str(
            r#"
            [[arguments]]
            name = "foo"
            required = true

            [[arguments]]
            name = "limit"
            type = "int"
            default = 10

            [[arguments]]
            name = "tags"
            type = "stringList"
            default = ["a", "b"]
            short = "t"
            "#,
        )
        .unwrap();

        let specs = wrapper.arguments;
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].ty, ParameterType::String);
        assert!(specs[0].required);
        assert!(!specs[0].has_default());
        assert_eq!(specs[1].ty, ParameterType::Integer);
        assert_eq!(specs[1].default, json!(10));
        assert_eq!(specs[2].default, json!(["a", "b"]));
        assert_eq!(specs[2].short, Some('t'));
        assert_eq!(specs[0].short, None);
    }
}
