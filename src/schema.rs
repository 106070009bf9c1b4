//! Declarative resource schemas.
//!
//! A [`Schema`] describes the attributes a resource accepts: their types,
//! whether they are required, optional or computed, and which validators run
//! against them. The same tree drives two things:
//!
//! - validation of incoming configuration ([`Schema::validate`] and
//!   [`Schema::validate_config`]), and
//! - conversion of snake_case configuration into the camelCase field names
//!   Kubernetes expects ([`Attribute::to_manifest`]).

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::diagnostics::{has_errors, AttributePath, Diagnostic};
use crate::validators::Validator;

#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct Schema {
    pub description: String,
    pub attributes: BTreeMap<String, Attribute>,
}

#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeKind,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub computed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Field name in the rendered manifest when it is not the camelCase form
    /// of the attribute name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_key: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    /// Reported as a warning when the attribute is set in configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
}

#[derive(Serialize, Debug, PartialEq, Clone)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Int64,
    Float64,
    Bool,
    /// Configured as a string; rendered as an integer when the string is one.
    IntOrString,
    /// Any value, rendered as given.
    Dynamic,
    List(Box<AttributeKind>),
    Map(Box<AttributeKind>),
    SingleNested(BTreeMap<String, Attribute>),
    ListNested(BTreeMap<String, Attribute>),
    MapNested(BTreeMap<String, Attribute>),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Mode {
    /// Raw configuration: computed-only attributes must be left unset.
    Config,
    /// A plan or prior state: computed attributes may carry values.
    Plan,
}

fn is_false(b: &bool) -> bool {
    !b
}

fn nested<I, K>(attributes: I) -> BTreeMap<String, Attribute>
where
    I: IntoIterator<Item = (K, Attribute)>,
    K: Into<String>,
{
    attributes
        .into_iter()
        .map(|(name, attribute)| (name.into(), attribute))
        .collect()
}

impl Schema {
    pub fn new<I, K>(description: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Attribute)>,
        K: Into<String>,
    {
        Self {
            description: description.into(),
            attributes: nested(attributes),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Validates a plan or state object against the schema.
    pub fn validate(&self, value: &Value) -> Vec<Diagnostic> {
        self.validate_with(value, Mode::Plan)
    }

    /// Validates user configuration: like [`Schema::validate`], and in
    /// addition rejects values on computed-only attributes.
    pub fn validate_config(&self, value: &Value) -> Vec<Diagnostic> {
        self.validate_with(value, Mode::Config)
    }

    fn validate_with(&self, value: &Value, mode: Mode) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        match value.as_object() {
            Some(object) => validate_attributes(
                &self.attributes,
                &AttributePath::root(),
                object,
                mode,
                &mut diagnostics,
            ),
            None => diagnostics.push(Diagnostic::error(
                "Invalid Resource Configuration",
                "The resource configuration must be an object.",
            )),
        }
        diagnostics
    }
}

impl Attribute {
    fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            description: String::new(),
            manifest_key: None,
            validators: Vec::new(),
            deprecation_message: None,
        }
    }

    pub fn string() -> Self {
        Self::new(AttributeKind::String)
    }

    pub fn int64() -> Self {
        Self::new(AttributeKind::Int64)
    }

    /// An `int64` attribute bounded to the range of a 32-bit field.
    pub fn int32() -> Self {
        Self::int64()
            .validator(Validator::AtLeast {
                min: i32::MIN.into(),
            })
            .validator(Validator::AtMost {
                max: i32::MAX.into(),
            })
    }

    pub fn float64() -> Self {
        Self::new(AttributeKind::Float64)
    }

    pub fn bool() -> Self {
        Self::new(AttributeKind::Bool)
    }

    pub fn int_or_string() -> Self {
        Self::new(AttributeKind::IntOrString)
    }

    pub fn dynamic() -> Self {
        Self::new(AttributeKind::Dynamic)
    }

    pub fn list_of(element: AttributeKind) -> Self {
        Self::new(AttributeKind::List(Box::new(element)))
    }

    pub fn map_of(element: AttributeKind) -> Self {
        Self::new(AttributeKind::Map(Box::new(element)))
    }

    pub fn single_nested<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Attribute)>,
        K: Into<String>,
    {
        Self::new(AttributeKind::SingleNested(nested(attributes)))
    }

    pub fn list_nested<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Attribute)>,
        K: Into<String>,
    {
        Self::new(AttributeKind::ListNested(nested(attributes)))
    }

    pub fn map_nested<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Attribute)>,
        K: Into<String>,
    {
        Self::new(AttributeKind::MapNested(nested(attributes)))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self.computed = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self.required = false;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn manifest_key(mut self, key: impl Into<String>) -> Self {
        self.manifest_key = Some(key.into());
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecation_message = Some(message.into());
        self
    }

    fn is_read_only(&self) -> bool {
        self.computed && !self.optional
    }

    /// The manifest field name for an attribute called `name`.
    pub fn key_for(&self, name: &str) -> String {
        self.manifest_key
            .clone()
            .unwrap_or_else(|| lower_camel_case(name))
    }

    /// Converts a configuration value into its manifest form: nested
    /// attribute names become manifest keys, nulls are dropped and
    /// integer-like strings in int-or-string attributes become integers.
    pub fn to_manifest(&self, value: &Value) -> Value {
        self.kind.to_manifest(value)
    }

    fn validate(
        &self,
        path: &AttributePath,
        value: &Value,
        mode: Mode,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if value.is_null() {
            if self.required {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing Configuration for Required Attribute",
                        format!(
                            "Must set a configuration value for the {path} attribute as the provider has marked it as required."
                        ),
                    )
                    .at(path),
                );
            }
            return;
        }
        if mode == Mode::Config && self.is_read_only() {
            diagnostics.push(
                Diagnostic::error(
                    "Invalid Configuration for Read-Only Attribute",
                    "Cannot set value for this attribute as the provider has marked it as read-only. Remove the configuration line setting the value.",
                )
                .at(path),
            );
            return;
        }
        if let (Mode::Config, Some(message)) = (mode, &self.deprecation_message) {
            diagnostics.push(Diagnostic::warning("Attribute Deprecated", message.clone()).at(path));
        }
        let before = diagnostics.len();
        self.kind.validate(path, value, mode, diagnostics);
        if has_errors(&diagnostics[before..]) {
            return;
        }
        for validator in &self.validators {
            diagnostics.extend(validator.validate(path, value));
        }
    }
}

impl AttributeKind {
    fn type_name(&self) -> &'static str {
        match self {
            Self::String | Self::IntOrString => "string",
            Self::Int64 | Self::Float64 => "number",
            Self::Bool => "bool",
            Self::Dynamic => "dynamic",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::SingleNested(_) | Self::MapNested(_) => "object",
            Self::ListNested(_) => "list of objects",
        }
    }

    fn validate(
        &self,
        path: &AttributePath,
        value: &Value,
        mode: Mode,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let matches = match self {
            Self::String | Self::IntOrString => value.is_string(),
            Self::Int64 => value.is_i64(),
            Self::Float64 => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Dynamic => true,
            Self::List(_) | Self::ListNested(_) => value.is_array(),
            Self::Map(_) | Self::SingleNested(_) | Self::MapNested(_) => value.is_object(),
        };
        if !matches {
            diagnostics.push(
                Diagnostic::error(
                    "Incorrect attribute value type",
                    format!(
                        "Inappropriate value for attribute \"{path}\": {} required.",
                        self.type_name()
                    ),
                )
                .at(path),
            );
            return;
        }

        match (self, value) {
            (Self::List(element), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    element.validate_element(&path.index(i), item, mode, diagnostics);
                }
            }
            (Self::Map(element), Value::Object(entries)) => {
                for (key, item) in entries {
                    element.validate_element(&path.key(key), item, mode, diagnostics);
                }
            }
            (Self::SingleNested(attributes), Value::Object(object)) => {
                validate_attributes(attributes, path, object, mode, diagnostics);
            }
            (Self::ListNested(attributes), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    nested_element(attributes, &path.index(i), item, mode, diagnostics);
                }
            }
            (Self::MapNested(attributes), Value::Object(entries)) => {
                for (key, item) in entries {
                    nested_element(attributes, &path.key(key), item, mode, diagnostics);
                }
            }
            _ => {}
        }
    }

    fn validate_element(
        &self,
        path: &AttributePath,
        value: &Value,
        mode: Mode,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if value.is_null() {
            diagnostics.push(null_element(path));
        } else {
            self.validate(path, value, mode, diagnostics);
        }
    }

    fn to_manifest(&self, value: &Value) -> Value {
        match (self, value) {
            (_, Value::Null) => Value::Null,
            (Self::IntOrString, Value::String(s)) => match s.parse::<i32>() {
                Ok(n) if n.to_string() == *s => Value::from(n),
                _ => value.clone(),
            },
            (Self::List(element), Value::Array(items)) => {
                Value::Array(items.iter().map(|item| element.to_manifest(item)).collect())
            }
            (Self::Map(element), Value::Object(entries)) => Value::Object(
                entries
                    .iter()
                    .map(|(key, item)| (key.clone(), element.to_manifest(item)))
                    .collect(),
            ),
            (Self::SingleNested(attributes), Value::Object(object)) => {
                object_to_manifest(attributes, object)
            }
            (Self::ListNested(attributes), Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(object) => object_to_manifest(attributes, object),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            (Self::MapNested(attributes), Value::Object(entries)) => Value::Object(
                entries
                    .iter()
                    .map(|(key, item)| {
                        let converted = match item {
                            Value::Object(object) => object_to_manifest(attributes, object),
                            other => other.clone(),
                        };
                        (key.clone(), converted)
                    })
                    .collect(),
            ),
            _ => value.clone(),
        }
    }
}

fn validate_attributes(
    attributes: &BTreeMap<String, Attribute>,
    path: &AttributePath,
    object: &Map<String, Value>,
    mode: Mode,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for key in object.keys().filter(|key| !attributes.contains_key(*key)) {
        diagnostics.push(
            Diagnostic::error(
                "Unsupported Argument",
                format!("An argument named \"{key}\" is not expected here."),
            )
            .at(&path.attribute(key)),
        );
    }
    for (name, attribute) in attributes {
        let value = object.get(name).unwrap_or(&Value::Null);
        attribute.validate(&path.attribute(name), value, mode, diagnostics);
    }
}

fn nested_element(
    attributes: &BTreeMap<String, Attribute>,
    path: &AttributePath,
    value: &Value,
    mode: Mode,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match value {
        Value::Object(object) => validate_attributes(attributes, path, object, mode, diagnostics),
        Value::Null => diagnostics.push(null_element(path)),
        _ => diagnostics.push(
            Diagnostic::error(
                "Incorrect attribute value type",
                format!("Inappropriate value for attribute \"{path}\": object required."),
            )
            .at(path),
        ),
    }
}

fn null_element(path: &AttributePath) -> Diagnostic {
    Diagnostic::error(
        "Invalid Null Element",
        format!("Elements of {path} must not be null."),
    )
    .at(path)
}

fn object_to_manifest(
    attributes: &BTreeMap<String, Attribute>,
    object: &Map<String, Value>,
) -> Value {
    let mut manifest = Map::new();
    for (name, attribute) in attributes {
        match object.get(name) {
            None | Some(Value::Null) => {}
            Some(value) => {
                manifest.insert(attribute.key_for(name), attribute.to_manifest(value));
            }
        }
    }
    Value::Object(manifest)
}

/// `secret_access_key_secret_ref` -> `secretAccessKeySecretRef`
pub fn lower_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, part) in name.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(part);
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
