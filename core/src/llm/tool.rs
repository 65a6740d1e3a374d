//! # Tool definitions
//!
//! A tool is advertised to the model as a [`ToolDefinition`]: a name, a description and
//! a JSON schema for its arguments. Schemas are derived from typed argument structs via
//! [`schemars`], so doc comments on the fields become the descriptions the model reads.
//!
//! The model answers with [`ToolCall`]s whose arguments are raw JSON text. Parsing and
//! validating that text into a typed record is the job of the consumer (the agent's tool
//! registry); this module only describes the surface.
//!
//! ```rust
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use tern_core::llm::tool::{ToolDefinition, ToolSpec};
//!
//! /// Look up the weather.
//! #[derive(JsonSchema, Deserialize)]
//! struct WeatherArgs {
//!     /// City name (e.g., "London", "Tokyo")
//!     city: String,
//!     /// Temperature unit, defaults to celsius
//!     unit: Option<String>,
//! }
//!
//! impl ToolSpec for WeatherArgs {
//!     const NAME: &'static str = "weather";
//!     const DESCRIPTION: &'static str = "Returns the current weather for a city.";
//! }
//!
//! let definition = WeatherArgs::definition();
//! assert_eq!(definition.name(), "weather");
//! assert_eq!(definition.required_fields(), vec!["city"]);
//! ```

use std::borrow::Cow;

use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Typed arguments of a tool, carrying the metadata needed to advertise it.
pub trait ToolSpec: JsonSchema + DeserializeOwned {
    /// Tool name. Must be unique within a catalogue.
    const NAME: &'static str;
    /// Tool description for the language model.
    const DESCRIPTION: &'static str;

    /// Builds the definition advertised to the model.
    #[must_use]
    fn definition() -> ToolDefinition {
        ToolDefinition::of::<Self>()
    }
}

/// Tool definition including schema for language models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    name: Cow<'static, str>,
    /// Tool description.
    description: Cow<'static, str>,
    /// JSON schema for tool arguments.
    parameters: Schema,
}

impl ToolDefinition {
    /// Creates a definition from explicit parts.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        parameters: Schema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Creates the definition for a typed argument record.
    #[must_use]
    pub fn of<T: ToolSpec>() -> Self {
        Self::new(T::NAME, T::DESCRIPTION, schema_for!(T))
    }

    /// Returns the tool's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool's description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the JSON schema for the tool's arguments.
    #[must_use]
    pub const fn parameters(&self) -> &Schema {
        &self.parameters
    }

    /// Returns the schema as a plain JSON value, without the `$schema`/`title` keys
    /// that function-calling endpoints do not expect.
    #[must_use]
    pub fn parameters_json(&self) -> Value {
        let mut value = self.parameters.as_value().clone();
        if let Value::Object(map) = &mut value {
            map.remove("$schema");
            map.remove("title");
        }
        value
    }

    /// Names of the top-level fields the schema marks as required.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&str> {
        self.parameters
            .as_value()
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// A request from the model to execute a tool.
///
/// This is an intent only; nothing has been executed. `arguments` holds the payload
/// exactly as the model produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier used to pair the tool result with this request.
    pub id: String,
    /// Name of the tool to execute.
    pub name: String,
    /// Raw JSON argument text.
    pub arguments: String,
}

impl ToolCall {
    /// Creates a new tool call.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}
