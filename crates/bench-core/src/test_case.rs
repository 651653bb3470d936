//! Test case definitions.
//!
//! A [`TestCase`] describes a single benchmark run: which component is under
//! test, which port it listens on, and the environment variables the
//! component was started with (these carry the credentials).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Error type for loading test cases.
#[derive(Debug, thiserror::Error)]
pub enum TestCaseError {
    /// Error reading the test case file
    #[error("Failed to read test case file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML (or JSON, which is parsed as YAML)
    #[error("Failed to parse test case: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Kind of component under test.
///
/// Deserialized from a plain string. Strings that do not name a known
/// component are kept verbatim in [`ComponentType::Other`] so that the
/// orchestrator can report them as unknown instead of failing at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    /// No component selected (empty string)
    #[default]
    None,
    /// PostgreSQL-compatible relational database
    Postgres,
    /// Kafka-compatible message broker
    Kafka,
    /// Anything else
    Other(String),
}

impl ComponentType {
    /// Get the wire name of this component type.
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::None => "",
            ComponentType::Postgres => "postgres",
            ComponentType::Kafka => "kafka",
            ComponentType::Other(name) => name,
        }
    }
}

impl From<String> for ComponentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" => ComponentType::None,
            "postgres" => ComponentType::Postgres,
            "kafka" => ComponentType::Kafka,
            _ => ComponentType::Other(value),
        }
    }
}

impl From<&str> for ComponentType {
    fn from(value: &str) -> Self {
        ComponentType::from(value.to_string())
    }
}

impl From<ComponentType> for String {
    fn from(value: ComponentType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentType::None => write!(f, "<none>"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Description of one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestCase {
    /// Component under test
    #[serde(default)]
    pub component_type: ComponentType,

    /// Container image the component runs from (metadata only)
    #[serde(default)]
    pub image: String,

    /// Port the component listens on
    pub port: u16,

    /// Environment variables of the component, including credentials
    #[serde(default)]
    pub env_vars: HashMap<String, String>,
}

impl TestCase {
    /// Create a new test case without environment variables.
    pub fn new(component_type: impl Into<ComponentType>, port: u16) -> Self {
        Self {
            component_type: component_type.into(),
            image: String::new(),
            port,
            env_vars: HashMap::new(),
        }
    }

    /// Add an environment variable.
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Set the image name.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Look up an environment variable.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env_vars.get(key).map(String::as_str)
    }

    /// Load a test case from a YAML or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TestCaseError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a test case from a YAML (or JSON) string.
    pub fn from_yaml(yaml: &str) -> Result<Self, TestCaseError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
