//! Resource Registry - Load resource definitions from YAML
//!
//! A definitions document maps resource-type names to the provider call that
//! lists them, where the items live in the response, optional detail calls
//! chained per item, and the fields to keep. Declaration order is preserved
//! and becomes the processing order.

use super::item::RawItem;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Built-in definitions, used when no config file is present.
pub const DEFAULT_DEFINITIONS: &str = include_str!("../resources/aws.yaml");

/// Region used for global services and as the discovery fallback.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Call parameters, keyed by provider parameter name.
pub type Params = BTreeMap<String, RawItem>;

/// One output column: `source[:target]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Dot-path into the resolved item
    pub source: String,
    /// Output column name
    pub target: String,
}

impl FieldSpec {
    /// Parse `source` or `source:target`. Only the first `:` splits.
    pub fn parse(spec: &str) -> Option<Self> {
        let (source, target) = spec.split_once(':').unwrap_or((spec, spec));
        let (source, target) = (source.trim(), target.trim());
        if source.is_empty() || target.is_empty() {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

/// Where an extra detail-call parameter takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_yaml::Value")]
pub enum ParamSource {
    /// The item remembered by an earlier `store_parent` step
    Stored,
    /// The item current at this step
    Current,
}

impl From<serde_yaml::Value> for ParamSource {
    fn from(value: serde_yaml::Value) -> Self {
        match value.as_str() {
            Some("stored") => ParamSource::Stored,
            _ => ParamSource::Current,
        }
    }
}

/// One chained detail call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetailStep {
    /// Operation to invoke
    pub name: String,
    /// Parameter that receives the current item
    pub param: String,
    /// Path locating the next candidate items in the detail response
    pub response_key: String,
    /// Remember the current item before this step runs
    #[serde(default)]
    pub store_parent: bool,
    #[serde(default)]
    pub extra_params: BTreeMap<String, ParamSource>,
    /// Drop the whole primary item when this step resolves nothing
    #[serde(default)]
    pub skip_empty: bool,
}

/// `detail_method` accepts a single step or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DetailMethod {
    Chain(Vec<DetailStep>),
    Single(DetailStep),
}

impl DetailMethod {
    fn into_steps(self) -> Vec<DetailStep> {
        match self {
            DetailMethod::Chain(steps) => steps,
            DetailMethod::Single(step) => vec![step],
        }
    }
}

/// Resource definition as written in the document
#[derive(Debug, Clone, Deserialize)]
struct ResourceDef {
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    response_key: Option<String>,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    detail_method: Option<DetailMethod>,
    #[serde(default)]
    primary_params: BTreeMap<String, serde_json::Value>,
}

/// Validated definition of one resource type.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    pub name: String,
    pub service: String,
    pub method: String,
    pub response_key: String,
    pub fields: Vec<FieldSpec>,
    /// Empty when no detail calls are configured
    pub detail_steps: Vec<DetailStep>,
    /// Static parameters for the primary call
    pub primary_params: Params,
}

impl ResourceConfig {
    fn from_def(name: &str, def: ResourceDef) -> Result<Self, ConfigError> {
        let required = |value: Option<String>, key: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::invalid(name, format!("missing '{}'", key)))
        };

        let service = required(def.service, "service")?;
        let method = required(def.method, "method")?;
        let response_key = required(def.response_key, "response_key")?;

        if def.fields.is_empty() {
            return Err(ConfigError::invalid(name, "'fields' must not be empty"));
        }
        let fields = def
            .fields
            .iter()
            .map(|spec| {
                FieldSpec::parse(spec)
                    .ok_or_else(|| ConfigError::invalid(name, format!("bad field spec '{}'", spec)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let detail_steps = match def.detail_method {
            Some(method) => {
                let steps = method.into_steps();
                if steps.is_empty() {
                    return Err(ConfigError::invalid(name, "'detail_method' list is empty"));
                }
                for (idx, step) in steps.iter().enumerate() {
                    for (value, key) in [
                        (&step.name, "name"),
                        (&step.param, "param"),
                        (&step.response_key, "response_key"),
                    ] {
                        if value.trim().is_empty() {
                            return Err(ConfigError::invalid(
                                name,
                                format!("detail step {} has empty '{}'", idx + 1, key),
                            ));
                        }
                    }
                }
                steps
            }
            None => Vec::new(),
        };

        let primary_params = def
            .primary_params
            .into_iter()
            .map(|(k, v)| (k, RawItem::from(v)))
            .collect();

        Ok(Self {
            name: name.to_string(),
            service,
            method,
            response_key,
            fields,
            detail_steps,
            primary_params,
        })
    }

    pub fn has_detail(&self) -> bool {
        !self.detail_steps.is_empty()
    }
}

fn default_global_services() -> Vec<String> {
    vec!["s3".to_string()]
}

fn default_global_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Root structure of a definitions document
#[derive(Debug, Deserialize)]
struct DefinitionsDocument {
    #[serde(default)]
    resources: serde_yaml::Mapping,
    #[serde(default = "default_global_services")]
    global_services: Vec<String>,
    #[serde(default = "default_global_region")]
    global_region: String,
}

/// All resource definitions for one inventory run.
#[derive(Debug, Clone)]
pub struct Registry {
    pub resources: Vec<ResourceConfig>,
    /// Services inventoried from `global_region` only
    pub global_services: Vec<String>,
    pub global_region: String,
}

impl Registry {
    /// Parse and validate a definitions document.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let doc: DefinitionsDocument = serde_yaml::from_str(content)?;

        if doc.resources.is_empty() {
            return Err(ConfigError::NoResources);
        }

        let mut resources = Vec::with_capacity(doc.resources.len());
        for (key, value) in doc.resources {
            let Some(name) = key.as_str().map(str::to_string) else {
                return Err(ConfigError::invalid(
                    &format!("{:?}", key),
                    "resource names must be strings",
                ));
            };
            let def: ResourceDef = serde_yaml::from_value(value)
                .map_err(|e| ConfigError::invalid(&name, e.to_string()))?;
            resources.push(ResourceConfig::from_def(&name, def)?);
        }

        Ok(Self {
            resources,
            global_services: doc.global_services,
            global_region: doc.global_region,
        })
    }

    /// The built-in definitions
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(DEFAULT_DEFINITIONS)
    }

    /// Get a resource definition by name
    pub fn get(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Resource names in processing order
    pub fn names(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.name.as_str()).collect()
    }

    /// Keep only the named resource types, in declaration order.
    pub fn retain_only(&mut self, names: &[String]) -> Result<(), ConfigError> {
        let unknown: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|n| self.get(n).is_none())
            .collect();
        if !unknown.is_empty() {
            return Err(ConfigError::UnknownResources(unknown.join(", ")));
        }
        self.resources.retain(|r| names.contains(&r.name));
        Ok(())
    }

    /// Regions to inventory for `resource`: global services use one fixed region.
    pub fn regions_for(&self, resource: &ResourceConfig, discovered: &[String]) -> Vec<String> {
        if self.global_services.contains(&resource.service) {
            vec![self.global_region.clone()]
        } else {
            discovered.to_vec()
        }
    }
}
