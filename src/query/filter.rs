//! Filter bodies sent with non-GET requests.
//!
//! The same shape is reused by the flows, flow runs, task runs and
//! deployments filter/count endpoints. Unset fields are left out of the
//! encoded JSON so an empty filter encodes as `{}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for filter and count endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Server-side sort key (e.g. `EXPECTED_START_TIME_DESC`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<EntityFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_runs: Option<EntityFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_runs: Option<EntityFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployments: Option<EntityFilter>,
    /// Other top-level filters (e.g. `work_pools`), encoded verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FilterBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn flows(mut self, filter: EntityFilter) -> Self {
        self.flows = Some(filter);
        self
    }

    pub fn flow_runs(mut self, filter: EntityFilter) -> Self {
        self.flow_runs = Some(filter);
        self
    }

    pub fn task_runs(mut self, filter: EntityFilter) -> Self {
        self.task_runs = Some(filter);
        self
    }

    pub fn deployments(mut self, filter: EntityFilter) -> Self {
        self.deployments = Some(filter);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Encode as the JSON request payload.
    pub fn to_json(&self) -> Value {
        // FilterBody only holds strings, integers, bools and JSON maps,
        // none of which can fail to serialize.
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Filter for one entity kind (flows, flow runs, task runs, deployments).
///
/// The commonly used operators are typed; anything else the server
/// understands can be passed through `extra` and is encoded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AnyOf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<AnyOf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<AllOf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<AnyOf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_version: Option<AnyOf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_schedule_active: Option<Equals>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityFilter {
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id = Some(AnyOf::new(ids));
        self
    }

    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name = Some(AnyOf::new(names));
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(AllOf {
            all_: tags.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn state_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = self.state.get_or_insert_with(StateFilter::default);
        state.state_type = Some(AnyOf::new(types));
        self
    }

    pub fn state_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = self.state.get_or_insert_with(StateFilter::default);
        state.name = Some(AnyOf::new(names));
        self
    }
}

/// `{"any_": [...]}` operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyOf {
    pub any_: Vec<String>,
}

impl AnyOf {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            any_: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// `{"all_": [...]}` operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllOf {
    pub all_: Vec<String>,
}

/// `{"eq_": bool}` operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equals {
    pub eq_: bool,
}

/// Run state filter: `{"type": {"any_": [...]}, "name": {"any_": [...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFilter {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub state_type: Option<AnyOf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<AnyOf>,
}
