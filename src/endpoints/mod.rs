//! Endpoint table for the Orion REST API.
//!
//! Maps symbolic operation names to an HTTP method and a path relative to
//! the API base URL. The table is static data; lookups are exact-name
//! matches and an unknown name is the caller's problem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Whether requests with this method carry a JSON body.
    pub fn has_body(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// A named HTTP method + URL pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// Path relative to the API base URL (e.g. `/flows/filter/`)
    pub url: &'static str,
}

impl Endpoint {
    pub const fn get(url: &'static str) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
        }
    }

    pub const fn post(url: &'static str) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
        }
    }

    /// Look up an endpoint by its symbolic name.
    ///
    /// # Examples
    ///
    /// ```
    /// use orion::endpoints::{Endpoint, HttpMethod};
    ///
    /// let endpoint = Endpoint::lookup("flows").unwrap();
    /// assert_eq!(endpoint.method, HttpMethod::Post);
    /// assert_eq!(endpoint.url, "/flows/filter/");
    /// assert!(Endpoint::lookup("flowz").is_none());
    /// ```
    pub fn lookup(name: &str) -> Option<Endpoint> {
        name.parse::<EndpointName>().ok().map(EndpointName::endpoint)
    }
}

/// Symbolic names of every endpoint the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointName {
    Flow,
    Flows,
    FlowsCount,
    Deployment,
    Deployments,
    DeploymentsCount,
    FlowRun,
    FlowRuns,
    FlowRunsCount,
    TaskRun,
    TaskRuns,
    TaskRunsCount,
    Settings,
    DatabaseClear,
    Version,
}

impl EndpointName {
    pub const ALL: [EndpointName; 15] = [
        EndpointName::Flow,
        EndpointName::Flows,
        EndpointName::FlowsCount,
        EndpointName::Deployment,
        EndpointName::Deployments,
        EndpointName::DeploymentsCount,
        EndpointName::FlowRun,
        EndpointName::FlowRuns,
        EndpointName::FlowRunsCount,
        EndpointName::TaskRun,
        EndpointName::TaskRuns,
        EndpointName::TaskRunsCount,
        EndpointName::Settings,
        EndpointName::DatabaseClear,
        EndpointName::Version,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EndpointName::Flow => "flow",
            EndpointName::Flows => "flows",
            EndpointName::FlowsCount => "flows_count",
            EndpointName::Deployment => "deployment",
            EndpointName::Deployments => "deployments",
            EndpointName::DeploymentsCount => "deployments_count",
            EndpointName::FlowRun => "flow_run",
            EndpointName::FlowRuns => "flow_runs",
            EndpointName::FlowRunsCount => "flow_runs_count",
            EndpointName::TaskRun => "task_run",
            EndpointName::TaskRuns => "task_runs",
            EndpointName::TaskRunsCount => "task_runs_count",
            EndpointName::Settings => "settings",
            EndpointName::DatabaseClear => "database_clear",
            EndpointName::Version => "version",
        }
    }

    pub fn endpoint(self) -> Endpoint {
        match self {
            EndpointName::Flow => Endpoint::get("/flows/"),
            EndpointName::Flows => Endpoint::post("/flows/filter/"),
            EndpointName::FlowsCount => Endpoint::post("/flows/count/"),
            EndpointName::Deployment => Endpoint::get("/deployments/"),
            EndpointName::Deployments => Endpoint::post("/deployments/filter/"),
            EndpointName::DeploymentsCount => Endpoint::post("/deployments/count/"),
            EndpointName::FlowRun => Endpoint::get("/flow_runs/"),
            EndpointName::FlowRuns => Endpoint::post("/flow_runs/filter/"),
            EndpointName::FlowRunsCount => Endpoint::post("/flow_runs/count/"),
            EndpointName::TaskRun => Endpoint::get("/task_runs/"),
            EndpointName::TaskRuns => Endpoint::post("/task_runs/filter/"),
            EndpointName::TaskRunsCount => Endpoint::post("/task_runs/count/"),
            EndpointName::Settings => Endpoint::get("/admin/settings"),
            EndpointName::DatabaseClear => Endpoint::post("/admin/database/clear"),
            EndpointName::Version => Endpoint::get("/admin/version"),
        }
    }
}

impl fmt::Display for EndpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EndpointName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Unknown endpoint: {}", s))
    }
}

impl From<EndpointName> for Endpoint {
    fn from(name: EndpointName) -> Self {
        name.endpoint()
    }
}
