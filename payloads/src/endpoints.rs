//! Candidate endpoint tables and the ordered plans built from them.
//!
//! Backends serving the device API disagree on URL shapes (plural or
//! singular collection, reservation by path or by body, API mounted under
//! `/api` or at the root). Instead of hand-written fallbacks, every shape is
//! a row in one of the tables below, and a [`Plan`] lays the rows out over
//! the configured hosts in priority order.

use reqwest::{Method, Url};

use crate::{ClientConfig, DeviceId, requests::ReserveDevice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Literal(&'static str),
    DeviceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTemplate {
    Empty,
    /// `{"id": <device id>}`
    DeviceId,
}

/// One row of an endpoint table: a request shape relative to some host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub verb: Verb,
    pub path: &'static [Segment],
    pub body: BodyTemplate,
}

use Segment::{DeviceId as Id, Literal as Lit};

pub const FETCH_DEVICES: &[Endpoint] = &[
    Endpoint::get(&[Lit("devices")]),
    // singular collection, kept for older backends
    Endpoint::get(&[Lit("device")]),
];

pub const RESERVE_BY_PATH: &[Endpoint] = &[
    Endpoint::post(&[Lit("devices"), Id, Lit("reserve")], BodyTemplate::Empty),
    Endpoint::post(&[Lit("device"), Id, Lit("reserve")], BodyTemplate::Empty),
];

pub const RESERVE_BY_BODY: &[Endpoint] = &[
    Endpoint::post(&[Lit("devices"), Lit("reserve")], BodyTemplate::DeviceId),
    Endpoint::post(&[Lit("device"), Lit("reserve")], BodyTemplate::DeviceId),
    Endpoint::post(&[Lit("reserve")], BodyTemplate::DeviceId),
];

impl Endpoint {
    const fn get(path: &'static [Segment]) -> Self {
        Self {
            verb: Verb::Get,
            path,
            body: BodyTemplate::Empty,
        }
    }

    const fn post(path: &'static [Segment], body: BodyTemplate) -> Self {
        Self {
            verb: Verb::Post,
            path,
            body,
        }
    }

    /// Bind this row to a host and, where the templates need one, a device.
    ///
    /// Returns `None` when the row needs a device id that was not given, when
    /// the id cannot stand as a path segment, or when the host cannot carry a
    /// path.
    pub fn resolve(&self, host: &Url, id: Option<&DeviceId>) -> Option<Candidate> {
        let mut url = host.clone();
        {
            let mut segments = url.path_segments_mut().ok()?;
            segments.pop_if_empty();
            for segment in self.path {
                match segment {
                    Segment::Literal(literal) => segments.push(literal),
                    // push percent-encodes, so ids with `/` stay one segment
                    Segment::DeviceId => segments.push(path_segment(id?)?),
                };
            }
        }
        let body = match self.body {
            BodyTemplate::Empty => None,
            BodyTemplate::DeviceId => Some(ReserveDevice { id: id?.clone() }),
        };
        Some(Candidate {
            verb: self.verb,
            url,
            body,
        })
    }
}

/// A fully resolved request to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub verb: Verb,
    pub url: Url,
    pub body: Option<ReserveDevice>,
}

/// Candidates sharing one request shape and one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub name: &'static str,
    pub candidates: Vec<Candidate>,
}

/// Ordered, de-duplicated stages of candidates for one logical operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    stages: Vec<Stage>,
}

impl Plan {
    /// `{base}/devices`, `{base}/device`, the same without a trailing `/api`
    /// segment, then the audience host.
    pub fn fetch_devices(config: &ClientConfig) -> Self {
        let base = config.base_url();
        let mut hosts = vec![base.clone()];
        hosts.extend(strip_api_segment(base));

        let mut plan = Self::default();
        plan.push_stage("primary", &hosts, FETCH_DEVICES, None);
        if let Some(audience) = config.audience() {
            plan.push_stage("audience", &[audience.clone()], FETCH_DEVICES, None);
        }
        plan
    }

    /// Path-style reservation on base then audience, followed by body-style
    /// reservation on base then audience.
    pub fn reserve_device(config: &ClientConfig, id: &DeviceId) -> Self {
        let base = [config.base_url().clone()];
        let audience: Vec<Url> = config.audience().cloned().into_iter().collect();

        let mut plan = Self::default();
        plan.push_stage("path", &base, RESERVE_BY_PATH, Some(id));
        plan.push_stage("path-audience", &audience, RESERVE_BY_PATH, Some(id));
        plan.push_stage("body", &base, RESERVE_BY_BODY, Some(id));
        plan.push_stage("body-audience", &audience, RESERVE_BY_BODY, Some(id));
        plan
    }

    fn push_stage(
        &mut self,
        name: &'static str,
        hosts: &[Url],
        table: &[Endpoint],
        id: Option<&DeviceId>,
    ) {
        let mut candidates: Vec<Candidate> = Vec::new();
        for host in hosts {
            for endpoint in table {
                let Some(candidate) = endpoint.resolve(host, id) else {
                    continue;
                };
                if !self.contains(&candidate) && !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        if !candidates.is_empty() {
            self.stages.push(Stage { name, candidates });
        }
    }

    fn contains(&self, candidate: &Candidate) -> bool {
        self.candidates().any(|existing| existing == candidate)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.stages.iter().flat_map(|stage| stage.candidates.iter())
    }

    pub fn len(&self) -> usize {
        self.stages.iter().map(|stage| stage.candidates.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The id as a single path segment.
///
/// URL parsing drops `.` and `..` segments (`%2e` included) and an empty one
/// collapses the path, so such ids only travel in a request body.
fn path_segment(id: &DeviceId) -> Option<&str> {
    match id.0.as_str() {
        "" | "." | ".." => None,
        id => Some(id),
    }
}

/// Rewrite `https://host/x/api` (or `.../api/`) to `https://host/x`.
pub fn strip_api_segment(base: &Url) -> Option<Url> {
    let path = base.path().trim_end_matches('/');
    let stripped = path.strip_suffix("/api")?;
    let mut url = base.clone();
    url.set_path(if stripped.is_empty() { "/" } else { stripped });
    Some(url)
}
