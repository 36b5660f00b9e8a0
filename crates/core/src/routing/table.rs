//! Route registry
//!
//! Patterns are `/`-separated segments. A segment starting with `:` captures
//! one path segment under that name; a trailing `*` captures the rest of the
//! path (possibly nothing). Query strings, fragments and trailing slashes are
//! ignored when matching.

use std::collections::HashMap;

use wildwelcome_domain::constants::{
    CONFIRMATION_PATH, LANDING_PATH, LANDLORD_HOME_PATH, LOGIN_PATH, SIGNUP_PATH,
    TENANT_HOME_PATH,
};

use super::policy::RoutePolicy;

/// Name under which a trailing `*` stores the unmatched rest of the path.
pub const WILDCARD_PARAM: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// A parsed route pattern such as `/landlord/property/:id/edit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses `pattern`. A `*` anywhere but last, or a bare `:`, is treated
    /// as a literal segment.
    pub fn parse(pattern: &str) -> Self {
        let parts: Vec<&str> = path_segments(pattern).collect();
        let last = parts.len().saturating_sub(1);
        let segments = parts
            .iter()
            .enumerate()
            .map(|(index, part)| match *part {
                "*" if index == last => Segment::Wildcard,
                param if param.len() > 1 && param.starts_with(':') => {
                    Segment::Param(param[1..].to_string())
                }
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        Self { raw: pattern.to_string(), segments }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Captured parameters when `path` matches, `None` otherwise.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path_segments(strip_query(path)).collect();
        let mut params = HashMap::new();

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard => {
                    params.insert(WILDCARD_PARAM.to_string(), parts.get(index..)?.join("/"));
                    return Some(params);
                }
                Segment::Literal(literal) => {
                    if parts.get(index) != Some(&literal.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*parts.get(index)?).to_string());
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }

    /// Higher for more literal patterns; used to break ties between matches.
    fn specificity(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(_) => 3,
                Segment::Param(_) => 2,
                Segment::Wildcard => 0,
            })
            .sum()
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[derive(Debug, Clone)]
struct RouteEntry {
    pattern: RoutePattern,
    policy: RoutePolicy,
}

/// Result of resolving a path against a [`RouteTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    Matched {
        pattern: &'a str,
        policy: &'a RoutePolicy,
        params: HashMap<String, String>,
    },
    /// No registered route; the not-found view is public.
    NotFound,
}

impl RouteMatch<'_> {
    /// Policy to enforce for this match.
    #[must_use]
    pub fn policy(&self) -> RoutePolicy {
        match self {
            Self::Matched { policy, .. } => (*policy).clone(),
            Self::NotFound => RoutePolicy::public(),
        }
    }
}

/// Ordered collection of route patterns and their policies
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `pattern` with `policy`.
    #[must_use]
    pub fn route(mut self, pattern: &str, policy: RoutePolicy) -> Self {
        self.entries.push(RouteEntry { pattern: RoutePattern::parse(pattern), policy });
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the most specific route matching `path`; among equally specific
    /// matches the first registered wins.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        let mut best: Option<(usize, &RouteEntry, HashMap<String, String>)> = None;
        for entry in &self.entries {
            if let Some(params) = entry.pattern.matches(path) {
                let score = entry.pattern.specificity();
                if best.as_ref().map_or(true, |(best_score, _, _)| score > *best_score) {
                    best = Some((score, entry, params));
                }
            }
        }

        match best {
            Some((_, entry, params)) => RouteMatch::Matched {
                pattern: entry.pattern.as_str(),
                policy: &entry.policy,
                params,
            },
            None => RouteMatch::NotFound,
        }
    }

    /// The Wild Welcome route registry.
    #[must_use]
    pub fn wild_welcome() -> Self {
        let tenant = RoutePolicy::tenant_only;
        let landlord = RoutePolicy::landlord_only;

        Self::new()
            // Public
            .route(LANDING_PATH, RoutePolicy::public())
            .route(LOGIN_PATH, RoutePolicy::public())
            .route(SIGNUP_PATH, RoutePolicy::public())
            .route(CONFIRMATION_PATH, RoutePolicy::public())
            // Tenant
            .route(TENANT_HOME_PATH, tenant())
            .route("/user/search", tenant())
            .route("/user/listing/:id", tenant())
            .route("/user/booking/*", tenant())
            .route("/user/account", tenant())
            .route("/user/favourites", tenant())
            .route("/user/applications", tenant())
            // Landlord
            .route("/landlord", landlord())
            .route("/landlord/account", landlord())
            .route(LANDLORD_HOME_PATH, landlord())
            .route("/landlord/properties", landlord())
            .route("/landlord/calendar", landlord())
            .route("/landlord/booking-request", landlord())
            .route("/landlord/bookings", landlord())
            .route("/landlord/add-room", landlord())
            .route("/landlord/add-apartment", landlord())
            .route("/landlord/property/:id", landlord())
            .route("/landlord/property/:id/edit", landlord())
            .route("/landlord/reject", landlord())
            .route("/landlord/approve", landlord())
    }
}
