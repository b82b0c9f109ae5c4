//! Permission grants and the view read check built from them.
//!
//! Grants are `domain:action:instance` strings. Each part may be `*`, a
//! missing trailing part counts as `*`, and the instance part may list
//! several ids separated by `,`:
//!
//! - `view:read:v1,v2`: read views `v1` and `v2`
//! - `view:read`: read every view
//! - `dashboards:read:*`: read every dashboard
//! - `*`: everything
//!
//! [`PermissionSet::can_read_view`] is the predicate handed to
//! [`SearchDomain`](searchgate_acl::SearchDomain).

use searchgate_core::{Error, Result, View, ViewType};

const WILDCARD: &str = "*";

/// One parsed grant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permission {
    parts: Vec<Vec<String>>,
}

impl Permission {
    /// Parse a grant string.
    pub fn parse(grant: &str) -> Result<Self> {
        let grant = grant.trim();
        if grant.is_empty() {
            return Err(Error::config("Empty permission grant"));
        }

        let parts: Vec<Vec<String>> = grant
            .split(':')
            .map(|part| {
                part.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .collect();

        if parts.len() > 3 {
            return Err(Error::config(format!(
                "Permission '{grant}' has more than three parts"
            )));
        }
        if parts.iter().any(Vec::is_empty) {
            return Err(Error::config(format!(
                "Permission '{grant}' has an empty part"
            )));
        }

        Ok(Self { parts })
    }

    /// Whether this grant covers `domain:action:instance`.
    pub fn implies(&self, domain: &str, action: &str, instance: &str) -> bool {
        [domain, action, instance]
            .iter()
            .enumerate()
            .all(|(i, wanted)| match self.parts.get(i) {
                None => true,
                Some(allowed) => allowed.iter().any(|a| a == WILDCARD || a == wanted),
            })
    }
}

/// All grants held by one user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet {
    grants: Vec<Permission>,
}

impl PermissionSet {
    /// Parse a list of grant strings.
    pub fn parse<S: AsRef<str>>(grants: &[S]) -> Result<Self> {
        let grants = grants
            .iter()
            .map(|g| Permission::parse(g.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { grants })
    }

    /// Whether any grant covers `domain:action:instance`.
    pub fn is_permitted(&self, domain: &str, action: &str, instance: &str) -> bool {
        self.grants
            .iter()
            .any(|g| g.implies(domain, action, instance))
    }

    /// Whether these grants allow reading `view`.
    ///
    /// Any view is readable through `view:read:<id>`. Dashboards are also
    /// readable through `dashboards:read:<id>`.
    pub fn can_read_view(&self, view: &View) -> bool {
        self.is_permitted("view", "read", &view.id)
            || (view.view_type == ViewType::Dashboard
                && self.is_permitted("dashboards", "read", &view.id))
    }

    /// Number of grants.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether there are no grants.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}
