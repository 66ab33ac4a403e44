// ── View routes ──
//
// `project/:projectId/imodel/:iModelId[/version/:versionId]`, optionally
// preceded by one section segment (e.g. `view/`).

use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::Serialize;
use thiserror::Error;

use crate::readiness::ViewRequest;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("expected 'project/<projectId>/imodel/<iModelId>[/version/<versionId>]', got '{0}'")]
    Malformed(String),

    #[error("empty {0} segment")]
    EmptySegment(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRoute {
    pub section: Option<String>,
    pub project_id: String,
    pub imodel_id: String,
    pub version_id: Option<String>,
}

impl ViewRoute {
    pub fn new(project_id: impl Into<String>, imodel_id: impl Into<String>) -> Self {
        Self {
            section: None,
            project_id: project_id.into(),
            imodel_id: imodel_id.into(),
            version_id: None,
        }
    }

    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Turn the route into a view request carrying the caller's token.
    pub fn into_request(self, access_token: Option<SecretString>) -> ViewRequest {
        ViewRequest {
            project_id: Some(self.project_id),
            imodel_id: self.imodel_id,
            version_id: self.version_id,
            access_token,
        }
    }
}

impl FromStr for ViewRoute {
    type Err = RouteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || RouteError::Malformed(raw.to_owned());
        let segments: Vec<&str> = raw.trim().trim_matches('/').split('/').collect();

        let (section, project_id, imodel_id, version_id) = match segments.as_slice() {
            ["project", project, "imodel", imodel] => (None, *project, *imodel, None),
            [section, "project", project, "imodel", imodel] => {
                (Some(*section), *project, *imodel, None)
            }
            ["project", project, "imodel", imodel, "version", version] => {
                (None, *project, *imodel, Some(*version))
            }
            [section, "project", project, "imodel", imodel, "version", version] => {
                (Some(*section), *project, *imodel, Some(*version))
            }
            _ => return Err(malformed()),
        };

        if project_id.is_empty() {
            return Err(RouteError::EmptySegment("projectId"));
        }
        if imodel_id.is_empty() {
            return Err(RouteError::EmptySegment("iModelId"));
        }
        if version_id.is_some_and(str::is_empty) {
            return Err(RouteError::EmptySegment("versionId"));
        }

        Ok(Self {
            section: section.map(str::to_owned),
            project_id: project_id.to_owned(),
            imodel_id: imodel_id.to_owned(),
            version_id: version_id.map(str::to_owned),
        })
    }
}

impl fmt::Display for ViewRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref section) = self.section {
            write!(f, "/{section}")?;
        }
        write!(f, "/project/{}/imodel/{}", self.project_id, self.imodel_id)?;
        if let Some(ref version) = self.version_id {
            write!(f, "/version/{version}")?;
        }
        Ok(())
    }
}

/// Where the header button navigates: the project's listing in `section`.
pub fn project_path(section: &str, project_id: &str) -> String {
    format!("/{section}/project/{project_id}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_latest_route() {
        let route: ViewRoute = "project/p1/imodel/m1".parse().unwrap();
        assert_eq!(route, ViewRoute::new("p1", "m1"));
    }

    #[test]
    fn parses_version_route_with_section() {
        let route: ViewRoute = "/view/project/p1/imodel/m1/version/v1/".parse().unwrap();
        assert_eq!(
            route,
            ViewRoute::new("p1", "m1").with_version("v1").with_section("view")
        );
        assert_eq!(route.to_string(), "/view/project/p1/imodel/m1/version/v1");
    }

    #[test]
    fn section_may_be_named_project() {
        let route: ViewRoute = "project/project/p1/imodel/m1".parse().unwrap();
        assert_eq!(route, ViewRoute::new("p1", "m1").with_section("project"));

        let route: ViewRoute = "project/project/p1/imodel/m1/version/v1".parse().unwrap();
        assert_eq!(
            route,
            ViewRoute::new("p1", "m1").with_version("v1").with_section("project")
        );
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert!(matches!(
            "project/p1".parse::<ViewRoute>(),
            Err(RouteError::Malformed(_))
        ));
        assert!(matches!(
            "project/p1/imodel/m1/changeset/c1".parse::<ViewRoute>(),
            Err(RouteError::Malformed(_))
        ));
        assert!(matches!(
            "view/project/p1/model/m1".parse::<ViewRoute>(),
            Err(RouteError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_empty_ids() {
        assert_eq!(
            "project//imodel/m1".parse::<ViewRoute>(),
            Err(RouteError::EmptySegment("projectId"))
        );
        assert_eq!(
            "project/p1/imodel/m1/version/".parse::<ViewRoute>(),
            Err(RouteError::Malformed("project/p1/imodel/m1/version/".into()))
        );
    }

    #[test]
    fn request_carries_route_ids() {
        let req = ViewRoute::new("p1", "m1").with_version("v1").into_request(None);
        assert_eq!(req.project_id.as_deref(), Some("p1"));
        assert_eq!(req.version_id.as_deref(), Some("v1"));
        assert!(req.access_token.is_none());
    }

    #[test]
    fn project_path_uses_section() {
        assert_eq!(project_path("browse", "p1"), "/browse/project/p1");
    }
}
