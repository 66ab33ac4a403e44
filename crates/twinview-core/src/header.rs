// ── iModel header button ──
//
// Display model for the header entry that names the current iModel and
// links back to its project listing.

use serde::Serialize;

use twinview_api::{IModel, ServerEnvironment};

use crate::route::project_path;

/// Placeholder name while the iModel is being fetched.
pub const FETCHING_LABEL: &str = "Fetching iModel";

/// Section in which the header is shown as a plain label, never active.
pub const VIEW_SECTION: &str = "view";

/// Thumbnail widget inputs. The access token is supplied at render time
/// by the caller and never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub imodel_id: String,
    pub server_environment_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IModelHeader {
    pub name: String,
    pub description: Option<String>,
    /// Render as a skeleton placeholder.
    pub loading: bool,
    pub is_active: bool,
    /// Navigation target on click.
    pub navigate_to: String,
    pub thumbnail: Option<Thumbnail>,
}

impl IModelHeader {
    pub fn build(
        imodel: Option<&IModel>,
        imodel_id: &str,
        project_id: &str,
        section: &str,
        environment: ServerEnvironment,
    ) -> Self {
        let display_name = imodel
            .map(|m| m.display_name.as_str())
            .filter(|name| !name.is_empty());

        Self {
            name: imodel.map_or_else(|| FETCHING_LABEL.to_owned(), |m| m.display_name.clone()),
            description: imodel.and_then(|m| m.description.clone()),
            loading: imodel.is_none(),
            is_active: display_name.is_some() && section != VIEW_SECTION,
            navigate_to: project_path(section, project_id),
            thumbnail: display_name.map(|_| Thumbnail {
                imodel_id: imodel_id.to_owned(),
                server_environment_prefix: environment.prefix().to_owned(),
            }),
        }
    }
}
