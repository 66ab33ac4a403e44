// Wire types for the iModels REST API.
//
// Field names follow the platform's camelCase JSON. Unknown fields are
// ignored so new platform properties never break decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /imodels/{id}` wraps the payload as `{"iModel": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct IModelEnvelope {
    #[serde(rename = "iModel")]
    pub imodel: IModel,
}

/// `GET /imodels/{id}/namedversions/{id}` wraps as `{"namedVersion": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedVersionEnvelope {
    #[serde(rename = "namedVersion")]
    pub named_version: NamedVersion,
}

/// iModel metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IModel {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Lifecycle state, e.g. `initialized` or `notInitialized`.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "iTwinId")]
    pub itwin_id: Option<String>,
    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,
}

/// A labeled snapshot of an iModel's change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedVersion {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `null` for versions created on the baseline (before any changeset).
    #[serde(default)]
    pub changeset_id: Option<String>,
    #[serde(default)]
    pub changeset_index: Option<u64>,
    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,
}

/// Error envelope: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
