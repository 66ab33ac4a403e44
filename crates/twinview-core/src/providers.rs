// ── Capability providers ──
//
// Pluggable UI contributions handed to the viewer shell. The set is
// derived from one flag (reporting subsystem initialized) and is either
// empty or the full fixed sequence.

use serde::Serialize;

/// Options for the content tools provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentToolsOptions {
    /// Show the measure group in the vertical toolbar.
    pub vertical_measure_group: bool,
}

/// Options for the property grid provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyGridOptions {
    pub enable_copying_property_text: bool,
}

/// One capability provider instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::IntoStaticStr)]
#[serde(tag = "provider", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CapabilityProvider {
    GroupingMapping,
    /// Cost analysis (one-click life-cycle assessment).
    OneClickLca,
    ReportsConfig,
    NavigationTools,
    ContentTools(ContentToolsOptions),
    StatusBar,
    TreeWidget,
    PropertyGrid(PropertyGridOptions),
    MeasureTools,
}

impl CapabilityProvider {
    /// Stable kebab-case identifier.
    pub fn id(&self) -> &'static str {
        self.into()
    }
}

/// The providers a viewer launch is configured with, in mount order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ViewerProviderSet(Vec<CapabilityProvider>);

impl ViewerProviderSet {
    /// Assemble the set for the current reporting state.
    ///
    /// Until the reporting subsystem has initialized no provider is
    /// constructed at all; afterwards the full sequence is returned.
    pub fn assemble(reporting_initialized: bool) -> Self {
        if !reporting_initialized {
            return Self::default();
        }
        Self(vec![
            CapabilityProvider::GroupingMapping,
            CapabilityProvider::OneClickLca,
            CapabilityProvider::ReportsConfig,
            CapabilityProvider::NavigationTools,
            CapabilityProvider::ContentTools(ContentToolsOptions {
                vertical_measure_group: false,
            }),
            CapabilityProvider::StatusBar,
            CapabilityProvider::TreeWidget,
            CapabilityProvider::PropertyGrid(PropertyGridOptions {
                enable_copying_property_text: true,
            }),
            CapabilityProvider::MeasureTools,
        ])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CapabilityProvider> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.0.iter().map(CapabilityProvider::id).collect()
    }
}

impl<'a> IntoIterator for &'a ViewerProviderSet {
    type Item = &'a CapabilityProvider;
    type IntoIter = std::slice::Iter<'a, CapabilityProvider>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
