//! Probe findings.

use serde::{Deserialize, Serialize};

use super::library::LibraryReport;

/// Subsystem inspected by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    /// Vendor GPU driver, queried through its management CLI.
    Driver,
    /// GPU compute toolkit (compiler + runtime libraries).
    ToolkitRuntime,
    /// Numerical library and its accelerator support.
    Library,
}

impl Component {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Driver => "NVIDIA driver",
            Self::ToolkitRuntime => "CUDA toolkit",
            Self::Library => "PyTorch CUDA support",
        }
    }
}

/// Structured finding produced by a single probe.
///
/// Built once through the constructor helpers and never mutated after it
/// leaves the probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub component: Component,
    /// For the library probe: library and accelerator usable together.
    pub available: bool,
    pub version: Option<String>,
    /// Ordered human-readable facts gathered by the probe.
    pub details: Vec<String>,
    /// Reason for a negative finding, or an unexpected error caught at the probe boundary.
    pub error: Option<String>,
    /// Library sub-findings; only set by the library probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<LibraryReport>,
}

impl ProbeResult {
    /// Positive finding with no details yet.
    pub const fn available(component: Component) -> Self {
        Self {
            component,
            available: true,
            version: None,
            details: Vec::new(),
            error: None,
            library: None,
        }
    }

    /// Negative finding carrying the reason.
    pub fn unavailable(component: Component, error: impl Into<String>) -> Self {
        Self {
            component,
            available: false,
            version: None,
            details: Vec::new(),
            error: Some(error.into()),
            library: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    #[must_use]
    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    #[must_use]
    pub fn with_library(mut self, report: LibraryReport) -> Self {
        self.library = Some(report);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_carries_error() {
        let result = ProbeResult::unavailable(Component::Driver, "not found");
        assert!(!result.available);
        assert_eq!(result.error.as_deref(), Some("not found"));
        assert!(result.details.is_empty());
    }

    #[test]
    fn details_preserve_insertion_order() {
        let result = ProbeResult::available(Component::ToolkitRuntime)
            .with_detail("first")
            .with_details(["second", "third"]);
        assert_eq!(result.details, vec!["first", "second", "third"]);
    }

    #[test]
    fn library_field_is_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&ProbeResult::available(Component::Driver)).unwrap();
        assert!(!json.contains("library"));
        assert!(json.contains("\"component\":\"driver\""));
    }
}
