//! Discovery of installed toolkit components.
//!
//! Three independent strategies run in a fixed order: package registry,
//! version folders under the configured install roots, then toolkit
//! environment variables. Results are concatenated without deduplication.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::InspectorConfig;
use crate::domain::InstalledComponentRecord;
use crate::ports::{EnvironmentPort, FileSystemPort, PackageRegistry};

/// Locates traces of an installed toolkit.
pub struct ComponentFinder {
    registry: Arc<dyn PackageRegistry>,
    fs: Arc<dyn FileSystemPort>,
    env: Arc<dyn EnvironmentPort>,
    config: Arc<InspectorConfig>,
}

impl ComponentFinder {
    pub fn new(
        registry: Arc<dyn PackageRegistry>,
        fs: Arc<dyn FileSystemPort>,
        env: Arc<dyn EnvironmentPort>,
        config: Arc<InspectorConfig>,
    ) -> Self {
        Self {
            registry,
            fs,
            env,
            config,
        }
    }

    /// Run all strategies. An empty result means nothing was found.
    pub async fn find_installed(&self) -> Vec<InstalledComponentRecord> {
        let mut records = self.find_packages().await;
        records.extend(self.find_version_folders());
        records.extend(self.find_env_vars());
        debug!(count = records.len(), "component discovery finished");
        records
    }

    /// Registry entries whose name contains the component filter.
    ///
    /// The registry query itself filters, but its matching rules are
    /// opaque, so names are checked again here case-insensitively. A failed
    /// query is logged and contributes nothing.
    pub async fn find_packages(&self) -> Vec<InstalledComponentRecord> {
        let filter = &self.config.component_filter;
        if filter.is_empty() {
            return Vec::new();
        }
        let needle = filter.to_lowercase();

        match self.registry.query(filter).await {
            Ok(packages) => packages
                .iter()
                .filter(|package| package.name.to_lowercase().contains(&needle))
                .map(|package| InstalledComponentRecord::package(package.display_name()))
                .collect(),
            Err(err) => {
                warn!(filter = %filter, error = %err, "package registry query failed");
                Vec::new()
            }
        }
    }

    /// Subdirectories of each install root starting with the version prefix.
    pub fn find_version_folders(&self) -> Vec<InstalledComponentRecord> {
        let prefix = &self.config.version_folder_prefix;
        let mut records = Vec::new();

        for root in &self.config.install_roots {
            if !self.fs.exists(root) {
                continue;
            }
            let names = match self.fs.list_dirs(root) {
                Ok(names) => names,
                Err(err) => {
                    warn!(root = %root.display(), error = %err, "cannot list install root");
                    continue;
                }
            };
            for name in names {
                if let Some(version) = name.strip_prefix(prefix.as_str()) {
                    let version = version.to_string();
                    records.push(InstalledComponentRecord::directory(version, root.join(&name)));
                }
            }
        }
        records
    }

    /// Toolkit home variables that are set and point at an existing path.
    pub fn find_env_vars(&self) -> Vec<InstalledComponentRecord> {
        self.config
            .toolkit_env_vars()
            .into_iter()
            .filter_map(|name| {
                let value = self.env.non_empty_var(name)?;
                let location = PathBuf::from(value);
                self.fs
                    .exists(&location)
                    .then(|| InstalledComponentRecord::env_var(name, location))
            })
            .collect()
    }
}
