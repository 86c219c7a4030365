//! Windows installer database through `wmic product`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use gpuscan_core::ports::{CommandRunner, InstalledPackage, PackageRegistry, PackageRegistryError};
use gpuscan_core::{CommandOutcome, CommandRequest};

/// [`PackageRegistry`] backed by `wmic product`.
///
/// Filters become `name like '%<filter>%'` clauses, which WMI matches
/// case-insensitively. Uninstalls pass `/nointeractive` and use the longer
/// uninstall timeout because `wmic` enumerates every MSI package first.
pub struct WmicPackageRegistry {
    runner: Arc<dyn CommandRunner>,
    query_timeout: Duration,
    uninstall_timeout: Duration,
}

impl WmicPackageRegistry {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        query_timeout: Duration,
        uninstall_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            query_timeout,
            uninstall_timeout,
        }
    }

    fn where_clause(filter: &str) -> String {
        format!("name like '%{filter}%'")
    }
}

#[async_trait]
impl PackageRegistry for WmicPackageRegistry {
    async fn query(&self, filter: &str) -> Result<Vec<InstalledPackage>, PackageRegistryError> {
        let request = CommandRequest::new("wmic")
            .args(["product", "where"])
            .arg(Self::where_clause(filter))
            .args(["get", "name,version"])
            .with_timeout(self.query_timeout);
        let outcome = self.runner.run(&request).await;
        if !outcome.succeeded() {
            return Err(PackageRegistryError::QueryFailed(outcome.failure_reason()));
        }
        let packages = parse_product_table(&outcome.stdout);
        debug!(filter, count = packages.len(), "package registry query");
        Ok(packages)
    }

    fn describe_uninstall(&self, filter: &str) -> CommandRequest {
        CommandRequest::new("wmic")
            .args(["product", "where"])
            .arg(Self::where_clause(filter))
            .args(["call", "uninstall", "/nointeractive"])
            .with_timeout(self.uninstall_timeout)
    }

    async fn uninstall(&self, filter: &str) -> CommandOutcome {
        info!(filter, "uninstalling registered packages");
        self.runner.run(&self.describe_uninstall(filter)).await
    }
}

/// Parse `wmic ... get name,version` output.
///
/// The first non-blank line is the column header. Columns are padded with
/// spaces, so the version is taken as the last token when it looks like a
/// dotted number; otherwise the whole row is the name.
pub fn parse_product_table(output: &str) -> Vec<InstalledPackage> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .map(|row| match row.rsplit_once(char::is_whitespace) {
            Some((name, last)) if looks_like_version(last) => {
                InstalledPackage::new(name.trim(), Some(last.to_string()))
            }
            _ => InstalledPackage::new(row, None),
        })
        .collect()
}

fn looks_like_version(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit()) && token.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpuscan_core::testing::FakeCommandRunner;

    const TABLE: &str = "Name                                   Version      \r\n\
NVIDIA CUDA Runtime 12.1               12.1.105     \r\n\
NVIDIA CUDA Documentation 12.1         12.1.105     \r\n\
NVIDIA Nsight Compute                               \r\n\
\r\n";

    fn registry(runner: FakeCommandRunner) -> WmicPackageRegistry {
        WmicPackageRegistry::new(
            Arc::new(runner),
            Duration::from_secs(60),
            Duration::from_secs(600),
        )
    }

    #[test]
    fn parses_padded_table() {
        let packages = parse_product_table(TABLE);
        assert_eq!(
            packages,
            vec![
                InstalledPackage::new("NVIDIA CUDA Runtime 12.1", Some("12.1.105".to_string())),
                InstalledPackage::new(
                    "NVIDIA CUDA Documentation 12.1",
                    Some("12.1.105".to_string()),
                ),
                InstalledPackage::new("NVIDIA Nsight Compute", None),
            ]
        );
    }

    #[test]
    fn empty_result_has_no_rows() {
        assert!(parse_product_table("No Instance(s) Available.\r\n").is_empty());
        assert!(parse_product_table("").is_empty());
    }

    #[test]
    fn uninstall_command_is_non_interactive() {
        let request = registry(FakeCommandRunner::new()).describe_uninstall("CUDA");
        assert_eq!(
            request.args,
            vec!["product", "where", "name like '%CUDA%'", "call", "uninstall", "/nointeractive"]
        );
        assert_eq!(request.timeout, Some(Duration::from_secs(600)));
    }

    #[tokio::test]
    async fn failed_query_is_an_error() {
        let registry = registry(
            FakeCommandRunner::new()
                .with_response("wmic", CommandOutcome::failure(1, "Invalid query")),
        );
        let err = registry.query("CUDA").await.unwrap_err();
        assert!(err.to_string().contains("Invalid query"));
    }

    #[tokio::test]
    async fn query_returns_parsed_rows() {
        let runner = FakeCommandRunner::new().with_response("wmic", CommandOutcome::success(TABLE));
        let registry = registry(runner);
        let packages = registry.query("CUDA").await.unwrap();
        assert_eq!(packages.len(), 3);
        assert_eq!(packages[0].display_name(), "NVIDIA CUDA Runtime 12.1 12.1.105");
    }
}
