//! In-memory fakes for every port.
//!
//! Available to this crate's tests and, through the `test-utils` feature,
//! to the runtime and CLI test suites. Fakes record what they were asked
//! to do so tests can assert that destructive calls did or did not happen.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{CommandOutcome, CommandRequest, LibraryReport};
use crate::ports::{
    CommandRunner, ConfirmationPort, ElevationPort, ElevationStatus, EnvironmentPort,
    FileSystemPort, InstalledPackage, LibraryLoadError, LibraryLoader, LibraryProbeMode,
    MenuChoice, PackageRegistry, PackageRegistryError, SystemEnvironmentWriter,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Command runner answering from canned outcomes keyed by program.
///
/// Programs without a canned outcome behave like a missing executable.
#[derive(Debug, Default)]
pub struct FakeCommandRunner {
    responses: HashMap<String, CommandOutcome>,
    calls: Mutex<Vec<CommandRequest>>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_response(mut self, program: impl Into<String>, outcome: CommandOutcome) -> Self {
        self.responses.insert(program.into(), outcome);
        self
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<CommandRequest> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl CommandRunner for FakeCommandRunner {
    async fn run(&self, request: &CommandRequest) -> CommandOutcome {
        lock(&self.calls).push(request.clone());
        self.responses.get(&request.program).cloned().unwrap_or_else(|| {
            CommandOutcome::spawn_failed(format!("{}: program not found", request.program))
        })
    }
}

/// Environment backed by a map.
#[derive(Debug, Clone, Default)]
pub struct FakeEnvironment {
    vars: HashMap<String, String>,
}

impl FakeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvironmentPort for FakeEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[derive(Debug, Default)]
struct FsState {
    dirs: BTreeSet<PathBuf>,
    files: BTreeSet<PathBuf>,
    failing_removals: HashMap<PathBuf, String>,
    removed: Vec<PathBuf>,
}

impl FsState {
    fn add_ancestors(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                self.dirs.insert(ancestor.to_path_buf());
            }
        }
    }
}

/// Filesystem of directories and files held in memory.
///
/// Adding a path also adds its ancestors as directories.
#[derive(Debug, Default)]
pub struct FakeFileSystem {
    state: Mutex<FsState>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        lock(&self.state).add_ancestors(path.as_ref());
        self
    }

    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        {
            let mut state = lock(&self.state);
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                state.add_ancestors(parent);
            }
            state.files.insert(path.to_path_buf());
        }
        self
    }

    /// Make `remove_dir_all(path)` fail with a permission error.
    #[must_use]
    pub fn failing_removal(self, path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        lock(&self.state)
            .failing_removals
            .insert(path.as_ref().to_path_buf(), message.into());
        self
    }

    /// Directories successfully removed, in order.
    pub fn removed(&self) -> Vec<PathBuf> {
        lock(&self.state).removed.clone()
    }
}

impl FileSystemPort for FakeFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let state = lock(&self.state);
        state.dirs.contains(path) || state.files.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        lock(&self.state).files.contains(path)
    }

    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>> {
        let state = lock(&self.state);
        if !state.dirs.contains(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "directory not found"));
        }
        Ok(state
            .dirs
            .iter()
            .filter(|dir| dir.parent() == Some(path))
            .filter_map(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = lock(&self.state);
        if let Some(message) = state.failing_removals.get(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, message.clone()));
        }
        if !state.dirs.contains(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "directory not found"));
        }
        state.dirs.retain(|dir| !dir.starts_with(path));
        state.files.retain(|file| !file.starts_with(path));
        state.removed.push(path.to_path_buf());
        Ok(())
    }
}

/// Package registry returning a fixed package list.
///
/// `query` ignores the filter and returns every package, leaving
/// filtering to the caller.
#[derive(Debug)]
pub struct FakePackageRegistry {
    packages: Vec<InstalledPackage>,
    query_error: Option<String>,
    uninstall_outcome: CommandOutcome,
    uninstalled: Mutex<Vec<String>>,
}

impl Default for FakePackageRegistry {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            query_error: None,
            uninstall_outcome: CommandOutcome::success("Method execution successful."),
            uninstalled: Mutex::new(Vec::new()),
        }
    }
}

impl FakePackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_packages(mut self, packages: Vec<InstalledPackage>) -> Self {
        self.packages = packages;
        self
    }

    #[must_use]
    pub fn failing_query(mut self, message: impl Into<String>) -> Self {
        self.query_error = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_uninstall_outcome(mut self, outcome: CommandOutcome) -> Self {
        self.uninstall_outcome = outcome;
        self
    }

    /// Filters passed to `uninstall`, in order.
    pub fn uninstalled(&self) -> Vec<String> {
        lock(&self.uninstalled).clone()
    }
}

#[async_trait]
impl PackageRegistry for FakePackageRegistry {
    async fn query(&self, _filter: &str) -> Result<Vec<InstalledPackage>, PackageRegistryError> {
        match &self.query_error {
            Some(message) => Err(PackageRegistryError::QueryFailed(message.clone())),
            None => Ok(self.packages.clone()),
        }
    }

    fn describe_uninstall(&self, filter: &str) -> CommandRequest {
        CommandRequest::new("fake-registry").args(["uninstall", filter])
    }

    async fn uninstall(&self, filter: &str) -> CommandOutcome {
        lock(&self.uninstalled).push(filter.to_string());
        self.uninstall_outcome.clone()
    }
}

/// System environment writer that records writes.
#[derive(Debug, Default)]
pub struct FakeSystemEnvironmentWriter {
    failing: HashMap<String, String>,
    writes: Mutex<Vec<(String, String)>>,
}

impl FakeSystemEnvironmentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes to `name` fail with `stderr`.
    #[must_use]
    pub fn failing_var(mut self, name: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.failing.insert(name.into(), stderr.into());
        self
    }

    /// Every attempted `(name, value)` write, in order.
    pub fn writes(&self) -> Vec<(String, String)> {
        lock(&self.writes).clone()
    }
}

#[async_trait]
impl SystemEnvironmentWriter for FakeSystemEnvironmentWriter {
    fn describe(&self, name: &str, value: &str) -> CommandRequest {
        CommandRequest::new("fake-setx").args([name, value])
    }

    async fn set_system_var(&self, name: &str, value: &str) -> CommandOutcome {
        lock(&self.writes).push((name.to_string(), value.to_string()));
        match self.failing.get(name) {
            Some(stderr) => CommandOutcome::failure(1, stderr.clone()),
            None => CommandOutcome::success("SUCCESS: Specified value was saved."),
        }
    }
}

/// Confirmation port answering with scripted choices.
#[derive(Debug)]
pub struct ScriptedConfirmation {
    choice: MenuChoice,
    confirm: bool,
    closed: bool,
    prompts: Mutex<usize>,
}

impl ScriptedConfirmation {
    pub const fn new(choice: MenuChoice, confirm: bool) -> Self {
        Self {
            choice,
            confirm,
            closed: false,
            prompts: Mutex::new(0),
        }
    }

    /// Every prompt fails as if stdin were closed.
    pub const fn closed_input() -> Self {
        Self {
            choice: MenuChoice::Abort,
            confirm: false,
            closed: true,
            prompts: Mutex::new(0),
        }
    }

    /// Number of prompts shown.
    pub fn prompts(&self) -> usize {
        *lock(&self.prompts)
    }

    fn prompt(&self) -> io::Result<()> {
        *lock(&self.prompts) += 1;
        if self.closed {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))
        } else {
            Ok(())
        }
    }
}

impl ConfirmationPort for ScriptedConfirmation {
    fn choose_action(&self) -> io::Result<MenuChoice> {
        self.prompt()?;
        Ok(self.choice)
    }

    fn confirm_uninstall(&self) -> io::Result<bool> {
        self.prompt()?;
        Ok(self.confirm)
    }
}

/// Library loader returning a fixed report or error.
#[derive(Debug)]
pub struct FakeLibraryLoader {
    result: Result<LibraryReport, LibraryLoadError>,
    modes: Mutex<Vec<LibraryProbeMode>>,
}

impl FakeLibraryLoader {
    pub const fn with_report(report: LibraryReport) -> Self {
        Self {
            result: Ok(report),
            modes: Mutex::new(Vec::new()),
        }
    }

    pub const fn with_error(error: LibraryLoadError) -> Self {
        Self {
            result: Err(error),
            modes: Mutex::new(Vec::new()),
        }
    }

    /// Modes requested so far.
    pub fn modes(&self) -> Vec<LibraryProbeMode> {
        lock(&self.modes).clone()
    }
}

#[async_trait]
impl LibraryLoader for FakeLibraryLoader {
    fn library_name(&self) -> &str {
        "PyTorch"
    }

    async fn load(&self, mode: LibraryProbeMode) -> Result<LibraryReport, LibraryLoadError> {
        lock(&self.modes).push(mode);
        self.result.clone()
    }
}

/// Elevation port with a fixed answer.
#[derive(Debug)]
pub struct FakeElevation {
    elevated: bool,
    relaunch: ElevationStatus,
    relaunches: Mutex<Vec<Vec<String>>>,
}

impl FakeElevation {
    pub const fn elevated() -> Self {
        Self {
            elevated: true,
            relaunch: ElevationStatus::AlreadyElevated,
            relaunches: Mutex::new(Vec::new()),
        }
    }

    /// Not elevated; a relaunch attempt yields `relaunch`.
    pub const fn not_elevated(relaunch: ElevationStatus) -> Self {
        Self {
            elevated: false,
            relaunch,
            relaunches: Mutex::new(Vec::new()),
        }
    }

    /// Argument lists passed to `relaunch_elevated`.
    pub fn relaunches(&self) -> Vec<Vec<String>> {
        lock(&self.relaunches).clone()
    }
}

#[async_trait]
impl ElevationPort for FakeElevation {
    async fn is_elevated(&self) -> bool {
        self.elevated
    }

    async fn relaunch_elevated(&self, args: &[String]) -> ElevationStatus {
        lock(&self.relaunches).push(args.to_vec());
        self.relaunch.clone()
    }
}
