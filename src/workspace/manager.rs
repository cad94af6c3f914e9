use anyhow::{Context, Result};
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use super::artifact::artifact_filename;
use super::chat_log::{append_entry, read_entries, ChatLogEntry};
use super::sanitize::sanitize_name;
use crate::constants::{BROWSER_DIR, CAD_DIR, CHAT_LOG_FILE, PROJECTS_DIR, TEMP_PROJECT};
use crate::utils::{log_error, log_info, log_warn, DaynaError};

/// Result of a project operation that is reported back to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub ok: bool,
    pub message: String,
}

impl Outcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Filesystem-backed store of projects, their chat logs and artifacts.
///
/// Layout under `root`:
///
/// ```text
/// projects/
///   <name>/
///     cad/
///     browser/
///     chat_history.jsonl
/// ```
///
/// Assumes a single writer. Two processes pointed at the same root is not
/// supported.
#[derive(Debug)]
pub struct ProjectWorkspace {
    projects_dir: PathBuf,
    active: String,
}

impl ProjectWorkspace {
    /// Ensure `root/projects` exists and recreate an empty `temp` project.
    /// Anything previously in `temp` is deleted.
    pub fn initialize(root: impl AsRef<Path>) -> Result<Self> {
        let projects_dir = root.as_ref().join(PROJECTS_DIR);
        fs::create_dir_all(&projects_dir).with_context(|| {
            format!("Failed to create projects directory: {}", projects_dir.display())
        })?;

        let temp_path = projects_dir.join(TEMP_PROJECT);
        if temp_path.exists() {
            log_info("[WORKSPACE]", "Clearing temp project...");
            fs::remove_dir_all(&temp_path)
                .with_context(|| format!("Failed to clear {}", temp_path.display()))?;
        }

        let workspace = Self {
            projects_dir,
            active: TEMP_PROJECT.to_string(),
        };

        let outcome = workspace.create_project(TEMP_PROJECT);
        if !outcome.ok {
            anyhow::bail!("Failed to create temp project: {}", outcome.message);
        }

        Ok(workspace)
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Name of the project receiving chat and artifacts
    pub fn active_project(&self) -> &str {
        &self.active
    }

    pub fn active_project_path(&self) -> PathBuf {
        self.projects_dir.join(&self.active)
    }

    pub fn chat_log_path(&self) -> PathBuf {
        self.active_project_path().join(CHAT_LOG_FILE)
    }

    /// Create `<name>/{cad,browser}`. An existing project is left untouched.
    pub fn create_project(&self, name: &str) -> Outcome {
        let safe_name = sanitize_name(name);
        if safe_name.is_empty() {
            return Outcome::fail(format!("Invalid project name '{}'.", name));
        }

        let project_path = self.projects_dir.join(&safe_name);
        if project_path.exists() {
            return Outcome::fail(format!("Project '{}' already exists.", safe_name));
        }

        let created = fs::create_dir(&project_path)
            .and_then(|_| fs::create_dir(project_path.join(CAD_DIR)))
            .and_then(|_| fs::create_dir(project_path.join(BROWSER_DIR)));

        match created {
            Ok(()) => {
                log_info("[WORKSPACE]", format!("Created project: {}", safe_name));
                Outcome::ok(format!("Project '{}' created.", safe_name))
            }
            Err(e) => {
                log_error("[WORKSPACE]", format!("Failed to create {}: {}", safe_name, e));
                Outcome::fail(format!("Failed to create project '{}': {}", safe_name, e))
            }
        }
    }

    /// Point the workspace at an existing project
    pub fn switch_project(&mut self, name: &str) -> Outcome {
        let safe_name = sanitize_name(name);
        let project_path = self.projects_dir.join(&safe_name);

        if safe_name.is_empty() || !project_path.is_dir() {
            return Outcome::fail(format!("Project '{}' does not exist.", safe_name));
        }

        self.active = safe_name;
        log_info("[WORKSPACE]", format!("Switched to project: {}", self.active));
        Outcome::ok(format!("Switched to project '{}'.", self.active))
    }

    /// Names of the immediate subdirectories of `projects/`, in whatever
    /// order the filesystem yields them. Sort if you need determinism.
    pub fn list_projects(&self) -> impl Iterator<Item = String> {
        project_names(&self.projects_dir)
    }

    /// Append one entry to the active project's chat log.
    /// Returns `false` (and logs) if the write failed.
    pub fn log_chat(&self, sender: &str, text: &str) -> bool {
        let entry = ChatLogEntry::new(sender, text);
        match append_entry(&self.chat_log_path(), &entry) {
            Ok(()) => true,
            Err(e) => {
                log_error("[WORKSPACE]", format!("{:#}", e));
                false
            }
        }
    }

    /// Full chat history of the active project, oldest first
    pub fn chat_history(&self) -> Result<Vec<ChatLogEntry>> {
        read_entries(&self.chat_log_path())
    }

    /// Copy `source` into `<active>/cad/<timestamp>_<prompt>.stl`.
    /// The source is left in place. Returns `None` (and logs) on any failure.
    pub fn save_artifact(&self, source: impl AsRef<Path>, prompt: &str) -> Option<PathBuf> {
        let source = source.as_ref();
        if !source.is_file() {
            log_error(
                "[WORKSPACE]",
                format!("Source file not found: {}", source.display()),
            );
            return None;
        }

        let dest = self
            .active_project_path()
            .join(CAD_DIR)
            .join(artifact_filename(prompt));

        match copy_with_metadata(source, &dest) {
            Ok(()) => {
                log_info(
                    "[WORKSPACE]",
                    format!("Saved CAD artifact to: {}", dest.display()),
                );
                Some(dest)
            }
            Err(e) => {
                log_error("[WORKSPACE]", format!("Failed to save artifact: {:#}", e));
                None
            }
        }
    }
}

/// Subdirectory names of `projects_dir`. Read-only, so it is safe to call
/// without initializing a workspace (which would clear `temp`). A missing
/// directory yields nothing.
pub fn project_names(projects_dir: &Path) -> impl Iterator<Item = String> {
    fs::read_dir(projects_dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
}

/// Copy bytes and permissions, then carry over the modification time.
/// A copy whose metadata could not be applied is removed again.
fn copy_with_metadata(source: &Path, dest: &Path) -> Result<(), DaynaError> {
    fs::copy(source, dest).map_err(|e| {
        DaynaError::Workspace(format!(
            "copy {} -> {}: {}",
            source.display(),
            dest.display(),
            e
        ))
    })?;

    if let Err(e) = preserve_mtime(source, dest) {
        if let Err(cleanup) = fs::remove_file(dest) {
            log_warn(
                "[WORKSPACE]",
                format!("Could not remove {}: {}", dest.display(), cleanup),
            );
        }
        return Err(DaynaError::Workspace(format!(
            "Failed to set mtime on {}: {}",
            dest.display(),
            e
        )));
    }

    Ok(())
}

/// futimens needs ownership, not write access, so a read-only handle is enough
fn preserve_mtime(source: &Path, dest: &Path) -> Result<(), DaynaError> {
    let modified = fs::metadata(source)?.modified()?;
    File::open(dest)?.set_modified(modified)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, ProjectWorkspace) {
        let dir = TempDir::new().unwrap();
        let ws = ProjectWorkspace::initialize(dir.path()).unwrap();
        (dir, ws)
    }

    fn sorted(ws: &ProjectWorkspace) -> Vec<String> {
        let mut names: Vec<String> = ws.list_projects().collect();
        names.sort();
        names
    }

    #[test]
    fn test_initialize_creates_temp_layout() {
        let (dir, ws) = workspace();
        let temp = dir.path().join("projects").join("temp");
        assert!(temp.join("cad").is_dir());
        assert!(temp.join("browser").is_dir());
        assert_eq!(ws.active_project(), "temp");
        assert_eq!(ws.active_project_path(), temp);
    }

    #[test]
    fn test_initialize_wipes_previous_temp_but_not_others() {
        let dir = TempDir::new().unwrap();
        {
            let ws = ProjectWorkspace::initialize(dir.path()).unwrap();
            assert!(ws.log_chat("user", "scratch"));
            assert!(ws.create_project("Keep").ok);
        }

        let ws = ProjectWorkspace::initialize(dir.path()).unwrap();
        assert!(ws.chat_history().unwrap().is_empty());
        assert!(!ws.chat_log_path().exists());
        assert_eq!(sorted(&ws), vec!["Keep".to_string(), "temp".to_string()]);
    }

    #[test]
    fn test_create_project_is_idempotent() {
        let (_dir, mut ws) = workspace();
        assert!(ws.create_project("Alpha").ok);
        assert!(ws.switch_project("Alpha").ok);
        assert!(ws.log_chat("user", "keep me"));
        let before = fs::read_to_string(ws.chat_log_path()).unwrap();

        let second = ws.create_project("Alpha");
        assert!(!second.ok);
        assert!(second.message.contains("already exists"));
        assert_eq!(fs::read_to_string(ws.chat_log_path()).unwrap(), before);
    }

    #[test]
    fn test_create_project_sanitizes_name() {
        let (dir, ws) = workspace();
        let outcome = ws.create_project("foo/bar!baz 1-2_3");
        assert!(outcome.ok);
        let path = dir.path().join("projects").join("foobarbaz 1-2_3");
        assert!(path.join("cad").is_dir());
        assert!(path.join("browser").is_dir());
    }

    #[test]
    fn test_create_project_rejects_empty_name() {
        let (_dir, ws) = workspace();
        let outcome = ws.create_project("/!?");
        assert!(!outcome.ok);
        assert_eq!(sorted(&ws), vec!["temp".to_string()]);
    }

    #[test]
    fn test_switch_to_missing_project_keeps_pointer() {
        let (_dir, mut ws) = workspace();
        let outcome = ws.switch_project("Ghost");
        assert!(!outcome.ok);
        assert!(outcome.message.contains("does not exist"));
        assert_eq!(ws.active_project(), "temp");
    }

    #[test]
    fn test_switch_project_sanitizes_name() {
        let (_dir, mut ws) = workspace();
        ws.create_project("Beta 2");
        let outcome = ws.switch_project("  Beta/ 2!");
        assert!(outcome.ok, "{}", outcome);
        assert_eq!(ws.active_project(), "Beta 2");
    }

    #[test]
    fn test_list_projects_only_returns_directories() {
        let (dir, ws) = workspace();
        ws.create_project("One");
        ws.create_project("Two");
        fs::write(dir.path().join("projects").join("stray.txt"), "x").unwrap();
        assert_eq!(
            sorted(&ws),
            vec!["One".to_string(), "Two".to_string(), "temp".to_string()]
        );
    }

    #[test]
    fn test_chat_log_roundtrip_in_order() {
        let (_dir, ws) = workspace();
        assert!(ws.log_chat("user", "hi"));
        assert!(ws.log_chat("assistant", "hello"));

        let raw = fs::read_to_string(ws.chat_log_path()).unwrap();
        assert_eq!(raw.lines().count(), 2);

        let history = ws.chat_history().unwrap();
        let pairs: Vec<(&str, &str)> = history
            .iter()
            .map(|e| (e.sender.as_str(), e.text.as_str()))
            .collect();
        assert_eq!(pairs, vec![("user", "hi"), ("assistant", "hello")]);
    }

    #[test]
    fn test_chat_log_follows_active_project() {
        let (_dir, mut ws) = workspace();
        ws.log_chat("user", "in temp");
        ws.create_project("Other");
        ws.switch_project("Other");
        ws.log_chat("user", "in other");

        assert_eq!(ws.chat_history().unwrap().len(), 1);
        assert_eq!(ws.chat_history().unwrap()[0].text, "in other");
        ws.switch_project("temp");
        assert_eq!(ws.chat_history().unwrap()[0].text, "in temp");
    }

    #[test]
    fn test_log_chat_reports_write_failure() {
        let (_dir, mut ws) = workspace();
        ws.create_project("Gone");
        ws.switch_project("Gone");
        fs::remove_dir_all(ws.active_project_path()).unwrap();
        assert!(!ws.log_chat("user", "lost"));
    }

    #[test]
    fn test_save_artifact_missing_source() {
        let (_dir, ws) = workspace();
        assert_eq!(ws.save_artifact("/no/such/file", "a prompt"), None);
        let cad = ws.active_project_path().join("cad");
        assert_eq!(fs::read_dir(cad).unwrap().count(), 0);
    }

    #[test]
    fn test_save_artifact_copies_into_active_cad() {
        let (dir, ws) = workspace();
        let source = dir.path().join("output.stl");
        fs::write(&source, b"solid wheel").unwrap();

        let dest = ws.save_artifact(&source, "a 10mm wheel!").unwrap();
        assert_eq!(dest.parent().unwrap(), ws.active_project_path().join("cad"));
        let name = dest.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("_a_10mm_wheel.stl"), "{}", name);
        assert_eq!(fs::read(&dest).unwrap(), b"solid wheel");
        // ownership transfers by copy
        assert!(source.exists());
        assert_eq!(
            fs::metadata(&dest).unwrap().modified().unwrap(),
            fs::metadata(&source).unwrap().modified().unwrap()
        );
    }

    #[test]
    fn test_project_names_does_not_touch_temp() {
        let (dir, ws) = workspace();
        assert!(ws.log_chat("user", "scratch"));
        let projects = dir.path().join("projects");

        let names: Vec<String> = project_names(&projects).collect();
        assert_eq!(names, vec!["temp".to_string()]);
        assert!(ws.chat_log_path().exists());
        assert_eq!(project_names(&dir.path().join("nowhere")).count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_artifact_from_read_only_source() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, ws) = workspace();
        let source = dir.path().join("ro.stl");
        fs::write(&source, b"solid ro").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o444)).unwrap();

        let dest = ws.save_artifact(&source, "ro part").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"solid ro");
        assert_eq!(
            fs::metadata(&dest).unwrap().permissions().mode() & 0o777,
            0o444
        );
        assert_eq!(
            fs::metadata(&dest).unwrap().modified().unwrap(),
            fs::metadata(&source).unwrap().modified().unwrap()
        );
    }

    #[test]
    fn test_save_artifact_copy_failure_leaves_no_file() {
        let (dir, ws) = workspace();
        let source = dir.path().join("output.stl");
        fs::write(&source, b"solid").unwrap();
        let cad = ws.active_project_path().join("cad");
        fs::remove_dir_all(&cad).unwrap();

        assert_eq!(ws.save_artifact(&source, "lost"), None);
        assert!(!cad.exists());
    }

    #[test]
    fn test_copy_failure_is_a_workspace_error() {
        let dir = TempDir::new().unwrap();
        let err = copy_with_metadata(&dir.path().join("missing"), &dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, DaynaError::Workspace(_)));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_save_artifact_rejects_directories() {
        let (dir, ws) = workspace();
        assert_eq!(ws.save_artifact(dir.path(), "dir"), None);
    }
}
