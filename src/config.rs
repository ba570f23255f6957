//! Project template configuration (`project_template.json`).
//!
//! The template is read once, validated, and then treated as read-only input
//! for the generators in [`crate::templates`] and [`crate::scaffold`].
//!
//! ## Example
//!
//! ```json
//! {
//!   "projectName": "demo",
//!   "cStandard": 11,
//!   "cppStandard": 17,
//!   "libraries": [{ "name": "foo", "sources": ["foo.c"], "headers": ["foo.h"] }],
//!   "executables": [{ "name": "app", "sources": ["main.c"], "dependencies": ["foo"] }],
//!   "enableTests": true
//! }
//! ```

use crate::error::{ScaffoldError, TargetKind, ValidationError};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// File name looked up next to the running executable.
pub const CONFIG_FILE_NAME: &str = "project_template.json";

const C_STANDARDS: &[u32] = &[90, 99, 11, 17, 23];
const CXX_STANDARDS: &[u32] = &[98, 11, 14, 17, 20, 23, 26];

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub project_name: String,
    pub c_standard: Option<Standard>,
    pub cpp_standard: Option<Standard>,
    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,
    #[serde(default)]
    pub executables: Vec<ExecutableConfig>,
    #[serde(default = "default_enable_tests")]
    pub enable_tests: bool,
    pub output_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LibraryConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub headers: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ExecutableConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A language standard as written in the template: `11`, `"17"` or `"c++17"`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Standard {
    Number(u32),
    Text(String),
}

fn default_enable_tests() -> bool {
    true
}

impl Standard {
    /// Numeric version with any `c`, `c++`, `gnu` or `gnu++` prefix removed.
    pub fn version(&self) -> Option<u32> {
        match self {
            Standard::Number(n) => Some(*n),
            Standard::Text(s) => {
                let s = s.trim().to_ascii_lowercase();
                let digits = ["gnu++", "c++", "gnu", "c"]
                    .iter()
                    .find_map(|prefix| s.strip_prefix(prefix))
                    .unwrap_or(s.as_str());
                digits.parse().ok()
            }
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standard::Number(n) => write!(f, "{}", n),
            Standard::Text(s) => write!(f, "{}", s),
        }
    }
}

impl ProjectConfig {
    /// Parses a template from its JSON text. `path` is only used for error reporting.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ScaffoldError> {
        serde_json::from_str(content).map_err(|e| ScaffoldError::ConfigParse {
            path: path.to_path_buf(),
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })
    }

    /// Resolved C standard, e.g. `11` for `"c11"`. Only meaningful after [`validate`](Self::validate).
    pub fn c_version(&self) -> u32 {
        self.c_standard.as_ref().and_then(Standard::version).unwrap_or(11)
    }

    /// Resolved C++ standard, e.g. `17` for `"c++17"`.
    pub fn cpp_version(&self) -> u32 {
        self.cpp_standard.as_ref().and_then(Standard::version).unwrap_or(17)
    }

    /// Library used by the generated GoogleTest harness.
    pub fn test_library(&self) -> Option<&LibraryConfig> {
        self.libraries.first()
    }

    /// Checks everything the generators rely on and returns every problem found.
    pub fn validate(&self) -> Result<(), ScaffoldError> {
        let issues = self.collect_issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ScaffoldError::Invalid(issues))
        }
    }

    fn collect_issues(&self) -> Vec<ValidationError> {
        let mut issues = Vec::new();

        if self.project_name.trim().is_empty() {
            issues.push(missing("projectName"));
        } else if !is_project_name(&self.project_name) {
            issues.push(ValidationError::InvalidIdentifier {
                kind: TargetKind::Project,
                name: self.project_name.clone(),
            });
        }

        check_standard(&mut issues, "cStandard", self.c_standard.as_ref(), C_STANDARDS);
        check_standard(&mut issues, "cppStandard", self.cpp_standard.as_ref(), CXX_STANDARDS);

        let mut names = HashSet::new();
        let mut planned = PlannedPaths::default();
        planned.add_file("CMakeLists.txt".to_string());
        planned.add_dir("lib");
        if self.enable_tests {
            planned.add_dir("tests");
            planned.add_file("tests/CMakeLists.txt".to_string());
            let test_source = crate::templates::test_source_name(self.test_library());
            planned.add_file(format!("tests/{}", test_source));
        }

        for (i, lib) in self.libraries.iter().enumerate() {
            if lib.name.is_empty() {
                issues.push(missing(&format!("libraries[{}].name", i)));
                continue;
            }
            if !is_c_identifier(&lib.name) {
                issues.push(ValidationError::InvalidIdentifier {
                    kind: TargetKind::Library,
                    name: lib.name.clone(),
                });
            }
            if !names.insert(lib.name.as_str()) {
                issues.push(ValidationError::DuplicateName {
                    name: lib.name.clone(),
                });
            }
            if lib.sources.is_empty() {
                issues.push(ValidationError::EmptySources {
                    target: lib.name.clone(),
                });
            }

            let lib_dir = format!("lib/{}", lib.name);
            let include_dir = format!("{}/include", lib_dir);
            planned.add_dir(&include_dir);
            planned.add_file(format!("{}/CMakeLists.txt", lib_dir));
            for src in &lib.sources {
                check_path(&mut issues, &mut planned, &lib.name, &lib_dir, src);
            }
            for hdr in &lib.headers {
                check_path(&mut issues, &mut planned, &lib.name, &include_dir, hdr);
            }
        }

        for (i, exe) in self.executables.iter().enumerate() {
            if exe.name.is_empty() {
                issues.push(missing(&format!("executables[{}].name", i)));
                continue;
            }
            if !is_executable_name(&exe.name) {
                issues.push(ValidationError::InvalidIdentifier {
                    kind: TargetKind::Executable,
                    name: exe.name.clone(),
                });
            }
            if !names.insert(exe.name.as_str()) {
                issues.push(ValidationError::DuplicateName {
                    name: exe.name.clone(),
                });
            }
            if exe.sources.is_empty() {
                issues.push(ValidationError::EmptySources {
                    target: exe.name.clone(),
                });
            }
            for src in &exe.sources {
                check_path(&mut issues, &mut planned, &exe.name, "", src);
            }
        }

        issues.extend(planned.conflicts());
        issues
    }
}

/// Default template location: next to the running executable.
pub fn default_config_path() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Reads and parses the template at `path`. Validation is a separate step.
pub fn load_config(path: &Path) -> Result<ProjectConfig, ScaffoldError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ScaffoldError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ScaffoldError::ConfigRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    ProjectConfig::from_json(&content, path)
}

fn missing(field: &str) -> ValidationError {
    ValidationError::MissingField {
        field: field.to_string(),
    }
}

fn check_standard(
    issues: &mut Vec<ValidationError>,
    field: &str,
    standard: Option<&Standard>,
    allowed: &[u32],
) {
    match standard {
        None => issues.push(missing(field)),
        Some(Standard::Text(s)) if s.trim().is_empty() => issues.push(missing(field)),
        Some(standard) => {
            if !standard.version().is_some_and(|v| allowed.contains(&v)) {
                issues.push(ValidationError::InvalidStandard {
                    field: field.to_string(),
                    value: standard.to_string(),
                });
            }
        }
    }
}

/// Every file and directory a plan will create, relative to the project root.
#[derive(Default)]
struct PlannedPaths {
    files: Vec<String>,
    seen_files: HashSet<String>,
    dirs: HashSet<String>,
}

impl PlannedPaths {
    /// Records a file and its parent directories. Returns false for a repeat.
    fn add_file(&mut self, location: String) -> bool {
        if let Some((parent, _)) = location.rsplit_once('/') {
            self.add_dir(parent);
        }
        if !self.seen_files.insert(location.clone()) {
            return false;
        }
        self.files.push(location);
        true
    }

    /// Records a directory and all of its ancestors.
    fn add_dir(&mut self, location: &str) {
        let mut end = 0;
        for part in location.split('/') {
            end += part.len();
            self.dirs.insert(location[..end].to_string());
            end += 1;
        }
    }

    /// Files that sit where a directory has to be created.
    fn conflicts(&self) -> Vec<ValidationError> {
        self.files
            .iter()
            .filter(|f| self.dirs.contains(f.as_str()))
            .map(|f| ValidationError::PathConflict { path: f.clone() })
            .collect()
    }
}

/// Validates a declared file path and records where it will land under the root.
fn check_path(
    issues: &mut Vec<ValidationError>,
    planned: &mut PlannedPaths,
    target: &str,
    base: &str,
    path: &str,
) {
    if !is_relative_path(path) || path.chars().any(is_unsafe_path_char) {
        issues.push(ValidationError::InvalidPath {
            target: target.to_string(),
            path: path.to_string(),
        });
        return;
    }
    let normalized = Path::new(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    let location = if base.is_empty() {
        normalized
    } else {
        format!("{}/{}", base, normalized)
    };
    if !planned.add_file(location.clone()) {
        issues.push(ValidationError::DuplicatePath { path: location });
    }
}

// Paths are written unquoted into CMake argument lists.
fn is_unsafe_path_char(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';' | '$' | '\\')
}

fn is_relative_path(path: &str) -> bool {
    if path.trim().is_empty() || path.starts_with('/') || path.starts_with('\\') {
        return false;
    }
    let components: Vec<Component> = Path::new(path).components().collect();
    components.iter().any(|c| matches!(c, Component::Normal(_)))
        && components
            .iter()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

// Library names become C symbols (`<name>_hello`) and header guards.
static C_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static EXECUTABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.+-]*$").unwrap());
static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.+-]*$").unwrap());

fn is_c_identifier(name: &str) -> bool {
    C_IDENTIFIER.is_match(name)
}

fn is_executable_name(name: &str) -> bool {
    EXECUTABLE_NAME.is_match(name)
}

fn is_project_name(name: &str) -> bool {
    PROJECT_NAME.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = r#"{
        "projectName": "demo",
        "cStandard": 11,
        "cppStandard": 17,
        "libraries": [{"name": "foo", "sources": ["foo.c"], "headers": ["foo.h"]}],
        "executables": [{"name": "app", "sources": ["main.c"], "dependencies": ["foo"]}],
        "enableTests": true
    }"#;

    fn parse(json: &str) -> ProjectConfig {
        ProjectConfig::from_json(json, Path::new("project_template.json")).unwrap()
    }

    fn issues(json: &str) -> Vec<ValidationError> {
        match parse(json).validate() {
            Err(ScaffoldError::Invalid(issues)) => issues,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_demo_template() {
        let config = parse(DEMO);
        assert_eq!(config.project_name, "demo");
        assert_eq!(config.c_version(), 11);
        assert_eq!(config.cpp_version(), 17);
        assert_eq!(config.libraries[0].headers, vec!["foo.h"]);
        assert_eq!(config.executables[0].dependencies, vec!["foo"]);
        assert!(config.output_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enable_tests_defaults_to_true() {
        let config = parse(r#"{"projectName": "demo", "cStandard": 11, "cppStandard": 17}"#);
        assert!(config.enable_tests);
        assert!(config.libraries.is_empty());
        assert!(config.executables.is_empty());
    }

    #[test]
    fn test_dependencies_are_optional() {
        let config = parse(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17,
                "executables": [{"name": "app", "sources": ["main.c"]}]}"#,
        );
        assert!(config.executables[0].dependencies.is_empty());
    }

    #[test]
    fn test_standard_forms() {
        assert_eq!(Standard::Number(11).version(), Some(11));
        assert_eq!(Standard::Text("17".into()).version(), Some(17));
        assert_eq!(Standard::Text("c11".into()).version(), Some(11));
        assert_eq!(Standard::Text("c++20".into()).version(), Some(20));
        assert_eq!(Standard::Text("gnu++17".into()).version(), Some(17));
        assert_eq!(Standard::Text("latest".into()).version(), None);
    }

    #[test]
    fn test_malformed_json_reports_location() {
        let err = ProjectConfig::from_json("{\n  \"projectName\": \"demo\",\n}", Path::new("t.json"))
            .unwrap_err();
        match err {
            ScaffoldError::ConfigParse { line, column, .. } => {
                assert_eq!(line, 3);
                assert!(column >= 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        match load_config(&path) {
            Err(ScaffoldError::ConfigNotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, DEMO).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.project_name, "demo");
    }

    #[test]
    fn test_unreadable_template_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        match load_config(dir.path()) {
            Err(ScaffoldError::ConfigRead { path, .. }) => assert_eq!(path, dir.path()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path_sits_next_to_executable() {
        let path = default_config_path().unwrap();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
        assert_eq!(path.parent(), exe.parent());
    }

    #[test]
    fn test_missing_fields() {
        let found = issues(r#"{"libraries": [{"sources": ["a.c"]}]}"#);
        assert!(found.contains(&missing("projectName")));
        assert!(found.contains(&missing("cStandard")));
        assert!(found.contains(&missing("cppStandard")));
        assert!(found.contains(&missing("libraries[0].name")));
    }

    #[test]
    fn test_duplicate_target_names_across_kinds() {
        let found = issues(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17,
                "libraries": [{"name": "core", "sources": ["core.c"]}],
                "executables": [{"name": "core", "sources": ["main.c"]}]}"#,
        );
        assert_eq!(
            found,
            vec![ValidationError::DuplicateName {
                name: "core".to_string()
            }]
        );
    }

    #[test]
    fn test_library_name_must_be_c_identifier() {
        let found = issues(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17,
                "libraries": [{"name": "my-lib", "sources": ["a.c"]}]}"#,
        );
        assert_eq!(
            found,
            vec![ValidationError::InvalidIdentifier {
                kind: TargetKind::Library,
                name: "my-lib".to_string()
            }]
        );
    }

    #[test]
    fn test_executable_name_allows_dashes() {
        let config = parse(
            r#"{"projectName": "my.project", "cStandard": "c17", "cppStandard": "c++20",
                "executables": [{"name": "my-app", "sources": ["src/main.cpp"]}]}"#,
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_standard() {
        let found = issues(r#"{"projectName": "p", "cStandard": 12, "cppStandard": "c++21"}"#);
        assert_eq!(found.len(), 2);
        assert!(matches!(
            &found[0],
            ValidationError::InvalidStandard { field, value } if field == "cStandard" && value == "12"
        ));
        assert!(matches!(
            &found[1],
            ValidationError::InvalidStandard { field, .. } if field == "cppStandard"
        ));
    }

    #[test]
    fn test_paths_must_stay_inside_project() {
        let found = issues(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17,
                "executables": [{"name": "app", "sources": ["../escape.c", "/abs.c", "", "./"]}]}"#,
        );
        assert_eq!(found.len(), 4);
        assert!(
            found
                .iter()
                .all(|i| matches!(i, ValidationError::InvalidPath { target, .. } if target == "app"))
        );
    }

    #[test]
    fn test_duplicate_paths_and_empty_sources() {
        let found = issues(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17,
                "libraries": [{"name": "foo", "sources": []}],
                "executables": [
                    {"name": "a", "sources": ["main.c"]},
                    {"name": "b", "sources": ["./main.c"]}
                ]}"#,
        );
        assert!(found.contains(&ValidationError::EmptySources {
            target: "foo".to_string()
        }));
        assert!(found.contains(&ValidationError::DuplicatePath {
            path: "main.c".to_string()
        }));
    }

    #[test]
    fn test_headers_and_sources_do_not_collide() {
        let config = parse(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17,
                "libraries": [{"name": "foo", "sources": ["foo.h"], "headers": ["foo.h"]}]}"#,
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_cannot_replace_planned_directory() {
        let found = issues(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17,
                "libraries": [{"name": "foo", "sources": ["foo.c", "include"]}],
                "executables": [{"name": "app", "sources": ["tests"]}]}"#,
        );
        assert_eq!(
            found,
            vec![
                ValidationError::PathConflict {
                    path: "lib/foo/include".to_string()
                },
                ValidationError::PathConflict {
                    path: "tests".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_file_cannot_shadow_parent_of_nested_source() {
        let found = issues(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17, "enableTests": false,
                "executables": [
                    {"name": "a", "sources": ["src/a.c"]},
                    {"name": "b", "sources": ["src"]},
                    {"name": "c", "sources": ["lib"]}
                ]}"#,
        );
        assert_eq!(
            found,
            vec![
                ValidationError::PathConflict {
                    path: "src".to_string()
                },
                ValidationError::PathConflict {
                    path: "lib".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_disabled_tests_free_the_tests_path() {
        let config = parse(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17, "enableTests": false,
                "executables": [{"name": "app", "sources": ["tests"]}]}"#,
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paths_must_be_cmake_safe() {
        let found = issues(
            r#"{"projectName": "p", "cStandard": 11, "cppStandard": 17,
                "libraries": [{"name": "foo", "sources": ["foo.c"], "headers": ["my header.h"]}],
                "executables": [{"name": "app",
                    "sources": ["my file.c", "a(b).c", "q\"uote.c", "x;y.c", "${X}.c", "src\\main.c"]}]}"#,
        );
        assert_eq!(found.len(), 7);
        assert_eq!(
            found[0],
            ValidationError::InvalidPath {
                target: "foo".to_string(),
                path: "my header.h".to_string()
            }
        );
        assert!(
            found[1..]
                .iter()
                .all(|i| matches!(i, ValidationError::InvalidPath { target, .. } if target == "app"))
        );
    }
}
