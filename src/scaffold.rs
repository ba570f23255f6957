//! Project materialization.
//!
//! A validated [`ProjectConfig`] is first turned into a [`ProjectPlan`], the
//! ordered list of directories and files that make up the new project. The
//! plan is only applied once the project root is known not to exist, so
//! configuration and precondition failures never leave anything on disk.
//! Filesystem errors while applying abort immediately without rollback.

use crate::config::ProjectConfig;
use crate::error::ScaffoldError;
use crate::templates;
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

/// One step of a plan. Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Dir(PathBuf),
    File { path: PathBuf, contents: String },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::Dir(path) => path,
            Entry::File { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScaffoldOptions {
    /// Print the plan instead of writing it.
    pub dry_run: bool,
    /// Log every directory and file as it is written.
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct ProjectPlan {
    root: PathBuf,
    entries: Vec<Entry>,
}

/// `<dir>/<projectName>`, where `<dir>` is the command-line output directory,
/// else the template's `outputDir`, else the current directory.
pub fn resolve_root(config: &ProjectConfig, cli_output_dir: Option<&Path>) -> PathBuf {
    match cli_output_dir.or(config.output_dir.as_deref()) {
        Some(dir) => dir.join(&config.project_name),
        None => PathBuf::from(&config.project_name),
    }
}

impl ProjectPlan {
    /// Computes every directory and file for `config`, in write order.
    pub fn new(config: &ProjectConfig, root: PathBuf) -> Self {
        let mut entries = vec![file("CMakeLists.txt", templates::root_cmakelists(config))];

        for exe in &config.executables {
            let contents = templates::executable_source(exe);
            for src in &exe.sources {
                entries.push(file(src, contents.clone()));
            }
        }

        let lib_root = PathBuf::from("lib");
        entries.push(Entry::Dir(lib_root.clone()));
        for lib in &config.libraries {
            let lib_dir = lib_root.join(&lib.name);
            entries.push(Entry::Dir(lib_dir.clone()));
            entries.push(Entry::File {
                path: lib_dir.join("CMakeLists.txt"),
                contents: templates::library_cmakelists(lib),
            });

            let source = templates::library_source(lib);
            for src in &lib.sources {
                entries.push(Entry::File {
                    path: lib_dir.join(src),
                    contents: source.clone(),
                });
            }

            let include_dir = lib_dir.join("include");
            entries.push(Entry::Dir(include_dir.clone()));
            let header = templates::library_header(lib);
            for hdr in &lib.headers {
                entries.push(Entry::File {
                    path: include_dir.join(hdr),
                    contents: header.clone(),
                });
            }
        }

        if config.enable_tests {
            let tests_dir = PathBuf::from("tests");
            let target = config.test_library();
            entries.push(Entry::Dir(tests_dir.clone()));
            entries.push(Entry::File {
                path: tests_dir.join("CMakeLists.txt"),
                contents: templates::tests_cmakelists(target),
            });
            entries.push(Entry::File {
                path: tests_dir.join(templates::test_source_name(target)),
                contents: templates::test_source(target),
            });
        }

        Self { root, entries }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::File { .. }))
            .count()
    }

    /// Looks up the planned contents of a file by its root-relative path.
    #[cfg(test)]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<&str> {
        let path = path.as_ref();
        self.entries.iter().find_map(|e| match e {
            Entry::File { path: p, contents } if p == path => Some(contents.as_str()),
            _ => None,
        })
    }

    /// Writes the plan below the root. The root itself must not exist yet.
    pub fn apply(&self, verbose: bool) -> Result<(), ScaffoldError> {
        create_dir(&self.root)?;
        for entry in &self.entries {
            let target = self.root.join(entry.path());
            match entry {
                Entry::Dir(_) => create_dir(&target)?,
                Entry::File { contents, .. } => {
                    if let Some(parent) = target.parent() {
                        create_dir(parent)?;
                    }
                    fs::write(&target, contents).map_err(|source| ScaffoldError::Io {
                        path: target.clone(),
                        source,
                    })?;
                }
            }
            if verbose {
                println!("   {} {}", "+".green(), target.display());
            }
        }
        Ok(())
    }

    pub fn print(&self) {
        println!("{} {}/", "~".cyan(), self.root.display());
        for entry in &self.entries {
            match entry {
                Entry::Dir(path) => println!("   {}/", path.display().to_string().blue()),
                Entry::File { path, contents } => println!(
                    "   {} {}",
                    path.display(),
                    format!("({} bytes)", contents.len()).dimmed()
                ),
            }
        }
    }
}

fn file(path: &str, contents: String) -> Entry {
    Entry::File {
        path: PathBuf::from(path),
        contents,
    }
}

fn create_dir(path: &Path) -> Result<(), ScaffoldError> {
    fs::create_dir_all(path).map_err(|source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Validates `config`, checks that the root is free and writes the project.
///
/// Returns the applied (or, with `dry_run`, the would-be) plan.
pub fn create_project(
    config: &ProjectConfig,
    cli_output_dir: Option<&Path>,
    options: ScaffoldOptions,
) -> Result<ProjectPlan, ScaffoldError> {
    config.validate()?;

    let root = resolve_root(config, cli_output_dir);
    // symlink_metadata so a dangling link still counts as occupied
    if root.symlink_metadata().is_ok() {
        return Err(ScaffoldError::AlreadyExists { path: root });
    }

    let plan = ProjectPlan::new(config, root);
    if options.dry_run {
        plan.print();
    } else {
        println!(
            "{} Creating project '{}' in '{}'...",
            "⚙️".cyan(),
            config.project_name,
            plan.root().display()
        );
        plan.apply(options.verbose)?;
    }
    Ok(plan)
}
