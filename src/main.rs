//! # cmake-init CLI Entry Point
//!
//! Parses arguments, loads `project_template.json` and hands it to
//! [`scaffold::create_project`]. Errors are printed in red and exit with status 1.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use cmake_init::config;
use cmake_init::scaffold::{self, ScaffoldOptions};
use cmake_init::ui;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
    fn SetConsoleCP(wCodePageID: u32) -> i32;
}

#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
        SetConsoleCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

#[derive(Parser)]
#[command(name = "cmake-init")]
#[command(about = "Create a new C/C++ CMake project from a template", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Directory to create the project in (overrides `outputDir` from the template)
    output_dir: Option<PathBuf>,
    /// Template file [default: project_template.json next to this executable]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Show the files that would be created without writing anything
    #[arg(long)]
    dry_run: bool,
    /// Print every file and directory as it is written
    #[arg(short, long)]
    verbose: bool,
    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    enable_windows_utf8_console();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} Error: {:#}", "x".red(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        return Ok(());
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_config_path()
            .context("Failed to locate the cmake-init executable")?,
    };
    if cli.verbose {
        println!("{} Using template {}", "·".dimmed(), config_path.display());
    }
    let template = config::load_config(&config_path)?;

    let options = ScaffoldOptions {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };
    let plan = scaffold::create_project(&template, cli.output_dir.as_deref(), options)?;
    let root = plan.root().display();

    if cli.dry_run {
        println!(
            "{} Dry run: {} files would be written to '{}'",
            "!".yellow(),
            plan.file_count(),
            root
        );
        return Ok(());
    }

    println!(
        "{} Project '{}' created successfully in '{}'.",
        "✓".green(),
        template.project_name.bold(),
        root
    );
    ui::print_targets(&template);
    println!("To build:");
    println!("  cd {}", root);
    println!("  cmake -B build -G Ninja");
    println!("  cmake --build build");
    Ok(())
}
