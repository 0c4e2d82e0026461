// ABOUTME: Behavioral tests for configuration layering and command-line overrides

use anyhow::Result;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use merged_branches::cli::Cli;
use merged_branches::config::AppConfig;
use merged_branches::tree::SortMode;

/// Later files win for the keys they set
#[test]
fn test_project_file_layers_over_user_file() -> Result<()> {
    let dir = TempDir::new()?;
    let user = dir.path().join("user.toml");
    let project = dir.path().join("project.toml");
    fs::write(
        &user,
        "git_binary = \"/opt/git/bin/git\"\nworkspaces = [\"/src/app\"]\n\n[ui]\nshow_details = false\n",
    )?;
    fs::write(&project, "sort_by_date = true\n")?;

    let mut config = AppConfig::default();
    config.merge(AppConfig::load_file(&user)?);
    config.merge(AppConfig::load_file(&project)?);

    assert_eq!(config.git_binary, PathBuf::from("/opt/git/bin/git"));
    assert_eq!(config.workspaces, vec![PathBuf::from("/src/app")]);
    assert_eq!(config.initial_sort_mode(), SortMode::Date);
    assert!(!config.ui.show_details);
    Ok(())
}

#[test]
fn test_unreadable_file_is_an_error_with_path() {
    let err = AppConfig::load_file(&PathBuf::from("/nonexistent/merged-branches.toml"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/merged-branches.toml"));
}

#[test]
fn test_cli_flags_beat_files() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("config.toml");
    fs::write(&path, "workspaces = [\"/src/app\"]\ngit_binary = \"/opt/git\"\n")?;
    let mut config = AppConfig::load_file(&path)?;

    let cli = Cli::try_parse_from(["mgb", "--workspace", "/src/other", "--git", "git2", "--expand"])?;
    cli.apply_overrides(&mut config);

    assert_eq!(config.workspaces, vec![PathBuf::from("/src/other")]);
    assert_eq!(config.git_binary, PathBuf::from("git2"));
    assert!(config.tree_options().merge_results_expanded);
    Ok(())
}

#[test]
fn test_empty_workspaces_fall_back_to_current_directory() -> Result<()> {
    let config = AppConfig::default();
    assert_eq!(config.resolve_workspaces(), vec![std::env::current_dir()?]);
    Ok(())
}
