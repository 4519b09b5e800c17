//! Command-line parsing tests.

use clap::Parser;
use cura_recipe_cli::{Cli, Commands, EnvFormat};
use std::path::PathBuf;

#[test]
fn test_env_with_overrides_and_format() {
    let cli = Cli::try_parse_from([
        "cura-recipe",
        "env",
        "-o",
        "staging=true",
        "--option",
        "enterprise=true",
        "--format",
        "json",
    ])
    .unwrap();

    let Some(Commands::Env { overrides, format }) = cli.command else {
        panic!("expected env command");
    };
    assert_eq!(overrides.options, ["staging=true", "enterprise=true"]);
    assert_eq!(format, EnvFormat::Json);
}

#[test]
fn test_env_format_defaults_to_shell() {
    let cli = Cli::try_parse_from(["cura-recipe", "env"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Env {
            format: EnvFormat::Shell,
            ..
        })
    ));
}

#[test]
fn test_build_arguments() {
    let cli = Cli::try_parse_from([
        "cura-recipe",
        "build",
        "--dep-info",
        "Uranium.URANIUM_CMAKE_PATH=/opt/uranium/cmake",
        "--source-dir",
        "/src/cura",
        "--build-dir",
        "/src/cura/build",
        "--output-dir",
        "/src/cura/build/generators",
        "--build-type",
        "Debug",
        "-j",
        "8",
        "--dry-run",
    ])
    .unwrap();

    let Some(Commands::Build {
        metadata,
        source_dir,
        build_type,
        jobs,
        dry_run,
        output_dir,
        ..
    }) = cli.command
    else {
        panic!("expected build command");
    };
    assert_eq!(
        metadata.dep_info,
        ["Uranium.URANIUM_CMAKE_PATH=/opt/uranium/cmake"]
    );
    assert_eq!(source_dir, PathBuf::from("/src/cura"));
    assert_eq!(output_dir, PathBuf::from("/src/cura/build/generators"));
    assert_eq!(build_type, "Debug");
    assert_eq!(jobs, Some(8));
    assert!(dry_run);
}

#[test]
fn test_launchers_requires_a_target() {
    let result = Cli::try_parse_from([
        "cura-recipe",
        "launchers",
        "--template",
        "cura.run.xml.jinja",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_env_format_is_rejected() {
    let result = Cli::try_parse_from(["cura-recipe", "env", "--format", "yaml"]);
    assert!(result.is_err());
}
