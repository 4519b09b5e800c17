//! Integration tests for the build pipeline: file generation, launcher
//! rendering and build execution against a fake driver.

use std::collections::BTreeMap;
use std::fs;

use cura_recipe_core::builtin::URANIUM_CMAKE_PATH;
use cura_recipe_core::{
    BuildStep, DependencyMetadata, RecipeError, ToolError, ToolchainDriver, cura_descriptor,
};
use cura_recipe_runtime::{
    BUILD_RECORD_FILE, BuildPlan, BuildRecord, LauncherTarget, LockFile, render_launchers,
};
use tempfile::tempdir;

fn uranium_metadata() -> DependencyMetadata {
    let mut metadata = DependencyMetadata::new();
    metadata.insert("Uranium", URANIUM_CMAKE_PATH, "/opt/uranium/share/cmake");
    metadata
}

fn plan(pairs: &[(&str, &str)]) -> BuildPlan {
    let overrides: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    BuildPlan::prepare(cura_descriptor(), &overrides, &uranium_metadata()).unwrap()
}

struct FakeDriver {
    calls: Vec<BuildStep>,
    fail_on: Option<BuildStep>,
}

impl FakeDriver {
    fn new(fail_on: Option<BuildStep>) -> Self {
        Self {
            calls: Vec::new(),
            fail_on,
        }
    }

    fn step(&mut self, step: BuildStep) -> Result<(), ToolError> {
        self.calls.push(step);
        if self.fail_on == Some(step) {
            Err(ToolError::ExitStatus {
                program: "fake-cmake".to_string(),
                code: Some(1),
            })
        } else {
            Ok(())
        }
    }
}

impl ToolchainDriver for FakeDriver {
    fn configure(&mut self) -> Result<(), ToolError> {
        self.step(BuildStep::Configure)
    }

    fn build(&mut self) -> Result<(), ToolError> {
        self.step(BuildStep::Build)
    }

    fn install(&mut self) -> Result<(), ToolError> {
        self.step(BuildStep::Install)
    }
}

#[test]
fn test_prepare_fails_without_uranium_metadata() {
    let err = BuildPlan::prepare(
        cura_descriptor(),
        &BTreeMap::new(),
        &DependencyMetadata::new(),
    )
    .unwrap_err();
    assert!(matches!(err, RecipeError::MissingDependencyMetadata { .. }));
}

#[test]
fn test_generate_writes_all_files() {
    let dir = tempdir().unwrap();
    let plan = plan(&[("python_version", "3.10"), ("staging", "true")]);
    let files = plan.generate(dir.path()).unwrap();

    for path in files.paths() {
        assert!(path.is_file(), "{}", path.display());
    }

    let toolchain = fs::read_to_string(&files.toolchain_file).unwrap();
    assert!(toolchain.contains("set(Python_VERSION \"3.10\" CACHE STRING \"\" FORCE)"));
    assert!(toolchain.contains("set(URANIUM_CMAKE_PATH \"/opt/uranium/share/cmake\""));

    let shell = fs::read_to_string(&files.run_env_sh).unwrap();
    assert!(shell.contains("export CLOUD_API_ROOT=\"https://api-staging.ultimaker.com\""));

    let batch = fs::read_to_string(&files.run_env_bat).unwrap();
    assert!(batch.contains("set \"APP_DISPLAY_NAME=Cura\""));
}

#[test]
fn test_lock_file_preserves_dependency_order() {
    let dir = tempdir().unwrap();
    let plan = plan(&[]);
    let files = plan.generate(dir.path()).unwrap();

    let lock: LockFile =
        serde_json::from_str(&fs::read_to_string(&files.lock_file).unwrap()).unwrap();
    let references: Vec<_> = lock
        .dependencies
        .iter()
        .map(|d| d.reference.as_str())
        .collect();
    assert_eq!(
        references,
        [
            "Charon/4.10.0@ultimaker/testing",
            "pynest2d/4.10.0@ultimaker/testing",
            "Savitar/4.10.0@ultimaker/testing",
            "Uranium/4.10.0@ultimaker/testing",
        ]
    );
    for dependency in &lock.dependencies {
        assert_eq!(dependency.options["python_version"], "3.9");
    }
    assert_eq!(lock.build_requirements, ["cmake/[>=3.16.2]"]);
    assert_eq!(lock, plan.lock());
}

#[test]
fn test_execute_records_completed_build() {
    let dir = tempdir().unwrap();
    let plan = plan(&[("enterprise", "true")]);
    let mut driver = FakeDriver::new(None);

    let record = plan.execute(&mut driver, "Release", dir.path()).unwrap();
    assert_eq!(driver.calls, BuildStep::ALL);
    assert_eq!(record.steps, BuildStep::ALL);

    let loaded = BuildRecord::load(&dir.path().join(BUILD_RECORD_FILE)).unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.options.get("enterprise"), Some("true"));
}

#[test]
fn test_failed_build_stops_before_install_and_writes_no_record() {
    let dir = tempdir().unwrap();
    let plan = plan(&[]);
    let mut driver = FakeDriver::new(Some(BuildStep::Build));

    let err = plan.execute(&mut driver, "Release", dir.path()).unwrap_err();
    assert_eq!(driver.calls, [BuildStep::Configure, BuildStep::Build]);
    assert!(matches!(
        err.downcast_ref::<RecipeError>(),
        Some(RecipeError::Build {
            step: BuildStep::Build,
            ..
        })
    ));
    assert!(!dir.path().join(BUILD_RECORD_FILE).exists());
}

#[test]
fn test_render_launchers_one_file_per_target() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("cura.run.xml.jinja");
    fs::write(
        &template,
        "<run name=\"{{ name }}\" script=\"{{ entry_point }}\" args=\"{{ arguments }}\" api=\"{{ env.CLOUD_API_ROOT }}\"/>\n{{ env_entries }}\n",
    )
    .unwrap();

    let plan = plan(&[]);
    let targets: Vec<LauncherTarget> = ["cura:cura_app.py:--debug", "tests:run_tests.py"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let out = dir.path().join("runConfigurations");

    let written = render_launchers(&template, &targets, &plan.environment, &out).unwrap();
    assert_eq!(
        written,
        [out.join("cura.run.xml"), out.join("tests.run.xml")]
    );

    let cura = fs::read_to_string(&written[0]).unwrap();
    assert!(cura.starts_with(
        "<run name=\"cura\" script=\"cura_app.py\" args=\"--debug\" api=\"https://api.ultimaker.com\"/>"
    ));
    assert!(cura.contains("APP_DISPLAY_NAME=Cura\nAPP_VERSION=master\n"));
}

#[test]
fn test_missing_template_is_reported() {
    let dir = tempdir().unwrap();
    let plan = plan(&[]);
    let template = dir.path().join("missing.run.xml.jinja");

    let err = render_launchers(&template, &[], &plan.environment, dir.path()).unwrap_err();
    assert!(matches!(err, RecipeError::TemplateNotFound { path } if path == template));
}

#[test]
fn test_unknown_env_placeholder_is_invalid_template() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("launcher.sh.tpl");
    fs::write(&template, "export X={{ env.NOT_RENDERED }}\n").unwrap();

    let plan = plan(&[]);
    let targets = ["cura:cura_app.py".parse::<LauncherTarget>().unwrap()];
    let err =
        render_launchers(&template, &targets, &plan.environment, dir.path()).unwrap_err();
    assert!(matches!(err, RecipeError::InvalidTemplate { .. }));
}

#[test]
fn test_launcher_name_cannot_leave_output_dir() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("launcher.sh.tpl");
    fs::write(&template, "python {{ entry_point }}\n").unwrap();
    let out = dir.path().join("out");

    let plan = plan(&[]);
    let targets = [LauncherTarget {
        name: "../escaped".to_string(),
        entry_point: "main.py".to_string(),
        arguments: String::new(),
    }];
    let err = render_launchers(&template, &targets, &plan.environment, &out).unwrap_err();
    assert!(matches!(err, RecipeError::InvalidTemplate { .. }));
    assert!(!dir.path().join("escaped.sh").exists());
}
