//! CMake toolchain driver with streamed output.
//!
//! Each step spawns `cmake`, drains stdout and stderr on two reader threads,
//! and shows the lines through an `indicatif` display. The rendered run
//! environment is exported to every step.

use cura_recipe_core::{RunEnvironment, ToolError, ToolchainDriver};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Settings for one CMake build tree.
#[derive(Debug, Clone)]
pub struct CMakeConfig {
    /// Directory holding the top-level `CMakeLists.txt`
    pub source_dir: PathBuf,
    /// Out-of-source build tree
    pub build_dir: PathBuf,
    /// Generated toolchain file passed as `CMAKE_TOOLCHAIN_FILE`
    pub toolchain_file: Option<PathBuf>,
    /// `CMAKE_BUILD_TYPE` / `--config`
    pub build_type: String,
    pub install_prefix: Option<PathBuf>,
    /// Exported to every cmake invocation
    pub environment: RunEnvironment,
    /// Program to run, `cmake` unless overridden
    pub program: String,
    /// Parallel jobs; `None` picks from the environment and CPU count
    pub jobs: Option<usize>,
}

impl CMakeConfig {
    pub fn new(source_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
            toolchain_file: None,
            build_type: "Release".to_string(),
            install_prefix: None,
            environment: RunEnvironment::default(),
            program: "cmake".to_string(),
            jobs: None,
        }
    }

    #[must_use]
    pub fn with_toolchain_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.toolchain_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_build_type(mut self, build_type: impl Into<String>) -> Self {
        self.build_type = build_type.into();
        self
    }

    #[must_use]
    pub fn with_install_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.install_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: RunEnvironment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub const fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Arguments for `cmake` configure.
    pub fn configure_args(&self) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.source_dir.display().to_string(),
            "-B".to_string(),
            self.build_dir.display().to_string(),
            format!("-DCMAKE_BUILD_TYPE={}", self.build_type),
        ];
        if let Some(toolchain) = &self.toolchain_file {
            args.push(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()));
        }
        if let Some(prefix) = &self.install_prefix {
            args.push(format!("-DCMAKE_INSTALL_PREFIX={}", prefix.display()));
        }
        args
    }

    /// Arguments for `cmake --build`.
    pub fn build_args(&self) -> Vec<String> {
        vec![
            "--build".to_string(),
            self.build_dir.display().to_string(),
            "--config".to_string(),
            self.build_type.clone(),
            "-j".to_string(),
            self.jobs.unwrap_or_else(build_parallelism).to_string(),
        ]
    }

    /// Arguments for `cmake --install`.
    pub fn install_args(&self) -> Vec<String> {
        vec![
            "--install".to_string(),
            self.build_dir.display().to_string(),
            "--config".to_string(),
            self.build_type.clone(),
        ]
    }
}

/// [`ToolchainDriver`] backed by the `cmake` executable.
#[derive(Debug, Clone)]
pub struct CMakeDriver {
    config: CMakeConfig,
}

impl CMakeDriver {
    pub const fn new(config: CMakeConfig) -> Self {
        Self { config }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(args);
        for (name, value) in self.config.environment.iter() {
            cmd.env(name, value);
        }
        cmd
    }
}

impl ToolchainDriver for CMakeDriver {
    fn configure(&mut self) -> Result<(), ToolError> {
        std::fs::create_dir_all(&self.config.build_dir)?;
        let args = self.config.configure_args();
        tracing::debug!(program = %self.config.program, ?args, "cmake configure");

        let pb = spinner("Configuring with CMake...");
        run_streamed(&self.config.program, self.command(&args), |line| {
            if !line.trim().is_empty() {
                pb.println(line);
            }
        })?;
        pb.finish_and_clear();

        println!("✓ CMake configuration complete");
        Ok(())
    }

    fn build(&mut self) -> Result<(), ToolError> {
        let args = self.config.build_args();
        tracing::debug!(program = %self.config.program, ?args, "cmake build");

        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));

        let mut last_progress = 0;
        run_streamed(&self.config.program, self.command(&args), |line| {
            if let Some((current, total)) = parse_build_progress(line)
                && current > last_progress
            {
                pb.set_length(total as u64);
                pb.set_position(current as u64);
                last_progress = current;
            }
            if is_notable_build_line(line) {
                pb.println(line);
            }
        })?;
        pb.finish_and_clear();

        println!("✓ Compilation complete");
        Ok(())
    }

    fn install(&mut self) -> Result<(), ToolError> {
        let args = self.config.install_args();
        tracing::debug!(program = %self.config.program, ?args, "cmake install");

        let pb = spinner("Installing...");
        run_streamed(&self.config.program, self.command(&args), |line| {
            if !line.trim().is_empty() {
                pb.println(line);
            }
        })?;
        pb.finish_and_clear();

        println!("✓ Install complete");
        Ok(())
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Spawn `cmd`, feed every output line to `on_line`, and wait for exit.
fn run_streamed(
    program: &str,
    mut cmd: Command,
    mut on_line: impl FnMut(&str),
) -> Result<(), ToolError> {
    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ToolError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let (tx, rx) = mpsc::channel();
    let readers: Vec<_> = [
        child.stdout.take().map(|s| Box::new(s) as Box<dyn Read + Send>),
        child.stderr.take().map(|s| Box::new(s) as Box<dyn Read + Send>),
    ]
    .into_iter()
    .flatten()
    .map(|stream| {
        let tx = tx.clone();
        thread::spawn(move || {
            let reader = BufReader::new(stream);
            for line in reader.lines().map_while(Result::ok) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
    })
    .collect();
    drop(tx);

    // Ends once both reader threads have dropped their senders
    for line in rx {
        tracing::trace!(target: "cmake", "{line}");
        on_line(&line);
    }
    for reader in readers {
        let _ = reader.join();
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(ToolError::ExitStatus {
            program: program.to_string(),
            code: status.code(),
        });
    }
    Ok(())
}

fn is_notable_build_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    line.contains("Building")
        || line.contains("Linking")
        || lower.contains("error")
        || lower.contains("warning:")
        || lower.contains("fatal")
        || lower.contains("undefined reference")
        || lower.contains("cannot find")
}

/// Parallel job count.
///
/// Respects `CMAKE_BUILD_PARALLEL_LEVEL` when it holds a positive integer.
pub fn build_parallelism() -> usize {
    std::env::var("CMAKE_BUILD_PARALLEL_LEVEL")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or_else(num_cpus::get)
}

/// Parse `(current, total)` from `[ 50%]` or `[150/200]` markers.
fn parse_build_progress(line: &str) -> Option<(usize, usize)> {
    let start = line.find('[')?;
    let end = line[start..].find(']')?;
    let bracket_content = &line[start + 1..start + end];

    if let Some(pct_pos) = bracket_content.find('%') {
        let percent = bracket_content[..pct_pos].trim().parse::<usize>().ok()?;
        return Some((percent, 100));
    }

    let (current, total) = bracket_content.split_once('/')?;
    Some((current.trim().parse().ok()?, total.trim().parse().ok()?))
}
