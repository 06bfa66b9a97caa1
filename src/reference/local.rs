//! A [Host] backed by the machine the tests run on.

use crate::host::Host;
use anyhow::{bail, Context};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The local machine, presented through the same interface as a remote host.
///
/// Useful when the system under test is the test runner itself, e.g. in containerized jobs that
/// install the agent and the harness side by side. `apply_manifest` shells out to a locally
/// installed `puppet`.
pub struct LocalHost {
    install_type: String,
    code_dir: PathBuf,
    default_hiera_datadir: PathBuf,
    hiera_config_path: PathBuf,
}

impl LocalHost {
    /// Creates a local host with an explicit install type and layout.
    pub fn new(
        install_type: impl Into<String>,
        code_dir: impl Into<PathBuf>,
        default_hiera_datadir: impl Into<PathBuf>,
        hiera_config_path: impl Into<PathBuf>,
    ) -> Self {
        LocalHost {
            install_type: install_type.into(),
            code_dir: code_dir.into(),
            default_hiera_datadir: default_hiera_datadir.into(),
            hiera_config_path: hiera_config_path.into(),
        }
    }

    /// The local machine with a conventional all-in-one agent layout.
    pub fn aio() -> Self {
        LocalHost::new(
            "aio",
            "/etc/puppetlabs/code",
            "/var/lib/hiera",
            "/etc/puppetlabs/puppet/hiera.yaml",
        )
    }
}

impl Host for LocalHost {
    fn install_type(&self) -> String {
        self.install_type.clone()
    }

    fn code_dir(&self) -> PathBuf {
        self.code_dir.clone()
    }

    fn default_hiera_datadir(&self) -> PathBuf {
        self.default_hiera_datadir.clone()
    }

    fn hiera_config_path(&self) -> PathBuf {
        self.hiera_config_path.clone()
    }

    fn write_file(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    fn copy_dir_to(&self, local_dir: &Path, remote_dir: &Path) -> anyhow::Result<()> {
        copy_dir(local_dir, remote_dir).with_context(|| {
            format!(
                "failed to copy {} to {}",
                local_dir.display(),
                remote_dir.display(),
            )
        })
    }

    fn apply_manifest(&self, manifest: &str) -> anyhow::Result<()> {
        let status = Command::new("puppet")
            .args(["apply", "-e"])
            .arg(manifest)
            .status()
            .context("failed to start puppet apply")?;

        if !status.success() {
            let error = match status.code() {
                Some(i) => format!("exit code {i}"),
                None => "error".to_string(),
            };
            bail!("puppet apply exited with {error}:\n{manifest}");
        }
        Ok(())
    }
}

/// Copies `from` into `to`, creating `to` as needed. Merges into an existing tree; existing
/// files not present in `from` are left alone, which is exactly why the fixture removes the
/// destination before calling this.
fn copy_dir(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
