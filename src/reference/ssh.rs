//! A [Host] reached through the system's `ssh` and `scp` command-line tools.
//!
//! This implementation assumes passwordless SSH to the target (e.g. key-based authentication
//! with an agent), which is how acceptance-test hosts are normally provisioned. Every operation
//! runs synchronously and blocks until the underlying tool exits.

use crate::host::Host;
use anyhow::{bail, Context};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Connection details and Puppet layout for one host reached over SSH.
pub struct SshHost {
    /// Whatever `ssh` accepts as a destination: a host name, `user@host`, or an alias from
    /// `~/.ssh/config`.
    address: String,
    install_type: String,
    code_dir: PathBuf,
    default_hiera_datadir: PathBuf,
    hiera_config_path: PathBuf,
}

impl SshHost {
    /// Creates a host with an explicit install type and layout.
    pub fn new(
        address: impl Into<String>,
        install_type: impl Into<String>,
        code_dir: impl Into<PathBuf>,
        default_hiera_datadir: impl Into<PathBuf>,
        hiera_config_path: impl Into<PathBuf>,
    ) -> Self {
        SshHost {
            address: address.into(),
            install_type: install_type.into(),
            code_dir: code_dir.into(),
            default_hiera_datadir: default_hiera_datadir.into(),
            hiera_config_path: hiera_config_path.into(),
        }
    }

    /// A host running the all-in-one agent packaging, with its conventional paths.
    pub fn aio(address: impl Into<String>) -> Self {
        SshHost::new(
            address,
            "aio",
            "/etc/puppetlabs/code",
            "/var/lib/hiera",
            "/etc/puppetlabs/puppet/hiera.yaml",
        )
    }

    /// A host running a legacy (non-AIO) install, with its conventional paths.
    pub fn legacy(address: impl Into<String>) -> Self {
        SshHost::new(
            address,
            "foss",
            "/etc/puppet",
            "/var/lib/hiera",
            "/etc/puppet/hiera.yaml",
        )
    }

    /// The `ssh` destination this host was created with.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Runs `remote_command` on the host via `ssh` and waits for it to finish.
    fn run_remote(&self, remote_command: &str) -> anyhow::Result<()> {
        let status = Command::new("ssh")
            .arg(&self.address)
            .arg(remote_command)
            .status()
            .with_context(|| format!("failed to start ssh to {}", self.address))?;

        if !status.success() {
            bail!(
                "ssh to {} exited with {}: {remote_command}",
                self.address,
                describe(status),
            );
        }
        Ok(())
    }
}

impl Host for SshHost {
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
        // Stream the content over stdin rather than embedding it in the command line, so file
        // contents never need shell quoting.
        let remote_command = write_file_command(path)?;
        let mut child = Command::new("ssh")
            .arg(&self.address)
            .arg(&remote_command)
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start ssh to {}", self.address))?;

        let mut stdin = child.stdin.take().context("ssh did not expose stdin")?;
        stdin.write_all(content.as_bytes())?;
        drop(stdin);

        let status = child.wait()?;
        if !status.success() {
            bail!(
                "ssh to {} exited with {}: {remote_command}",
                self.address,
                describe(status),
            );
        }
        Ok(())
    }

    fn copy_dir_to(&self, local_dir: &Path, remote_dir: &Path) -> anyhow::Result<()> {
        let destination = scp_destination(&self.address, remote_dir)?;
        let status = Command::new("scp")
            .arg("-r")
            .arg(local_dir)
            .arg(&destination)
            .status()
            .context("failed to start scp")?;

        if !status.success() {
            bail!("scp to {destination} exited with {}", describe(status));
        }
        Ok(())
    }

    fn apply_manifest(&self, manifest: &str) -> anyhow::Result<()> {
        self.run_remote(&apply_manifest_command(manifest)?)
    }
}

/// The remote command that receives a file's content on stdin and writes it to `path`.
fn write_file_command(path: &Path) -> anyhow::Result<String> {
    Ok(format!("cat > {}", quote(path_str(path)?)?))
}

/// The remote command that applies a Puppet manifest snippet.
fn apply_manifest_command(manifest: &str) -> anyhow::Result<String> {
    Ok(format!("puppet apply -e {}", quote(manifest)?))
}

/// The `scp` destination argument for `remote_dir` on `address`.
fn scp_destination(address: &str, remote_dir: &Path) -> anyhow::Result<String> {
    Ok(format!("{address}:{}", path_str(remote_dir)?))
}

fn quote(s: &str) -> anyhow::Result<String> {
    let quoted = shlex::try_quote(s)
        .with_context(|| format!("cannot quote for the remote shell: {s}"))?;
    Ok(quoted.into_owned())
}

fn path_str(path: &Path) -> anyhow::Result<&str> {
    path.to_str()
        .with_context(|| format!("path is not UTF-8: {}", path.display()))
}

fn describe(status: ExitStatus) -> String {
    match status.code() {
        Some(i) => format!("exit code {i}"),
        None => "error".to_string(),
    }
}
