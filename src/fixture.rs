//! The session-scoped fixture that stages and provisions Hiera data.

use crate::config::HieraConfig;
use crate::host::{hiera_datadir, Host};
use anyhow::Context;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The data-source name used when the caller doesn't pick one.
pub const DEFAULT_DATA_FILE: &str = "default";

/// Convenience alias for hand-built hieradata payloads.
///
/// Any [Serialize] type works as a payload; this alias covers the common case of an ad-hoc
/// mapping. [IndexMap] keeps insertion order, so the YAML written to the host reads the way the
/// test author wrote it.
pub type Hieradata = IndexMap<String, serde_yaml::Value>;

/// Stages Hiera data for a group of tests and cleans up afterward.
///
/// One fixture belongs to one test group. The harness creates it with [HieraFixture::setup]
/// before the group runs and calls [HieraFixture::teardown] once the group ends. Every local
/// staging directory created by [HieraFixture::set_hieradata_on] is tracked here and removed by
/// teardown; nothing else in this type holds state.
///
/// A fixture is not meant to be shared between concurrently running test groups. Give each group
/// its own.
#[derive(Debug, Default)]
pub struct HieraFixture {
    /// Local staging directories, in creation order. Each is removed exactly once by
    /// [HieraFixture::clear_temp_hieradata].
    temp_dirs: Vec<PathBuf>,
}

impl HieraFixture {
    /// Creates a fixture with no staged data. Call once per test group.
    pub fn setup() -> Self {
        HieraFixture::default()
    }

    /// Writes a `hiera.yaml` to every host in `hosts`.
    ///
    /// Each host gets a configuration pointing at its own data directory (see
    /// [hiera_datadir]) with the given hierarchy. The write replaces the file's prior content
    /// wholesale; there is no merging.
    ///
    /// # Errors
    ///
    /// Any failure from a host's remote write is returned unchanged. Hosts are processed in
    /// order, so a failure partway leaves earlier hosts configured.
    pub fn write_hiera_config_on(
        &self,
        hosts: &[&dyn Host],
        hierarchy: &[String],
    ) -> anyhow::Result<()> {
        for host in hosts {
            let config = HieraConfig::new(hiera_datadir(*host), hierarchy.to_vec());
            let yaml = config
                .to_yaml()
                .context("failed to serialize hiera.yaml")?;
            let path = host.hiera_config_path();
            debug!("writing hiera config to {}", path.display());
            host.write_file(&path, &yaml)?;
        }
        Ok(())
    }

    /// Single-host form of [HieraFixture::write_hiera_config_on].
    ///
    /// The surrounding harness passes whichever host it considers its default.
    pub fn write_hiera_config(&self, host: &dyn Host, hierarchy: &[String]) -> anyhow::Result<()> {
        self.write_hiera_config_on(&[host], hierarchy)
    }

    /// Stages `hieradata` under the name [DEFAULT_DATA_FILE] and provisions it onto `hosts`.
    ///
    /// See [HieraFixture::set_named_hieradata_on].
    pub fn set_hieradata_on<T: Serialize>(
        &mut self,
        hosts: &[&dyn Host],
        hieradata: &T,
    ) -> anyhow::Result<()> {
        self.set_named_hieradata_on(hosts, hieradata, DEFAULT_DATA_FILE)
    }

    /// Stages `hieradata` as `<data_file_name>.yaml` and provisions it onto `hosts`.
    ///
    /// In order: creates a uniquely named local staging directory (tracked for cleanup at
    /// teardown), writes the YAML serialization of `hieradata` into it, replaces each host's
    /// data directory with the staged directory, and writes each host a `hiera.yaml` whose
    /// hierarchy is exactly `[data_file_name]`.
    ///
    /// The call is authoritative: calling it again replaces the remote data directory and the
    /// configured hierarchy rather than accumulating. `data_file_name` must be a usable
    /// file-name fragment; no validation happens beyond what the file system imposes.
    ///
    /// # Errors
    ///
    /// Steps run in sequence with no rollback. A failure after staging leaves the staging
    /// directory on disk; it is still tracked and will be removed by the next
    /// [HieraFixture::clear_temp_hieradata].
    pub fn set_named_hieradata_on<T: Serialize>(
        &mut self,
        hosts: &[&dyn Host],
        hieradata: &T,
        data_file_name: &str,
    ) -> anyhow::Result<()> {
        let dir = tempfile::Builder::new()
            .prefix("hieradata-")
            .tempdir()
            .context("failed to create staging directory")?
            .keep();
        debug!("staging hieradata in {}", dir.display());
        self.temp_dirs.push(dir.clone());

        let yaml =
            serde_yaml::to_string(hieradata).context("failed to serialize hieradata")?;
        let data_file = dir.join(format!("{data_file_name}.yaml"));
        fs::write(&data_file, yaml)
            .with_context(|| format!("failed to write {}", data_file.display()))?;

        for host in hosts {
            self.copy_hiera_data_to(*host, &dir)?;
        }
        self.write_hiera_config_on(hosts, &[data_file_name.to_string()])
    }

    /// Replaces the host's Hiera data directory with the contents of `source_dir`.
    ///
    /// The data directory is first removed on the host via a Puppet manifest
    /// (`ensure => absent, force => true, recurse => true`, a no-op when the directory doesn't
    /// exist), and only then is `source_dir` copied over. [Host::copy_dir_to] may merge into an
    /// existing tree, so the prior removal is what guarantees the destination exactly mirrors
    /// `source_dir`, with no stale files from earlier runs.
    ///
    /// `source_dir` is resolved to an absolute local path before the copy.
    pub fn copy_hiera_data_to(&self, host: &dyn Host, source_dir: &Path) -> anyhow::Result<()> {
        let datadir = hiera_datadir(host);
        debug!("replacing hiera data in {}", datadir.display());
        host.apply_manifest(&absent_manifest(&datadir))?;

        let source = fs::canonicalize(source_dir)
            .with_context(|| format!("failed to resolve {}", source_dir.display()))?;
        host.copy_dir_to(&source, &datadir)
    }

    /// Deletes every staging directory this fixture has created.
    ///
    /// Safe to call any number of times; an empty fixture and directories that have already
    /// disappeared are both fine.
    ///
    /// # Errors
    ///
    /// Returns the first hard file-system error. The failing directory stays tracked so a later
    /// call retries it.
    pub fn clear_temp_hieradata(&mut self) -> anyhow::Result<()> {
        while let Some(dir) = self.temp_dirs.pop() {
            if let Err(err) = remove_staging_dir(&dir) {
                self.temp_dirs.push(dir);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Ends the session: removes all staged data. Call once per test group, after it finishes.
    pub fn teardown(&mut self) -> anyhow::Result<()> {
        self.clear_temp_hieradata()
    }

    /// The staging directories currently tracked for cleanup, in creation order.
    pub fn temp_dirs(&self) -> &[PathBuf] {
        &self.temp_dirs
    }
}

/// Renders the manifest that force-removes `path` on a host. Applying it when `path` is already
/// absent is a no-op.
fn absent_manifest(path: &Path) -> String {
    format!(
        "file {{ '{}':\n  ensure  => absent,\n  force   => true,\n  recurse => true,\n}}\n",
        path.display(),
    )
}

fn remove_staging_dir(dir: &Path) -> anyhow::Result<()> {
    debug!("removing staging directory {}", dir.display());
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err)
            .with_context(|| format!("failed to remove staging directory {}", dir.display())),
    }
}
