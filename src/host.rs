//! The capability interface the fixture needs from a system under test.

use std::path::{Path, PathBuf};

/// Marks a host's install type as the all-in-one (AIO) agent packaging.
///
/// The match is a case-sensitive substring test, so classifiers such as `aio` and `centos7-aio`
/// both qualify.
const AIO_MARKER: &str = "aio";

/// What the fixture needs to know about, and do to, one host.
///
/// Test harnesses usually carry a rich host object of their own. Rather than depend on any
/// particular one, the fixture consumes this narrow trait; implement it on (or next to) your
/// harness's host type and everything here works with it. Reference implementations live in
/// [crate::reference].
///
/// All operations are synchronous and blocking, returning once the underlying I/O completes or
/// fails. Errors are passed through unchanged; the fixture adds no taxonomy of its own.
pub trait Host {
    /// The host's install-type classifier, e.g. `aio` or `foss`.
    ///
    /// Used only by [hiera_datadir] to pick between packaging layouts.
    fn install_type(&self) -> String;

    /// The Puppet code directory for AIO installs, e.g. `/etc/puppetlabs/code`.
    fn code_dir(&self) -> PathBuf;

    /// The preconfigured Hiera data directory for non-AIO (legacy) installs.
    fn default_hiera_datadir(&self) -> PathBuf;

    /// Where `hiera.yaml` lives on this host.
    fn hiera_config_path(&self) -> PathBuf;

    /// Writes `content` to `path` on the host, replacing any existing file.
    fn write_file(&self, path: &Path, content: &str) -> anyhow::Result<()>;

    /// Copies the local directory `local_dir` to `remote_dir` on the host.
    ///
    /// Implementations may merge into an existing `remote_dir` rather than replace it; callers
    /// that need an exact mirror must remove the destination first. The fixture does exactly
    /// that in [crate::HieraFixture::copy_hiera_data_to].
    fn copy_dir_to(&self, local_dir: &Path, remote_dir: &Path) -> anyhow::Result<()>;

    /// Applies a Puppet manifest snippet on the host.
    fn apply_manifest(&self, manifest: &str) -> anyhow::Result<()>;
}

/// Returns the Hiera data directory for `host`.
///
/// AIO installs keep Hiera data under the code directory; everything else uses the host's
/// preconfigured legacy directory, returned untouched. Pure; no host I/O.
pub fn hiera_datadir(host: &dyn Host) -> PathBuf {
    if host.install_type().contains(AIO_MARKER) {
        host.code_dir().join("hieradata")
    } else {
        host.default_hiera_datadir()
    }
}
