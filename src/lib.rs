//! Test helpers for provisioning Hiera data onto Puppet-managed test hosts.
//!
//! # What this crate does
//!
//! Acceptance-test harnesses for Puppet code routinely need to place Hiera data on the systems
//! under test: a `hiera.yaml` configuration file pointing at a data directory, plus the YAML data
//! files themselves. This crate packages those chores as a small, session-scoped fixture:
//!
//! 1. Build a Hiera configuration value and write it to a host, overwriting whatever was there.
//! 2. Stage an in-memory data structure as a local YAML file and push it to a host.
//! 3. Copy an existing directory of Hiera data files to a host, replacing prior contents.
//! 4. Compute the Hiera data directory for a host, bridging the all-in-one (AIO) and legacy
//!    packaging layouts.
//!
//! # Hosts
//!
//! The fixture does not know how to reach a machine. It consumes the narrow [Host] trait, which
//! any harness-specific host type can implement. Reference implementations live in
//! [mod@reference]: one that drives the `ssh` and `scp` command-line tools, and one backed by the
//! local machine.
//!
//! # Lifecycle
//!
//! A [HieraFixture] belongs to one test group. The harness constructs it with
//! [HieraFixture::setup] before the group runs and calls [HieraFixture::teardown] afterward,
//! which deletes every local staging directory the fixture created. No hook-registration
//! mechanism is assumed; the harness owns the calls.
//!
//! ```no_run
//! use hiera_fixture::{HieraFixture, Hieradata};
//! use hiera_fixture::reference::SshHost;
//!
//! # fn main() -> anyhow::Result<()> {
//! let agent = SshHost::aio("agent1.example.com");
//! let mut fixture = HieraFixture::setup();
//!
//! let mut hieradata = Hieradata::new();
//! hieradata.insert("ntp::servers".into(), serde_yaml::to_value(["0.pool.ntp.org"])?);
//! fixture.set_hieradata_on(&[&agent], &hieradata)?;
//!
//! // ... run the tests ...
//!
//! fixture.teardown()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod fixture;
pub mod host;
pub mod reference;

#[doc(inline)]
pub use config::HieraConfig;

#[doc(inline)]
pub use fixture::{HieraFixture, Hieradata, DEFAULT_DATA_FILE};

#[doc(inline)]
pub use host::{hiera_datadir, Host};
