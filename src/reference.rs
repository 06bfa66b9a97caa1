//! Reference [crate::Host] implementations.
//!
//! These cover the two transports most harnesses need: [ssh::SshHost] drives the system's `ssh`
//! and `scp` command-line tools, and [local::LocalHost] targets the machine the tests run on.
//! Harnesses with their own host objects can skip this module entirely and implement
//! [crate::Host] directly.

pub mod local;
pub mod ssh;

#[doc(inline)]
pub use local::LocalHost;

#[doc(inline)]
pub use ssh::SshHost;
