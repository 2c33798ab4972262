//! Utility functions for use in other parts of the window manager
use crate::Result;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use tracing::info;

/// Run an external command from an argv style vector.
///
/// The child is detached into its own session and its stdio is redirected
/// to /dev/null; it is never waited on (SIGCHLD is ignored while the
/// window manager runs).
pub fn spawn(argv: &[&str]) -> Result<()> {
    let (cmd, args) = match argv.split_first() {
        Some(parts) => parts,
        None => return Ok(()),
    };

    info!(?argv, "spawning subprocess");
    Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()?;

    Ok(())
}

/// Run a shell command string via `/bin/sh -c`.
pub fn spawn_sh(cmd: &str) -> Result<()> {
    spawn(&["/bin/sh", "-c", cmd])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argv_is_a_no_op() {
        assert!(spawn(&[]).is_ok());
    }

    #[test]
    fn missing_binary_is_an_error() {
        assert!(spawn(&["/definitely/not/a/real/binary"]).is_err());
    }
}
