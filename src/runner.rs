//! Child process execution
//!
//! Runs the assembled command line through the shell and forwards its
//! stdout/stderr to ours as data arrives. Both pipes are drained through
//! one poll(2) readiness loop so a burst on either stream never stalls the
//! other, and output appears close to real time instead of on exit.

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::fcntl::{FcntlArg, OFlag, fcntl};
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use std::io::{ErrorKind, Read, Write};
use std::os::fd::AsFd;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, Stdio};
use tracing::debug;

/// Run `command_text` through `sh -c` and return the child's exit status.
///
/// A child that ran and exited non-zero is not an error here; its code is
/// returned verbatim. A signal-killed child maps to 128 + signal number.
/// Only failure to start the shell at all is an `Err`.
pub fn run(command_text: &str) -> Result<i32> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command_text)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("Failed to spawn shell for command")?;

    let mut child_out = child
        .stdout
        .take()
        .context("child stdout pipe missing")?;
    let mut child_err = child
        .stderr
        .take()
        .context("child stderr pipe missing")?;
    set_nonblocking(&child_out)?;
    set_nonblocking(&child_err)?;

    let mut out_open = true;
    let mut err_open = true;

    while out_open || err_open {
        // Collect readiness first; the PollFd borrows must end before the
        // streams can be read mutably.
        let mut out_ready = false;
        let mut err_ready = false;
        {
            let mut fds = Vec::with_capacity(2);
            let mut slots = Vec::with_capacity(2);
            if out_open {
                fds.push(PollFd::new(child_out.as_fd(), PollFlags::POLLIN));
                slots.push(0);
            }
            if err_open {
                fds.push(PollFd::new(child_err.as_fd(), PollFlags::POLLIN));
                slots.push(1);
            }

            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => {}
                // A signal aimed at the child can interrupt our wait too.
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(e).context("poll on child pipes failed"),
            }

            for (fd, &slot) in fds.iter().zip(&slots) {
                let hit = fd.revents().is_some_and(|r| {
                    r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR)
                });
                if slot == 0 {
                    out_ready = hit;
                } else {
                    err_ready = hit;
                }
            }
        }

        if out_ready {
            out_open = drain(&mut child_out, &mut std::io::stdout())?;
        }
        if err_ready {
            err_open = drain(&mut child_err, &mut std::io::stderr())?;
        }
    }

    let status = child.wait().context("Failed to wait for child")?;
    let code = match status.code() {
        Some(code) => code,
        // Killed by a signal; report it shell-style.
        None => 128 + status.signal().unwrap_or(0),
    };
    debug!(code = code, "Child exited");
    Ok(code)
}

/// Forward whatever is currently readable; `false` once the stream hit EOF.
fn drain(stream: &mut impl Read, sink: &mut impl Write) -> Result<bool> {
    let mut buf = [0u8; 8192];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => return Ok(false),
            Ok(n) => {
                sink.write_all(&buf[..n])
                    .and_then(|_| sink.flush())
                    .context("Failed to forward child output")?;
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(true),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => return Ok(false),
        }
    }
}

fn set_nonblocking<F: AsFd>(fd: &F) -> Result<()> {
    let flags = fcntl(fd, FcntlArg::F_GETFL).context("F_GETFL failed")?;
    let flags = OFlag::from_bits_retain(flags) | OFlag::O_NONBLOCK;
    fcntl(fd, FcntlArg::F_SETFL(flags)).context("F_SETFL failed")?;
    Ok(())
}
