use std::{
    io::{self, Write},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard utility is available on this system")]
    Unavailable,
    #[error("could not run the clipboard utility: {0}")]
    Io(#[from] io::Error),
    #[error("clipboard utility exited with {0}")]
    Failed(ExitStatus),
    #[error("clipboard utility did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Copies run on the state store loop, a utility taking longer than this is killed
const COPY_TIMEOUT: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Copies through the platform clipboard utilities (`pbcopy`, `wl-copy`, `xclip`).
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut last_error = ClipboardError::Unavailable;

        for utility in utilities() {
            match pipe_into(utility, text, COPY_TIMEOUT) {
                Ok(()) => return Ok(()),
                // try the next utility, it may simply not be installed
                Err(err) => last_error = err,
            }
        }

        Err(last_error)
    }
}

struct Utility {
    program: &'static str,
    args: &'static [&'static str],
}

const MACOS_UTILITIES: [Utility; 1] = [Utility {
    program: "pbcopy",
    args: &[],
}];

// Wayland first, then X11
const LINUX_UTILITIES: [Utility; 2] = [
    Utility {
        program: "wl-copy",
        args: &[],
    },
    Utility {
        program: "xclip",
        args: &["-selection", "clipboard"],
    },
];

fn utilities() -> &'static [Utility] {
    if cfg!(target_os = "macos") {
        return &MACOS_UTILITIES;
    }
    if cfg!(target_os = "linux") {
        return &LINUX_UTILITIES;
    }

    &[]
}

fn pipe_into(utility: &Utility, text: &str, timeout: Duration) -> Result<(), ClipboardError> {
    let mut child = Command::new(utility.program)
        .args(utility.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // stdin is closed at the end of this block so the utility sees EOF
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }

    let status = wait_with_timeout(&mut child, timeout)?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::Failed(status))
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus, ClipboardError> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            // reap the killed process
            let _ = child.wait();
            return Err(ClipboardError::TimedOut(timeout));
        }

        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;

    /// Keeps copied text in memory, or fails every copy when `broken`.
    #[derive(Debug, Default)]
    pub struct MemoryClipboard {
        pub broken: bool,
        pub contents: Option<String>,
    }

    impl Clipboard for MemoryClipboard {
        fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.broken {
                return Err(ClipboardError::Unavailable);
            }

            self.contents = Some(text.to_string());
            Ok(())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_hanging_utility_is_killed() {
        let hanging = Utility {
            program: "sleep",
            args: &["5"],
        };

        let started = Instant::now();
        let result = pipe_into(&hanging, "ABCD1234", Duration::from_millis(100));

        assert!(matches!(result, Err(ClipboardError::TimedOut(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_utility_reading_stdin_succeeds() {
        let cat = Utility {
            program: "cat",
            args: &[],
        };

        assert!(pipe_into(&cat, "ABCD1234", COPY_TIMEOUT).is_ok());
    }

    #[test]
    fn test_missing_utility_is_an_io_error() {
        let missing = Utility {
            program: "anonchat-no-such-clipboard",
            args: &[],
        };

        assert!(matches!(
            pipe_into(&missing, "ABCD1234", COPY_TIMEOUT),
            Err(ClipboardError::Io(_))
        ));
    }
}
