//! Straight key on a serial port's DTR line.

use std::fs::File;
use std::io;
use std::path::Path;

use super::Key;

/// Keys a transmitter by asserting DTR on a serial device.
pub struct SerialDtrKey {
    #[cfg_attr(not(unix), allow(dead_code))]
    port: File,
}

impl SerialDtrKey {
    /// Opens the serial device and makes sure DTR starts released.
    ///
    /// # Errors
    /// Returns an error if the device can't be opened or DTR can't be cleared.
    #[cfg(unix)]
    pub fn open(path: &Path) -> io::Result<Self> {
        use std::os::unix::fs::OpenOptionsExt;

        let port = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
            .open(path)?;
        let key = Self { port };
        key.up()?;
        tracing::info!(path = %path.display(), "opened serial DTR key");
        Ok(key)
    }

    /// Serial DTR keying needs termios ioctls.
    ///
    /// # Errors
    /// Always fails on this platform.
    #[cfg(not(unix))]
    pub fn open(path: &Path) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!(
                "serial DTR keying is not supported on this platform ({})",
                path.display()
            ),
        ))
    }

    #[cfg(unix)]
    fn set_dtr(&self, asserted: bool) -> io::Result<()> {
        use std::os::fd::AsRawFd;

        let request = if asserted {
            libc::TIOCMBIS
        } else {
            libc::TIOCMBIC
        };
        let bits: libc::c_int = libc::TIOCM_DTR;
        // SAFETY: the fd is owned by `self.port` for the duration of the call
        // and `bits` outlives it.
        let rc = unsafe { libc::ioctl(self.port.as_raw_fd(), request, &raw const bits) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_dtr(&self, _asserted: bool) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}

impl Key for SerialDtrKey {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn down(&self) -> io::Result<()> {
        self.set_dtr(true)
    }

    fn up(&self) -> io::Result<()> {
        self.set_dtr(false)
    }
}

impl Drop for SerialDtrKey {
    fn drop(&mut self) {
        let _ = self.up();
    }
}
