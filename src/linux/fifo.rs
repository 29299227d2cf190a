use std;

use libc;

use {
    Error,
    Result,
};

/// Directory holding the runtime configuration pipe.
pub const CONFIG_DIR: &'static str = "/tmp/bootselectd";

/// Well known path of the live reload pipe.
pub const CONFIG_PATH: &'static str = "/tmp/bootselectd/config";

const CONFIG_DIR_C: &'static str = "/tmp/bootselectd\0";

const CONFIG_PATH_C: &'static str = "/tmp/bootselectd/config\0";

/// Read end of the named pipe that delivers configuration reloads.
///
/// The pipe is world writable so operators can append updates with a plain
/// shell redirection. It is held open for the process lifetime and survives
/// writers attaching and detaching.
pub struct ConfigFifo {
    fd: libc::c_int,
}

impl ConfigFifo {
    /// Creates the pipe if needed and opens it for reading.
    ///
    /// The open is non blocking so startup does not stall until a writer
    /// attaches.
    pub fn open() -> Result<ConfigFifo> {
        unsafe {
            libc::umask(0);

            // Either call failing with EEXIST after a restart is fine; a
            // failed open below reports anything actually wrong.
            libc::mkdir(CONFIG_DIR_C.as_ptr() as *const libc::c_char, 0o777);
            libc::mkfifo(CONFIG_PATH_C.as_ptr() as *const libc::c_char, 0o666);

            let fd = libc::open(
                CONFIG_PATH_C.as_ptr() as *const libc::c_char,
                libc::O_RDONLY | libc::O_NONBLOCK,
            );

            if fd == -1 {
                return Err(Error::IO(std::io::Error::last_os_error()));
            }

            Ok(ConfigFifo { fd })
        }
    }

    /// Returns the raw file descriptor for readiness registration.
    pub fn fd(&self) -> libc::c_int {
        self.fd
    }

    /// Reads whatever is currently queued on the pipe.
    ///
    /// The buffer is sized from FIONREAD, never from the content. An empty
    /// result means the writing end closed; on a pipe held open for read
    /// that is spurious and must not terminate the caller.
    pub fn read(&mut self) -> Result<Vec<u8>> {
        unsafe {
            let mut queued: libc::c_int = 0;

            if libc::ioctl(
                self.fd,
                libc::FIONREAD as libc::c_ulong,
                &mut queued as *mut libc::c_int,
            ) == -1
            {
                return Err(Error::IO(std::io::Error::last_os_error()));
            }

            let mut buffer = vec![0; queued as usize];
            if buffer.is_empty() {
                return Ok(buffer);
            }

            let read = libc::read(
                self.fd,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len(),
            );

            if read == -1 {
                return Err(Error::IO(std::io::Error::last_os_error()));
            }

            buffer.truncate(read as usize);
            Ok(buffer)
        }
    }
}

impl Drop for ConfigFifo {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}
