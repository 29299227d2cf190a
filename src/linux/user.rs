use std;

use libc;

use {
    Error,
    Result,
};

/// Account the server runs as once privileged setup is done.
pub const SERVICE_USER: &'static str = "bootselect";

const SERVICE_USER_C: &'static str = "bootselect\0";

/// Switches the process to the unprivileged service account.
///
/// Must run after the raw socket and its filter exist; only socket creation
/// and filter installation need elevated rights.
pub fn drop_privileges() -> Result<()> {
    unsafe {
        let user = libc::getpwnam(SERVICE_USER_C.as_ptr() as *const libc::c_char);

        if user.is_null() {
            return Err(Error::Address);
        }

        // Group first; after setuid the process can no longer change it.
        if libc::setgid((*user).pw_gid) == -1 {
            return Err(Error::IO(std::io::Error::last_os_error()));
        }

        if libc::setuid((*user).pw_uid) == -1 {
            return Err(Error::IO(std::io::Error::last_os_error()));
        }

        Ok(())
    }
}
