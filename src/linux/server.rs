use std;

use libc;

use core::service::Service;
use linux::dev::RawSock;
use linux::fifo::ConfigFifo;
use {
    Error,
    Result,
};

const LISTEN_SOCKET: u64 = 0;

const CONFIG_FIFO: u64 = 1;

/// Event loop multiplexing the raw socket and the configuration pipe.
///
/// Exactly two sources are ever registered. Each wake up dispatches the
/// ready sources one at a time to completion on the calling thread, so
/// table reloads and request lookups are strictly serialized.
pub struct Server {
    service: Service<RawSock>,
    fifo: ConfigFifo,
    epfd: libc::c_int,
}

impl Server {
    pub fn new(service: Service<RawSock>, fifo: ConfigFifo) -> Result<Server> {
        let epfd = unsafe { libc::epoll_create1(0) };

        if epfd == -1 {
            return Err(Error::IO(std::io::Error::last_os_error()));
        }

        let server = Server {
            service,
            fifo,
            epfd,
        };

        server.register(server.service.dev().fd(), LISTEN_SOCKET)?;
        server.register(server.fifo.fd(), CONFIG_FIFO)?;

        Ok(server)
    }

    fn register(&self, fd: libc::c_int, token: u64) -> Result<()> {
        let mut event = libc::epoll_event {
            events: libc::EPOLLIN as u32,
            u64: token,
        };

        if unsafe { libc::epoll_ctl(self.epfd, libc::EPOLL_CTL_ADD, fd, &mut event) } == -1 {
            return Err(Error::IO(std::io::Error::last_os_error()));
        }

        Ok(())
    }

    /// Runs the dispatch loop until an unrecoverable error.
    ///
    /// The wait has no timeout; the server sleeps until a frame or a config
    /// write arrives.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let mut events: [libc::epoll_event; 2] = unsafe { std::mem::zeroed() };

            let count = unsafe {
                libc::epoll_wait(
                    self.epfd,
                    events.as_mut_ptr(),
                    events.len() as libc::c_int,
                    -1,
                )
            };

            if count <= 0 {
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() == Some(libc::EINTR) {
                    continue;
                }
                return Err(Error::IO(err));
            }

            for event in &events[.. count as usize] {
                // A pipe with no writer attached reports HUP on every wait;
                // reading it here would spin without ever blocking.
                if event.events == libc::EPOLLHUP as u32 {
                    continue;
                }

                match event.u64 {
                    LISTEN_SOCKET => self.service.recv()?,
                    CONFIG_FIFO => self.reload(),
                    token => unreachable!("readiness for unregistered source {}", token),
                }
            }
        }
    }

    fn reload(&mut self) {
        match self.fifo.read() {
            // The writing end closed with nothing queued; not a reload and
            // not a reason to stop.
            Ok(ref bytes) if bytes.is_empty() => {}
            Ok(bytes) => {
                let updates = self.service.reload(&bytes);
                info!("config reload applied {} update(s).", updates);
            }
            Err(err) => warn!("ConfigFifo::read(...) failed with {:?}.", err),
        };
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.epfd);
        }
    }
}
