use std;

use libc;

use core::dev::Device;
use core::repr::EthernetAddress;
use linux::filter;
use linux::libc as _libc;
use {
    Error,
    Result,
};

/// [AF_PACKET](http://man7.org/linux/man-pages/man7/packet.7.html) socket
/// bound to a single interface for sending and receiving raw ethernet
/// frames.
///
/// Creating one requires elevated privileges. The kernel packet filter is
/// installed before the constructor returns, so the caller can drop those
/// privileges immediately afterwards.
pub struct RawSock {
    fd: libc::c_int,
    ifindex: libc::c_int,
    eth_addr: EthernetAddress,
}

impl RawSock {
    /// Opens a raw socket on the interface with the boot selection filter
    /// installed.
    pub fn new(ifr_name: &str) -> Result<RawSock> {
        let fd = unsafe {
            let fd = libc::socket(
                libc::AF_PACKET,
                libc::SOCK_RAW,
                (_libc::ETH_P_ALL as u16).to_be() as libc::c_int,
            );

            if fd == -1 {
                return Err(Error::IO(std::io::Error::last_os_error()));
            }

            fd
        };

        match Self::setup(fd, ifr_name) {
            Ok((ifindex, eth_addr)) => Ok(RawSock {
                fd,
                ifindex,
                eth_addr,
            }),
            Err(err) => {
                unsafe {
                    libc::close(fd);
                }
                Err(err)
            }
        }
    }

    fn setup(fd: libc::c_int, ifr_name: &str) -> Result<(libc::c_int, EthernetAddress)> {
        unsafe {
            let mut ifreq = _libc::c_ifreq::with_name(ifr_name);

            if libc::ioctl(fd, _libc::SIOCGIFINDEX, &mut ifreq as *mut _libc::c_ifreq) == -1 {
                return Err(Error::IO(std::io::Error::last_os_error()));
            }

            let ifindex = ifreq.ifr_ifru.ifr_ifindex;

            let mut ifreq = _libc::c_ifreq::with_name(ifr_name);

            if libc::ioctl(fd, _libc::SIOCGIFHWADDR, &mut ifreq as *mut _libc::c_ifreq) == -1 {
                return Err(Error::IO(std::io::Error::last_os_error()));
            }

            let c_addr = &ifreq.ifr_ifru.ifr_hwaddr;
            if c_addr.sa_family != _libc::ARPHRD_ETHER {
                return Err(Error::Address);
            }

            let mut addr = [0 as u8; 6];
            for i in 0 .. 6 {
                addr[i] = c_addr.sa_data[i] as u8;
            }

            let mut sll: libc::sockaddr_ll = std::mem::zeroed();
            sll.sll_family = libc::AF_PACKET as libc::c_ushort;
            sll.sll_protocol = (_libc::ETH_P_ALL as u16).to_be();
            sll.sll_ifindex = ifindex;

            if libc::bind(
                fd,
                &sll as *const libc::sockaddr_ll as *const libc::sockaddr,
                std::mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            ) == -1
            {
                return Err(Error::IO(std::io::Error::last_os_error()));
            }

            filter::install(fd)?;

            Ok((ifindex, EthernetAddress::new(addr)))
        }
    }

    /// Returns the raw file descriptor for readiness registration.
    pub fn fd(&self) -> libc::c_int {
        self.fd
    }
}

impl Device for RawSock {
    fn send(&mut self, buffer: &[u8]) -> Result<()> {
        unsafe {
            let mut sll: libc::sockaddr_ll = std::mem::zeroed();
            sll.sll_family = libc::AF_PACKET as libc::c_ushort;
            sll.sll_protocol = (_libc::ETH_P_ALL as u16).to_be();
            sll.sll_ifindex = self.ifindex;
            sll.sll_halen = 6;
            // The frame starts with its destination address.
            for i in 0 .. 6 {
                sll.sll_addr[i] = buffer[i];
            }

            let wrote = libc::sendto(
                self.fd,
                buffer.as_ptr() as *const libc::c_void,
                buffer.len(),
                0,
                &sll as *const libc::sockaddr_ll as *const libc::sockaddr,
                std::mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            );

            if wrote < 0 && _libc::errno() == libc::EAGAIN {
                Err(Error::Busy)
            } else if wrote < 0 {
                Err(Error::IO(std::io::Error::last_os_error()))
            } else {
                Ok(())
            }
        }
    }

    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize> {
        unsafe {
            let read = libc::recv(
                self.fd,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len(),
                libc::MSG_DONTWAIT,
            );

            if read < 0 && _libc::errno() == libc::EAGAIN {
                Err(Error::Nothing)
            } else if read < 0 {
                Err(Error::IO(std::io::Error::last_os_error()))
            } else {
                Ok(read as usize)
            }
        }
    }

    fn ethernet_addr(&self) -> EthernetAddress {
        self.eth_addr
    }
}

impl Drop for RawSock {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}
