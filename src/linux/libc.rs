use libc;

pub const ETH_P_ALL: libc::c_int = 0x0003;

pub const ARPHRD_ETHER: libc::c_ushort = 1;

pub const SIOCGIFINDEX: libc::c_ulong = 0x8933;

pub const SIOCGIFHWADDR: libc::c_ulong = 0x8927;

#[repr(C)]
#[derive(Clone, Copy)]
pub union c_ifr_ifru {
    pub ifr_hwaddr: libc::sockaddr,
    pub ifr_flags: libc::c_short,
    pub ifr_ifindex: libc::c_int,
    pub ifr_mtu: libc::c_int,
}

#[repr(C)]
#[derive(Clone, Copy)]
/// [https://linux.die.net/man/7/netdevice](https://linux.die.net/man/7/netdevice)
pub struct c_ifreq {
    pub ifr_name: [libc::c_char; libc::IF_NAMESIZE],
    pub ifr_ifru: c_ifr_ifru,
}

impl c_ifreq {
    pub fn with_name(ifr_name: &str) -> c_ifreq {
        assert!(ifr_name.len() < libc::IF_NAMESIZE);

        let mut ifreq = c_ifreq {
            ifr_name: [0; libc::IF_NAMESIZE],
            ifr_ifru: c_ifr_ifru { ifr_ifindex: 0 },
        };

        for (i, c) in ifr_name.as_bytes().iter().enumerate() {
            ifreq.ifr_name[i] = *c as libc::c_char;
        }

        ifreq
    }
}

pub fn errno() -> libc::c_int {
    unsafe { *libc::__errno_location() }
}
