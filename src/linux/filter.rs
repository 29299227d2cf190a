//! Kernel packet filter setup for the listening socket.
//!
//! A raw socket bound to all protocols sees every frame on the interface;
//! the filter installed here narrows that to boot selection frames before
//! they ever reach user space.

use std;

use libc;

use core::repr::{
    eth_types,
    DATA_FRAME_LEN,
};
use {
    Error,
    Result,
};

// Classic BPF opcode fields, absent from the libc crate.
const BPF_LD: u16 = 0x00;
const BPF_H: u16 = 0x08;
const BPF_ABS: u16 = 0x20;
const BPF_JMP: u16 = 0x05;
const BPF_JEQ: u16 = 0x10;
const BPF_K: u16 = 0x00;
const BPF_RET: u16 = 0x06;

/// Byte offset of the ethertype field in an Ethernet header.
const ETHERTYPE_OFF: u32 = 12;

fn stmt(code: u16, k: u32) -> libc::sock_filter {
    libc::sock_filter {
        code,
        jt: 0,
        jf: 0,
        k,
    }
}

fn jump(code: u16, k: u32, jt: u8, jf: u8) -> libc::sock_filter {
    libc::sock_filter { code, jt, jf, k }
}

/// Accepts boot selection frames truncated to the larger of the two wire
/// frame sizes, and nothing else.
fn bootselect_program() -> [libc::sock_filter; 4] {
    [
        stmt(BPF_LD | BPF_H | BPF_ABS, ETHERTYPE_OFF),
        jump(
            BPF_JMP | BPF_JEQ | BPF_K,
            eth_types::BOOTSELECT as u32,
            0,
            1,
        ),
        stmt(BPF_RET | BPF_K, DATA_FRAME_LEN as u32),
        stmt(BPF_RET | BPF_K, 0),
    ]
}

fn reject_all_program() -> [libc::sock_filter; 1] {
    [stmt(BPF_RET | BPF_K, 0)]
}

fn attach(fd: libc::c_int, program: &[libc::sock_filter]) -> Result<()> {
    let fprog = libc::sock_fprog {
        len: program.len() as libc::c_ushort,
        filter: program.as_ptr() as *mut libc::sock_filter,
    };

    let rc = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_ATTACH_FILTER,
            &fprog as *const libc::sock_fprog as *const libc::c_void,
            std::mem::size_of::<libc::sock_fprog>() as libc::socklen_t,
        )
    };

    if rc == -1 {
        return Err(Error::IO(std::io::Error::last_os_error()));
    }

    Ok(())
}

/// Reads and discards everything currently queued on the socket.
fn drain(fd: libc::c_int) {
    let mut drain = [0 as u8; 1];

    loop {
        let read = unsafe {
            libc::recv(
                fd,
                drain.as_mut_ptr() as *mut libc::c_void,
                drain.len(),
                libc::MSG_DONTWAIT,
            )
        };

        if read == -1 {
            break;
        }
    }
}

/// Installs the boot selection filter on a raw socket.
///
/// A reject-everything program goes in first and the socket is drained under
/// it, so frames queued before any filter existed never reach the dispatch
/// loop. Any failure here must abort startup; an unfiltered raw socket would
/// flood the process with unrelated traffic.
pub fn install(fd: libc::c_int) -> Result<()> {
    attach(fd, &reject_all_program())?;
    drain(fd);
    attach(fd, &bootselect_program())
}
