//! Linux specific plumbing: the raw socket, kernel packet filter,
//! configuration pipe, privilege drop and the epoll dispatch loop.

pub mod dev;
pub mod fifo;
pub mod filter;
pub mod libc;
pub mod server;
pub mod user;
