use core::config;
use core::dev::Device;
use core::repr::{
    eth_types,
    Bootselect,
    Entry,
    EthernetAddress,
    EthernetFrame,
    DATA_FRAME_LEN,
};
use core::table::AddressTable;
use {
    Error,
    Result,
};

/// Policy for requests from hardware addresses with no table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissPolicy {
    /// Log the miss, dump the table and keep serving. This is the normal
    /// operational condition for an unmanaged machine on the segment.
    Diagnose,
    /// Treat the miss as an unrecoverable error.
    Fatal,
}

/// Answers boot selection requests arriving on a device.
///
/// The service exclusively owns the device and the address table; every
/// lookup and mutation happens inside a single dispatch call, so the table
/// is never observed mid-update.
pub struct Service<D>
where
    D: Device,
{
    dev: D,
    table: AddressTable,
    miss_policy: MissPolicy,
}

impl<D> Service<D>
where
    D: Device,
{
    pub fn new(dev: D, miss_policy: MissPolicy) -> Service<D> {
        Service {
            dev,
            table: AddressTable::new(),
            miss_policy,
        }
    }

    pub fn dev(&self) -> &D {
        &self.dev
    }

    pub fn dev_mut(&mut self) -> &mut D {
        &mut self.dev
    }

    pub fn table(&self) -> &AddressTable {
        &self.table
    }

    /// Applies configuration bytes to the address table, returning the
    /// number of updates applied.
    pub fn reload(&mut self, bytes: &[u8]) -> usize {
        config::load(&mut self.table, bytes)
    }

    /// Reads and dispatches exactly one frame from the device.
    ///
    /// An empty read and transient device errors are not failures; the only
    /// error this returns is a lookup miss under MissPolicy::Fatal.
    pub fn recv(&mut self) -> Result<()> {
        let mut recv_buffer = vec![0; DATA_FRAME_LEN];

        match self.dev.recv(recv_buffer.as_mut()) {
            Ok(buffer_len) => self.recv_ethernet(&recv_buffer[.. buffer_len]),
            Err(Error::Nothing) => Ok(()),
            Err(err) => {
                warn!("Device::recv(...) failed with {:?}.", err);
                Ok(())
            }
        }
    }

    fn recv_ethernet(&mut self, eth_buffer: &[u8]) -> Result<()> {
        let (requester, entry) = match EthernetFrame::try_new(eth_buffer) {
            Ok(eth_frame) => {
                // The kernel filter matches type and length only; a unicast
                // destination here is one of our own replies echoed back, not
                // a fresh request. Dropped without a diagnostic.
                if eth_frame.dst_addr() != EthernetAddress::BROADCAST {
                    return Ok(());
                }
                if eth_frame.payload_type() != eth_types::BOOTSELECT {
                    return Ok(());
                }

                let requester = eth_frame.src_addr();
                info!("received request from {}.", requester);

                match self.table.lookup(requester) {
                    Some(entry) => (requester, *entry),
                    None => return self.recv_miss(requester),
                }
            }
            Err(err) => {
                debug!(
                    "EthernetFrame::try_new(...) failed on {:?} with {:?}.",
                    eth_buffer, err
                );
                return Ok(());
            }
        };

        self.send_data(requester, entry);
        Ok(())
    }

    fn recv_miss(&mut self, requester: EthernetAddress) -> Result<()> {
        match self.miss_policy {
            MissPolicy::Diagnose => {
                warn!("no entry for {}; table holds:", requester);
                for &(addr, ref entry) in self.table.iter() {
                    warn!("  {} {}", addr, entry);
                }
                Ok(())
            }
            MissPolicy::Fatal => Err(Error::Address),
        }
    }

    fn send_data(&mut self, dst_addr: EthernetAddress, entry: Entry) {
        let repr = Bootselect::Data { entry };
        let frame_len = EthernetFrame::<&[u8]>::buffer_len(repr.buffer_len());
        let mut buffer = vec![0; frame_len];

        {
            let mut eth_frame = EthernetFrame::try_new(&mut buffer[..]).unwrap();
            eth_frame.set_dst_addr(dst_addr);
            eth_frame.set_src_addr(self.dev.ethernet_addr());
            eth_frame.set_payload_type(eth_types::BOOTSELECT);
            repr.serialize(eth_frame.payload_mut()).unwrap();
        }

        match self.dev.send(buffer.as_ref()) {
            Ok(()) => info!("sent default {} to {}.", entry, dst_addr),
            Err(err) => warn!("Device::send(...) failed with {:?}.", err),
        };
    }
}
