use std::slice;

use core::repr::{
    Entry,
    EthernetAddress,
};

/// Maintains the hardware address -> default entry mappings for the machines
/// this server answers for.
///
/// Entries are only ever added or overwritten, never removed; the table is
/// rebuilt incrementally from configuration reloads for the lifetime of the
/// process. The table is small (one row per managed machine) so lookups are
/// a linear scan.
pub struct AddressTable {
    entries: Vec<(EthernetAddress, Entry)>,
}

impl AddressTable {
    /// Creates an empty table.
    pub fn new() -> AddressTable {
        AddressTable {
            entries: Vec::new(),
        }
    }

    /// Looks up the default entry for a hardware address.
    pub fn lookup(&self, addr: EthernetAddress) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|&&(entry_addr, _)| entry_addr == addr)
            .map(|&(_, ref entry)| entry)
    }

    /// Creates or overwrites the default entry for a hardware address.
    ///
    /// A table never holds more than one row per address.
    pub fn upsert(&mut self, addr: EthernetAddress, entry: Entry) {
        for &mut (entry_addr, ref mut existing) in &mut self.entries {
            if entry_addr == addr {
                *existing = entry;
                return;
            }
        }

        self.entries.push((addr, entry));
    }

    /// Iterates over all rows in insertion order, for diagnostic dumps.
    pub fn iter(&self) -> slice::Iter<(EthernetAddress, Entry)> {
        self.entries.iter()
    }

    /// Returns the number of rows in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(i: u8) -> EthernetAddress {
        EthernetAddress::new([0, 0, 0, 0, 0, i])
    }

    fn entry(text: &str) -> Entry {
        Entry::try_new(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_lookup_with_no_mapping() {
        let table = AddressTable::new();
        assert_matches!(table.lookup(eth(0)), None);
    }

    #[test]
    fn test_lookup_with_mapping() {
        let mut table = AddressTable::new();

        table.upsert(eth(0), entry("menu1"));
        assert_eq!(table.lookup(eth(0)).unwrap(), &entry("menu1"));
    }

    #[test]
    fn test_upsert_overwrites_in_place() {
        let mut table = AddressTable::new();

        table.upsert(eth(0), entry("menu1"));
        table.upsert(eth(0), entry("menu2"));

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(eth(0)).unwrap(), &entry("menu2"));
    }

    #[test]
    fn test_upsert_does_not_touch_other_rows() {
        let mut table = AddressTable::new();

        table.upsert(eth(0), entry("menu1"));
        table.upsert(eth(1), entry("menu2"));
        table.upsert(eth(0), entry("menu3"));

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(eth(1)).unwrap(), &entry("menu2"));
    }

    #[test]
    fn test_iter_in_insertion_order() {
        let mut table = AddressTable::new();

        table.upsert(eth(2), entry("menu1"));
        table.upsert(eth(0), entry("menu2"));
        table.upsert(eth(1), entry("menu3"));

        let addrs: Vec<_> = table.iter().map(|&(addr, _)| addr).collect();
        assert_eq!(addrs, vec![eth(2), eth(0), eth(1)]);
    }
}
