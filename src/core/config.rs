//! Parsing of `AA:BB:CC:DD:EE:FF entry` configuration lines.
//!
//! The same parser serves the one-shot startup file and the live reload
//! pipe; both hand their bytes here whole and receive zero or more table
//! updates. Reloads are purely additive, a reload can add or overwrite
//! mappings but never remove one.

use core::repr::{
    Entry,
    EthernetAddress,
};
use core::table::AddressTable;
use {
    Error,
    Result,
};

/// Applies newline delimited configuration lines to a table, skipping
/// malformed lines with a diagnostic.
///
/// Returns the number of updates applied.
pub fn load(table: &mut AddressTable, bytes: &[u8]) -> usize {
    let text = String::from_utf8_lossy(bytes);
    let mut updates = 0;

    for line in text.lines() {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok((addr, entry)) => {
                table.upsert(addr, entry);
                updates += 1;
            }
            Err(err) => warn!("skipping malformed config line {:?}: {:?}", line, err),
        }
    }

    updates
}

fn parse_line(line: &str) -> Result<(EthernetAddress, Entry)> {
    let mut tokens = line.split_whitespace();

    let addr = tokens
        .next()
        .ok_or(Error::Malformed)?
        .parse::<EthernetAddress>()
        .map_err(|_| Error::Address)?;

    let entry = Entry::try_new(tokens.next().ok_or(Error::Malformed)?.as_bytes())?;

    if tokens.next().is_some() {
        return Err(Error::Malformed);
    }

    Ok((addr, entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(bytes: [u8; 6]) -> EthernetAddress {
        EthernetAddress::new(bytes)
    }

    fn entry(text: &str) -> Entry {
        Entry::try_new(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_well_formed_lines() {
        let mut table = AddressTable::new();

        let updates = load(
            &mut table,
            b"AA:BB:CC:DD:EE:FF menu1\n00:11:22:33:44:55 menu2\n",
        );

        assert_eq!(updates, 2);
        assert_eq!(
            table.lookup(eth([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF])).unwrap(),
            &entry("menu1")
        );
        assert_eq!(
            table.lookup(eth([0x00, 0x11, 0x22, 0x33, 0x44, 0x55])).unwrap(),
            &entry("menu2")
        );
    }

    #[test]
    fn test_load_skips_malformed_line() {
        let mut table = AddressTable::new();

        let updates = load(
            &mut table,
            b"AA:BB:CC:DD:EE:FF menu1\nnot-a-mac menu2\n00:11:22:33:44:55 menu3\n",
        );

        assert_eq!(updates, 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_load_skips_line_without_entry() {
        let mut table = AddressTable::new();
        assert_eq!(load(&mut table, b"AA:BB:CC:DD:EE:FF\n"), 0);
    }

    #[test]
    fn test_load_skips_line_with_trailing_tokens() {
        let mut table = AddressTable::new();
        assert_eq!(load(&mut table, b"AA:BB:CC:DD:EE:FF menu1 menu2\n"), 0);
    }

    #[test]
    fn test_load_skips_oversized_entry() {
        let mut table = AddressTable::new();

        let mut line = b"AA:BB:CC:DD:EE:FF ".to_vec();
        line.extend(vec![b'a'; Entry::MAX_LEN + 1]);

        assert_eq!(load(&mut table, &line), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_ignores_blank_lines() {
        let mut table = AddressTable::new();
        assert_eq!(load(&mut table, b"\n\nAA:BB:CC:DD:EE:FF menu1\n\n"), 1);
    }

    #[test]
    fn test_reload_overwrites_existing_mapping() {
        let mut table = AddressTable::new();

        load(&mut table, b"AA:BB:CC:DD:EE:FF menu1\n");
        load(&mut table, b"AA:BB:CC:DD:EE:FF menu2\n");

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup(eth([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF])).unwrap(),
            &entry("menu2")
        );
    }
}
