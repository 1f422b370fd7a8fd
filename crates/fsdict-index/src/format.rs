//! The bucket index text format.
//!
//! ```text
//! 3\n                 counter (high-water mark of assigned identifiers)
//! 1\n                 entry identifier, unindented
//! \tfirst key\n       key, one tab-indented line per key line
//! 3\n
//! \tmulti\n           a key containing a line terminator
//! \tline key\n
//! ```
//!
//! A line continues the current key if and only if its first byte is a tab.
//! The key is the concatenation of its indented lines with the leading tab
//! removed, minus the final line terminator. Keys are opaque bytes, so this
//! indentation is what lets them contain line terminators.

use std::io::{self, Write};

/// Marks a key continuation line.
pub const TAB: u8 = b'\t';
/// Line terminator.
pub const NEWLINE: u8 = b'\n';

/// One unindented line and the key lines that follow it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// The unindented line, terminator removed.
    pub identifier: Vec<u8>,
    /// The reconstructed key.
    pub key: Vec<u8>,
}

impl Record {
    fn finish(mut identifier: Vec<u8>, mut key: Vec<u8>) -> Self {
        strip_terminator(&mut identifier);
        strip_terminator(&mut key);
        Self { identifier, key }
    }
}

fn strip_terminator(bytes: &mut Vec<u8>) {
    if bytes.last() == Some(&NEWLINE) {
        bytes.pop();
    }
}

/// Split file contents into lines, each keeping its terminator.
pub fn split_lines(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    data.split_inclusive(|b| *b == NEWLINE)
}

/// Group lines into records.
///
/// The first record is the counter line (with an empty key). Lines are
/// expected to carry their trailing terminator.
pub fn structure<I, L>(lines: I) -> Vec<Record>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    let mut records = Vec::new();
    let mut lines = lines.into_iter();
    let Some(first) = lines.next() else {
        return records;
    };

    let mut identifier = first.as_ref().to_vec();
    let mut key = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if line.first() == Some(&TAB) {
            key.extend_from_slice(&line[1..]);
        } else {
            let next = line.to_vec();
            records.push(Record::finish(
                std::mem::replace(&mut identifier, next),
                std::mem::take(&mut key),
            ));
        }
    }
    records.push(Record::finish(identifier, key));

    records
}

/// Write the counter line.
pub fn write_counter<W: Write>(w: &mut W, counter: u64) -> io::Result<()> {
    writeln!(w, "{counter}")
}

/// Write one entry: the identifier line followed by the indented key.
pub fn write_record<W: Write>(w: &mut W, identifier: &str, key: &[u8]) -> io::Result<()> {
    w.write_all(identifier.as_bytes())?;
    w.write_all(&[NEWLINE])?;
    for line in key.split(|b| *b == NEWLINE) {
        w.write_all(&[TAB])?;
        w.write_all(line)?;
        w.write_all(&[NEWLINE])?;
    }
    Ok(())
}
