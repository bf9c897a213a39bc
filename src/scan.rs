//! Heuristic filename recovery from unstructured files
//!
//! Script sources, data tables and even native libraries embed resource
//! filenames behind short tag sequences. There is no framing to trust, so
//! the scan walks the whole byte stream one position at a time and tries the
//! three known tags at each offset. Coincidental matches inside unrelated
//! binary data are expected; whatever string comes out is handed to the
//! resolver, and names that never materialize on disk surface later in the
//! missing-resource report instead of being filtered here.

/// Length-prefixed filename tag, as in the dictionary format.
const DATA_TAG: &[u8; 4] = b"DFNM";
/// Null-terminated filename tag found in native binaries.
const EXE_TAG: &[u8; 4] = b"EFNM";
/// Line-terminated filename tag found in text scripts.
const TEXT_TAG: &[u8; 4] = b"TFNM";

/// Longest name the bounded tag forms accept; a longer length field marks a
/// false positive.
const MAX_NAME: usize = 254;

/// Collect candidate filenames from raw bytes, in discovery order.
pub fn scan_bytes(data: &[u8]) -> Vec<String> {
    let mut found = Vec::new();
    let mut pos = 0;

    while pos + 4 <= data.len() {
        let tag = &data[pos..pos + 4];

        if tag == DATA_TAG {
            if let Some((name, next)) = read_prefixed(data, pos + 4) {
                push_name(&mut found, name);
                pos = next;
                continue;
            }
        } else if tag == EXE_TAG {
            let start = pos + 4;
            let end = data[start..]
                .iter()
                .position(|&b| b == 0)
                .map_or(data.len(), |i| start + i);
            push_name(&mut found, &data[start..end]);
            pos = (end + 1).min(data.len());
            continue;
        } else if tag == TEXT_TAG {
            let start = pos + 5;
            if start <= data.len() {
                let mut end = start;
                while end < data.len()
                    && end - start < MAX_NAME
                    && !matches!(data[end], b'\n' | b'\r' | 0)
                {
                    end += 1;
                }
                push_name(&mut found, &data[start..end]);
                pos = end;
                continue;
            }
        }

        pos += 1;
    }

    found
}

/// Length-prefixed read for the data tag. `None` marks a false positive:
/// either the length field fails the sanity bound or the name would run past
/// the end of the data.
fn read_prefixed(data: &[u8], at: usize) -> Option<(&[u8], usize)> {
    let len_bytes = data.get(at..at + 4)?;
    let len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
    if len >= MAX_NAME {
        return None;
    }
    let name = data.get(at + 4..at + 4 + len)?;
    Some((name, at + 4 + len))
}

fn push_name(found: &mut Vec<String>, bytes: &[u8]) {
    if !bytes.is_empty() {
        found.push(String::from_utf8_lossy(bytes).into_owned());
    }
}

/// Scan start offset for a native-library source.
///
/// Filenames never live in the code section, so scanning starts past the end
/// of the image's first section as recorded in the PE section table. Any
/// surprise in the headers, or a table with no second section, falls back to
/// scanning from byte 0.
pub fn native_scan_start(data: &[u8]) -> usize {
    match first_section_end(data) {
        Some(end) if end < data.len() => end,
        _ => 0,
    }
}

fn first_section_end(data: &[u8]) -> Option<usize> {
    if data.get(..2)? != b"MZ" {
        return None;
    }
    let pe_offset = u32_at(data, 0x3C)? as usize;
    if data.get(pe_offset..pe_offset + 4)? != b"PE\0\0" {
        return None;
    }

    let coff = pe_offset + 4;
    let section_count = u16_at(data, coff + 2)? as usize;
    if section_count < 2 {
        return None;
    }
    let optional_header_size = u16_at(data, coff + 16)? as usize;

    // first entry of the section table: raw size at +16, raw offset at +20
    let section = coff + 20 + optional_header_size;
    let raw_size = u32_at(data, section + 16)? as usize;
    let raw_offset = u32_at(data, section + 20)? as usize;
    raw_offset.checked_add(raw_size)
}

fn u16_at(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn u32_at(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
