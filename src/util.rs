use crate::boxes::is_print;
use std::fmt::Write;
use std::path::Path;

/// Read a whole file into memory; the views borrow from the returned buffer.
pub fn load_file(path: impl AsRef<Path>) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}

/// Classic 16-bytes-per-row hex dump. `start_offset` labels the first row.
pub fn hex_dump(bytes: &[u8], start_offset: u64) -> String {
    let mut out = String::new();
    for (i, chunk) in bytes.chunks(16).enumerate() {
        let offs = start_offset + (i as u64) * 16;
        let hexs: String = chunk.iter().map(|b| format!("{b:02x} ")).collect();
        let ascii: String = chunk
            .iter()
            .map(|&c| if is_print(c) { c as char } else { '.' })
            .collect();
        let _ = writeln!(out, "{offs:08x}  {hexs:<48}  |{ascii}|");
    }
    out
}
