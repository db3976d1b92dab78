use bytemuck::pod_read_unaligned;
use bytemuck::{Pod, Zeroable};
use std::io::{self, ErrorKind, Read, Write};
use std::mem;
use tracing::warn;

/// Co-occurrence record struct. `repr(C)` and `Pod` ensure the memory layout
/// is identical to the C struct, allowing us to read the binary file directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Crec {
    pub word1: i32,
    pub word2: i32,
    pub val: f64,
}

impl Crec {
    /// Size of one record on disk, in bytes.
    pub const SIZE: usize = mem::size_of::<Crec>();

    /// Reads one record in host byte order.
    /// - `Ok(Some(crec))`: Success.
    /// - `Ok(None)`: End-Of-File, clean or after a truncated trailing record.
    /// - `Err(e)`: An I/O error occurred.
    ///
    /// A truncated record at the end of the stream is dropped, never returned
    /// half-filled.
    pub fn read_from_raw<R: Read>(reader: &mut R) -> io::Result<Option<Self>> {
        let mut buffer = [0u8; Crec::SIZE];
        let mut filled = 0;
        while filled < Crec::SIZE {
            match reader.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        match filled {
            0 => Ok(None),
            Crec::SIZE => Ok(Some(pod_read_unaligned(&buffer))),
            partial => {
                warn!(bytes = partial, "discarding truncated trailing record");
                Ok(None)
            }
        }
    }

    /// Writes a single Crec record to a writer.
    pub fn write_to_raw<W: Write>(writer: &mut W, crec: &Crec) -> io::Result<()> {
        writer.write_all(bytemuck::bytes_of(crec))
    }

    /// Writes a slice of Crec records to a writer in a single, efficient operation.
    pub fn write_slice_raw<W: Write>(writer: &mut W, crecs: &[Crec]) -> io::Result<()> {
        writer.write_all(bytemuck::cast_slice(crecs))
    }
}
