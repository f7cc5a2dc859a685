//! PCAP capture of raw TCNet datagrams for offline inspection
//!
//! Captures use `LINKTYPE_USER0`: each record holds one bare UDP payload
//! starting at the "TCN" signature, with no IP framing. Open the file in
//! Wireshark with the user DLT mapped to a TCNet dissector, or walk the
//! records with any pcap reader.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

const MAGIC: u32 = 0xa1b2_c3d4;
const VERSION: (u16, u16) = (2, 4);
const SNAPLEN: u32 = 65_535;
/// `LINKTYPE_USER0`
const LINKTYPE: u32 = 147;

/// Appends timestamped TCNet datagrams to a PCAP file.
///
/// Clones share the same file; records from concurrent senders and
/// receivers interleave whole, never torn.
#[derive(Clone)]
pub struct DatagramRecorder {
    file: Arc<Mutex<File>>,
}

impl DatagramRecorder {
    /// Start a capture at `path`, truncating any existing file and writing
    /// the PCAP global header.
    pub fn create(path: &Path) -> io::Result<Self> {
        let mut file = File::create(path)?;
        file.write_all(&global_header())?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Append one datagram stamped with the current system time.
    ///
    /// Datagrams longer than the snap length are clipped; TCNet datagrams
    /// never come close to it.
    pub fn record(&self, datagram: &[u8]) -> io::Result<()> {
        let clipped = &datagram[..datagram.len().min(SNAPLEN as usize)];
        let header = record_header(SystemTime::now(), datagram.len(), clipped.len());
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("datagram recorder poisoned"))?;
        file.write_all(&header)?;
        file.write_all(clipped)?;
        file.flush()
    }
}

impl fmt::Debug for DatagramRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatagramRecorder").finish_non_exhaustive()
    }
}

fn global_header() -> [u8; 24] {
    let mut header = [0u8; 24];
    header[0..4].copy_from_slice(&MAGIC.to_le_bytes());
    header[4..6].copy_from_slice(&VERSION.0.to_le_bytes());
    header[6..8].copy_from_slice(&VERSION.1.to_le_bytes());
    // thiszone and sigfigs stay zero
    header[16..20].copy_from_slice(&SNAPLEN.to_le_bytes());
    header[20..24].copy_from_slice(&LINKTYPE.to_le_bytes());
    header
}

fn record_header(timestamp: SystemTime, original_len: usize, captured_len: usize) -> [u8; 16] {
    let since_epoch = timestamp.duration_since(UNIX_EPOCH).unwrap_or_default();
    let secs = since_epoch.as_secs().min(u64::from(u32::MAX)) as u32;
    let original = original_len.min(u32::MAX as usize) as u32;

    let mut header = [0u8; 16];
    header[0..4].copy_from_slice(&secs.to_le_bytes());
    header[4..8].copy_from_slice(&since_epoch.subsec_micros().to_le_bytes());
    header[8..12].copy_from_slice(&(captured_len as u32).to_le_bytes());
    header[12..16].copy_from_slice(&original.to_le_bytes());
    header
}
