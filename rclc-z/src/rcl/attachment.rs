//! Metadata riding along with every published sample.
//!
//! Wire layout, in order: sequence number (`i64`), source timestamp in
//! nanoseconds since the Unix epoch (`i64`), publisher GID (16 bytes).

use std::time::{SystemTime, UNIX_EPOCH};

use zenoh::bytes::ZBytes;
use zenoh_ext::{ZDeserializer, ZSerializer};

pub type GidArray = [u8; 16];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub sequence_number: i64,
    pub source_timestamp: i64,
    pub source_gid: GidArray,
}

impl Attachment {
    /// Stamp a sample from `gid` with the current system time.
    pub fn stamped(sequence_number: i64, gid: GidArray) -> Self {
        let source_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as i64);
        Self {
            sequence_number,
            source_timestamp,
            source_gid: gid,
        }
    }
}

impl TryFrom<&ZBytes> for Attachment {
    type Error = zenoh::Error;

    fn try_from(bytes: &ZBytes) -> Result<Self, Self::Error> {
        let mut reader = ZDeserializer::new(bytes);
        let sequence_number: i64 = reader.deserialize()?;
        let source_timestamp: i64 = reader.deserialize()?;
        let source_gid: GidArray = reader.deserialize()?;
        if !reader.done() {
            return Err("trailing bytes after attachment".into());
        }
        Ok(Self {
            sequence_number,
            source_timestamp,
            source_gid,
        })
    }
}

impl From<Attachment> for ZBytes {
    fn from(att: Attachment) -> Self {
        let mut writer = ZSerializer::new();
        writer.serialize(att.sequence_number);
        writer.serialize(att.source_timestamp);
        writer.serialize(&att.source_gid);
        writer.finish()
    }
}
