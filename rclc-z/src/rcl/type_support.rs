use std::fmt::Display;

use serde::{Serialize, de::DeserializeOwned};

use crate::ret::Result;

/// RIHS01 type description hash.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct TypeHash {
    pub version: u8,
    pub value: [u8; 32],
}

impl TypeHash {
    pub const fn zero() -> Self {
        Self {
            version: 1,
            value: [0; 32],
        }
    }

    pub fn from_rihs_string(rihs: &str) -> Option<Self> {
        let hex = rihs.strip_prefix("RIHS01_")?;
        if hex.len() != 64 || !hex.is_ascii() {
            return None;
        }
        let mut value = [0u8; 32];
        for (byte, chunk) in value.iter_mut().zip(hex.as_bytes().chunks(2)) {
            let digits = std::str::from_utf8(chunk).ok()?;
            *byte = u8::from_str_radix(digits, 16).ok()?;
        }
        Some(Self { version: 1, value })
    }

    pub fn to_rihs_string(&self) -> String {
        let hex: String = self.value.iter().map(|b| format!("{b:02x}")).collect();
        format!("RIHS{:02}_{hex}", self.version)
    }
}

impl Display for TypeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rihs_string())
    }
}

/// Message types that know their wire name and hash.
pub trait MessageTypeInfo {
    /// Fully qualified DDS name, e.g. `std_msgs::msg::dds_::String_`.
    fn type_name() -> &'static str;

    fn type_hash() -> TypeHash {
        TypeHash::zero()
    }
}

/// Type description handed to publisher and subscription constructors.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct TypeSupport {
    pub name: String,
    pub hash: TypeHash,
}

impl TypeSupport {
    pub fn new(name: impl Into<String>, hash: TypeHash) -> Self {
        Self {
            name: name.into(),
            hash,
        }
    }

    pub fn of<M: MessageTypeInfo>() -> Self {
        Self::new(M::type_name(), M::type_hash())
    }
}

impl Display for TypeSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.hash)
    }
}

/// CDR encoding with the little endian encapsulation header.
pub fn serialize<M: Serialize>(msg: &M) -> Result<Vec<u8>> {
    Ok(cdr::serialize::<_, _, cdr::CdrLe>(msg, cdr::Infinite)?)
}

pub fn deserialize<M: DeserializeOwned>(bytes: &[u8]) -> Result<M> {
    Ok(cdr::deserialize(bytes)?)
}
