//! Interface configuration stored in interface files.
//!
//! Wire format (13 bytes, D7ASP master session configuration):
//! ```text
//! ┌──────┬─────┬─────────────────┬───────────┬──────────────┬──────────┐
//! │ 0xD7 │ QoS │ dormant timeout │ addr ctrl │ access class │ id (8 B) │
//! └──────┴─────┴─────────────────┴───────────┴──────────────┴──────────┘
//!
//! QoS       = resp_mode[2:0] | retry_mode[5:3] | stop_on_error[6] | record[7]
//! addr ctrl = nls_method[3:0] | id_type[5:4] | rfu[7:6] (must be zero)
//! ```
//!
//! The action engine treats the config as opaque beyond parsing it; the
//! transport interprets the fields.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Interface id byte tagging a D7ASP session configuration.
pub const ITF_ID_D7ASP: u8 = 0xD7;

/// Encoded size of a D7ASP interface config.
pub const D7ASP_CONFIG_LEN: usize = 13;

// ───────────────────────────────────────────────────────────────
// QoS
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RespMode {
    /// No acknowledgement requested.
    No = 0,
    All = 1,
    Any = 2,
    NoRepeat = 4,
    OnError = 5,
    Preferred = 6,
}

impl RespMode {
    fn from_bits(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::No),
            1 => Some(Self::All),
            2 => Some(Self::Any),
            4 => Some(Self::NoRepeat),
            5 => Some(Self::OnError),
            6 => Some(Self::Preferred),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RetryMode {
    /// Single attempt; the only mode the session layer defines.
    No = 0,
}

impl RetryMode {
    fn from_bits(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qos {
    pub resp_mode: RespMode,
    pub retry_mode: RetryMode,
    pub stop_on_error: bool,
    pub record: bool,
}

impl Qos {
    fn to_byte(self) -> u8 {
        (self.resp_mode as u8)
            | ((self.retry_mode as u8) << 3)
            | (u8::from(self.stop_on_error) << 6)
            | (u8::from(self.record) << 7)
    }

    fn from_byte(raw: u8) -> Option<Self> {
        Some(Self {
            resp_mode: RespMode::from_bits(raw & 0x07)?,
            retry_mode: RetryMode::from_bits((raw >> 3) & 0x07)?,
            stop_on_error: raw & (1 << 6) != 0,
            record: raw & (1 << 7) != 0,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Addressee
// ───────────────────────────────────────────────────────────────

/// Network-layer security method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum NlsMethod {
    None = 0,
    AesCtr = 1,
    AesCbcMac128 = 2,
    AesCbcMac64 = 3,
    AesCbcMac32 = 4,
    AesCcm128 = 5,
    AesCcm64 = 6,
    AesCcm32 = 7,
}

impl NlsMethod {
    fn from_bits(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::None),
            1 => Some(Self::AesCtr),
            2 => Some(Self::AesCbcMac128),
            3 => Some(Self::AesCbcMac64),
            4 => Some(Self::AesCbcMac32),
            5 => Some(Self::AesCcm128),
            6 => Some(Self::AesCcm64),
            7 => Some(Self::AesCcm32),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum IdType {
    /// Broadcast with an estimate of the number of responders.
    NbId = 0,
    /// Broadcast, no identifier.
    NoId = 1,
    /// Unique 64-bit identifier.
    Uid = 2,
    /// Virtual 16-bit identifier.
    Vid = 3,
}

impl IdType {
    fn from_bits(raw: u8) -> Self {
        match raw & 0x03 {
            0 => Self::NbId,
            1 => Self::NoId,
            2 => Self::Uid,
            _ => Self::Vid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addressee {
    pub nls_method: NlsMethod,
    pub id_type: IdType,
    pub access_class: u8,
    pub id: [u8; 8],
}

// ───────────────────────────────────────────────────────────────
// Session config
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub qos: Qos,
    pub dormant_timeout: u8,
    pub addressee: Addressee,
}

impl Default for SessionConfig {
    /// Unacknowledged broadcast on access class 0x01.
    fn default() -> Self {
        Self {
            qos: Qos {
                resp_mode: RespMode::No,
                retry_mode: RetryMode::No,
                stop_on_error: false,
                record: false,
            },
            dormant_timeout: 0,
            addressee: Addressee {
                nls_method: NlsMethod::None,
                id_type: IdType::NoId,
                access_class: 0x01,
                id: [0; 8],
            },
        }
    }
}

/// Configuration of the interface a fired action is dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceConfig {
    D7asp(SessionConfig),
}

impl InterfaceConfig {
    pub fn encode(&self) -> [u8; D7ASP_CONFIG_LEN] {
        let Self::D7asp(cfg) = self;
        let mut out = [0u8; D7ASP_CONFIG_LEN];
        out[0] = ITF_ID_D7ASP;
        out[1] = cfg.qos.to_byte();
        out[2] = cfg.dormant_timeout;
        out[3] = (cfg.addressee.nls_method as u8) | ((cfg.addressee.id_type as u8) << 4);
        out[4] = cfg.addressee.access_class;
        out[5..].copy_from_slice(&cfg.addressee.id);
        out
    }

    /// Parse an interface file.  Anything but an exact, well-formed D7ASP
    /// config is rejected with [`CodecError::InvalidInterfaceConfig`].
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let invalid = CodecError::InvalidInterfaceConfig;
        if bytes.len() != D7ASP_CONFIG_LEN || bytes[0] != ITF_ID_D7ASP {
            return Err(invalid);
        }
        let qos = Qos::from_byte(bytes[1]).ok_or(invalid)?;
        let ctrl = bytes[3];
        if ctrl & 0xC0 != 0 {
            return Err(invalid);
        }
        let nls_method = NlsMethod::from_bits(ctrl & 0x0F).ok_or(invalid)?;
        let mut id = [0u8; 8];
        id.copy_from_slice(&bytes[5..]);

        Ok(Self::D7asp(SessionConfig {
            qos,
            dormant_timeout: bytes[2],
            addressee: Addressee {
                nls_method,
                id_type: IdType::from_bits(ctrl >> 4),
                access_class: bytes[4],
                id,
            },
        }))
    }
}
