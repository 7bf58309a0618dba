//! Byte codec for [`ActionCommand`]s and the `RETURN_FILE_DATA` response.
//!
//! ```text
//! READ_FILE_DATA     ┌──────┬─────────┬────────┬────────┐
//!                    │ ctrl │ file id │ offset │ length │
//!                    └──────┴─────────┴────────┴────────┘
//! RETURN_FILE_DATA   ┌──────┬─────────┬────────┬────────┬──────────────┐
//!                    │ 0x20 │ file id │ offset │ length │ data (len B) │
//!                    └──────┴─────────┴────────┴────────┴──────────────┘
//! ```
//! Encoding is the exact inverse of decoding: `decode(encode(c)) == c`.

use crate::error::CodecError;
use crate::fs::{FileId, MAX_FILE_SIZE};

use super::{
    ActionCommand, AlpControl, CommandBytes, FileDataRequest, MAX_COMMAND_LEN, OP_READ_FILE_DATA,
    OP_RETURN_FILE_DATA,
};

/// Control byte plus the three operand bytes.
const READ_FILE_DATA_LEN: usize = 4;

/// Response header: control, file id, offset, length.
const RETURN_HEADER_LEN: usize = 4;

/// Largest encoded `RETURN_FILE_DATA` response.
pub const MAX_RESPONSE_LEN: usize = RETURN_HEADER_LEN + MAX_FILE_SIZE;

/// Encoded response bytes.
pub type ResponseBytes = heapless::Vec<u8, MAX_RESPONSE_LEN>;

pub fn decode(bytes: &[u8]) -> Result<ActionCommand, CodecError> {
    let Some(&ctrl) = bytes.first() else {
        return Err(CodecError::TruncatedCommand);
    };
    if bytes.len() > MAX_COMMAND_LEN {
        return Err(CodecError::CommandTooLong);
    }

    let control = AlpControl::from_byte(ctrl);
    if control.op != OP_READ_FILE_DATA {
        let raw = CommandBytes::from_slice(bytes).map_err(|()| CodecError::CommandTooLong)?;
        return Ok(ActionCommand::Other(raw));
    }

    match bytes.len() {
        n if n < READ_FILE_DATA_LEN => Err(CodecError::TruncatedCommand),
        READ_FILE_DATA_LEN => Ok(ActionCommand::ReadFileData {
            control,
            request: FileDataRequest {
                file_id: bytes[1],
                offset: bytes[2],
                length: bytes[3],
            },
        }),
        _ => Err(CodecError::TrailingBytes),
    }
}

pub fn encode(command: &ActionCommand) -> CommandBytes {
    match command {
        ActionCommand::ReadFileData { control, request } => {
            let mut out = CommandBytes::new();
            // Four bytes always fit MAX_COMMAND_LEN.
            let _ = out.extend_from_slice(&[
                control.to_byte(),
                request.file_id,
                request.offset,
                request.length,
            ]);
            out
        }
        ActionCommand::Other(raw) => raw.clone(),
    }
}

/// Build the `RETURN_FILE_DATA` response for data read at `offset` of `file_id`.
pub fn encode_return_file_data(
    file_id: FileId,
    offset: u8,
    data: &[u8],
) -> Result<ResponseBytes, CodecError> {
    let mut out = ResponseBytes::new();
    out.extend_from_slice(&[OP_RETURN_FILE_DATA, file_id, offset, data.len() as u8])
        .and_then(|()| out.extend_from_slice(data))
        .map_err(|()| CodecError::CommandTooLong)?;
    Ok(out)
}
