//! Interface dispatch binding.
//!
//! Pairs a decoded command with the configuration read from the trigger's
//! interface file and, for `READ_FILE_DATA`, the local result of running
//! the command.  The resulting [`DispatchJob`] is what the transport sends.

use log::debug;

use crate::alp::codec::{ResponseBytes, encode_return_file_data};
use crate::alp::ActionCommand;
use crate::app::ports::StoragePort;
use crate::error::Error;
use crate::fs::header::{AccessLevel, ActionBinding};
use crate::fs::table::FileTable;
use crate::fs::FileId;
use crate::session::InterfaceConfig;

/// One fired action, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchJob {
    /// The file whose mutation fired the action.
    pub origin_file_id: FileId,
    pub command: ActionCommand,
    pub config: InterfaceConfig,
    /// `RETURN_FILE_DATA` produced by executing the command locally.
    pub response: Option<ResponseBytes>,
}

/// Read and parse the interface file.
pub fn load_interface_config<V: StoragePort, P: StoragePort>(
    table: &FileTable<V, P>,
    interface_file_id: FileId,
) -> Result<InterfaceConfig, Error> {
    let raw = table.read_all(interface_file_id)?;
    Ok(InterfaceConfig::decode(&raw)?)
}

/// Run the command against the table and encode its result, if it has one.
pub fn execute<V: StoragePort, P: StoragePort>(
    table: &FileTable<V, P>,
    command: &ActionCommand,
) -> Result<Option<ResponseBytes>, Error> {
    match command {
        ActionCommand::ReadFileData { request, .. } => {
            let data = table.read(
                AccessLevel::Root,
                request.file_id,
                u32::from(request.offset),
                u32::from(request.length),
            )?;
            let response = encode_return_file_data(request.file_id, request.offset, &data)?;
            debug!(
                "actp: read {} bytes of file 0x{:02X} for response",
                data.len(),
                request.file_id
            );
            Ok(Some(response))
        }
        ActionCommand::Other(_) => Ok(None),
    }
}

/// Build the dispatch job for a decoded command.
///
/// Fails with `InvalidInterfaceConfig` before anything is executed when the
/// interface file does not parse.
pub fn bind<V: StoragePort, P: StoragePort>(
    table: &FileTable<V, P>,
    origin_file_id: FileId,
    binding: &ActionBinding,
    command: ActionCommand,
) -> Result<DispatchJob, Error> {
    let config = load_interface_config(table, binding.interface_file_id)?;
    let response = execute(table, &command)?;
    Ok(DispatchJob {
        origin_file_id,
        command,
        config,
        response,
    })
}
