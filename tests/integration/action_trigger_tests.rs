//! Integration tests for write → trigger → dispatch through `FileSystem`.

use crate::mock_ports::{MockStorage, RecordingTransport, VecSink};

use d7node::actp::TriggerState;
use d7node::adapters::ram::RamStorage;
use d7node::alp::{self, ActionCommand, OP_READ_FILE_DATA, OP_WRITE_FILE_DATA};
use d7node::app::events::NodeEvent;
use d7node::error::{CodecError, Error, FsError, TransportError};
use d7node::fs::{FileSystem, MAX_FILE_SIZE};
use d7node::fs::header::{ActionBinding, ActionCondition, FileHeader, StorageClass};
use d7node::session::{InterfaceConfig, SessionConfig};

const SENSOR: u8 = 0x40;
const CMD: u8 = 0x41;
const ITF: u8 = 0x42;

fn sensor_header() -> FileHeader {
    FileHeader::new(StorageClass::Volatile, 2).with_action(ActionBinding {
        condition: ActionCondition::Write,
        alp_cmd_file_id: CMD,
        interface_file_id: ITF,
    })
}

/// 0x40 sensor (action on write) → 0x41 `READ_FILE_DATA 0x40,0,2` → 0x42 no-ack session.
fn scenario() -> FileSystem<RamStorage, RamStorage> {
    let mut fs = FileSystem::new(RamStorage::new(), RamStorage::new());
    let command = [OP_READ_FILE_DATA, SENSOR, 0, 2];
    fs.init_file(CMD, FileHeader::new(StorageClass::Permanent, 4), &command)
        .unwrap();
    fs.init_file_with_interface_config(ITF, &InterfaceConfig::D7asp(SessionConfig::default()))
        .unwrap();
    fs.init_file(SENSOR, sensor_header(), &[]).unwrap();
    fs
}

// ── Reference scenario ────────────────────────────────────────

#[test]
fn sensor_write_dispatches_stored_command_once() {
    let mut fs = scenario();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    fs.write_file(SENSOR, 0, &[0x00, 0x0A], &mut tx, &mut sink).unwrap();

    assert_eq!(fs.header_of(SENSOR).unwrap().length, 2);
    assert_eq!(tx.jobs.len(), 1, "exactly one submission per write");

    let job = &tx.jobs[0];
    assert_eq!(job.origin_file_id, SENSOR);
    assert_eq!(job.command, ActionCommand::read_file_data(SENSOR, 0, 2));
    assert_eq!(&alp::encode(&job.command)[..], &[OP_READ_FILE_DATA, SENSOR, 0, 2]);
    assert_eq!(job.config, InterfaceConfig::D7asp(SessionConfig::default()));
    assert_eq!(
        job.response.as_deref(),
        Some(&[0x20, SENSOR, 0x00, 0x02, 0x00, 0x0A][..])
    );

    assert_eq!(
        sink.states(),
        vec![
            TriggerState::Triggered,
            TriggerState::Decoded,
            TriggerState::DispatchReady,
            TriggerState::Idle
        ]
    );
    assert_eq!(
        sink.count(|e| matches!(e, NodeEvent::Dispatched { file_id: SENSOR, .. })),
        1
    );
}

#[test]
fn every_write_dispatches_again() {
    let mut fs = scenario();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    for v in 0..5u8 {
        fs.write_file(SENSOR, 0, &[0, v], &mut tx, &mut sink).unwrap();
    }
    assert_eq!(tx.jobs.len(), 5);
    assert_eq!(fs.actions().stats().dispatched, 5);
    assert_eq!(tx.jobs[4].response.as_deref().map(|r| r[5]), Some(4));
}

// ── Non-action files ─────────────────────────────────────────

#[test]
fn writing_command_or_interface_file_never_submits() {
    let mut fs = scenario();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    fs.write_file(CMD, 3, &[1], &mut tx, &mut sink).unwrap();
    fs.write_file(ITF, 4, &[0x02], &mut tx, &mut sink).unwrap();

    assert!(tx.jobs.is_empty());
    assert!(sink.states().is_empty());
}

// ── Fresh snapshots ──────────────────────────────────────────

#[test]
fn command_changes_are_seen_by_the_next_trigger() {
    let mut fs = scenario();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    fs.write_file(SENSOR, 0, &[0x01, 0x02], &mut tx, &mut sink).unwrap();
    // Shrink the read to one byte at offset 1.
    fs.write_file(CMD, 2, &[1, 1], &mut tx, &mut sink).unwrap();
    fs.write_file(SENSOR, 0, &[0x03, 0x04], &mut tx, &mut sink).unwrap();

    assert_eq!(tx.jobs.len(), 2);
    assert_eq!(tx.jobs[0].command, ActionCommand::read_file_data(SENSOR, 0, 2));
    assert_eq!(tx.jobs[1].command, ActionCommand::read_file_data(SENSOR, 1, 1));
    assert_eq!(
        tx.jobs[1].response.as_deref(),
        Some(&[0x20, SENSOR, 0x01, 0x01, 0x04][..])
    );
}

#[test]
fn interface_changes_are_seen_by_the_next_trigger() {
    let mut fs = scenario();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    // Access class byte.
    fs.write_file(ITF, 4, &[0x21], &mut tx, &mut sink).unwrap();
    fs.write_file(SENSOR, 0, &[0, 1], &mut tx, &mut sink).unwrap();

    let InterfaceConfig::D7asp(session) = tx.jobs[0].config;
    assert_eq!(session.addressee.access_class, 0x21);
}

#[test]
fn non_read_command_is_dispatched_verbatim() {
    let mut fs = FileSystem::new(RamStorage::new(), RamStorage::new());
    let raw = [OP_WRITE_FILE_DATA, 0x50, 0, 1, 0xEE];
    fs.init_file(CMD, FileHeader::new(StorageClass::Permanent, raw.len() as u32), &raw)
        .unwrap();
    fs.init_file_with_interface_config(ITF, &InterfaceConfig::D7asp(SessionConfig::default()))
        .unwrap();
    fs.init_file(SENSOR, sensor_header(), &[]).unwrap();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    fs.write_file(SENSOR, 0, &[1, 2], &mut tx, &mut sink).unwrap();

    assert_eq!(tx.jobs.len(), 1);
    assert_eq!(&alp::encode(&tx.jobs[0].command)[..], &raw);
    assert!(tx.jobs[0].response.is_none());
}

#[test]
fn command_filling_a_whole_file_is_dispatched_verbatim() {
    let mut fs = FileSystem::new(RamStorage::new(), RamStorage::new());
    let raw = [OP_WRITE_FILE_DATA; MAX_FILE_SIZE];
    fs.init_file(CMD, FileHeader::new(StorageClass::Permanent, raw.len() as u32), &raw)
        .unwrap();
    fs.init_file_with_interface_config(ITF, &InterfaceConfig::D7asp(SessionConfig::default()))
        .unwrap();
    fs.init_file(SENSOR, sensor_header(), &[]).unwrap();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    fs.write_file(SENSOR, 0, &[1, 2], &mut tx, &mut sink).unwrap();

    assert_eq!(fs.actions().last_failure(), None);
    assert_eq!(tx.jobs.len(), 1);
    assert_eq!(&alp::encode(&tx.jobs[0].command)[..], &raw[..]);
}

// ── Contained failures ───────────────────────────────────────

#[test]
fn missing_command_file_fails_but_write_succeeds() {
    let mut fs = FileSystem::new(RamStorage::new(), RamStorage::new());
    fs.init_file_with_interface_config(ITF, &InterfaceConfig::D7asp(SessionConfig::default()))
        .unwrap();
    fs.init_file(SENSOR, sensor_header(), &[]).unwrap();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    assert_eq!(fs.write_file(SENSOR, 0, &[9, 9], &mut tx, &mut sink), Ok(()));

    assert!(tx.jobs.is_empty());
    assert_eq!(&fs.read_file(SENSOR, 0, 2).unwrap()[..], &[9, 9]);
    assert_eq!(
        sink.states(),
        vec![TriggerState::Triggered, TriggerState::Failed, TriggerState::Idle]
    );
    assert_eq!(
        fs.actions().last_failure(),
        Some((SENSOR, Error::Fs(FsError::UnknownFile)))
    );
}

#[test]
fn undecodable_command_fails_in_triggered() {
    let mut fs = FileSystem::new(RamStorage::new(), RamStorage::new());
    fs.init_file(CMD, FileHeader::new(StorageClass::Permanent, 2), &[OP_READ_FILE_DATA, SENSOR])
        .unwrap();
    fs.init_file_with_interface_config(ITF, &InterfaceConfig::D7asp(SessionConfig::default()))
        .unwrap();
    fs.init_file(SENSOR, sensor_header(), &[]).unwrap();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    fs.write_file(SENSOR, 0, &[1, 1], &mut tx, &mut sink).unwrap();

    assert!(tx.jobs.is_empty());
    assert!(sink.events.contains(&NodeEvent::TriggerFailed {
        file_id: SENSOR,
        error: Error::Codec(CodecError::TruncatedCommand),
    }));
}

#[test]
fn corrupt_interface_file_fails_after_decode() {
    let mut fs = scenario();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    fs.write_file(ITF, 0, &[0x00], &mut tx, &mut sink).unwrap();
    fs.write_file(SENSOR, 0, &[1, 1], &mut tx, &mut sink).unwrap();

    assert!(tx.jobs.is_empty());
    assert_eq!(
        sink.states(),
        vec![
            TriggerState::Triggered,
            TriggerState::Decoded,
            TriggerState::Failed,
            TriggerState::Idle
        ]
    );
    assert_eq!(
        fs.actions().last_failure(),
        Some((SENSOR, Error::Codec(CodecError::InvalidInterfaceConfig)))
    );
}

#[test]
fn rejected_submission_is_reported_not_retried() {
    let mut fs = scenario();
    let mut tx = RecordingTransport {
        reject_with: Some(TransportError::QueueFull),
        ..Default::default()
    };
    let mut sink = VecSink::default();

    assert!(fs.write_file(SENSOR, 0, &[1, 1], &mut tx, &mut sink).is_ok());

    let stats = fs.actions().stats();
    assert_eq!(stats.fired, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.dispatched, 0);
}

#[test]
fn failed_write_fires_nothing() {
    let mut fs = scenario();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    assert_eq!(
        fs.write_file(SENSOR, 1, &[1, 2], &mut tx, &mut sink),
        Err(FsError::OutOfBounds)
    );
    assert!(tx.jobs.is_empty());
    assert!(sink.events.is_empty());
    assert_eq!(fs.actions().stats().fired, 0);
}

#[test]
fn storage_failure_fails_the_write_without_trigger() {
    let volatile = MockStorage::default();
    let fail = volatile.fail_switch();
    let mut fs = FileSystem::new(volatile, MockStorage::default());
    let command = [OP_READ_FILE_DATA, SENSOR, 0, 2];
    fs.init_file(CMD, FileHeader::new(StorageClass::Permanent, 4), &command)
        .unwrap();
    fs.init_file_with_interface_config(ITF, &InterfaceConfig::D7asp(SessionConfig::default()))
        .unwrap();
    fs.init_file(SENSOR, sensor_header(), &[]).unwrap();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    fail.set(true);
    assert_eq!(
        fs.write_file(SENSOR, 0, &[1, 1], &mut tx, &mut sink),
        Err(FsError::StorageFailure)
    );
    assert!(tx.jobs.is_empty());
    assert!(sink.events.is_empty());

    fail.set(false);
    fs.write_file(SENSOR, 0, &[1, 1], &mut tx, &mut sink).unwrap();
    assert_eq!(tx.jobs.len(), 1);
}

#[test]
fn storage_failure_during_init_registers_nothing() {
    let volatile = MockStorage::default();
    volatile.fail_switch().set(true);
    let mut fs = FileSystem::new(volatile, MockStorage::default());
    assert_eq!(
        fs.init_file(SENSOR, FileHeader::new(StorageClass::Volatile, 2), &[]),
        Err(FsError::StorageFailure)
    );
    assert_eq!(fs.header_of(SENSOR), Err(FsError::UnknownFile));
}
