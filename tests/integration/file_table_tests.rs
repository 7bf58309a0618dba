//! Integration tests for the file table over the RAM and NVS adapters.

use crate::mock_ports::{RecordingTransport, VecSink};

use d7node::adapters::nvs::NvsAdapter;
use d7node::adapters::ram::RamStorage;
use d7node::app::events::NodeEvent;
use d7node::error::FsError;
use d7node::fs::header::{
    AccessLevel, ActionBinding, ActionCondition, FileHeader, FilePermissions, StorageClass,
};
use d7node::fs::{FileSystem, MAX_FILE_SIZE};

fn node() -> FileSystem<RamStorage, NvsAdapter> {
    FileSystem::new(RamStorage::new(), NvsAdapter::new())
}

#[test]
fn classes_route_to_their_backend() {
    let mut fs = node();
    fs.init_file(0x10, FileHeader::new(StorageClass::Volatile, 2), &[1, 2])
        .unwrap();
    fs.init_file(0x11, FileHeader::new(StorageClass::Permanent, 3), &[3, 4, 5])
        .unwrap();

    assert_eq!(fs.table().volatile_backend().len(), 1);
    assert_eq!(fs.table().permanent_backend().file_count(), 1);
    assert_eq!(&fs.read_file(0x11, 0, 3).unwrap()[..], &[3, 4, 5]);
}

#[test]
fn writes_are_visible_to_the_next_read() {
    let mut fs = node();
    fs.init_file(0x11, FileHeader::new(StorageClass::Permanent, 4), &[])
        .unwrap();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    fs.write_file(0x11, 1, &[0xAB, 0xCD], &mut tx, &mut sink).unwrap();

    assert_eq!(&fs.read_file(0x11, 0, 4).unwrap()[..], &[0, 0xAB, 0xCD, 0]);
    assert_eq!(
        sink.events,
        vec![NodeEvent::FileWritten {
            file_id: 0x11,
            offset: 1,
            len: 2
        }]
    );
}

#[test]
fn length_never_exceeds_allocation() {
    let mut fs = node();
    let mut h = FileHeader::new(StorageClass::Volatile, 6);
    h.length = 1;
    fs.init_file(0x20, h, &[]).unwrap();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    for (offset, len) in [(0u32, 2usize), (4, 2), (5, 2), (6, 1), (0, 7)] {
        let _ = fs.write_file(0x20, offset, &vec![0xFF; len], &mut tx, &mut sink);
        let header = fs.header_of(0x20).unwrap();
        assert!(header.length <= header.allocated_length);
    }
    assert_eq!(fs.header_of(0x20).unwrap().length, 6);
}

#[test]
fn init_rejects_bad_headers() {
    let mut fs = node();

    let too_big = FileHeader::new(StorageClass::Volatile, MAX_FILE_SIZE as u32 + 1);
    assert_eq!(fs.init_file(0x01, too_big, &[]), Err(FsError::CapacityExceeded));

    let mut inverted = FileHeader::new(StorageClass::Volatile, 2);
    inverted.length = 3;
    assert_eq!(fs.init_file(0x02, inverted, &[]), Err(FsError::CapacityExceeded));

    let self_ref = FileHeader::new(StorageClass::Volatile, 2).with_action(ActionBinding {
        condition: ActionCondition::Write,
        alp_cmd_file_id: 0x03,
        interface_file_id: 0x42,
    });
    assert_eq!(fs.init_file(0x03, self_ref, &[]), Err(FsError::InvalidHeader));

    assert_eq!(fs.table().len(), 0);
}

#[test]
fn permissions_apply_to_remote_access_only() {
    let mut fs = node();
    let h = FileHeader::new(StorageClass::Volatile, 2)
        .with_permissions(FilePermissions(
            FilePermissions::USER_READ | FilePermissions::USER_WRITE,
        ));
    fs.init_file(0x30, h, &[]).unwrap();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();

    assert!(fs.write_file_as(AccessLevel::User, 0x30, 0, &[1], &mut tx, &mut sink).is_ok());
    assert_eq!(
        fs.write_file_as(AccessLevel::Guest, 0x30, 0, &[2], &mut tx, &mut sink),
        Err(FsError::PermissionDenied)
    );
    assert_eq!(
        fs.read_file_as(AccessLevel::Guest, 0x30, 0, 1),
        Err(FsError::PermissionDenied)
    );
    assert_eq!(&fs.read_file_as(AccessLevel::User, 0x30, 0, 1).unwrap()[..], &[1]);
    assert!(fs.write_file(0x30, 1, &[3], &mut tx, &mut sink).is_ok());
}

#[test]
fn volatile_reset_spares_permanent_files() {
    let mut fs = node();
    fs.init_file(0x40, FileHeader::new(StorageClass::Volatile, 2), &[])
        .unwrap();
    fs.init_file(0x41, FileHeader::new(StorageClass::Permanent, 2), &[7, 7])
        .unwrap();
    let mut tx = RecordingTransport::default();
    let mut sink = VecSink::default();
    fs.write_file(0x40, 0, &[5, 5], &mut tx, &mut sink).unwrap();

    fs.reset_volatile().unwrap();

    assert_eq!(&fs.read_file(0x40, 0, 2).unwrap()[..], &[0, 0]);
    assert_eq!(&fs.read_file(0x41, 0, 2).unwrap()[..], &[7, 7]);
}

#[test]
fn file_ids_lists_registration_order() {
    let mut fs = node();
    for id in [0x42, 0x40, 0x41] {
        fs.init_file(id, FileHeader::new(StorageClass::Volatile, 1), &[])
            .unwrap();
    }
    assert_eq!(fs.table().file_ids().collect::<Vec<_>>(), vec![0x42, 0x40, 0x41]);
}
