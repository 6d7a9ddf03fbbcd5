//! Stream access pattern tests.
//!
//! Tests verify:
//! - Contiguous bands cost one seek and one read per call
//! - Strided bands seek relative to the current position between pixels
//! - No skip is issued after the last pixel of a call
//! - Backend failures reach the caller with their kind intact

use std::cell::RefCell;

use nitf_bandio::{BandSource, BufferStream, ByteStream, ErrorKind, StreamSource, Whence};

use super::test_utils::{Call, TrackingStream};

// =============================================================================
// Access Patterns
// =============================================================================

#[test]
fn test_contiguous_read_is_one_request() {
    let stream = TrackingStream::new((0..100u8).collect());
    let mut source = StreamSource::new(stream.clone(), 10, 4, 0).unwrap();

    assert_eq!(source.read_vec(30).unwrap(), (10..40u8).collect::<Vec<_>>());
    assert_eq!(
        stream.calls(),
        vec![Call::Seek(10, Whence::Start), Call::Read(30)]
    );

    stream.reset_tracking();
    source.read_vec(5).unwrap();
    assert_eq!(
        stream.calls(),
        vec![Call::Seek(40, Whence::Start), Call::Read(5)]
    );
}

#[test]
fn test_strided_read_pattern() {
    let stream = TrackingStream::new(b"ABCDEFGHIJKL".to_vec());
    let mut source = StreamSource::new(stream.clone(), 0, 2, 1).unwrap();

    assert_eq!(source.read_vec(5).unwrap(), b"ABEFI");
    assert_eq!(
        stream.calls(),
        vec![
            Call::Seek(0, Whence::Start),
            Call::Read(2),
            Call::Seek(2, Whence::Current),
            Call::Read(2),
            Call::Seek(2, Whence::Current),
            Call::Read(1),
        ]
    );
}

#[test]
fn test_no_trailing_skip_after_whole_pixel() {
    let stream = TrackingStream::new(b"ABCDEFGHIJKL".to_vec());
    let mut source = StreamSource::new(stream.clone(), 0, 2, 1).unwrap();

    source.read_vec(4).unwrap();
    let calls = stream.calls();
    assert_eq!(calls.last(), Some(&Call::Read(2)));

    // The next call starts at the following pixel, not the skipped bytes.
    stream.reset_tracking();
    assert_eq!(source.read_vec(2).unwrap(), b"IJ");
    assert_eq!(stream.calls()[0], Call::Seek(8, Whence::Start));
}

#[test]
fn test_size_asks_the_stream() {
    let stream = TrackingStream::new(vec![0; 40]);
    let mut source = StreamSource::new(stream.clone(), 4, 4, 1).unwrap();

    assert_eq!(source.size().unwrap(), 20);
    assert_eq!(stream.calls(), vec![Call::Size]);
}

#[test]
fn test_reads_per_call_match_pixels_touched() {
    let stream = TrackingStream::new(vec![7; 300]);
    let mut source = StreamSource::new(stream.clone(), 0, 3, 2).unwrap();

    // 10 whole pixels plus one partial one.
    source.read_vec(32).unwrap();
    assert_eq!(stream.read_count(), 11);
}

// =============================================================================
// Failure Propagation
// =============================================================================

#[test]
fn test_backend_error_kind_passes_through() {
    for kind in [ErrorKind::Unknown, ErrorKind::Memory, ErrorKind::InvalidObject] {
        let stream = TrackingStream::failing_reads(vec![0; 16], kind);
        let mut source = StreamSource::new(stream, 0, 1, 1).unwrap();

        let err = source.read_vec(4).unwrap_err();
        assert_eq!(err.kind(), kind);
        assert_eq!(
            err.message(),
            "band read of 4 bytes at offset 0: injected read failure"
        );
    }
}

#[test]
fn test_failed_read_leaves_earlier_bytes() {
    // The stream holds two whole pixels and part of a third.
    let mut stream = BufferStream::from(b"AAxxBBxxC".to_vec());
    let mut source = StreamSource::new(&mut stream, 0, 2, 1).unwrap();

    let mut buf = [0u8; 6];
    let err = source.read(&mut buf).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Read);
    assert_eq!(&buf[..4], b"AABB");
}

#[test]
fn test_closed_stream_is_reported() {
    let mut stream = BufferStream::from(vec![1, 2, 3, 4]);
    stream.close().unwrap();

    let mut source = StreamSource::new(&mut stream, 0, 0, 0).unwrap();
    assert_eq!(source.read_vec(1).unwrap_err().kind(), ErrorKind::InvalidObject);
    assert_eq!(source.size().unwrap_err().kind(), ErrorKind::InvalidObject);
}

#[test]
fn test_refcell_stream_busy_elsewhere() {
    let stream = RefCell::new(BufferStream::from(vec![0; 8]));
    let mut source = StreamSource::new(&stream, 0, 0, 0).unwrap();

    let _held = stream.borrow_mut();
    assert_eq!(source.read_vec(1).unwrap_err().kind(), ErrorKind::InvalidObject);
}

// =============================================================================
// Seek Contract
// =============================================================================

#[test]
fn test_seek_then_tell_agrees() {
    let mut stream = BufferStream::from(vec![0; 64]);
    for offset in 0..=64i64 {
        assert_eq!(stream.seek(offset, Whence::Start).unwrap(), offset as u64);
        assert_eq!(stream.tell().unwrap(), offset as u64);
    }
    assert_eq!(stream.seek(-4, Whence::End).unwrap(), 60);
    assert_eq!(stream.seek(-10, Whence::Current).unwrap(), 50);
    assert_eq!(
        stream.seek(-51, Whence::Current).unwrap_err().kind(),
        ErrorKind::Seek
    );
    assert_eq!(stream.tell().unwrap(), 50);
}
