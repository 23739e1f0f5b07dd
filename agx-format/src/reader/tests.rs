//! Tests for the streaming reader

use std::io::Cursor;

use super::*;
use crate::writer::to_bytes;

fn reader_for(doc: &AnimationDocument) -> AgxReader<Cursor<Vec<u8>>> {
    AgxReader::new(Cursor::new(to_bytes(doc))).unwrap()
}

fn collect_constants<R: Read + Seek>(reader: &mut AgxReader<R>) -> Vec<String> {
    let mut names = Vec::new();
    while let Some(p) = reader.next_constant().into_result().unwrap() {
        names.push(p.name_str().into_owned());
    }
    names
}

/// Three params per step, two steps, plus two constants
fn three_param_doc() -> AnimationDocument {
    let mut doc = AnimationDocument::new();
    doc.set_constant_value("c0", ElementType::UINT32, &10u32);
    doc.set_constant_value("c1", ElementType::UINT32, &11u32);
    doc.set_time_step_count(2);
    for t in 0..2u32 {
        doc.set_time_step_value(t, "a", ElementType::UINT32, &(t * 10));
        doc.set_time_step_value(t, "b", ElementType::UINT32, &(t * 10 + 1));
        doc.set_time_step_value(t, "c", ElementType::UINT32, &(t * 10 + 2));
    }
    doc
}

/// Writes integers in the opposite byte order of the host, payloads untouched
struct Swapped(Vec<u8>);

impl Swapped {
    fn u8(&mut self, v: u8) -> &mut Self {
        self.0.push(v);
        self
    }
    fn u32(&mut self, v: u32) -> &mut Self {
        self.0.extend_from_slice(&v.swap_bytes().to_ne_bytes());
        self
    }
    fn u64(&mut self, v: u64) -> &mut Self {
        self.0.extend_from_slice(&v.swap_bytes().to_ne_bytes());
        self
    }
    fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.extend_from_slice(bytes);
        self
    }
}

// ========================================================================
// Scenarios
// ========================================================================

#[test]
fn test_constant_only_document() {
    let mut doc = AnimationDocument::new();
    doc.set_time_step_count(0);
    doc.set_constant_value("bbox.min", ElementType::FLOAT32_VEC3, &[0.0f32; 3]);

    let mut reader = reader_for(&doc);
    assert_eq!(reader.header().constant_param_count, 1);
    assert_eq!(reader.header().time_steps, 0);

    match reader.next_constant() {
        Next::Produced(p) => {
            assert_eq!(p.name(), b"bbox.min");
            assert!(!p.is_array());
            assert_eq!(p.data_type(), ElementType::FLOAT32_VEC3);
            assert_eq!(p.to_vec::<f32>(), vec![0.0, 0.0, 0.0]);
        }
        other => panic!("expected a constant, got {other:?}"),
    }
    assert!(reader.next_constant().is_end());
    assert!(reader.begin_next_time_step().is_end());
}

#[test]
fn test_time_values_in_order() {
    let mut doc = AnimationDocument::new();
    doc.set_time_step_count(4);
    for t in 0..4u32 {
        doc.set_time_step_value(t, "time", ElementType::FLOAT32, &(t as f32 / 3.0));
    }

    let mut reader = reader_for(&doc);
    let mut times = Vec::new();
    let mut indices = Vec::new();
    while let Some(step) = reader.begin_next_time_step().into_result().unwrap() {
        indices.push(step.index);
        assert_eq!(step.param_count, 1);
        let p = reader.next_time_step_param().into_result().unwrap().unwrap();
        assert_eq!(p.name_str(), "time");
        times.push(p.to_vec::<f32>()[0]);
    }

    assert_eq!(indices, vec![0, 1, 2, 3]);
    let expected = [0.0f32, 0.333333, 0.666667, 1.0];
    for (got, want) in times.iter().zip(expected) {
        assert!((got - want).abs() < 1e-5, "{got} vs {want}");
    }
}

#[test]
fn test_skip_remaining_moves_to_next_step() {
    let mut reader = reader_for(&three_param_doc());

    let first = reader.begin_next_time_step().into_result().unwrap().unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.param_count, 3);
    let p = reader.next_time_step_param().into_result().unwrap().unwrap();
    assert_eq!(p.name_str(), "a");

    reader.skip_remaining_time_step().unwrap();
    assert!(reader.next_time_step_param().is_end());

    let second = reader.begin_next_time_step().into_result().unwrap().unwrap();
    assert_eq!(second.index, 1);
    let p = reader.next_time_step_param().into_result().unwrap().unwrap();
    assert_eq!(p.name_str(), "a");
    assert_eq!(p.to_vec::<u32>(), vec![10]);
}

#[test]
fn test_begin_next_skips_unread_params() {
    let mut reader = reader_for(&three_param_doc());
    assert_eq!(reader.begin_next_time_step().code(), 1);
    // Nothing read from step 0
    let step = reader.begin_next_time_step().into_result().unwrap().unwrap();
    assert_eq!(step.index, 1);
    let names: Vec<String> = std::iter::from_fn(|| {
        reader
            .next_time_step_param()
            .into_result()
            .unwrap()
            .map(|p| p.name_str().into_owned())
    })
    .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

// ========================================================================
// Cursor behavior
// ========================================================================

#[test]
fn test_exhaustion_is_idempotent() {
    let mut reader = reader_for(&three_param_doc());
    assert_eq!(collect_constants(&mut reader).len(), 2);
    for _ in 0..3 {
        assert_eq!(reader.next_constant().code(), 0);
    }

    while reader.begin_next_time_step().code() == 1 {}
    for _ in 0..3 {
        assert_eq!(reader.begin_next_time_step().code(), 0);
        assert_eq!(reader.next_time_step_param().code(), 0);
    }
}

#[test]
fn test_param_before_first_step_is_end() {
    let mut reader = reader_for(&three_param_doc());
    assert!(reader.next_time_step_param().is_end());
    assert_eq!(reader.begin_next_time_step().code(), 1);
}

#[test]
fn test_reset_rewinds_both_cursors() {
    let mut reader = reader_for(&three_param_doc());
    assert_eq!(collect_constants(&mut reader), ["c0", "c1"]);
    reader.reset_constants();
    assert_eq!(collect_constants(&mut reader), ["c0", "c1"]);

    while reader.begin_next_time_step().code() == 1 {}
    reader.reset_time_steps();
    let step = reader.begin_next_time_step().into_result().unwrap().unwrap();
    assert_eq!(step.index, 0);
}

#[test]
fn test_interleaved_cursors() {
    let mut reader = reader_for(&three_param_doc());

    // Time steps first: the constants are skipped to locate step 0
    let step = reader.begin_next_time_step().into_result().unwrap().unwrap();
    assert_eq!(step.index, 0);
    let name = reader
        .next_time_step_param()
        .into_result()
        .unwrap()
        .map(|p| p.name_str().into_owned());
    assert_eq!(name.as_deref(), Some("a"));

    let c = reader.next_constant().into_result().unwrap().unwrap();
    assert_eq!(c.name_str(), "c0");
    assert_eq!(c.to_vec::<u32>(), vec![10]);

    let p = reader.next_time_step_param().into_result().unwrap().unwrap();
    assert_eq!(p.name_str(), "b");
    assert_eq!(p.to_vec::<u32>(), vec![1]);

    let c = reader.next_constant().into_result().unwrap().unwrap();
    assert_eq!(c.name_str(), "c1");
}

#[test]
fn test_array_record_view() {
    let mut doc = AnimationDocument::new();
    doc.set_constant_slice("indices", ElementType::UINT32, &[0u32, 1, 2, 2, 3, 0]);
    let mut reader = reader_for(&doc);

    let p = reader.next_constant().into_result().unwrap().unwrap();
    assert!(p.is_array());
    assert_eq!(p.data_type(), ElementType::UINT32);
    assert_eq!(p.element_count(), 6);
    assert_eq!(p.data().len(), 24);
    assert_eq!(p.to_owned_value(), doc.constants()["indices"]);
}

#[test]
fn test_read_document_round_trip() {
    let mut doc = three_param_doc();
    doc.set_object_type(ElementType::GEOMETRY);
    doc.set_subtype("triangle");
    doc.set_time_step_parameter_array(1, "positions", ElementType::FLOAT32_VEC3, None, 3);

    let mut reader = reader_for(&doc);
    assert_eq!(reader.subtype(), "triangle");
    assert_eq!(reader.header().object_type, ElementType::GEOMETRY);
    let loaded = reader.read_document().unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn test_read_document_keeps_empty_names() {
    let mut doc = AnimationDocument::new();
    doc.set_constant_value("x", ElementType::UINT32, &5u32);
    let bytes = to_bytes(&doc);

    // Rewrite the single constant with a zero-length name
    let rec = 28;
    let mut patched = bytes[..rec].to_vec();
    patched.extend_from_slice(&0u32.to_ne_bytes());
    patched.extend_from_slice(&bytes[rec + 5..]);

    let mut reader = AgxReader::new(Cursor::new(patched)).unwrap();
    let loaded = reader.read_document().unwrap();
    assert_eq!(loaded.constants().len(), 1);
    assert_eq!(loaded.constants()[""].to_vec::<u32>(), vec![5]);
}

// ========================================================================
// Header validation
// ========================================================================

#[test]
fn test_header_fields_native() {
    let reader = reader_for(&AnimationDocument::new());
    let header = reader.header();
    assert_eq!(header.version, 1);
    assert!(!header.need_byte_swap);
    assert_eq!(header.endian_marker, 0x0102_0304);
    assert_eq!(header.normalized_marker(), 0x0102_0304);
    assert_eq!(header.host_little_endian, cfg!(target_endian = "little"));
    assert_eq!(header.file_little_endian, header.host_little_endian);
}

#[test]
fn test_bad_magic() {
    let mut bytes = to_bytes(&AnimationDocument::new());
    bytes[0] = b'X';
    let err = AgxReader::new(Cursor::new(bytes)).err().unwrap();
    assert!(matches!(err, AgxError::BadMagic));
}

#[test]
fn test_short_magic() {
    let err = AgxReader::new(Cursor::new(b"AG".to_vec())).err().unwrap();
    assert!(matches!(err, AgxError::TruncatedMagic));

    let err = AgxReader::new(Cursor::new(Vec::new())).err().unwrap();
    assert!(matches!(err, AgxError::TruncatedMagic));
}

#[test]
fn test_bad_endian_marker() {
    let mut bytes = to_bytes(&AnimationDocument::new());
    bytes[8..12].copy_from_slice(&0xDEAD_BEEFu32.to_ne_bytes());
    let err = AgxReader::new(Cursor::new(bytes)).err().unwrap();
    assert!(matches!(err, AgxError::BadEndianMarker(0xDEAD_BEEF)));
}

#[test]
fn test_bad_marker_wins_over_truncated_subtype() {
    let mut doc = AnimationDocument::new();
    doc.set_subtype("triangle");
    let mut bytes = to_bytes(&doc);
    bytes[8..12].copy_from_slice(&0xDEAD_BEEFu32.to_ne_bytes());
    bytes.truncate(bytes.len() - 3);
    let err = AgxReader::new(Cursor::new(bytes)).err().unwrap();
    assert!(matches!(err, AgxError::BadEndianMarker(0xDEAD_BEEF)));
}

#[test]
fn test_unsupported_version() {
    let mut bytes = to_bytes(&AnimationDocument::new());
    bytes[4..8].copy_from_slice(&2u32.to_ne_bytes());
    let err = AgxReader::new(Cursor::new(bytes)).err().unwrap();
    assert!(matches!(err, AgxError::UnsupportedVersion(2)));
}

#[test]
fn test_truncated_header() {
    let mut doc = AnimationDocument::new();
    doc.set_subtype("quad");
    let bytes = to_bytes(&doc);
    for len in [10, 24, bytes.len() - 1] {
        let err = AgxReader::new(Cursor::new(bytes[..len].to_vec()))
            .err()
            .unwrap();
        assert!(matches!(err, AgxError::TruncatedHeader), "len {len}");
    }
}

// ========================================================================
// Mid-stream errors
// ========================================================================

#[test]
fn test_truncated_record_poisons_until_reset() {
    let mut doc = AnimationDocument::new();
    doc.set_constant_slice("data", ElementType::FLOAT32, &[1.0f32; 8]);
    let mut bytes = to_bytes(&doc);
    bytes.truncate(bytes.len() - 5);

    let mut reader = AgxReader::new(Cursor::new(bytes)).unwrap();
    match reader.next_constant() {
        Next::Error(AgxError::TruncatedRecord) => {}
        other => panic!("expected truncated record, got {other:?}"),
    }
    assert!(matches!(
        reader.next_constant(),
        Next::Error(AgxError::Poisoned)
    ));

    reader.reset_constants();
    assert!(matches!(
        reader.next_constant(),
        Next::Error(AgxError::TruncatedRecord)
    ));
}

#[test]
fn test_truncated_time_step() {
    let mut bytes = to_bytes(&three_param_doc());
    bytes.truncate(bytes.len() - 2);

    let mut reader = AgxReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(collect_constants(&mut reader).len(), 2);
    assert_eq!(reader.begin_next_time_step().code(), 1);
    let step = reader.begin_next_time_step().into_result().unwrap().unwrap();
    assert_eq!(step.index, 1);
    assert_eq!(reader.next_time_step_param().code(), 1);
    assert_eq!(reader.next_time_step_param().code(), 1);
    assert_eq!(reader.next_time_step_param().code(), -1);
    assert_eq!(reader.begin_next_time_step().code(), -1);
    assert!(reader.skip_remaining_time_step().is_err());

    // The constants cursor is unaffected
    reader.reset_constants();
    assert_eq!(reader.next_constant().code(), 1);
}

#[test]
fn test_time_steps_missing_entirely() {
    let mut doc = AnimationDocument::new();
    doc.set_time_step_count(1);
    let mut bytes = to_bytes(&doc);
    bytes.truncate(bytes.len() - 8);

    let mut reader = AgxReader::new(Cursor::new(bytes)).unwrap();
    assert!(matches!(
        reader.begin_next_time_step(),
        Next::Error(AgxError::TruncatedRecord)
    ));
}

// ========================================================================
// Opposite byte order
// ========================================================================

#[test]
fn test_opposite_endian_file() {
    let payload = 1.5f32.to_ne_bytes();
    let indices: Vec<u8> = [4u32, 5].iter().flat_map(|v| v.to_ne_bytes()).collect();

    let mut f = Swapped(Vec::new());
    f.raw(b"AGXB")
        .u32(1)
        .u32(0x0102_0304)
        .u32(ElementType::GEOMETRY.raw())
        .u32(1)
        .u32(1)
        .u32(4)
        .raw(b"quad");
    // Constant array "idx"
    f.u32(3)
        .raw(b"idx")
        .u8(1)
        .u32(ElementType::UINT32.raw())
        .u64(2)
        .u64(8)
        .raw(&indices);
    // Step 0 with scalar "time"
    f.u32(0)
        .u32(1)
        .u32(4)
        .raw(b"time")
        .u8(0)
        .u32(ElementType::FLOAT32.raw())
        .u32(4)
        .raw(&payload);

    let mut reader = AgxReader::new(Cursor::new(f.0)).unwrap();
    let header = *reader.header();
    assert!(header.need_byte_swap);
    assert_eq!(header.endian_marker, 0x0102_0304u32.swap_bytes());
    assert_eq!(header.normalized_marker(), 0x0102_0304);
    assert_eq!(header.file_little_endian, !header.host_little_endian);
    assert_eq!(header.object_type, ElementType::GEOMETRY);
    assert_eq!(header.time_steps, 1);
    assert_eq!(header.constant_param_count, 1);
    assert_eq!(reader.subtype(), "quad");

    let c = reader.next_constant().into_result().unwrap().unwrap();
    assert_eq!(c.name_str(), "idx");
    assert_eq!(c.data_type(), ElementType::UINT32);
    assert_eq!(c.element_count(), 2);
    // Payload bytes are not swapped
    assert_eq!(c.data(), indices.as_slice());

    let step = reader.begin_next_time_step().into_result().unwrap().unwrap();
    assert_eq!(step, TimeStepInfo { index: 0, param_count: 1 });
    let p = reader.next_time_step_param().into_result().unwrap().unwrap();
    assert_eq!(p.name_str(), "time");
    assert_eq!(p.data_type(), ElementType::FLOAT32);
    assert_eq!(p.data(), &payload);
    assert!(reader.begin_next_time_step().is_end());
}

#[test]
fn test_next_codes() {
    let produced: Next<u8> = Next::Produced(1);
    let end: Next<u8> = Next::End;
    let error: Next<u8> = Next::Error(AgxError::TruncatedRecord);
    assert_eq!(produced.code(), 1);
    assert_eq!(end.code(), 0);
    assert_eq!(error.code(), -1);
    assert_eq!(Next::Produced(2u8).into_result().unwrap(), Some(2));
}
