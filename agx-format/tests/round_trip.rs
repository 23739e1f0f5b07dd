//! Integration tests for agx-format
//!
//! Tests the full pipeline: build document -> write file -> stream it back

use agx_format::{AgxReader, AnimationDocument, ElementType, Next, json, write_document};
use glam::Vec3;
use tempfile::tempdir;

/// Animated quad: bbox constants, index array, per-step positions and time
fn animated_quad(steps: u32) -> AnimationDocument {
    let mut doc = AnimationDocument::new();
    doc.set_object_type(ElementType::GEOMETRY);
    doc.set_subtype("triangle");
    doc.set_time_step_count(steps);

    doc.set_constant_value("bbox.min", ElementType::FLOAT32_VEC3, &Vec3::ZERO);
    doc.set_constant_value("bbox.max", ElementType::FLOAT32_VEC3, &Vec3::ONE);
    let indices = [0u32, 1, 2, 2, 3, 0];
    doc.set_constant_slice("primitive.index", ElementType::UINT32_VEC3, &indices);

    for t in 0..steps {
        let phase = t as f32 / (steps.max(2) - 1) as f32;
        let lift = Vec3::new(0.0, 0.0, phase);
        let positions = [
            Vec3::new(0.0, 0.0, 0.0) + lift,
            Vec3::new(1.0, 0.0, 0.0) + lift,
            Vec3::new(1.0, 1.0, 0.0) + lift,
            Vec3::new(0.0, 1.0, 0.0) + lift,
        ];
        doc.begin_time_step(t);
        doc.set_time_step_slice(t, "vertex.position", ElementType::FLOAT32_VEC3, &positions);
        doc.set_time_step_value(t, "time", ElementType::FLOAT32, &phase);
        doc.end_time_step(t);
    }
    doc
}

#[test]
fn test_file_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("quad.agxb");
    let doc = animated_quad(4);

    write_document(&doc, &path).expect("Failed to write document");
    assert!(path.exists(), "AGXB file should exist");

    let mut reader = AgxReader::open(&path).expect("Failed to open AGXB file");
    let header = *reader.header();
    assert_eq!(header.version, 1);
    assert_eq!(header.time_steps, 4);
    assert_eq!(header.constant_param_count, 3);
    assert!(!header.need_byte_swap);
    assert_eq!(reader.subtype(), "triangle");

    let loaded = reader.read_document().expect("Failed to read document");
    assert_eq!(loaded, doc);
}

#[test]
fn test_streaming_reads_match_document() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("quad.agxb");
    let doc = animated_quad(3);
    write_document(&doc, &path).unwrap();

    let mut reader = AgxReader::open(&path).unwrap();
    let mut seen = 0;
    loop {
        let step = match reader.begin_next_time_step() {
            Next::Produced(step) => step,
            Next::End => break,
            Next::Error(err) => panic!("unexpected error: {err}"),
        };
        let bucket = doc.time_step(step.index).expect("step index in range");
        assert_eq!(step.param_count as usize, bucket.len());

        while let Some(param) = reader.next_time_step_param().into_result().unwrap() {
            let expected = &bucket[&*param.name_str()];
            assert_eq!(param.data(), expected.bytes());
            assert_eq!(param.element_count(), expected.element_count());
        }
        seen += 1;
    }
    assert_eq!(seen, 3);

    let positions = doc.time_step(2).unwrap()["vertex.position"].to_vec::<Vec3>();
    assert_eq!(positions[2], Vec3::new(1.0, 1.0, 1.0));
}

#[test]
fn test_constants_only_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bbox.agxb");

    let mut doc = AnimationDocument::new();
    doc.set_time_step_count(0);
    doc.set_constant_value("bbox.min", ElementType::FLOAT32_VEC3, &[0.0f32, 0.0, 0.0]);
    write_document(&doc, &path).unwrap();

    let mut reader = AgxReader::open(&path).unwrap();
    assert_eq!(reader.header().constant_param_count, 1);
    assert_eq!(reader.header().time_steps, 0);
    let param = reader.next_constant().into_result().unwrap().unwrap();
    assert_eq!(param.to_vec::<f32>(), vec![0.0, 0.0, 0.0]);
    assert_eq!(reader.begin_next_time_step().code(), 0);

    let loaded = reader.read_document().unwrap();
    let value = json::to_json(&loaded).unwrap();
    assert_eq!(
        value["constants"]["bbox.min"]["value"],
        serde_json::json!([0.0, 0.0, 0.0])
    );
}

#[test]
fn test_overwrite_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.agxb");

    write_document(&animated_quad(5), &path).unwrap();
    let big = std::fs::metadata(&path).unwrap().len();
    write_document(&AnimationDocument::new(), &path).unwrap();
    let small = std::fs::metadata(&path).unwrap().len();
    assert!(small < big);

    let reader = AgxReader::open(&path).unwrap();
    assert_eq!(reader.header().constant_param_count, 0);
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().unwrap();
    let err = AgxReader::open(dir.path().join("nope.agxb")).err().unwrap();
    assert!(matches!(err, agx_format::AgxError::Open { .. }));
}
