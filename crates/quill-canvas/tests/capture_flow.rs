//! End-to-end stroke capture without a GPU: gesture filter → sampler →
//! ribbon builder → mesh store.

use quill_canvas::{MeshStore, StrokeCanvas};
use stroke_core::{PanPhase, PanRecognizer, RibbonMeshBuilder, StrokeSampler, StrokeStyle};

#[test]
fn two_point_stroke_commits_one_quad() {
    let mut pan = PanRecognizer::new();
    pan.set_distance_to_recognize(10.0);
    let mut sampler = StrokeSampler::new(2.0, 10.0);
    let mut builder = RibbonMeshBuilder::new();
    let mut store = MeshStore::new();

    pan.pointer_down([0.0, 0.0]);
    assert_eq!(pan.pointer_move([3.0, 0.0]), None);

    let began = pan.pointer_move([12.0, 0.0]);
    assert_eq!(began, Some(PanPhase::Began([12.0, 0.0])));
    sampler.begin([12.0, 0.0], 0.0);

    let changed = pan.pointer_move([20.0, 0.0]);
    assert_eq!(changed, Some(PanPhase::Changed([20.0, 0.0])));
    let segment = sampler.add_point([20.0, 0.0], 0.1).unwrap();
    let mesh = builder.segment_mesh(segment.a, segment.b).unwrap();
    store.append(&mesh);

    assert_eq!(pan.pointer_up(), Some(PanPhase::Ended));
    let points = sampler.end();

    assert_eq!(points.len(), 2);
    assert_eq!(store.vertex_count(), 4);
    assert_eq!(store.index_count(), 6);
    assert!(!store.is_empty());
}

#[test]
fn tap_commits_nothing() {
    let mut pan = PanRecognizer::new();
    let mut sampler = StrokeSampler::new(2.0, 10.0);
    let store = MeshStore::new();

    pan.pointer_down([50.0, 50.0]);
    assert_eq!(pan.pointer_move([52.0, 50.0]), None);
    assert_eq!(pan.pointer_up(), None);
    assert!(sampler.end().is_empty());
    assert!(store.is_empty());
}

#[test]
fn out_of_order_sample_appends_no_geometry() {
    let mut sampler = StrokeSampler::new(2.0, 10.0);
    let mut builder = RibbonMeshBuilder::new();
    let mut store = MeshStore::new();

    sampler.begin([0.0, 0.0], 1.0);
    if let Some(seg) = sampler.add_point([10.0, 0.0], 1.1) {
        store.append(&builder.segment_mesh(seg.a, seg.b).unwrap());
    }
    let before = (store.vertex_count(), store.index_count());

    // Timestamp goes backwards: rejected, nothing meshed.
    assert_eq!(sampler.add_point([30.0, 0.0], 0.9), None);
    assert_eq!((store.vertex_count(), store.index_count()), before);
    assert_eq!(sampler.points().len(), 2);
}

#[test]
fn erase_leaves_empty_store() {
    let mut sampler = StrokeSampler::new(2.0, 10.0);
    let mut builder = RibbonMeshBuilder::new();
    let mut store = MeshStore::new();

    sampler.begin([0.0, 0.0], 0.0);
    for i in 1..20 {
        if let Some(seg) = sampler.add_point([i as f32 * 5.0, 0.0], i as f64 * 0.016) {
            if let Some(mesh) = builder.segment_mesh(seg.a, seg.b) {
                store.append(&mesh);
            }
        }
    }
    assert!(!store.is_empty());

    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.index_count(), 0);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn erase_clears_canvas_and_snapshot() {
    let mut canvas = StrokeCanvas::headless(64, 64, StrokeStyle::default()).unwrap();
    let mut sampler = StrokeSampler::new(2.0, 10.0);
    let mut builder = RibbonMeshBuilder::new();

    sampler.begin([10.0, 32.0], 0.0);
    let seg = sampler.add_point([50.0, 32.0], 0.1).unwrap();
    canvas.append_segment_mesh(&builder.segment_mesh(seg.a, seg.b).unwrap());
    assert!(canvas.has_signature());
    let drawn = canvas.snapshot().unwrap();
    assert!(drawn.pixels().any(|p| p.0[3] != 0));

    canvas.erase();
    assert!(!canvas.has_signature());
    let blank = canvas.snapshot().unwrap();
    assert!(blank.pixels().all(|p| p.0[3] == 0));
}
