use approx::assert_abs_diff_eq;
use serde_json::json;
use timeline_model::core::{ContainerRef, ThreadRef};
use timeline_model::{
    ModelState, TimelineError, TimelineModel, TimelineModelConfig, TracePayload,
};

fn payload(value: serde_json::Value) -> TracePayload {
    TracePayload::from_value(value)
}

fn unshifted() -> TimelineModelConfig {
    TimelineModelConfig::new().with_shift_world_to_zero(false)
}

#[test]
fn single_event_trace_is_shifted_to_zero() {
    let trace = payload(json!([
        { "ph": "X", "name": "X", "cat": "test", "pid": 7, "tid": 1, "ts": 5000, "dur": 10000 }
    ]));
    let model =
        TimelineModel::from_traces(trace, TimelineModelConfig::default()).expect("model");

    assert_eq!(model.state(), ModelState::Frozen);
    assert_eq!(model.bounds().min(), Some(0.0));
    assert_eq!(model.bounds().max(), Some(10.0));

    let event = model.event_of_name("X", false, false).expect("event X");
    assert_abs_diff_eq!(event.start, 0.0);
    assert_abs_diff_eq!(event.end(), 10.0);
    assert_eq!(event.thread, ThreadRef::new(7, 1));
    assert!(model.process(7).is_some());
}

#[test]
fn frozen_model_rejects_every_mutation() {
    let mut model = TimelineModel::new();
    model
        .import_traces(TracePayload::empty(), true)
        .expect("empty import");
    assert!(model.is_frozen());

    assert!(matches!(
        model.import_traces(TracePayload::empty(), true),
        Err(TimelineError::AlreadyFrozen { .. })
    ));
    assert!(matches!(
        model.get_or_create_process(1),
        Err(TimelineError::AlreadyFrozen { .. })
    ));
    assert!(matches!(
        model.add_mapping_from_tab_id_to_renderer_thread("tab", ThreadRef::new(1, 1)),
        Err(TimelineError::AlreadyFrozen { .. })
    ));
    assert!(matches!(
        model.finalize_import(false),
        Err(TimelineError::AlreadyFrozen { .. })
    ));
}

#[test]
fn empty_trace_produces_empty_frozen_model() {
    let model = TimelineModel::from_traces(payload(json!([])), TimelineModelConfig::default())
        .expect("model");
    assert!(model.bounds().is_empty());
    assert!(model.processes().is_empty());
    assert!(model.all_events().is_empty());
    assert!(model.import_errors().is_empty());
}

#[test]
fn payload_without_importer_is_rejected() {
    let mut model = TimelineModel::new();
    let result = model.import_traces(payload(json!("not a trace")), true);
    assert!(matches!(result, Err(TimelineError::NoImporterFound)));
    assert_eq!(model.state(), ModelState::Empty);
}

#[test]
fn update_bounds_is_idempotent() {
    let trace = payload(json!([
        { "ph": "X", "name": "a", "pid": 1, "tid": 1, "ts": 1000, "dur": 3000, "tts": 10, "tdur": 500 },
        { "ph": "X", "name": "b", "pid": 1, "tid": 2, "ts": 9000, "dur": 1000 }
    ]));
    let mut model = TimelineModel::from_traces(trace, unshifted()).expect("model");

    model.update_bounds();
    let first = (model.bounds(), model.thread_time_bounds().clone());
    model.update_bounds();
    let second = (model.bounds(), model.thread_time_bounds().clone());
    assert_eq!(first, second);

    assert_eq!(model.bounds().min(), Some(1.0));
    assert_eq!(model.bounds().max(), Some(10.0));
    let thread_bounds = model.thread_time_bounds()[&ThreadRef::new(1, 1)];
    assert_abs_diff_eq!(thread_bounds.min().expect("min"), 0.01, epsilon = 1e-9);
    assert_abs_diff_eq!(thread_bounds.max().expect("max"), 0.51, epsilon = 1e-9);
    assert!(model.thread_time_bounds()[&ThreadRef::new(1, 2)].is_empty());
}

#[test]
fn open_slices_are_closed_at_trace_end() {
    let trace = payload(json!([
        { "ph": "B", "name": "open", "pid": 1, "tid": 1, "ts": 1000, "tts": 100 },
        { "ph": "X", "name": "later", "pid": 1, "tid": 1, "ts": 4000, "dur": 2000, "tts": 300, "tdur": 200 }
    ]));
    let model = TimelineModel::from_traces(trace, unshifted()).expect("model");

    let open = model.event_of_name("open", true, true).expect("open slice");
    assert!(open.did_not_finish);
    assert_abs_diff_eq!(open.end(), 6.0);
    assert_abs_diff_eq!(
        open.thread_duration.expect("thread duration"),
        0.4,
        epsilon = 1e-9
    );

    let later = model.event_of_name("later", false, true).expect("later slice");
    assert_eq!(later.parent_slice(), Some(open.id));
    assert!(model.events_of_name("later", true).is_empty());
}

#[test]
fn event_lookup_reports_missing_and_ambiguous_names() {
    let trace = payload(json!([
        { "ph": "X", "name": "dup", "pid": 1, "tid": 1, "ts": 5000, "dur": 1000 },
        { "ph": "X", "name": "dup", "pid": 1, "tid": 1, "ts": 1000, "dur": 1000 }
    ]));
    let model = TimelineModel::from_traces(trace, unshifted()).expect("model");

    match model.event_of_name("dup", false, true) {
        Err(TimelineError::AmbiguousEvent { name, count }) => {
            assert_eq!(name, "dup");
            assert_eq!(count, 2);
        }
        other => panic!("expected ambiguous lookup, got {other:?}"),
    }

    let first = model.event_of_name("dup", false, false).expect("first dup");
    assert_abs_diff_eq!(first.start, 1.0);

    assert!(matches!(
        model.event_of_name("missing", false, false),
        Err(TimelineError::EventNotFound { .. })
    ));
}

#[test]
fn containers_are_walked_depth_first() {
    let trace = payload(json!([
        { "ph": "X", "name": "outer", "pid": 2, "tid": 5, "ts": 0, "dur": 10000 },
        { "ph": "X", "name": "inner", "pid": 2, "tid": 5, "ts": 1000, "dur": 1000 }
    ]));
    let model = TimelineModel::from_traces(trace, unshifted()).expect("model");

    let outer = model.event_of_name("outer", true, true).expect("outer").slice_ref();
    let inner = model.event_of_name("inner", false, true).expect("inner").slice_ref();
    let thread = ThreadRef::new(2, 5);

    assert_eq!(
        model.all_containers(),
        vec![
            ContainerRef::Process(2),
            ContainerRef::Thread(thread),
            ContainerRef::Slice(outer),
            ContainerRef::Slice(inner),
        ]
    );
    assert_eq!(model.all_event_refs(), vec![outer, inner]);
    assert_abs_diff_eq!(model.self_time(outer).expect("self time"), 9.0);
}

#[test]
fn tab_mappings_resolve_renderer_thread_and_process() {
    let mut model = TimelineModel::new();
    model
        .get_or_create_process(3)
        .expect("process")
        .get_or_create_thread(4)
        .set_name("CrRendererMain");
    model
        .add_mapping_from_tab_id_to_renderer_thread("tab-1", ThreadRef::new(3, 4))
        .expect("mapping");
    model.set_browser_process(Some(3));
    model.finalize_import(true).expect("finalize");

    let thread = model.renderer_thread_from_tab_id("tab-1").expect("thread");
    assert_eq!(thread.name(), Some("CrRendererMain"));
    assert_eq!(
        model.renderer_process_from_tab_id("tab-1").map(|p| p.pid()),
        Some(3)
    );
    assert!(model.renderer_thread_from_tab_id("tab-2").is_none());
    assert_eq!(model.browser_process().map(|p| p.pid()), Some(3));
}

#[test]
fn manual_population_is_finalized_like_an_import() {
    let mut model = TimelineModel::new();
    assert_eq!(model.state(), ModelState::Empty);
    let thread = model
        .get_or_create_process(9)
        .expect("process")
        .get_or_create_thread(1);
    thread.push_complete_slice("cat", "a", 100.0, 5.0, None, None, serde_json::Map::new());
    thread.push_complete_slice("cat", "b", 101.0, 1.0, None, None, serde_json::Map::new());
    assert_eq!(model.state(), ModelState::Importing);

    model.finalize_import(true).expect("finalize");

    let a = model.event_of_name("a", true, true).expect("a");
    let b = model.event_of_name("b", false, true).expect("b");
    assert_abs_diff_eq!(a.start, 0.0);
    assert_abs_diff_eq!(b.start, 1.0);
    assert_eq!(b.parent_slice(), Some(a.id));
}

#[test]
fn deeply_nested_unclosed_slices_import_without_exhausting_the_stack() {
    const DEPTH: usize = 100_000;
    let events: Vec<serde_json::Value> = (0..DEPTH)
        .map(|i| {
            let name = if i == 0 { "root" } else { "leaked" };
            json!({ "ph": "B", "name": name, "pid": 1, "tid": 1, "ts": i })
        })
        .collect();
    let model = TimelineModel::from_traces(
        payload(serde_json::Value::Array(events)),
        TimelineModelConfig::default(),
    )
    .expect("model");

    assert_eq!(model.all_events().len(), DEPTH);
    assert_eq!(model.all_containers().len(), DEPTH + 2);
    let root = model.event_of_name("root", true, true).expect("root");
    assert!(root.did_not_finish);
    assert_eq!(root.sub_slices().len(), 1);
    assert!(model.events_of_name("leaked", true).is_empty());
    assert_eq!(model.events_of_name("leaked", false).len(), DEPTH - 1);
}

#[test]
fn container_order_spans_processes_and_threads_in_insertion_order() {
    let trace = payload(json!([
        { "ph": "X", "name": "p2t1", "pid": 2, "tid": 1, "ts": 0, "dur": 4000 },
        { "ph": "X", "name": "p2t1-child", "pid": 2, "tid": 1, "ts": 1000, "dur": 1000 },
        { "ph": "X", "name": "p2t3", "pid": 2, "tid": 3, "ts": 0, "dur": 1000 },
        { "ph": "X", "name": "p1t1", "pid": 1, "tid": 1, "ts": 0, "dur": 1000 }
    ]));
    let model = TimelineModel::from_traces(trace, unshifted()).expect("model");
    let slice = |name: &str| {
        ContainerRef::Slice(model.event_of_name(name, false, true).expect(name).slice_ref())
    };

    assert_eq!(
        model.all_containers(),
        vec![
            ContainerRef::Process(2),
            ContainerRef::Thread(ThreadRef::new(2, 1)),
            slice("p2t1"),
            slice("p2t1-child"),
            ContainerRef::Thread(ThreadRef::new(2, 3)),
            slice("p2t3"),
            ContainerRef::Process(1),
            ContainerRef::Thread(ThreadRef::new(1, 1)),
            slice("p1t1"),
        ]
    );
}
