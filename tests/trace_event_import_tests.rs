use approx::assert_abs_diff_eq;
use serde_json::json;
use timeline_model::core::ThreadRef;
use timeline_model::import::ImporterKind;
use timeline_model::{TimelineModel, TimelineModelConfig, TracePayload};

fn import(value: serde_json::Value) -> TimelineModel {
    TimelineModel::from_traces(
        TracePayload::from_value(value),
        TimelineModelConfig::new().with_shift_world_to_zero(false),
    )
    .expect("trace import")
}

fn error_messages(model: &TimelineModel) -> Vec<&str> {
    model
        .import_errors()
        .iter()
        .map(|error| error.message.as_str())
        .collect()
}

#[test]
fn begin_end_pairs_build_nested_slices() {
    let model = import(json!([
        { "ph": "B", "name": "outer", "cat": "c", "pid": 1, "tid": 1, "ts": 0 },
        { "ph": "B", "name": "inner", "cat": "c", "pid": 1, "tid": 1, "ts": 1000 },
        { "ph": "E", "pid": 1, "tid": 1, "ts": 2000, "args": { "result": "ok" } },
        { "ph": "E", "pid": 1, "tid": 1, "ts": 5000 }
    ]));

    let outer = model.event_of_name("outer", true, true).expect("outer");
    let inner = model.event_of_name("inner", false, true).expect("inner");
    assert_abs_diff_eq!(outer.duration, 5.0);
    assert_abs_diff_eq!(inner.duration, 1.0);
    assert!(!outer.did_not_finish);
    assert_eq!(inner.parent_slice(), Some(outer.id));
    assert_eq!(outer.sub_slices(), &[inner.id]);
    assert_eq!(inner.args.get("result"), Some(&json!("ok")));
    assert!(model.import_errors().is_empty());
}

#[test]
fn unmatched_end_and_unknown_phase_are_recorded() {
    let model = import(json!([
        { "ph": "E", "name": "stray", "pid": 1, "tid": 1, "ts": 0 },
        { "ph": "Z", "name": "mystery", "pid": 1, "tid": 1, "ts": 0 },
        { "ph": "C", "name": "counter", "pid": 1, "tid": 1, "ts": 0, "args": { "value": 3 } },
        { "ph": "X", "name": "no-thread", "ts": 0, "dur": 1 },
        { "ph": 5 }
    ]));

    let messages = error_messages(&model);
    assert_eq!(messages.len(), 4, "{messages:?}");
    assert!(messages[0].contains("without a matching B"));
    assert!(messages[1].contains("Unrecognized event phase: Z"));
    assert!(messages[2].contains("no pid/tid"));
    assert!(messages[3].contains("malformed trace event #4"));
    assert!(
        model
            .import_errors()
            .iter()
            .all(|error| error.importer == ImporterKind::TraceEvent)
    );
}

#[test]
fn instant_events_become_zero_length_slices() {
    let model = import(json!([
        { "ph": "X", "name": "task", "pid": 1, "tid": 1, "ts": 0, "dur": 4000 },
        { "ph": "I", "name": "mark", "pid": 1, "tid": 1, "ts": 2000 }
    ]));

    let mark = model.event_of_name("mark", false, true).expect("mark");
    let task = model.event_of_name("task", true, true).expect("task");
    assert_eq!(mark.duration, 0.0);
    assert_eq!(mark.parent_slice(), Some(task.id));
}

#[test]
fn metadata_events_name_threads_and_processes() {
    let model = import(json!([
        { "ph": "M", "name": "process_name", "pid": 4, "args": { "name": "Renderer" } },
        { "ph": "M", "name": "process_labels", "pid": 4, "args": { "labels": "example.com, news" } },
        { "ph": "M", "name": "thread_name", "pid": 4, "tid": 9, "args": { "name": "CrRendererMain" } },
        { "ph": "M", "name": "thread_sort_index", "pid": 4, "tid": 9, "args": { "sort_index": 1 } },
        { "ph": "M", "name": "bogus", "pid": 4, "tid": 9, "args": {} }
    ]));

    let process = model.process(4).expect("process");
    assert_eq!(process.name(), Some("Renderer"));
    assert_eq!(
        process.labels(),
        &["example.com".to_owned(), "news".to_owned()]
    );
    assert_eq!(
        model.thread(ThreadRef::new(4, 9)).and_then(|t| t.name()),
        Some("CrRendererMain")
    );
    assert_eq!(model.metadata().len(), 5);
    assert_eq!(error_messages(&model), vec!["Unrecognized metadata name: bogus"]);
}

#[test]
fn object_payload_records_trace_metadata() {
    let model = import(json!({
        "traceEvents": [
            { "ph": "X", "name": "work", "pid": 1, "tid": 1, "ts": 1000, "dur": 1000 }
        ],
        "metadata": { "product": "Chrome" }
    }));

    assert!(model.event_of_name("work", true, true).is_ok());
    let entry = &model.metadata()[0];
    assert_eq!(entry.name, "metadata");
    assert_eq!(entry.value, json!({ "product": "Chrome" }));
}

#[test]
fn flow_steps_link_enclosing_slices() {
    let model = import(json!([
        { "ph": "X", "name": "send", "pid": 1, "tid": 1, "ts": 0, "dur": 10000 },
        { "ph": "X", "name": "recv", "pid": 1, "tid": 2, "ts": 20000, "dur": 5000 },
        { "ph": "s", "name": "ipc", "cat": "mojo", "id": 7, "pid": 1, "tid": 1, "ts": 5000 },
        { "ph": "f", "name": "ipc", "cat": "mojo", "id": 7, "pid": 1, "tid": 2, "ts": 21000 },
        { "ph": "s", "name": "lonely", "cat": "mojo", "id": "0x8", "pid": 1, "tid": 1, "ts": 1000 }
    ]));

    let flows = model.flow_events();
    assert_eq!(flows.len(), 1);
    let flow = &flows[0];
    assert_eq!(flow.id, "7");
    assert_eq!(flow.category, "mojo");
    assert_eq!(model.slice(flow.from).map(|s| s.name.as_str()), Some("send"));
    assert_eq!(model.slice(flow.to).map(|s| s.name.as_str()), Some("recv"));

    let messages = error_messages(&model);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("single step"));
}

#[test]
fn truncated_trace_text_still_imports() {
    let text = "[{\"ph\":\"X\",\"name\":\"a\",\"pid\":1,\"tid\":1,\"ts\":0,\"dur\":1000},\n";
    let payload = TracePayload::from_json_str(text).expect("repaired payload");
    let model = TimelineModel::from_traces(payload, TimelineModelConfig::default())
        .expect("model");
    assert_abs_diff_eq!(model.bounds().max().expect("max"), 1.0);
}

#[test]
fn shift_moves_every_event_by_the_earliest_start() {
    let model = TimelineModel::from_traces(
        TracePayload::from_value(json!([
            { "ph": "X", "name": "a", "pid": 1, "tid": 1, "ts": 100000, "dur": 4000 },
            { "ph": "X", "name": "b", "pid": 2, "tid": 1, "ts": 103000, "dur": 1000 },
            { "ph": "X", "name": "c", "pid": 1, "tid": 1, "ts": 101000, "dur": 1000 }
        ])),
        TimelineModelConfig::default(),
    )
    .expect("model");

    let start_of = |name: &str| model.event_of_name(name, false, true).expect(name).start;
    assert_abs_diff_eq!(start_of("a"), 0.0);
    assert_abs_diff_eq!(start_of("b"), 3.0);
    assert_abs_diff_eq!(start_of("c"), 1.0);
    assert_abs_diff_eq!(model.bounds().max().expect("max"), 4.0);
}

#[test]
fn thread_start_is_kept_without_thread_duration() {
    let model = import(json!([
        { "ph": "X", "name": "cpu", "pid": 1, "tid": 1, "ts": 0, "dur": 2000, "tts": 500 },
        { "ph": "X", "name": "timed", "pid": 1, "tid": 2, "ts": 0, "dur": 2000, "tts": 100, "tdur": 300 }
    ]));

    let cpu = model.event_of_name("cpu", true, true).expect("cpu");
    assert_eq!(cpu.thread_start, Some(0.5));
    assert_eq!(cpu.thread_duration, None);
    let bounds = model.thread_time_bounds()[&ThreadRef::new(1, 1)];
    assert_eq!(bounds.min(), Some(0.5));
    assert_eq!(bounds.max(), Some(0.5));

    let timed = model.event_of_name("timed", true, true).expect("timed");
    assert_abs_diff_eq!(timed.thread_end().expect("thread end"), 0.4, epsilon = 1e-9);
}
