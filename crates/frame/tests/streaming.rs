//! End-to-end tests driving handles through `emit`.

use proptest::prelude::*;
use streamframe::{
    Chunk, Error, Frame, Kind, Series, Streaming, StreamingFrame, StreamingSeries, Value, Window,
};

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|v| Value::Int64(*v)).collect()
}

fn ab(a: &[i64], b: &[i64]) -> Frame {
    Frame::from_columns([("a", ints(a)), ("b", ints(b))]).unwrap()
}

fn keyed(keys: &[&str], x: &[i64]) -> Frame {
    Frame::from_columns([
        ("key", keys.iter().map(|k| Value::from(*k)).collect::<Vec<_>>()),
        ("x", ints(x)),
    ])
    .unwrap()
}

fn series(values: &[i64]) -> Series {
    Series::from_values(values.iter().copied())
}

fn series_values(chunk: &Chunk) -> Vec<Value> {
    chunk.as_series().unwrap().values().to_vec()
}

#[test]
fn running_sum_over_frame_chunks() {
    let sdf = StreamingFrame::with_columns(["a", "b"]);
    let totals = sdf.sum().unwrap();
    let out = totals.sink_to_list();

    sdf.emit(ab(&[1, 2], &[10, 20])).unwrap();
    sdf.emit(ab(&[3], &[30])).unwrap();

    let seen: Vec<Vec<Value>> = out.borrow().iter().map(series_values).collect();
    assert_eq!(seen, vec![ints(&[3, 30]), ints(&[6, 60])]);
}

#[test]
fn running_mean_is_recomputed_from_totals() {
    let s = StreamingSeries::new(Series::empty());
    let means = s.mean().unwrap();
    let out = means.sink_to_list();

    s.emit(series(&[1, 2, 3])).unwrap();
    s.emit(series(&[10])).unwrap();

    assert_eq!(
        *out.borrow(),
        vec![Chunk::from(2.0f64), Chunk::from(4.0f64)]
    );
}

#[test]
fn grouped_aggregates_match_one_shot_result() {
    let chunks = [
        keyed(&["A", "B", "A"], &[1, 2, 3]),
        keyed(&["A"], &[4]),
        keyed(&["B", "C"], &[5, 6]),
    ];

    let sdf = StreamingFrame::with_columns(["key", "x"]);
    let sums = sdf.groupby("key").select("x").sum().unwrap().sink_to_list();
    let means = sdf.groupby("key").select("x").mean().unwrap().sink_to_list();
    for chunk in &chunks {
        sdf.emit(chunk.clone()).unwrap();
    }

    let parts: Vec<Chunk> = chunks.iter().cloned().map(Chunk::Frame).collect();
    let refs: Vec<&Chunk> = parts.iter().collect();
    let whole = Chunk::concat_rows(&refs).unwrap();
    let grouper = "key".into();
    let selector = "x".into();
    let expected_sum = whole.groupby(&grouper).select(Some(&selector)).sum().unwrap();
    let expected_mean = whole.groupby(&grouper).select(Some(&selector)).mean().unwrap();

    let last_sum = sums.borrow().last().cloned().unwrap();
    let last_mean = means.borrow().last().cloned().unwrap();
    assert_eq!(last_sum.index(), expected_sum.index());
    assert_eq!(series_values(&last_sum), series_values(&expected_sum));
    assert_eq!(series_values(&last_mean), series_values(&expected_mean));
}

#[test]
fn rolling_rows_respects_min_periods() {
    let s = StreamingSeries::new(Series::empty());
    let rolled = s.rolling(Window::rows(3).unwrap(), 2).unwrap();
    assert_eq!(rolled.kind(), Kind::Series);
    let out = rolled.sink_to_list();

    s.emit(series(&[1])).unwrap();
    assert!(out.borrow().is_empty());
    for v in 2..=4 {
        s.emit(series(&[v])).unwrap();
    }

    let seen: Vec<Vec<Value>> = out.borrow().iter().map(series_values).collect();
    assert_eq!(seen, vec![ints(&[1, 2]), ints(&[1, 2, 3]), ints(&[2, 3, 4])]);
}

#[test]
fn rolling_duration_uses_time_index() {
    fn timed(ms: &[i64]) -> Frame {
        ab(ms, ms)
            .with_index(ms.iter().map(|t| Value::DateTime(*t)).collect())
            .unwrap()
    }
    let sdf = StreamingFrame::with_columns(["a", "b"]);
    let rolled = sdf.rolling(Window::parse("1s").unwrap(), 10).unwrap();
    let out = rolled.sink_to_list();

    sdf.emit(timed(&[0, 500])).unwrap();
    sdf.emit(timed(&[1200])).unwrap();

    let out = out.borrow();
    assert_eq!(out.len(), 2, "duration windows emit from the first row");
    assert_eq!(
        out[1].index().unwrap(),
        &[Value::DateTime(500), Value::DateTime(1200)]
    );
}

#[test]
fn schema_violation_does_not_advance_state() {
    let sdf = StreamingFrame::with_columns(["a", "b"]);
    let totals = sdf.sum().unwrap();
    let out = totals.sink_to_list();
    let example_before = sdf.example().clone();

    let only_a = Frame::from_columns([("a", ints(&[100]))]).unwrap();
    let err = sdf.emit(only_a).unwrap_err();
    assert!(matches!(err, Error::SchemaViolation { .. }));
    assert_eq!(sdf.example(), &example_before);
    assert!(out.borrow().is_empty());

    let swapped = Frame::from_columns([("b", ints(&[1])), ("a", ints(&[1]))]).unwrap();
    assert!(matches!(sdf.emit(swapped), Err(Error::SchemaViolation { .. })));

    sdf.emit(ab(&[1], &[2])).unwrap();
    assert_eq!(series_values(&out.borrow()[0]), ints(&[1, 2]));
}

#[test]
fn type_violation_for_wrong_kind() {
    let sdf = StreamingFrame::with_columns(["a"]);
    assert!(matches!(
        sdf.emit(series(&[1])),
        Err(Error::TypeViolation { .. })
    ));
}

#[test]
fn derived_examples_match_direct_computation() {
    let example = ab(&[1, 2], &[3, 4]);
    let sdf = StreamingFrame::new(example.clone());
    let direct = Chunk::Frame(example.clone());

    let plus = (&sdf + 10i64).unwrap();
    assert_eq!(plus.example(), &direct.add(&Chunk::from(10i64)).unwrap());

    let mapped = sdf
        .map_partitions(|c| c.get(&"a".into())?.mul(&Chunk::from(3i64)), None)
        .unwrap();
    assert_eq!(
        mapped.example(),
        &direct.get(&"a".into()).unwrap().mul(&Chunk::from(3i64)).unwrap()
    );
    assert_eq!(mapped.kind(), Kind::Series);

    let keyed_example = keyed(&["p", "q", "p"], &[1, 2, 3]);
    let grouped = StreamingFrame::new(keyed_example.clone())
        .groupby("key")
        .sum()
        .unwrap();
    let grouper = "key".into();
    assert_eq!(
        grouped.example(),
        &Chunk::Frame(keyed_example).groupby(&grouper).sum().unwrap()
    );
}

#[test]
fn streaming_key_waits_for_both_flows() {
    let sdf = StreamingFrame::with_columns(["x"]);
    let keys = StreamingSeries::new(Series::empty());
    let totals = sdf.groupby(&keys).sum().unwrap();
    let out = totals.sink_to_list();

    fn x(v: &[i64]) -> Frame {
        Frame::from_columns([("x", ints(v))]).unwrap()
    }
    sdf.emit(x(&[1, 2])).unwrap();
    sdf.emit(x(&[3, 4])).unwrap();
    assert!(out.borrow().is_empty());

    keys.emit(Series::from_values(["a", "b"])).unwrap();
    assert_eq!(out.borrow().len(), 1);
    let totals = out.borrow()[0].as_frame().unwrap().clone();
    assert_eq!(totals.column_values("x").unwrap(), ints(&[1, 2]).as_slice());

    keys.emit(Series::from_values(["a", "a"])).unwrap();
    let totals = out.borrow()[1].as_frame().unwrap().clone();
    assert_eq!(totals.column_values("x").unwrap(), ints(&[8, 2]).as_slice());
}

#[test]
fn streaming_key_mean_tracks_sums_and_counts() {
    let sdf = StreamingFrame::with_columns(["x"]);
    let keys = StreamingSeries::new(Series::empty());
    let means = sdf.groupby(&keys).mean().unwrap();
    assert_eq!(means.kind(), Kind::Frame);
    let out = means.sink_to_list();

    fn x(v: &[i64]) -> Frame {
        Frame::from_columns([("x", ints(v))]).unwrap()
    }
    sdf.emit(x(&[1, 2, 3])).unwrap();
    keys.emit(Series::from_values(["a", "b", "a"])).unwrap();
    // "a" is absent from the second tick and keeps its mean.
    sdf.emit(x(&[10])).unwrap();
    keys.emit(Series::from_values(["b"])).unwrap();

    let out = out.borrow();
    assert_eq!(out.len(), 2);
    let first = out[0].as_frame().unwrap();
    assert_eq!(first.index(), &[Value::from("a"), Value::from("b")]);
    assert_eq!(
        first.column_values("x").unwrap(),
        &[Value::Float64(2.0), Value::Float64(2.0)]
    );
    let second = out[1].as_frame().unwrap();
    assert_eq!(second.index(), &[Value::from("a"), Value::from("b")]);
    assert_eq!(
        second.column_values("x").unwrap(),
        &[Value::Float64(2.0), Value::Float64(6.0)]
    );
}

#[test]
fn failed_tick_keeps_zipped_operands_in_step() {
    let s = StreamingSeries::new(Series::empty());
    let left = s.map_partitions(|c| Ok(c.clone()), None).unwrap();
    let right = s
        .map_partitions(
            |c| {
                let rejected = c
                    .as_series()
                    .is_some_and(|values| values.values().contains(&Value::Int64(99)));
                if rejected {
                    Err(Error::invalid_operation("rejected value"))
                } else {
                    Ok(c.clone())
                }
            },
            None,
        )
        .unwrap();
    let total = left.add(&right).unwrap();
    let out = total.sink_to_list();

    s.emit(series(&[1])).unwrap();
    assert!(s.emit(series(&[99])).is_err());
    s.emit(series(&[5])).unwrap();

    let seen: Vec<Vec<Value>> = out.borrow().iter().map(series_values).collect();
    assert_eq!(seen, vec![ints(&[2]), ints(&[10])]);
}

#[test]
fn failed_tick_leaves_assigned_columns_in_step() {
    let sdf = StreamingFrame::new(ab(&[1], &[2]));
    let scaled = (&sdf.column("a").unwrap() * 1i64)
        .unwrap()
        .into_series()
        .unwrap();
    let checked = sdf
        .column("b")
        .unwrap()
        .map_partitions(
            |c| {
                if c.sum()? == Chunk::from(0i64) {
                    Err(Error::invalid_operation("zero column"))
                } else {
                    Ok(c.clone())
                }
            },
            None,
        )
        .unwrap()
        .into_series()
        .unwrap();
    let wider = sdf.assign([("c", &scaled), ("d", &checked)]).unwrap();
    let out = wider.sink_to_list();

    // "c" is buffered before "d" fails; the failed tick must not leave it behind.
    assert!(sdf.emit(ab(&[5], &[0])).is_err());
    sdf.emit(ab(&[4], &[8])).unwrap();

    let out = out.borrow();
    assert_eq!(out.len(), 1);
    let frame = out[0].as_frame().unwrap();
    assert_eq!(frame.column_values("c").unwrap(), ints(&[4]).as_slice());
    assert_eq!(frame.column_values("d").unwrap(), ints(&[8]).as_slice());
}

#[test]
fn set_item_leaves_old_handle_frozen() {
    let sdf = StreamingFrame::new(ab(&[1], &[2]));
    let old_out = sdf.sink_to_list();
    let updated = sdf.set_item("c", (&sdf.column("a").unwrap() * 2i64).unwrap()).unwrap();
    let new_out = updated.sink_to_list();

    assert_eq!(sdf.columns().len(), 2);
    assert_eq!(updated.columns().len(), 3);

    sdf.emit(ab(&[5], &[6])).unwrap();
    assert_eq!(old_out.borrow()[0].columns().unwrap().len(), 2);
    assert_eq!(
        new_out.borrow()[0].as_frame().unwrap().column_values("c").unwrap(),
        ints(&[10]).as_slice()
    );

    // The new handle enforces its own, wider schema.
    assert!(matches!(
        updated.emit(ab(&[1], &[1])),
        Err(Error::SchemaViolation { .. })
    ));
}

#[test]
fn downstream_errors_surface_at_emit() {
    let s = StreamingSeries::new(Series::empty());
    let _labels = s.groupby(vec![Value::Int64(0)]).sum().unwrap();
    assert!(matches!(
        s.emit(series(&[1, 2])),
        Err(Error::LengthMismatch { .. })
    ));
}

#[test]
fn previews() {
    let sdf = StreamingFrame::new(ab(&[1, 2, 3], &[4, 5, 6]));
    let text = sdf.to_string();
    assert!(text.starts_with("StreamingFrame - elements like:\n"));
    assert_eq!(text.lines().count(), 4, "header line, column line and two rows");

    let generic = Streaming::new(Chunk::from(1i64));
    assert!(generic.to_html().contains("<pre>1</pre>"));
}

proptest! {
    /// A running sum through a series handle equals the prefix sum after every chunk.
    #[test]
    fn handle_running_sum_matches_prefix(chunks in prop::collection::vec(prop::collection::vec(-50i64..50, 0..8), 1..12)) {
        let s = StreamingSeries::new(Series::empty());
        let out = s.sum().unwrap().sink_to_list();
        let mut total = 0i64;
        for (i, chunk) in chunks.iter().enumerate() {
            s.emit(series(chunk)).unwrap();
            total += chunk.iter().sum::<i64>();
            prop_assert_eq!(&out.borrow()[i], &Chunk::from(total));
        }
    }
}
