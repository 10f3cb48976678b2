//! Bounded window retention.

use alloc::format;
use streamframe_core::{Chunk, Error, Result, Value, Window};

/// Appends `new` to the retained rows and trims them to `window`.
///
/// Returns the new buffer and the visible output, which is `None` until the
/// buffer holds at least `min_periods` rows. Duration windows ignore
/// `min_periods` and use 1.
pub fn roll(
    buffer: Option<&Chunk>,
    new: &Chunk,
    window: &Window,
    min_periods: usize,
) -> Result<(Chunk, Option<Chunk>)> {
    if new.kind() == streamframe_core::ChunkKind::Scalar {
        return Err(Error::invalid_operation("cannot roll a stream of scalars"));
    }
    let combined = match buffer {
        Some(buffer) => Chunk::concat_rows(&[buffer, new])?,
        None => new.clone(),
    };

    let retained = match window {
        Window::Rows(n) => combined.tail(*n),
        Window::Duration(_) => trim_to_span(&combined, window)?,
    };
    tracing::trace!(rows = retained.len(), "roll");

    let visible = if retained.len() >= window.effective_min_periods(min_periods) {
        Some(retained.clone())
    } else {
        None
    };
    Ok((retained, visible))
}

fn trim_to_span(chunk: &Chunk, window: &Window) -> Result<Chunk> {
    let span = window.span_millis().unwrap_or(0);
    match chunk.max_index() {
        None => Ok(chunk.clone()),
        Some(Value::DateTime(latest)) => {
            chunk.slice_from(&Value::DateTime(latest.saturating_sub(span)))
        }
        Some(other) => Err(Error::invalid_window(format!(
            "duration window needs a datetime index, got {}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use streamframe_core::Series;

    fn series(values: &[i64]) -> Chunk {
        Chunk::Series(Series::from_values(values.iter().copied()))
    }

    fn timed(ms: &[i64]) -> Chunk {
        Chunk::Series(
            Series::new(
                ms.iter().map(|t| Value::DateTime(*t)).collect(),
                ms.iter().map(|t| Value::Int64(*t)).collect(),
            )
            .unwrap(),
        )
    }

    fn visible_values(out: &Option<Chunk>) -> Option<Vec<Value>> {
        out.as_ref().map(|c| c.as_series().unwrap().values().to_vec())
    }

    #[test]
    fn test_row_window_with_min_periods() {
        let window = Window::rows(3).unwrap();
        let mut buffer: Option<Chunk> = None;
        let mut outputs = vec![];
        for v in 1..=4 {
            let (next, visible) = roll(buffer.as_ref(), &series(&[v]), &window, 2).unwrap();
            buffer = Some(next);
            outputs.push(visible_values(&visible));
        }
        let ints = |xs: &[i64]| Some(xs.iter().map(|x| Value::Int64(*x)).collect::<Vec<_>>());
        assert_eq!(
            outputs,
            vec![None, ints(&[1, 2]), ints(&[1, 2, 3]), ints(&[2, 3, 4])]
        );
    }

    #[test]
    fn test_duration_window_keeps_recent_rows() {
        let window = Window::parse("2s").unwrap();
        let (buffer, _) = roll(None, &timed(&[0, 1000]), &window, 5).unwrap();
        let (buffer, visible) = roll(Some(&buffer), &timed(&[2500, 3000]), &window, 5).unwrap();
        assert_eq!(buffer.index().unwrap(), &[Value::DateTime(1000), Value::DateTime(2500), Value::DateTime(3000)]);
        assert!(visible.is_some());
    }

    #[test]
    fn test_duration_window_rejects_positional_index() {
        let window = Window::parse("1s").unwrap();
        assert!(matches!(
            roll(None, &series(&[1]), &window, 1),
            Err(Error::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_scalars_are_rejected() {
        let window = Window::rows(2).unwrap();
        assert!(roll(None, &Chunk::from(1i64), &window, 1).is_err());
    }
}
