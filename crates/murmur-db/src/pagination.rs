use murmur_types::{ChatError, Result};

/// Slice the window `[offset, offset + limit)` out of `items`.
///
/// Callers guarantee `limit > 0`. An offset at or past the end is reported as
/// `OutOfRange`; a limit that overruns the end is truncated silently.
pub fn paginate<T>(items: &[T], limit: usize, offset: usize) -> Result<&[T]> {
    if offset >= items.len() {
        return Err(ChatError::OutOfRange);
    }

    let end = offset.saturating_add(limit).min(items.len());
    Ok(&items[offset..end])
}
