//! Range header handling
//!
//! Resolves a single `bytes=` range against a known file size. Malformed
//! and multi-range headers are ignored rather than rejected, per RFC 7233.

/// Outcome of resolving a Range header against a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve the whole file (no header, or a header we ignore)
    Full,
    /// Serve the inclusive byte span `start..=end`
    Partial { start: usize, end: usize },
    /// Range cannot be satisfied, respond 416
    Unsatisfiable,
}

/// Resolve an optional Range header value for a file of `len` bytes.
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
pub fn resolve(header: Option<&str>, len: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };

    // Multi-range responses (multipart/byteranges) are not supported;
    // fall back to the full file.
    if spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((first, last)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    if len == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    // Suffix form: "-N" means the final N bytes
    if first.is_empty() {
        let Ok(suffix) = last.parse::<usize>() else {
            return RangeOutcome::Full;
        };
        if suffix == 0 {
            return RangeOutcome::Unsatisfiable;
        }
        return RangeOutcome::Partial {
            start: len.saturating_sub(suffix),
            end: len - 1,
        };
    }

    let Ok(start) = first.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if last.is_empty() {
        len - 1
    } else {
        match last.parse::<usize>() {
            Ok(e) if e >= start => e.min(len - 1),
            Ok(_) => return RangeOutcome::Unsatisfiable,
            Err(_) => return RangeOutcome::Full,
        }
    };

    RangeOutcome::Partial { start, end }
}
