//! Shared helpers for turning tagged sections into generators.

use mdfx_config::{join_path, ConfigSection, Entry, ErrorSink};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Key holding the phase offset of periodic generators.
pub(crate) const INITIAL_PROGRESS: &str = "initialProgress";

/// Distance from the top of a progress range below which progress snaps to 0.
pub(crate) const PROGRESS_EPSILON: f64 = 1e-9;

/// Find the single generator tag among the keys of `section`.
///
/// Returns the resolved kind plus the key exactly as written, so the payload
/// can be looked up again.
pub(crate) fn select_tag<K: Copy>(
    section: &ConfigSection,
    lookup: fn(&str) -> Option<K>,
    sink: &mut dyn ErrorSink,
    path: &str,
) -> ProviderResult<(K, String)> {
    let matches: Vec<(K, &str)> = section
        .keys()
        .filter_map(|key| lookup(key).map(|kind| (kind, key)))
        .collect();

    match matches.as_slice() {
        [(kind, key)] => {
            for extra in section.keys().filter(|other| other != key) {
                debug!(path, key = extra, "ignoring key beside provider tag");
            }
            Ok((*kind, key.to_string()))
        }
        [] => {
            let message = match section.keys().next() {
                Some(only) if section.len() == 1 => {
                    format!("Provider type not recognised: {only}")
                }
                _ => "Must specify either a provider or a number".to_string(),
            };
            Err(ProviderError::invalid(message, path).report(sink))
        }
        _ => Err(ProviderError::invalid(
            "Too many sections; choose a single provider",
            path,
        )
        .report(sink)),
    }
}

/// The body of a tag that must be a nested section.
pub(crate) fn require_section(
    section: &ConfigSection,
    tag: &str,
    sink: &mut dyn ErrorSink,
    path: &str,
) -> ProviderResult<ConfigSection> {
    match section.entry(tag) {
        Some(Entry::Section(body)) => Ok(body),
        Some(other) => Err(ProviderError::invalid(
            format!("{tag} must be a section, found {}", other.type_name()),
            &join_path(path, tag),
        )
        .report(sink)),
        None => Err(ProviderError::missing(tag, &join_path(path, tag)).report(sink)),
    }
}

/// Read the section under `tag` with `read`, extending the path by the tag.
pub(crate) fn with_body<T>(
    section: &ConfigSection,
    tag: &str,
    sink: &mut dyn ErrorSink,
    path: &str,
    read: fn(&ConfigSection, &mut dyn ErrorSink, &str) -> ProviderResult<T>,
) -> ProviderResult<T> {
    let body = require_section(section, tag, sink, path)?;
    read(&body, sink, &join_path(path, tag))
}

/// Phase offset of a periodic generator; absent means 0, negatives are mirrored.
pub(crate) fn read_initial_progress(
    section: &ConfigSection,
    sink: &mut dyn ErrorSink,
    path: &str,
) -> ProviderResult<f64> {
    match section.entry(INITIAL_PROGRESS) {
        None => Ok(0.0),
        Some(Entry::Number(value)) => Ok(value.abs()),
        Some(other) => Err(ProviderError::invalid(
            format!("{INITIAL_PROGRESS} must be a number, found {}", other.type_name()),
            &join_path(path, INITIAL_PROGRESS),
        )
        .report(sink)),
    }
}

/// Wrap `progress` into `[0, range)`.
pub(crate) fn wrap_progress(progress: f64, range: f64) -> f64 {
    let wrapped = progress.rem_euclid(range);
    if range - wrapped < PROGRESS_EPSILON {
        0.0
    } else {
        wrapped
    }
}

/// Key used when writing the `index`th positional argument.
pub(crate) fn arg_key(index: usize) -> String {
    match u8::try_from(index) {
        Ok(offset) if offset < 26 => char::from(b'a' + offset).to_string(),
        _ => format!("arg{index}"),
    }
}

/// Check an argument count against `[min, max]`.
pub(crate) fn check_arity(
    tag: &str,
    found: usize,
    min: usize,
    max: Option<usize>,
    path: &str,
) -> ProviderResult<()> {
    let message = match max {
        Some(max) if min == max && found != min => {
            format!("{tag} requires exactly {min} arguments, found {found}")
        }
        Some(max) if found > max => {
            format!("{tag} accepts at most {max} arguments, found {found}")
        }
        _ if found < min => format!("{tag} requires at least {min} arguments, found {found}"),
        _ => return Ok(()),
    };
    Err(ProviderError::invalid(message, path))
}
