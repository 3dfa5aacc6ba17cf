//! Dotted-numeric version comparison.
//!
//! Versions are compared segment by segment as integers, so `1.10.0` is newer
//! than `1.9.0`. Missing trailing segments count as zero (`1.2` equals
//! `1.2.0`). Pre-release and build suffixes are never ranked: callers strip
//! them with [`release_core`] before comparing.

use std::cmp::Ordering;

use thiserror::Error;

/// Reasons a version string is rejected by the comparator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version string is empty")]
    Empty,
    #[error("empty segment at position {position} in '{version}'")]
    EmptySegment { version: String, position: usize },
    #[error("invalid character '{character}' in '{version}'")]
    InvalidCharacter { version: String, character: char },
    #[error("segment at position {position} in '{version}' is too large")]
    SegmentOverflow { version: String, position: usize },
}

/// Returns `true` when `latest` is strictly newer than `current`.
///
/// Both inputs must be of the form `N(.N)*`. Any suffix such as `-beta.1`
/// has to be removed from `current` beforehand; this function performs no
/// suffix handling and rejects it as an invalid character.
pub fn is_newer(current: &str, latest: &str) -> Result<bool, VersionError> {
    Ok(compare(current, latest)? == Ordering::Less)
}

/// Compares two dotted-numeric versions.
///
/// Walks both strings in lock-step. The first segment pair that differs
/// decides the result; an exhausted side contributes `0` for every remaining
/// position.
pub fn compare(current: &str, latest: &str) -> Result<Ordering, VersionError> {
    let current_segments = segments(current)?;
    let latest_segments = segments(latest)?;

    let len = current_segments.len().max(latest_segments.len());
    for idx in 0..len {
        let a = current_segments.get(idx).copied().unwrap_or(0);
        let b = latest_segments.get(idx).copied().unwrap_or(0);
        match a.cmp(&b) {
            Ordering::Equal => continue,
            ord => return Ok(ord),
        }
    }

    Ok(Ordering::Equal)
}

/// Removes build metadata, keeping everything before the first `+`.
///
/// pub.dev publishes versions such as `0.8.9+1`; the `+1` never takes part
/// in ordering.
pub fn strip_build(version: &str) -> &str {
    version.split_once('+').map_or(version, |(base, _)| base)
}

/// The `N(.N)*` part of a version with any pre-release tag and build
/// metadata removed. `"1.2.3-beta.1+7"` and `"1.2.3+7"` both give `"1.2.3"`.
pub fn release_core(version: &str) -> &str {
    strip_build(strip_prerelease(version))
}

/// Removes a pre-release tag, keeping everything before the first `-`.
///
/// `"1.2.3-beta.1"` becomes `"1.2.3"`; strings without `-` are returned
/// unchanged.
pub fn strip_prerelease(version: &str) -> &str {
    version.split_once('-').map_or(version, |(base, _)| base)
}

/// Whether a published version carries a pre-release tag. A `-` inside
/// build metadata (`1.0.0+build-1`) does not count.
pub fn is_prerelease(version: &str) -> bool {
    strip_build(version).contains('-')
}

fn segments(version: &str) -> Result<Vec<u64>, VersionError> {
    if version.is_empty() {
        return Err(VersionError::Empty);
    }

    version
        .split('.')
        .enumerate()
        .map(|(position, segment)| segment_value(version, position, segment))
        .collect()
}

/// Accumulates the digits of one segment left to right.
fn segment_value(version: &str, position: usize, segment: &str) -> Result<u64, VersionError> {
    if segment.is_empty() {
        return Err(VersionError::EmptySegment {
            version: version.to_string(),
            position,
        });
    }

    let mut value: u64 = 0;
    for character in segment.chars() {
        let Some(digit) = character.to_digit(10) else {
            return Err(VersionError::InvalidCharacter {
                version: version.to_string(),
                character,
            });
        };
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| VersionError::SegmentOverflow {
                version: version.to_string(),
                position,
            })?;
    }

    Ok(value)
}
