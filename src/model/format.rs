//! Audio stream selection

use crate::config::FormatPolicy;
use crate::error::LoadError;

use super::types::AudioFormatCandidate;

/// Pick the stream to play.
///
/// Prefers the highest-bitrate candidate of the policy codec at or above the
/// bitrate floor, then the highest-bitrate candidate of any codec. Ties keep
/// the provider's order. The winner must carry a URL.
pub fn select_format<'a>(
    candidates: &'a [AudioFormatCandidate],
    policy: &FormatPolicy,
) -> Result<&'a AudioFormatCandidate, LoadError> {
    let preferred = best_by_bitrate(candidates.iter().filter(|candidate| {
        candidate.codec.starts_with(policy.codec.as_str())
            && candidate.bitrate_bps >= policy.min_bitrate_bps
    }));

    let winner = preferred
        .or_else(|| best_by_bitrate(candidates.iter()))
        .ok_or(LoadError::NoAudioFormatFound)?;

    match winner.url.as_deref() {
        Some(url) if !url.is_empty() => Ok(winner),
        _ => Err(LoadError::NoAudioFormatFound),
    }
}

fn best_by_bitrate<'a>(
    candidates: impl Iterator<Item = &'a AudioFormatCandidate>,
) -> Option<&'a AudioFormatCandidate> {
    candidates.fold(None::<&'a AudioFormatCandidate>, |best, candidate| match best {
        Some(current) if current.bitrate_bps >= candidate.bitrate_bps => Some(current),
        _ => Some(candidate),
    })
}
