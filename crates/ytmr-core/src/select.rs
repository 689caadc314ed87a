//! Stream selection policy.
//!
//! Preferred formats are looked up by id among audio-capable
//! representations, first preference wins. Without a match, the highest
//! bitrate audio-only representation is taken, and as a last resort the first
//! representation that carries audio at all.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::extract::Representation;

/// Which branch of the policy picked a representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedBy {
    /// Matched this preference-list entry.
    Preference(String),
    /// Highest-bitrate audio-only representation.
    BestAudioOnly,
    /// First representation with audio, in source order.
    FirstWithAudio,
}

#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub representation: &'a Representation,
    pub selected_by: SelectedBy,
}

/// Maps format id to representation, keeping only those with audio.
///
/// On duplicate ids the higher `abr` wins; equal bitrates keep the first seen.
pub fn index_by_format(formats: &[Representation]) -> HashMap<&str, &Representation> {
    let mut by_id: HashMap<&str, &Representation> = HashMap::new();
    for f in formats.iter().filter(|f| f.has_audio()) {
        let Some(id) = f.format_id.as_deref() else {
            continue;
        };
        match by_id.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(f);
            }
            Entry::Occupied(mut slot) => {
                if f.audio_bitrate() > slot.get().audio_bitrate() {
                    slot.insert(f);
                }
            }
        }
    }
    by_id
}

/// First preference present in `index`, with the matching entry.
pub fn select_preferred<'a, 'p>(
    index: &HashMap<&str, &'a Representation>,
    preferences: &'p [String],
) -> Option<(&'p str, &'a Representation)> {
    preferences
        .iter()
        .find_map(|pref| index.get(pref.as_str()).map(|r| (pref.as_str(), *r)))
}

/// Audio-only representation with the highest `abr`; ties keep source order.
pub fn best_audio_only(formats: &[Representation]) -> Option<&Representation> {
    formats
        .iter()
        .filter(|f| f.is_audio_only())
        .fold(None, |best: Option<&Representation>, f| match best {
            Some(b) if b.audio_bitrate() >= f.audio_bitrate() => Some(b),
            _ => Some(f),
        })
}

pub fn first_with_audio(formats: &[Representation]) -> Option<&Representation> {
    formats.iter().find(|f| f.has_audio())
}

/// Applies the full policy. `None` when nothing carries audio.
pub fn select<'a>(formats: &'a [Representation], preferences: &[String]) -> Option<Selection<'a>> {
    if !preferences.is_empty() {
        let index = index_by_format(formats);
        if let Some((pref, representation)) = select_preferred(&index, preferences) {
            tracing::debug!("found preferred stream {}", pref);
            return Some(Selection {
                representation,
                selected_by: SelectedBy::Preference(pref.to_string()),
            });
        }
        tracing::debug!("no preferred stream among {} formats", formats.len());
    }

    if let Some(representation) = best_audio_only(formats) {
        return Some(Selection {
            representation,
            selected_by: SelectedBy::BestAudioOnly,
        });
    }

    first_with_audio(formats).map(|representation| {
        tracing::debug!("no audio-only stream; falling back to first format with audio");
        Selection {
            representation,
            selected_by: SelectedBy::FirstWithAudio,
        }
    })
}
