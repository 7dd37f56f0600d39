use super::model::Format;

/// Pick the format to download for a track.
///
/// The first format in source order that carries at least one audio channel wins,
/// so the same source data always yields the same choice.
pub fn select_audio_format(formats: &[Format]) -> Option<&Format> {
    formats.iter().find(|f| f.has_audio())
}
