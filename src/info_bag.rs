//! The now-playing information bag and the keys read from it.

use std::collections::HashMap;

use crate::convert::ForeignValue;

/// The six now-playing keys this crate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKey {
    Title,
    Album,
    Artist,
    Duration,
    PlaybackRate,
    ElapsedTime,
}

impl InfoKey {
    pub const ALL: [InfoKey; 6] = [
        InfoKey::Title,
        InfoKey::Album,
        InfoKey::Artist,
        InfoKey::Duration,
        InfoKey::PlaybackRate,
        InfoKey::ElapsedTime,
    ];

    /// Key under which MediaRemote stores this value in `nowPlayingInfo`.
    pub fn media_remote_key(self) -> &'static str {
        match self {
            InfoKey::Title => "kMRMediaRemoteNowPlayingInfoTitle",
            InfoKey::Album => "kMRMediaRemoteNowPlayingInfoAlbum",
            InfoKey::Artist => "kMRMediaRemoteNowPlayingInfoArtist",
            InfoKey::Duration => "kMRMediaRemoteNowPlayingInfoDuration",
            InfoKey::PlaybackRate => "kMRMediaRemoteNowPlayingInfoPlaybackRate",
            InfoKey::ElapsedTime => "kMRMediaRemoteNowPlayingInfoElapsedTime",
        }
    }

    pub fn from_media_remote_key(key: &str) -> Option<InfoKey> {
        InfoKey::ALL
            .into_iter()
            .find(|candidate| candidate.media_remote_key() == key)
    }
}

/// Loosely-typed key/value bag describing the current item.
///
/// Any key may be missing; [`InfoBag::lookup`] treats that the same as a
/// stored null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoBag {
    values: HashMap<InfoKey, ForeignValue>,
}

impl InfoBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: InfoKey, value: ForeignValue) {
        self.values.insert(key, value);
    }

    pub fn lookup(&self, key: InfoKey) -> &ForeignValue {
        const MISSING: &ForeignValue = &ForeignValue::Null;
        self.values.get(&key).unwrap_or(MISSING)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(InfoKey, ForeignValue)> for InfoBag {
    fn from_iter<I: IntoIterator<Item = (InfoKey, ForeignValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
