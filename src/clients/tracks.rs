use log::debug;

use crate::clients::{
    entities::{Album, Track},
    errors::Result,
    session::{Session, decode},
};

impl Track {
    /// Fetch the album this track belongs to.
    ///
    /// This consumes one API request.
    pub async fn album(&self, session: &Session) -> Result<Album> {
        session.get_track_album(self.id).await
    }
}

impl Session {
    /// Fetch the track with the given ID.
    ///
    /// Track IDs are unique, so no album (record) ID is needed.
    pub async fn get_track(&self, track_id: u64) -> Result<Track> {
        let payload = self.api_request(&format!("/track/{track_id}")).await?;
        let track: Track = decode(payload)?;
        debug!("Fetched track {track_id}: {} - {}", track.artist, track.title);
        Ok(track)
    }

    /// Fetch only the title of the track with the given ID.
    pub async fn get_track_title(&self, track_id: u64) -> Result<String> {
        let payload = self.api_request(&format!("/track/{track_id}/title")).await?;
        decode(payload)
    }

    /// Fetch the album of the track with the given ID.
    pub async fn get_track_album(&self, track_id: u64) -> Result<Album> {
        let payload = self.api_request(&format!("/track/{track_id}/album")).await?;
        let album: Album = decode(payload)?;
        debug!("Fetched album {} for track {track_id}", album.id);
        Ok(album)
    }
}
