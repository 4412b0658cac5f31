use log::debug;

use crate::clients::{
    entities::{Officership, OfficershipRecord, Photo, PhotoRecord, ShowMeta},
    errors::{Error, Result},
    session::{Session, decode},
};

impl Session {
    /// Fetch the bio of the user with the given ID.
    ///
    /// A user who never wrote a bio gets [`Error::NoBio`]; an empty bio is
    /// returned as an empty string.
    pub async fn get_user_bio(&self, user_id: u64) -> Result<String> {
        let payload = self.api_request(&format!("/user/{user_id}/bio/")).await?;
        if payload.is_none() {
            return Err(Error::NoBio);
        }
        decode(payload)
    }

    /// Fetch the display name of the user with the given ID.
    ///
    /// Unlike the bio, a missing name is not special-cased and fails to
    /// decode.
    pub async fn get_user_name(&self, user_id: u64) -> Result<String> {
        let payload = self.api_request(&format!("/user/{user_id}/name/")).await?;
        decode(payload)
    }

    /// Fetch the profile photo of the user with the given ID.
    pub async fn get_user_profile_photo(&self, user_id: u64) -> Result<Photo> {
        let payload = self
            .api_request(&format!("/user/{user_id}/profilephoto/"))
            .await?;
        if payload.is_none() {
            return Err(Error::NoProfilePhoto);
        }
        let record: PhotoRecord = decode(payload)?;
        Photo::try_from(record)
    }

    /// Fetch every officership the user with the given ID has held.
    ///
    /// Fails on the first officership with an unparseable date.
    pub async fn get_user_officerships(&self, user_id: u64) -> Result<Vec<Officership>> {
        let payload = self
            .api_request(&format!("/user/{user_id}/officerships/"))
            .await?;
        let records: Vec<OfficershipRecord> = decode(payload)?;
        debug!("User {user_id} has {} officerships", records.len());
        records.into_iter().map(Officership::try_from).collect()
    }

    /// Fetch the shows the user with the given ID is credited on.
    pub async fn get_user_show_credits(&self, user_id: u64) -> Result<Vec<ShowMeta>> {
        let payload = self.api_request(&format!("/user/{user_id}/shows/")).await?;
        let shows: Vec<ShowMeta> = decode(payload)?;
        debug!("User {user_id} is credited on {} shows", shows.len());
        Ok(shows)
    }
}
