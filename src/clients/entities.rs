use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::clients::errors::{Error, Result};

const MICROS_PER_SEC: u64 = 1_000_000;
const PHOTO_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";
const OFFICERSHIP_DATE_FORMAT: &str = "%Y-%m-%d";

/// A track in the station's music library.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Unique database ID of the track.
    #[serde(rename = "trackid")]
    pub id: u64,
    /// Title of the track.
    pub title: String,
    /// Primary credited artist.
    pub artist: String,
    /// Type code of the track ('central' etc.).
    #[serde(rename = "type")]
    pub track_type: String,
    /// Length of the track, in hours:minutes:seconds.
    pub length: String,
    /// Length of the intro, in seconds.
    pub intro: u64,
    /// True if the track has no expletives.
    #[serde(rename = "clean")]
    pub is_clean: bool,
    /// True if the track is available in the playout system.
    #[serde(rename = "digitised")]
    pub is_digitised: bool,
}

impl Track {
    /// The track's length in seconds.
    ///
    /// Fails if the length is not three colon-separated non-negative integers.
    pub fn length_sec(&self) -> Result<u64> {
        let fields = self.length.replace(':', " ");
        let parts: Vec<&str> = fields.split_whitespace().collect();
        let [hours, minutes, seconds] = parts.as_slice() else {
            return Err(self.length_error(format!("expected 3 fields, found {}", parts.len())));
        };

        let hours = self.length_field(hours)?;
        let minutes = self.length_field(minutes)?;
        let seconds = self.length_field(seconds)?;

        hours
            .checked_mul(60 * 60)
            .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(seconds))
            .ok_or_else(|| self.length_error("length overflows".to_string()))
    }

    /// The track's length in microseconds.
    ///
    /// This is derived from the length in whole seconds, so it is not
    /// precise. Measure the track file itself if exact timing matters.
    pub fn length_usec(&self) -> Result<u64> {
        self.length_sec()?
            .checked_mul(MICROS_PER_SEC)
            .ok_or_else(|| self.length_error("length overflows".to_string()))
    }

    /// The track's intro in microseconds.
    pub fn intro_usec(&self) -> u64 {
        self.intro.saturating_mul(MICROS_PER_SEC)
    }

    fn length_field(&self, field: &str) -> Result<u64> {
        field
            .parse()
            .map_err(|e| self.length_error(format!("{field:?}: {e}")))
    }

    fn length_error(&self, reason: String) -> Error {
        Error::LengthParseError {
            length: self.length.clone(),
            reason,
        }
    }
}

/// An album (physical or digital release) in the station's music library.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Unique database ID of the album.
    #[serde(rename = "recordid")]
    pub id: u64,
    /// Title of the album.
    pub title: String,
    /// Primary credited artist.
    pub artist: String,

    // Dates are kept as received
    /// Date the album entered the library.
    pub date_added: String,
    /// Date the album was released.
    pub date_released: String,
    /// Date the album was last modified.
    pub last_modified: String,

    /// ID of the CD, if the album comes from one.
    #[serde(default, rename = "cdid")]
    pub cd_id: Option<String>,

    /// Location of the physical copy, if any.
    #[serde(default)]
    pub location: Option<String>,
    /// Shelf holding the physical copy.
    #[serde(default)]
    pub shelf_letter: Option<String>,
    /// Position on the shelf.
    #[serde(default)]
    pub shelf_number: Option<String>,

    /// Single-character code of the physical format.
    #[serde(default)]
    pub format: Option<String>,
    /// Single-character code of the physical medium.
    #[serde(default, rename = "media")]
    pub medium: Option<String>,

    /// ID of the member who added the album.
    #[serde(default, rename = "member_add")]
    pub adding_member: Option<u64>,
    /// ID of the member who last modified the album.
    #[serde(default, rename = "member_edit")]
    pub editing_member: Option<u64>,

    /// Record label responsible for the album.
    #[serde(default)]
    pub record_label: Option<String>,

    /// Digitisation status code.
    pub status: String,
}

/// A user's tenure in an officer position.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Officership {
    /// ID of the officer position.
    pub officer_id: u32,
    /// Name of the officer position.
    pub officer_name: String,
    /// ID of the team the position belongs to.
    pub team_id: u32,
    /// Start date as received; empty if unknown.
    pub from_date_raw: String,
    /// Parsed start date, if any.
    pub from_date: Option<NaiveDate>,
    /// End date as received; empty if the officership is current.
    pub till_date_raw: String,
    /// Parsed end date, if any.
    pub till_date: Option<NaiveDate>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct OfficershipRecord {
    #[serde(deserialize_with = "number_from_string")]
    officerid: u32,
    officer_name: String,
    #[serde(deserialize_with = "number_from_string")]
    teamid: u32,
    #[serde(default)]
    from_date: Option<String>,
    #[serde(default)]
    till_date: Option<String>,
}

impl TryFrom<OfficershipRecord> for Officership {
    type Error = Error;

    fn try_from(record: OfficershipRecord) -> Result<Officership> {
        let from_date_raw = record.from_date.unwrap_or_default();
        let till_date_raw = record.till_date.unwrap_or_default();
        Ok(Officership {
            officer_id: record.officerid,
            officer_name: record.officer_name,
            team_id: record.teamid,
            from_date: parse_optional_date(&from_date_raw)?,
            from_date_raw,
            till_date: parse_optional_date(&till_date_raw)?,
            till_date_raw,
        })
    }
}

/// A photo uploaded by a user.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Unique ID of the photo.
    pub photo_id: u64,
    /// Upload time as received, `DD/MM/YYYY HH:MM`.
    pub date_added_raw: String,
    /// Parsed upload time.
    pub date_added: NaiveDateTime,
    /// Image format code.
    pub format: String,
    /// ID of the user who owns the photo.
    pub owner: u64,
    /// Where the image is served from.
    pub url: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct PhotoRecord {
    photoid: u64,
    date_added: String,
    format: String,
    owner: u64,
    url: String,
}

impl TryFrom<PhotoRecord> for Photo {
    type Error = Error;

    fn try_from(record: PhotoRecord) -> Result<Photo> {
        let date_added = NaiveDateTime::parse_from_str(&record.date_added, PHOTO_DATE_FORMAT)
            .map_err(|source| Error::DateParseError {
                raw: record.date_added.clone(),
                source,
            })?;
        Ok(Photo {
            photo_id: record.photoid,
            date_added_raw: record.date_added,
            date_added,
            format: record.format,
            owner: record.owner,
            url: record.url,
        })
    }
}

/// Summary of a show, as listed in a user's show credits.
///
/// The record is kept exactly as the server sent it; the accessors read
/// the commonly used fields out of it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct ShowMeta {
    /// Every field of the record, as received.
    pub fields: Map<String, Value>,
}

impl ShowMeta {
    /// The show's ID, whether sent as a number or a numeric string.
    pub fn show_id(&self) -> Option<u64> {
        match self.fields.get("show_id")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The show's title.
    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    /// Presenter credits, as one display string.
    pub fn credits_string(&self) -> Option<&str> {
        self.text("credits_string")
    }

    /// The show's description.
    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, OFFICERSHIP_DATE_FORMAT)
        .map(Some)
        .map_err(|source| Error::DateParseError {
            raw: raw.to_string(),
            source,
        })
}

// The API sends some IDs as strings holding numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    String(String),
}

fn number_from_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track_with_length(length: &str) -> Track {
        Track {
            id: 1,
            title: "Song".into(),
            artist: "Band".into(),
            track_type: "central".into(),
            length: length.into(),
            intro: 7,
            is_clean: true,
            is_digitised: true,
        }
    }

    #[test]
    fn test_length_sec() {
        assert_eq!(track_with_length("1:02:03").length_sec().unwrap(), 3723);
        assert_eq!(track_with_length("00:03:30").length_sec().unwrap(), 210);
        assert_eq!(track_with_length("0:00:00").length_sec().unwrap(), 0);
    }

    #[test]
    fn test_length_sec_malformed() {
        for length in ["abc", "1:02", "", "1:02:03:04", "1:-2:03", "1:xx:03"] {
            let result = track_with_length(length).length_sec();
            assert!(
                matches!(result, Err(Error::LengthParseError { .. })),
                "{length:?} should not parse"
            );
        }
    }

    #[test]
    fn test_length_usec() {
        assert_eq!(
            track_with_length("0:01:01").length_usec().unwrap(),
            61_000_000
        );
        assert!(matches!(
            track_with_length("1:02").length_usec(),
            Err(Error::LengthParseError { .. })
        ));
    }

    #[test]
    fn test_intro_usec() {
        let mut track = track_with_length("0:03:00");
        assert_eq!(track.intro_usec(), 7_000_000);
        track.intro = 0;
        assert_eq!(track.intro_usec(), 0);
    }

    #[test]
    fn test_track_wire_names() {
        let track: Track = serde_json::from_value(json!({
            "trackid": 42,
            "title": "Song",
            "artist": "Band",
            "type": "central",
            "length": "00:03:30",
            "intro": 12,
            "clean": false,
            "digitised": true
        }))
        .unwrap();
        assert_eq!(track.id, 42);
        assert_eq!(track.track_type, "central");
        assert!(!track.is_clean);
        assert!(track.is_digitised);
    }

    #[test]
    fn test_album_optional_fields() {
        let album: Album = serde_json::from_value(json!({
            "recordid": 7,
            "title": "Record",
            "artist": "Band",
            "date_added": "01/02/2010",
            "date_released": "2009",
            "last_modified": "03/04/2011",
            "media": "c",
            "member_add": 1234,
            "member_edit": null,
            "status": "y"
        }))
        .unwrap();
        assert_eq!(album.id, 7);
        assert_eq!(album.medium.as_deref(), Some("c"));
        assert_eq!(album.adding_member, Some(1234));
        assert_eq!(album.editing_member, None);
        assert_eq!(album.cd_id, None);
    }

    #[test]
    fn test_officership_ids_from_strings_or_numbers() {
        let record: OfficershipRecord = serde_json::from_value(json!({
            "officerid": "12",
            "officer_name": "Station Manager",
            "teamid": 3
        }))
        .unwrap();
        let officership = Officership::try_from(record).unwrap();
        assert_eq!(officership.officer_id, 12);
        assert_eq!(officership.team_id, 3);
        assert_eq!(officership.from_date, None);
        assert_eq!(officership.till_date, None);

        let bad: std::result::Result<OfficershipRecord, _> = serde_json::from_value(json!({
            "officerid": "twelve",
            "officer_name": "Station Manager",
            "teamid": "3"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_officership_till_date_uses_till_raw() {
        let record: OfficershipRecord = serde_json::from_value(json!({
            "officerid": "1",
            "officer_name": "Head of Music",
            "teamid": "2",
            "from_date": "2019-06-01",
            "till_date": "2020-05-31"
        }))
        .unwrap();
        let officership = Officership::try_from(record).unwrap();
        assert_eq!(officership.from_date, NaiveDate::from_ymd_opt(2019, 6, 1));
        assert_eq!(officership.till_date, NaiveDate::from_ymd_opt(2020, 5, 31));
    }

    #[test]
    fn test_photo_date_parsing() {
        let record = PhotoRecord {
            photoid: 5,
            date_added: "15/06/2021 13:45".into(),
            format: "png".into(),
            owner: 99,
            url: "https://ury.org.uk/media/5.png".into(),
        };
        let photo = Photo::try_from(record).unwrap();
        let expected = NaiveDate::from_ymd_opt(2021, 6, 15)
            .and_then(|d| d.and_hms_opt(13, 45, 0))
            .unwrap();
        assert_eq!(photo.date_added, expected);
        assert_eq!(photo.date_added_raw, "15/06/2021 13:45");
    }

    #[test]
    fn test_show_meta_accessors() {
        let show: ShowMeta = serde_json::from_value(json!({
            "show_id": "11",
            "title": "Breakfast",
            "description": null,
            "show_type_id": 1
        }))
        .unwrap();
        assert_eq!(show.show_id(), Some(11));
        assert_eq!(show.title(), Some("Breakfast"));
        assert_eq!(show.credits_string(), None);
        assert_eq!(show.description(), None);
        assert_eq!(show.fields.get("show_type_id"), Some(&json!(1)));
    }

    #[test]
    fn test_show_meta_serializes_as_received() {
        for raw in [
            json!({ "show_id": 12, "title": "Late Night", "description": null }),
            json!({ "show_id": "12", "title": "Late Night" }),
            json!({ "title": "Late Night" }),
        ] {
            let show: ShowMeta = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(serde_json::to_value(&show).unwrap(), raw);
        }
    }

    #[test]
    fn test_intro_usec_saturates() {
        let mut track = track_with_length("0:03:00");
        track.intro = u64::MAX;
        assert_eq!(track.intro_usec(), u64::MAX);
    }
}
