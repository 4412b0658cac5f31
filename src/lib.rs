//! myradio - Client for the MyRadio station management API
//!
//! This library fetches tracks, albums and user records from a MyRadio
//! server and decodes them into typed values. Every accessor is a method on
//! [`clients::Session`] and costs one API request.
//!
//! ```ignore
//! use myradio::clients::Session;
//!
//! let session = Session::try_default().await?;
//! let track = session.get_track(1234).await?;
//! println!("{} runs for {}s", track.title, track.length_sec()?);
//! let album = track.album(&session).await?;
//! ```

/// Client modules for the MyRadio API
pub mod clients;
