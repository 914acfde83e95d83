//! Domain types shared by the catalog server and its clients
//!
//! `Movie` is the record both the persisted document and the HTTP gateway
//! speak; it converts to and from the protobuf message at the RPC boundary.

use serde::{Deserialize, Serialize};

/// Status carried by a successful `LoadMovies` response (HTTP Reset Content)
pub const STATUS_RESET_CONTENT: i32 = 205;

/// Status carried by a successful `UpdateMovieDetails` response (HTTP Created)
pub const STATUS_CREATED: i32 = 201;

/// A single catalog record
///
/// `release_date` is free-form text. It is compared for exact string
/// equality and never parsed as a calendar date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: String,
    pub genre: String,
    pub release_date: String,
}

impl Movie {
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        release_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            genre: genre.into(),
            release_date: release_date.into(),
        }
    }

    /// Whether this movie is selected by a release-date query.
    /// An empty query matches everything.
    pub fn matches_release_date(&self, release_date: &str) -> bool {
        release_date.is_empty() || self.release_date == release_date
    }
}

// Conversion helpers between our types and protobuf types
impl From<crate::pb::Movie> for Movie {
    fn from(pb: crate::pb::Movie) -> Self {
        Self {
            title: pb.title,
            genre: pb.genre,
            release_date: pb.release_date,
        }
    }
}

impl From<Movie> for crate::pb::Movie {
    fn from(movie: Movie) -> Self {
        Self {
            title: movie.title,
            genre: movie.genre,
            release_date: movie.release_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_everything() {
        let movie = Movie::new("Betty-1", "crime", "01-10-2023");
        assert!(movie.matches_release_date(""));
        assert!(movie.matches_release_date("01-10-2023"));
        assert!(!movie.matches_release_date("1-10-2023"));
    }

    #[test]
    fn test_json_field_names() {
        let movie = Movie::new("Betty-2", "sci-fi", "02-10-2023");
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Betty-2",
                "genre": "sci-fi",
                "releaseDate": "02-10-2023"
            })
        );
    }
}
