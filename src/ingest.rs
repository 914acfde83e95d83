//! Decoding of XML movie documents
//!
//! ```xml
//! <movies>
//!   <movie title="Betty-1" genre="crime" releaseDate="01-10-2023"/>
//! </movies>
//! ```

use crate::error::{Error, Result};
use crate::protocol::Movie;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

const ROOT_ELEMENT: &[u8] = b"movies";

#[derive(Debug, Deserialize)]
struct MoviesDocument {
    #[serde(rename = "movie", default)]
    movies: Vec<MovieElement>,
}

#[derive(Debug, Deserialize)]
struct MovieElement {
    #[serde(rename = "@title")]
    title: String,
    #[serde(rename = "@genre")]
    genre: String,
    #[serde(rename = "@releaseDate")]
    release_date: String,
}

impl From<MovieElement> for Movie {
    fn from(element: MovieElement) -> Self {
        Movie::new(element.title, element.genre, element.release_date)
    }
}

/// Parse a `<movies>` document into catalog records, in document order
pub fn parse_catalog_document(markup: &[u8]) -> Result<Vec<Movie>> {
    let text = std::str::from_utf8(markup)
        .map_err(|e| Error::Parse(format!("document is not valid UTF-8: {e}")))?;

    check_root(text)?;

    let document: MoviesDocument =
        quick_xml::de::from_str(text).map_err(|e| Error::Parse(e.to_string()))?;
    Ok(document.movies.into_iter().map(Movie::from).collect())
}

/// Parse an update document, which must carry exactly one movie
pub fn parse_single_movie(markup: &[u8]) -> Result<Movie> {
    let mut movies = parse_catalog_document(markup)?;
    match movies.len() {
        1 => Ok(movies.remove(0)),
        n => Err(Error::Validation(format!(
            "update document must contain exactly one movie, found {n}"
        ))),
    }
}

/// Titles of every movie in `genre`, in document order
pub fn titles_by_genre<'a>(movies: &'a [Movie], genre: &str) -> Vec<&'a str> {
    movies
        .iter()
        .filter(|movie| movie.genre == genre)
        .map(|movie| movie.title.as_str())
        .collect()
}

fn check_root(text: &str) -> Result<()> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.name();
                if name.as_ref() == ROOT_ELEMENT {
                    return Ok(());
                }
                return Err(Error::Parse(format!(
                    "expected <movies> root element, found <{}>",
                    String::from_utf8_lossy(name.as_ref())
                )));
            }
            Ok(Event::Eof) => return Err(Error::Parse("document is empty".to_string())),
            Ok(_) => {}
            Err(e) => return Err(Error::Parse(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const HERD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<movies>
    <movie title="Betty-1" genre="crime" releaseDate="01-10-2023"/>
    <movie title="Betty-2" genre="sci-fi" releaseDate="02-10-2023"/>
    <movie title="Betty-3" genre="crime" releaseDate="02-10-2023"></movie>
</movies>"#;

    #[test]
    fn test_parse_document() {
        let movies = parse_catalog_document(HERD.as_bytes()).unwrap();
        assert_eq!(
            movies,
            vec![
                Movie::new("Betty-1", "crime", "01-10-2023"),
                Movie::new("Betty-2", "sci-fi", "02-10-2023"),
                Movie::new("Betty-3", "crime", "02-10-2023"),
            ]
        );
    }

    #[test]
    fn test_empty_collection() {
        assert!(parse_catalog_document(b"<movies/>").unwrap().is_empty());
        assert!(parse_catalog_document(b"<movies></movies>")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_malformed_markup() {
        let err = parse_catalog_document(b"<movies><movie title=\"x\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = parse_catalog_document(b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = parse_catalog_document(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_wrong_root() {
        let err = parse_catalog_document(
            br#"<films><movie title="a" genre="b" releaseDate="c"/></films>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("<films>"));
    }

    #[test]
    fn test_missing_attribute() {
        let err =
            parse_catalog_document(br#"<movies><movie title="a" genre="b"/></movies>"#)
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_single_movie() {
        let movie = parse_single_movie(
            br#"<movies><movie title="Betty-9" genre="drama" releaseDate="09-10-2023"/></movies>"#,
        )
        .unwrap();
        assert_eq!(movie, Movie::new("Betty-9", "drama", "09-10-2023"));

        let err = parse_single_movie(HERD.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = parse_single_movie(b"<movies/>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_titles_by_genre() {
        let movies = parse_catalog_document(HERD.as_bytes()).unwrap();
        assert_eq!(titles_by_genre(&movies, "crime"), vec!["Betty-1", "Betty-3"]);
        assert!(titles_by_genre(&movies, "western").is_empty());
    }
}
