//! Wire messages for the movie library gRPC service
//!
//! Standard protobuf encoding via prost; the service stubs are generated
//! by build.rs.

#[derive(Clone, PartialEq, prost::Message)]
pub struct Movie {
    #[prost(string, tag = "1")]
    pub title: String,
    #[prost(string, tag = "2")]
    pub genre: String,
    #[prost(string, tag = "3")]
    pub release_date: String,
}

/// Full replacement payload for `LoadMovies`
#[derive(Clone, PartialEq, prost::Message)]
pub struct MovieRequest {
    #[prost(message, repeated, tag = "1")]
    pub movies: Vec<Movie>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MovieResponse {
    #[prost(int32, tag = "1")]
    pub status_code: i32,
}

/// An empty release date matches every movie
#[derive(Clone, PartialEq, prost::Message)]
pub struct GetMovieDetailsRequest {
    #[prost(string, tag = "1")]
    pub release_date: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetMovieDetailsResponse {
    #[prost(message, repeated, tag = "1")]
    pub movies: Vec<Movie>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateMovieDetailsRequest {
    /// 1-based position in the current catalog
    #[prost(int32, tag = "1")]
    pub movie_id: i32,
    #[prost(message, optional, tag = "2")]
    pub updated_movie: Option<Movie>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateMovieDetailsResponse {
    #[prost(int32, tag = "1")]
    pub status_code: i32,
    #[prost(message, optional, tag = "2")]
    pub updated_movie: Option<Movie>,
}

include!(concat!(
    env!("OUT_DIR"),
    "/movie_library.MovieLibraryService.rs"
));
