fn main() {
    // The service is declared by hand so the build does not need protoc.
    // Message types live in src/pb.rs.
    let service = tonic_build::manual::Service::builder()
        .name("MovieLibraryService")
        .package("movie_library")
        .method(
            tonic_build::manual::Method::builder()
                .name("load_movies")
                .route_name("LoadMovies")
                .input_type("crate::pb::MovieRequest")
                .output_type("crate::pb::MovieResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .method(
            tonic_build::manual::Method::builder()
                .name("get_movie_details")
                .route_name("GetMovieDetails")
                .input_type("crate::pb::GetMovieDetailsRequest")
                .output_type("crate::pb::GetMovieDetailsResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .method(
            tonic_build::manual::Method::builder()
                .name("update_movie_details")
                .route_name("UpdateMovieDetails")
                .input_type("crate::pb::UpdateMovieDetailsRequest")
                .output_type("crate::pb::UpdateMovieDetailsResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}
