//! OpenAPI document, generated from the handler annotations.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use folio_shared::ErrorResponse;
use folio_shared::dto::{
    AccessTokenData, AuthorResource, LoginRequest, MovieData, MovieListData, MovieRequest,
    MovieResource, PostData, PostListData, PostRequest, PostResource, RegisterRequest,
};

use crate::handlers::{auth, movies, posts};

/// Name of the bearer scheme referenced by protected paths.
pub const BEARER_AUTH: &str = "bearerAuth";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        version = "1.0.0",
        description = "Token auth, blog posts and movies."
    ),
    paths(
        auth::login,
        auth::register,
        posts::index,
        posts::store,
        posts::show,
        posts::update,
        posts::destroy,
        movies::index,
        movies::store,
        movies::show,
        movies::update,
        movies::destroy,
    ),
    components(schemas(
        ErrorResponse,
        AccessTokenData,
        AuthorResource,
        PostResource,
        PostData,
        PostListData,
        MovieResource,
        MovieData,
        MovieListData,
        LoginRequest,
        RegisterRequest,
        PostRequest,
        MovieRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Posts", description = "Blog posts, soft-deleted on delete"),
        (name = "Movies", description = "Movies"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let bearer = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build();
            components.add_security_scheme(BEARER_AUTH, SecurityScheme::Http(bearer));
        }
    }
}
