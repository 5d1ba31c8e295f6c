//! Projections from domain records to their public JSON shapes.

use folio_core::domain::{Movie, PostWithAuthor, User};
use folio_shared::dto::{AuthorResource, MovieResource, PostResource};

pub fn author(user: &User) -> AuthorResource {
    AuthorResource {
        id: user.id,
        name: user.name.clone(),
    }
}

/// A post with its author embedded.
pub fn post(record: &PostWithAuthor) -> PostResource {
    let post = &record.post;

    PostResource {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        body: post.body.clone(),
        author: author(&record.author),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn movie(movie: &Movie) -> MovieResource {
    MovieResource {
        id: movie.id,
        name: movie.name.clone(),
        title: movie.title.clone(),
        author: movie.author.clone(),
    }
}
