//! Domain entities - the core business objects.

mod access_token;
mod movie;
mod page;
mod post;
mod user;

pub use access_token::AccessToken;
pub use movie::{Movie, MovieInput};
pub use page::PageRequest;
pub use post::{Post, PostInput, PostWithAuthor};
pub use user::{Credentials, NewUser, Registration, User};
