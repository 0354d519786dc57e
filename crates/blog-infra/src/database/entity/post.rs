//! Post entity for SeaORM.
//!
//! The author is stored as a JSONB document next to the scalar columns.

use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};

use blog_core::domain::{Author, BlogPost, NewPost, PostId, creation_timestamp};

/// JSON document stored in the `author` column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDocument {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub author: AuthorDocument,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Author> for AuthorDocument {
    fn from(author: Author) -> Self {
        Self {
            first_name: author.first_name,
            last_name: author.last_name,
        }
    }
}

impl From<AuthorDocument> for Author {
    fn from(doc: AuthorDocument) -> Self {
        Self {
            first_name: doc.first_name,
            last_name: doc.last_name,
        }
    }
}

/// Conversion from SeaORM Model to Domain BlogPost.
impl From<Model> for BlogPost {
    fn from(model: Model) -> Self {
        Self {
            id: PostId::from(model.id),
            author: model.author.into(),
            title: model.title,
            content: model.content,
            created: model.created.into(),
        }
    }
}

/// Build the row for a post that is about to be inserted.
///
/// The id and creation time are assigned here, at the store boundary.
pub fn new_active_model(post: NewPost) -> ActiveModel {
    ActiveModel {
        id: Set(PostId::generate().as_uuid()),
        author: Set(post.author.into()),
        title: Set(post.title),
        content: Set(post.content),
        created: Set(creation_timestamp().into()),
    }
}
