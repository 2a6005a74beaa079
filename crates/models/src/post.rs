use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, OnConflict},
    DatabaseConnection, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub author_id: String,
    pub created_at: DateTimeUtc,
    pub last_modified_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a post unless its id is taken. Returns `false` on an id collision.
pub async fn insert_if_absent(db: &DatabaseConnection, post: Model) -> Result<bool, errors::ModelError> {
    let am = ActiveModel {
        id: Set(post.id),
        text: Set(post.text),
        author_id: Set(post.author_id),
        created_at: Set(post.created_at),
        last_modified_at: Set(post.last_modified_at),
    };
    let inserted = Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Id).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(inserted == 1)
}

pub async fn find(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id.to_owned()).one(db).await?)
}

/// Whether the author has written anything at all. Reads at most one row.
pub async fn author_has_posts(db: &DatabaseConnection, author_id: &str) -> Result<bool, errors::ModelError> {
    let first = Entity::find()
        .filter(Column::AuthorId.eq(author_id))
        .limit(1)
        .one(db)
        .await?;
    Ok(first.is_some())
}

/// Newest-first slice of an author's posts, starting at `start_id` inclusive
/// when given. Served by the `(author_id, id DESC)` index.
pub async fn page_by_author(
    db: &DatabaseConnection,
    author_id: &str,
    start_id: Option<&str>,
    limit: u64,
) -> Result<Vec<Model>, errors::ModelError> {
    let mut query = Entity::find().filter(Column::AuthorId.eq(author_id));
    if let Some(start) = start_id {
        query = query.filter(Column::Id.lte(start));
    }
    let rows = query.order_by_desc(Column::Id).limit(limit).all(db).await?;
    Ok(rows)
}

/// Overwrite the editable columns of a post. Returns the number of rows touched.
pub async fn update_text(
    db: &DatabaseConnection,
    id: &str,
    text: &str,
    last_modified_at: DateTimeUtc,
) -> Result<u64, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Text, Expr::value(text.to_owned()))
        .col_expr(Column::LastModifiedAt, Expr::value(last_modified_at))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
