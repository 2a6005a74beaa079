use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const AUTHOR_ID_DESC_INDEX: &str = "idx_post_author_id_desc";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Post: (author_id ASC, id DESC) so a page is a single range scan
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(AUTHOR_ID_DESC_INDEX)
                    .table(Post::Table)
                    .col(Post::AuthorId)
                    .col((Post::Id, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(AUTHOR_ID_DESC_INDEX).table(Post::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Post { Table, Id, AuthorId }
