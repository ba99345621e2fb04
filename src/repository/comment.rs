use diesel::prelude::*;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::EntryId;
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CommentReader, CommentWriter, DieselRepository};

impl CommentReader for DieselRepository {
    fn list_top_level_comments(&self, entry_id: EntryId) -> RepositoryResult<Vec<Comment>> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;

        let items = comments::table
            .inner_join(users::table)
            .filter(comments::entry_id.eq(entry_id.get()))
            .filter(comments::parent_id.is_null())
            .order((comments::created_at.desc(), comments::id.desc()))
            .select((comments::all_columns, users::username))
            .load::<(DbComment, String)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Comment>, _>>()?;

        Ok(items)
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;

        let (created, author_name) = conn.transaction::<_, RepositoryError, _>(|conn| {
            let db_comment: DbNewComment = comment.into();
            let created = diesel::insert_into(comments::table)
                .values(&db_comment)
                .get_result::<DbComment>(conn)?;

            let author_name = users::table
                .filter(users::id.eq(created.author_id))
                .select(users::username)
                .first::<String>(conn)?;

            Ok((created, author_name))
        })?;

        Ok((created, author_name).try_into()?)
    }
}
