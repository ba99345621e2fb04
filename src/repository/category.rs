use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::category::{Category, CategoryWithCount, NewCategory};
use crate::domain::types::{CategoryId, EntryStatus};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order((categories::name.asc(), categories::id.asc()))
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn list_categories_with_counts(&self) -> RepositoryResult<Vec<CategoryWithCount>> {
        use crate::schema::entries;

        let categories = self.list_categories()?;

        let mut conn = self.conn()?;
        let counts: HashMap<i32, i64> = entries::table
            .filter(entries::status.eq(EntryStatus::Published.as_str()))
            .group_by(entries::category_id)
            .select((entries::category_id, diesel::dsl::count_star()))
            .load::<(Option<i32>, i64)>(&mut conn)?
            .into_iter()
            .filter_map(|(category_id, count)| category_id.map(|id| (id, count)))
            .collect();

        Ok(categories
            .into_iter()
            .map(|category| {
                let entry_count = counts.get(&category.id.get()).copied().unwrap_or(0) as usize;
                CategoryWithCount {
                    category,
                    entry_count,
                }
            })
            .collect())
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = diesel::insert_into(categories::table)
            .values(db_category)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::{categories, entries};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::update(entries::table.filter(entries::category_id.eq(Some(id.get()))))
                .set(entries::category_id.eq(None::<i32>))
                .execute(conn)?;

            diesel::delete(categories::table.filter(categories::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
