use diesel::prelude::*;

use crate::{
    domain::user::{NewUser as DomainNewUser, User as DomainUser},
    models::user::{NewAuthToken as DbNewAuthToken, NewUser as DbNewUser, User as DbUser},
    repository::errors::RepositoryResult,
    repository::{DieselRepository, UserReader, UserWriter},
};

impl UserReader for DieselRepository {
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::{auth_tokens, users};

        let mut conn = self.conn()?;
        let user = auth_tokens::table
            .inner_join(users::table)
            .filter(auth_tokens::key.eq(key))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }
}

impl UserWriter for DieselRepository {
    fn create_user(
        &self,
        new_user: &DomainNewUser,
        token_key: &str,
    ) -> RepositoryResult<DomainUser> {
        use crate::schema::{auth_tokens, users};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let db_new = DbNewUser::from(new_user);

            let created = diesel::insert_into(users::table)
                .values(&db_new)
                .get_result::<DbUser>(conn)?;

            diesel::insert_into(auth_tokens::table)
                .values(&DbNewAuthToken {
                    key: token_key,
                    user_id: created.id,
                })
                .execute(conn)?;

            Ok(created.into())
        })
    }
}
