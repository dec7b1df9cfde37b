use facegate_lib::ids;
use facegate_api::users::Role;

use chrono::{DateTime, Utc};
use tokio_postgres::{Error as PgError};
use deadpool_postgres::GenericClient;

pub const DEFAULT_PICTURE: &str = "/assets/default-avatar.png";

fn role_from_i16(v: i16) -> Option<Role> {
    match v {
        0 => Some(Role::User),
        1 => Some(Role::Manager),
        2 => Some(Role::Admin),
        _ => None
    }
}

fn role_as_i16(role: &Role) -> i16 {
    match role {
        Role::User => 0,
        Role::Manager => 1,
        Role::Admin => 2,
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: ids::UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub picture: String,
    pub role: Role,
    pub deleted: bool,
    pub created: DateTime<Utc>,
}

pub struct UserBuilder {
    name: String,
    email: Option<String>,
    phone: Option<String>,
    picture: Option<String>,
    role: Role,
}

impl UserBuilder {
    pub fn email<E>(mut self, email: E) -> Self
    where
        E: Into<String>
    {
        self.email = Some(email.into());
        self
    }

    pub fn phone<P>(mut self, phone: P) -> Self
    where
        P: Into<String>
    {
        self.phone = Some(phone.into());
        self
    }

    pub fn picture(mut self, picture: Option<String>) -> Self {
        self.picture = picture;
        self
    }

    pub async fn build(self, conn: &impl GenericClient) -> Result<User, PgError> {
        let picture = self.picture
            .unwrap_or_else(|| String::from(DEFAULT_PICTURE));
        let role = role_as_i16(&self.role);

        let row = conn.query_one(
            "\
            insert into users (name, email, phone, picture, role) values \
            ($1, $2, $3, $4, $5) \
            returning id, created",
            &[&self.name, &self.email, &self.phone, &picture, &role]
        ).await?;

        Ok(User {
            id: row.get(0),
            name: self.name,
            email: self.email,
            phone: self.phone,
            picture,
            role: self.role,
            deleted: false,
            created: row.get(1),
        })
    }
}

impl User {
    pub fn builder<N>(name: N) -> UserBuilder
    where
        N: Into<String>
    {
        UserBuilder {
            name: name.into(),
            email: None,
            phone: None,
            picture: None,
            role: Role::default(),
        }
    }

    fn from_row(row: tokio_postgres::Row) -> User {
        User {
            id: row.get(0),
            name: row.get(1),
            email: row.get(2),
            phone: row.get(3),
            picture: row.get(4),
            role: role_from_i16(row.get(5))
                .expect("invalid role returned from database for user"),
            deleted: row.get(6),
            created: row.get(7),
        }
    }

    /// includes soft deleted rows. the auth gate checks the flag itself
    pub async fn retrieve(
        conn: &impl GenericClient,
        id: &ids::UserId,
    ) -> Result<Option<User>, PgError> {
        Ok(conn.query_opt(
            "\
            select users.id, \
                   users.name, \
                   users.email, \
                   users.phone, \
                   users.picture, \
                   users.role, \
                   users.deleted, \
                   users.created \
            from users \
            where users.id = $1",
            &[id]
        ).await?.map(User::from_row))
    }

    pub async fn retrieve_email(
        conn: &impl GenericClient,
        email: &str,
    ) -> Result<Option<User>, PgError> {
        Ok(conn.query_opt(
            "\
            select users.id, \
                   users.name, \
                   users.email, \
                   users.phone, \
                   users.picture, \
                   users.role, \
                   users.deleted, \
                   users.created \
            from users \
            where users.email = $1 and \
                  users.deleted = false",
            &[&email]
        ).await?.map(User::from_row))
    }

    pub async fn retrieve_phone_or_email(
        conn: &impl GenericClient,
        phone: &str,
        email: &str,
    ) -> Result<Option<User>, PgError> {
        Ok(conn.query_opt(
            "\
            select users.id, \
                   users.name, \
                   users.email, \
                   users.phone, \
                   users.picture, \
                   users.role, \
                   users.deleted, \
                   users.created \
            from users \
            where (users.phone = $1 or users.email = $2) and \
                  users.deleted = false",
            &[&phone, &email]
        ).await?.map(User::from_row))
    }
}

impl From<&User> for facegate_api::users::User {
    fn from(user: &User) -> Self {
        facegate_api::users::User {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            picture: user.picture.clone(),
            role: user.role,
        }
    }
}
