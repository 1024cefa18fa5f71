//! Test fixtures for API integration tests
//!
//! Provides seed data written straight through a store session.

#![allow(dead_code)]

use quill_api::models::{NewPost, NewUser};
use quill_api::store::Store;

/// A user with the titles of the posts they own
pub struct SeedUser {
    pub username: &'static str,
    pub email: &'static str,
    pub posts: &'static [&'static str],
}

/// Three users: two with posts and one without
pub const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        username: "ada",
        email: "ada@example.com",
        posts: &["engines", "notes"],
    },
    SeedUser {
        username: "grace",
        email: "grace@example.com",
        posts: &["compilers"],
    },
    SeedUser {
        username: "linus",
        email: "linus@example.com",
        posts: &[],
    },
];

/// Commit the seed users and posts. Users get ids 1..=3 on a fresh store.
pub async fn seed(store: &Store) {
    let mut session = store.session();

    for user in SEED_USERS {
        session.add(NewUser::new(user.username, user.email)).unwrap();
    }
    session.flush().await.unwrap();

    for (index, user) in SEED_USERS.iter().enumerate() {
        let user_id = index as i32 + 1;
        for title in user.posts {
            session
                .add(NewPost::new(user_id, *title, format!("{title} body")))
                .unwrap();
        }
    }
    session.commit().await.unwrap();
}
