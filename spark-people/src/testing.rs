use std::sync::Arc;

use crate::models::NewUser;
use crate::store::{MemoryStore, UserDirectory};

/// A memory store holding users 1..=n, named and emailed by index, one
/// picture each.
pub(crate) fn store_with_users(n: i64) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for i in 1..=n {
        store
            .insert_user(
                NewUser {
                    name: format!("User {i}"),
                    age: 20 + (i % 16) as i32,
                    location: "Bandung".into(),
                    email: format!("user{i}@example.com"),
                },
                &[format!("https://i.pravatar.cc/300?img={i}")],
            )
            .unwrap();
    }
    store
}
