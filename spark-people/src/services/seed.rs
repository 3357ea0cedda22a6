use rand::seq::SliceRandom;
use rand::Rng;

use spark_shared::errors::AppResult;

use crate::models::NewUser;
use crate::store::UserDirectory;

const LOCATIONS: &[&str] = &["Jakarta", "Bandung", "Surabaya", "Bali", "Yogyakarta", "Medan", "Semarang"];

/// Fills an empty directory with `count` demo users, one picture each.
/// Returns how many users were created; a non-empty directory is left alone.
pub fn seed_demo_users(directory: &dyn UserDirectory, count: u32) -> AppResult<u32> {
    if count == 0 || directory.user_count()? > 0 {
        return Ok(0);
    }

    let mut rng = rand::thread_rng();
    for i in 1..=count {
        let location = LOCATIONS.choose(&mut rng).copied().unwrap_or("Jakarta");
        let user = NewUser {
            name: format!("User {i}"),
            age: rng.gen_range(20..=35),
            location: location.to_string(),
            email: format!("user{i}@example.com"),
        };
        directory.insert_user(user, &[format!("https://i.pravatar.cc/300?img={i}")])?;
    }

    tracing::info!(count = count, "demo users seeded");
    Ok(count)
}
