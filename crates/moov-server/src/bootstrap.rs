use anyhow::Result;
use tracing::{info, warn};

use moov_api::auth::hash_password;
use moov_api::catalog::VenueCatalog;
use moov_db::Database;
use moov_db::models::NewUser;
use moov_types::UserType;

use crate::config::Config;

struct DemoUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    interests: &'static str,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        name: "angel",
        email: "angel@gmail.com",
        password: "12345678",
        interests: "Music, Art",
    },
    DemoUser {
        name: "sarah",
        email: "sarah@gmail.com",
        password: "loser",
        interests: "Tech, Sports",
    },
];

/// Imports venues, optionally seeds demo users, and returns the venue
/// catalog used by search.
pub fn run(db: &Database, config: &Config) -> Result<VenueCatalog> {
    if config.venues_csv.exists() {
        db.import_venues_csv(&config.venues_csv)?;
    } else {
        warn!(
            "Venue file {} not found, keeping existing venue data",
            config.venues_csv.display()
        );
    }

    if config.seed_demo_users {
        seed_demo_users(db)?;
    }

    let catalog = VenueCatalog::new(db.all_venues()?);
    info!("Venue catalog loaded ({} venues)", catalog.len());
    Ok(catalog)
}

fn seed_demo_users(db: &Database) -> Result<()> {
    for demo in DEMO_USERS {
        let password_hash = hash_password(demo.password)?;
        let added = db.seed_user(&NewUser {
            name: demo.name,
            email: demo.email,
            password_hash: &password_hash,
            user_type: UserType::Attendee,
            interests: demo.interests,
        })?;
        if added {
            info!("Seeded demo user {}", demo.name);
        } else {
            info!("Demo user {} already exists, skipping", demo.name);
        }
    }
    Ok(())
}
