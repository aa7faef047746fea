use diesel::sqlite::SqliteConnection;

use crate::store::{self, SharedConnection};

pub fn establish_test_connection() -> SqliteConnection {
    store::establish(":memory:").expect("Failed to create in-memory database")
}

pub fn shared_test_connection() -> SharedConnection {
    store::shared(establish_test_connection())
}
