use std::time::Duration;

use super::{Api, Config, Counting, Logs, Tally, TallyBox};

/// Creates a new test configuration.
pub fn new_test_config() -> Config {
    Tally {
        tally: TallyBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            api: Some(Api {
                name: Some("freshtally-test".to_string()),
                port: Some("8091".to_string()),
            }),
            counting: Counting {
                timezone: chrono_tz::Asia::Makassar,
                poll_interval: Some(Duration::from_secs(5)),
                persist_on_update: Some(true),
            },
            // No db path: tests run against an in-memory database.
            db: None,
        },
    }
}
