//! Database access for moodlog-svc

pub mod entries;
