use backbox_core::{FileRecord, Session, User};
use chrono::{DateTime, Utc};

pub fn session(token: &str, email: &str) -> Session {
    Session {
        token: token.to_string(),
        user: User::new(email),
    }
}

pub fn file_record(id: &str, name: &str, file_type: &str, uploaded_at: &str) -> FileRecord {
    FileRecord {
        id: id.to_string(),
        file_name: name.to_string(),
        file_type: file_type.to_string(),
        size: 1024,
        uploaded_at: DateTime::parse_from_rfc3339(uploaded_at)
            .expect("fixture timestamp")
            .with_timezone(&Utc),
        url: format!("https://cdn.example.com/{}", name),
    }
}
