/// All server-assigned record identifiers are numeric.
pub type DbId = i64;

/// Server-authoritative timestamps travel as ISO-8601 text.
pub type IsoTimestamp = String;

/// Current time as an ISO-8601 UTC string.
///
/// Used to refresh a record's `updated_at` locally between server
/// round-trips; the server value wins on the next fetch.
pub fn now_iso() -> IsoTimestamp {
    chrono::Utc::now().to_rfc3339()
}
