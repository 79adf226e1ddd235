use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use moodjournal_core::db::open_db_in_memory;
use moodjournal_core::generator::rules::base_template;
use moodjournal_core::{
    Clock, EncouragementGenerator, EncouragementRequest, EncouragementSource, EntryRepository,
    EntryService, EntryServiceError, EntryValidationError, GenerationError, GenerationSource,
    Mood, SqliteEntryRepository,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;

/// Clock that starts at noon on a fixed day and advances 1ms per call.
struct SteppingClock {
    start: DateTime<Local>,
    calls: Cell<i64>,
}

impl SteppingClock {
    fn new() -> Self {
        Self {
            start: Local
                .with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
                .single()
                .expect("unambiguous local time"),
            calls: Cell::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Local> {
        let step = self.calls.get();
        self.calls.set(step + 1);
        self.start + Duration::milliseconds(step)
    }
}

struct FailingSource;

impl EncouragementSource for FailingSource {
    fn source_id(&self) -> &str {
        "failing"
    }

    fn fetch(&self, _request: &EncouragementRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Status(500))
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn create_entry_prepends_and_persists() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service =
        EntryService::with_clock(repo, EncouragementGenerator::rule_based(), SteppingClock::new());
    let mut rng = rng();

    let first = service
        .create_entry(Some(Mood::Down), "Rainy morning", &mut rng)
        .unwrap();
    let before = service.list_entries().len();

    let created = service
        .create_entry(Some(Mood::Happy), "  Today was good  ", &mut rng)
        .unwrap();
    let listed = service.list_entries();

    assert_eq!(listed.len(), before + 1);
    assert_eq!(listed[0], created.entry);
    assert_eq!(listed[1], first.entry);
    assert_eq!(created.source, GenerationSource::Rules);
    assert_eq!(created.entry.reflection, "Today was good");
    assert_eq!(created.entry.encouragement, base_template(Mood::Happy));
    assert_eq!(
        created.entry.date,
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    );
    assert_ne!(created.entry.id, first.entry.id);
}

#[test]
fn entry_id_is_creation_timestamp_in_millis() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let clock = SteppingClock::new();
    let expected = clock.start.timestamp_millis().to_string();
    let service = EntryService::with_clock(repo, EncouragementGenerator::rule_based(), clock);

    let created = service
        .create_entry(Some(Mood::Neutral), "ordinary day", &mut rng())
        .unwrap();
    assert_eq!(created.entry.id, expected);
}

#[test]
fn invalid_input_is_rejected_without_touching_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service =
        EntryService::with_clock(repo, EncouragementGenerator::rule_based(), SteppingClock::new());
    let mut rng = rng();
    service
        .create_entry(Some(Mood::Angry), "stuck in traffic", &mut rng)
        .unwrap();
    let before = service.list_entries();

    let missing_mood = service.create_entry(None, "text", &mut rng).unwrap_err();
    assert!(matches!(
        missing_mood,
        EntryServiceError::Validation(EntryValidationError::MissingMood)
    ));

    let blank = service
        .create_entry(Some(Mood::Happy), "   ", &mut rng)
        .unwrap_err();
    assert!(matches!(
        blank,
        EntryServiceError::Validation(EntryValidationError::EmptyReflection)
    ));

    assert_eq!(service.list_entries(), before);
}

#[test]
fn delete_entry_removes_only_matching_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service =
        EntryService::with_clock(repo, EncouragementGenerator::rule_based(), SteppingClock::new());
    let mut rng = rng();
    let keep = service
        .create_entry(Some(Mood::Happy), "keep me", &mut rng)
        .unwrap();
    let drop_me = service
        .create_entry(Some(Mood::Down), "delete me", &mut rng)
        .unwrap();

    service.delete_entry(&drop_me.entry.id).unwrap();
    assert_eq!(service.list_entries(), vec![keep.entry.clone()]);

    service.delete_entry(&drop_me.entry.id).unwrap();
    assert_eq!(service.list_entries(), vec![keep.entry]);
}

#[test]
fn delete_unknown_id_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service =
        EntryService::with_clock(repo, EncouragementGenerator::rule_based(), SteppingClock::new());
    service
        .create_entry(Some(Mood::Neutral), "steady", &mut rng())
        .unwrap();
    let before = service.list_entries();

    service.delete_entry("does-not-exist").unwrap();
    assert_eq!(service.list_entries(), before);
}

#[test]
fn delete_unknown_id_leaves_stored_value_untouched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let key = repo.storage_key().to_string();
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, 'garbage');",
        [key.as_str()],
    )
    .unwrap();
    let service =
        EntryService::with_clock(repo, EncouragementGenerator::rule_based(), SteppingClock::new());

    service.delete_entry("does-not-exist").unwrap();

    let raw: String = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [key.as_str()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(raw, "garbage");

    conn.execute_batch("PRAGMA query_only = ON;").unwrap();
    service.delete_entry("does-not-exist").unwrap();
}

#[test]
fn offline_fallback_is_reported_on_created_entry() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::with_clock(
        repo,
        EncouragementGenerator::delegated(Box::new(FailingSource)),
        SteppingClock::new(),
    );

    let created = service
        .create_entry(Some(Mood::Overwhelmed), "so much to do", &mut rng())
        .unwrap();
    assert_eq!(created.source, GenerationSource::OfflineFallback);
    assert_eq!(created.entry.encouragement, base_template(Mood::Overwhelmed));
    assert_eq!(service.list_entries().len(), 1);
}

#[test]
fn storage_failure_during_create_is_surfaced() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service =
        EntryService::with_clock(repo, EncouragementGenerator::rule_based(), SteppingClock::new());
    conn.execute_batch("PRAGMA query_only = ON;").unwrap();

    let err = service
        .create_entry(Some(Mood::Happy), "will not be saved", &mut rng())
        .unwrap_err();
    assert!(matches!(err, EntryServiceError::Storage(_)));
    assert!(service.list_entries().is_empty());
}

#[test]
fn corrupted_store_lists_empty_and_next_create_overwrites_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, 'garbage');",
        [repo.storage_key()],
    )
    .unwrap();
    assert!(repo.load_all().is_empty());

    let service =
        EntryService::with_clock(repo, EncouragementGenerator::rule_based(), SteppingClock::new());
    service
        .create_entry(Some(Mood::Happy), "fresh start", &mut rng())
        .unwrap();
    assert_eq!(service.list_entries().len(), 1);
}
