//! Connection behavior over a scripted in-memory session.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use xdb::db::{ColumnType, RawColumn, RawResultSet, Session};
use xdb::{Connection, QueryParam, Value, XdbError, XdbResult, quote};

/// Shared log of hook calls and submitted statements, in order.
#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct FakeSession {
    journal: Journal,
    responses: VecDeque<XdbResult<Option<RawResultSet>>>,
    params: Arc<Mutex<Vec<Vec<QueryParam>>>>,
    closes: Arc<AtomicUsize>,
}

impl FakeSession {
    fn new(responses: Vec<XdbResult<Option<RawResultSet>>>) -> Self {
        Self {
            journal: Journal::default(),
            responses: responses.into(),
            params: Arc::default(),
            closes: Arc::default(),
        }
    }
}

impl Session for FakeSession {
    fn execute(&mut self, sql: &str, params: &[QueryParam]) -> XdbResult<Option<RawResultSet>> {
        self.journal.push(format!("execute: {sql}"));
        self.params.lock().unwrap().push(params.to_vec());
        self.responses.pop_front().unwrap_or(Ok(None))
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

fn users() -> RawResultSet {
    RawResultSet::new(vec![
        RawColumn::new("id", ColumnType::LongLong),
        RawColumn::new("name", ColumnType::VarString),
        RawColumn::new("key", ColumnType::Long),
    ])
    .with_row([Some("1"), Some("alice"), Some("12345")])
    .with_row([Some("2"), Some("bob"), Some("7")])
}

fn empty_users() -> RawResultSet {
    RawResultSet::new(vec![
        RawColumn::new("id", ColumnType::LongLong),
        RawColumn::new("name", ColumnType::VarString),
    ])
}

fn connect(responses: Vec<XdbResult<Option<RawResultSet>>>) -> (Connection<FakeSession>, Journal) {
    let session = FakeSession::new(responses);
    let journal = session.journal.clone();
    (Connection::with_session(session, "netunit"), journal)
}

#[test]
fn test_hook_runs_once_before_submission() {
    let (mut conn, journal) = connect(vec![Ok(None), Ok(None)]);
    let hook_journal = journal.clone();
    conn.set_query_listener(move |sql| hook_journal.push(format!("hook: {sql}")));

    conn.query("DELETE FROM t").unwrap();
    xdb::query!(conn, "DELETE FROM t WHERE id = {}", 5).unwrap();

    assert_eq!(
        journal.entries(),
        vec![
            "hook: DELETE FROM t",
            "execute: DELETE FROM t",
            "hook: DELETE FROM t WHERE id = 5",
            "execute: DELETE FROM t WHERE id = 5",
        ]
    );
}

#[test]
fn test_hook_runs_for_failing_statement() {
    let (mut conn, journal) = connect(vec![Err(XdbError::query("You have an error in your SQL syntax"))]);
    let hook_journal = journal.clone();
    conn.set_query_listener(move |sql| hook_journal.push(format!("hook: {sql}")));

    let err = conn.select("SELEC 1").unwrap_err();
    assert!(matches!(err, XdbError::Query { .. }));
    assert_eq!(journal.entries(), vec!["hook: SELEC 1", "execute: SELEC 1"]);
}

#[test]
fn test_cleared_hook_is_not_called() {
    let (mut conn, journal) = connect(vec![Ok(None)]);
    let hook_journal = journal.clone();
    conn.set_query_listener(move |sql| hook_journal.push(format!("hook: {sql}")));
    conn.clear_query_listener();

    conn.query("DO 1").unwrap();
    assert_eq!(journal.entries(), vec!["execute: DO 1"]);
}

#[test]
fn test_select_users() {
    let (mut conn, _) = connect(vec![Ok(Some(users()))]);
    let result = conn.select("SELECT id, name, `key` FROM users").unwrap();

    assert_eq!(result.num_rows(), 2);
    assert_eq!(result.num_columns(), 3);
    for row in &result {
        assert_eq!(row.len(), result.num_columns());
    }

    let first = result.single().unwrap();
    assert_eq!(first.get("key").unwrap().as_int().unwrap(), 12345);
    assert_eq!(first.get("key").unwrap().as_string(), "12345");
    assert_eq!(first.get_string("name").unwrap(), "alice");

    assert!(matches!(
        first.get(999),
        Err(XdbError::IndexOutOfRange { index: 999, len: 3 })
    ));
    assert!(matches!(
        first.get("missing_column"),
        Err(XdbError::UnknownColumn { .. })
    ));
    assert!(matches!(
        first.get("name").unwrap().as_int(),
        Err(XdbError::TypeMismatch { .. })
    ));
}

#[test]
fn test_select_empty_keeps_columns() {
    let (mut conn, _) = connect(vec![Ok(Some(empty_users()))]);
    let result = conn.select("SELECT id, name FROM users WHERE 1 = 0").unwrap();

    assert_eq!(result.num_rows(), 0);
    assert_eq!(result.num_columns(), 2);
    assert!(matches!(result.single(), Err(XdbError::EmptyResult)));
}

#[test]
fn test_statement_without_result_set() {
    let (mut conn, _) = connect(vec![Ok(None)]);
    let result = conn.select("CREATE TABLE t (id INT)").unwrap();
    assert_eq!(result.num_rows(), 0);
    assert_eq!(result.num_columns(), 0);
    assert!(result.fields().is_empty());
}

#[test]
fn test_single() {
    let (mut conn, _) = connect(vec![Ok(Some(users())), Ok(Some(empty_users()))]);

    let row = xdb::single!(conn, "SELECT * FROM users WHERE name = {}", quote("alice")).unwrap();
    assert_eq!(row.get_int("id").unwrap(), 1);

    assert!(matches!(
        conn.single("SELECT * FROM users WHERE 1 = 0"),
        Err(XdbError::NoRows)
    ));
}

#[test]
fn test_scalar() {
    let answer = RawResultSet::new(vec![RawColumn::new("n", ColumnType::LongLong)])
        .with_row([Some("42")]);
    let no_columns = RawResultSet::new(Vec::new()).with_row(Vec::<Option<&str>>::new());
    let (mut conn, _) = connect(vec![
        Ok(Some(answer)),
        Ok(Some(empty_users())),
        Ok(Some(no_columns)),
    ]);

    let value = xdb::scalar!(conn, "SELECT {}", 42).unwrap();
    assert_eq!(value.as_int().unwrap(), 42);
    assert_eq!(value, Value::Int(42));

    assert!(matches!(conn.scalar("SELECT id FROM users WHERE 1 = 0"), Err(XdbError::NoRows)));
    assert!(matches!(conn.scalar("SELECT"), Err(XdbError::NoRows)));
}

#[test]
fn test_decode_failure_aborts_whole_result() {
    let raw = RawResultSet::new(vec![
        RawColumn::new("id", ColumnType::Long),
        RawColumn::new("time_end", ColumnType::Datetime),
    ])
    .with_row([Some("1"), Some("2024-01-01 00:00:00")]);
    let (mut conn, _) = connect(vec![Ok(Some(raw))]);

    let err = conn.select("SELECT id, time_end FROM events").unwrap_err();
    assert!(err.is_decode_error());
    assert!(err.to_string().contains("12"));
}

#[test]
fn test_is_table_exists_binds_schema_and_name() {
    let count = |n: &str| {
        RawResultSet::new(vec![RawColumn::new("COUNT(*)", ColumnType::LongLong)])
            .with_row([Some(n)])
    };
    let session = FakeSession::new(vec![Ok(Some(count("1"))), Ok(Some(count("0")))]);
    let params = session.params.clone();
    let mut conn = Connection::with_session(session, "netunit");

    assert!(conn.is_table_exists("users").unwrap());
    assert!(!conn.is_table_exists("no_such_table").unwrap());

    let params = params.lock().unwrap();
    assert_eq!(
        params[0],
        vec![QueryParam::from("netunit"), QueryParam::from("users")]
    );
    assert_eq!(
        params[1],
        vec![QueryParam::from("netunit"), QueryParam::from("no_such_table")]
    );
}

#[test]
fn test_session_released_once_after_move() {
    let session = FakeSession::new(vec![Ok(None)]);
    let closes = session.closes.clone();

    let conn = Connection::with_session(session, "netunit");
    let mut moved = conn;
    moved.query("DO 1").unwrap();
    assert_eq!(closes.load(Ordering::SeqCst), 0);

    drop(moved);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_connection_moves_across_threads() {
    let session = FakeSession::new(vec![Ok(Some(users()))]);
    let closes = session.closes.clone();
    let mut conn = Connection::with_session(session, "netunit");

    let rows = std::thread::spawn(move || conn.select("SELECT * FROM users").map(|r| r.num_rows()))
        .join()
        .unwrap()
        .unwrap();

    assert_eq!(rows, 2);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}
