//! Shared test helpers for integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};

use paginate::paginate_core::config::DatabaseConfig;
use paginate::paginate_core::types::TIMESTAMP_FORMAT;
use paginate::prelude::*;

/// A call received by [`RecordingModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindAll(FindOptions),
    FindIds(Vec<Value>, FindOptions),
    FindByAttributes(Vec<(String, Value)>, FindOptions),
    Finder(String, Vec<Value>, FindOptions),
    Count(FindOptions),
    CountInScope(String, FindOptions),
    FindBySql(SqlQuery),
    CountBySql(SqlQuery),
}

impl Call {
    /// Whether this call is a count.
    pub fn is_count(&self) -> bool {
        matches!(
            self,
            Self::Count(_) | Self::CountInScope(..) | Self::CountBySql(_)
        )
    }
}

/// How many rows the finders of a [`RecordingModel`] return.
#[derive(Debug, Clone, Copy)]
pub enum Rows {
    /// Always this many rows, whatever the window.
    Fixed(usize),
    /// A table of this many rows, windowed by `limit`/`offset`.
    Table(u32),
}

/// A model that records every primitive call and answers with canned rows.
pub struct RecordingModel {
    table: &'static str,
    rows: Rows,
    count: u64,
    default_select: Option<String>,
    finders: Vec<String>,
    scopes: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingModel {
    /// A model whose finders return nothing and whose count is 0.
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            rows: Rows::Fixed(0),
            count: 0,
            default_select: None,
            finders: Vec::new(),
            scopes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(mut self, rows: usize) -> Self {
        self.rows = Rows::Fixed(rows);
        self
    }

    pub fn table_of(mut self, rows: u32) -> Self {
        self.rows = Rows::Table(rows);
        self
    }

    pub fn counting(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn selecting(mut self, select: &str) -> Self {
        self.default_select = Some(select.to_string());
        self
    }

    pub fn with_finder(mut self, name: &str) -> Self {
        self.finders.push(name.to_string());
        self
    }

    pub fn with_scope(mut self, name: &str) -> Self {
        self.scopes.push(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_count).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn rows_for(&self, limit: Option<u64>, offset: Option<u64>) -> Vec<u32> {
        match self.rows {
            Rows::Fixed(n) => (0..n as u32).collect(),
            Rows::Table(total) => {
                let offset = offset.unwrap_or(0) as u32;
                let limit = limit.map_or(total, |l| l as u32);
                (offset..total).take(limit as usize).collect()
            }
        }
    }
}

#[async_trait]
impl Model for RecordingModel {
    type Record = u32;

    fn table_name(&self) -> &str {
        self.table
    }

    fn default_select(&self) -> Option<String> {
        self.default_select.clone()
    }

    async fn find_all(&self, options: &FindOptions) -> PaginateResult<Vec<u32>> {
        self.record(Call::FindAll(options.clone()));
        Ok(self.rows_for(options.limit, options.offset))
    }

    async fn find_ids(&self, ids: &[Value], options: &FindOptions) -> PaginateResult<Vec<u32>> {
        self.record(Call::FindIds(ids.to_vec(), options.clone()));
        Ok(self.rows_for(options.limit, options.offset))
    }

    async fn find_by_attributes(
        &self,
        attributes: &[(String, Value)],
        options: &FindOptions,
    ) -> PaginateResult<Vec<u32>> {
        self.record(Call::FindByAttributes(attributes.to_vec(), options.clone()));
        Ok(self.rows_for(options.limit, options.offset))
    }

    async fn call_finder(
        &self,
        name: &str,
        args: &[Value],
        options: &FindOptions,
    ) -> PaginateResult<Vec<u32>> {
        if !self.finders.iter().any(|f| f == name) {
            return Err(PaginateError::unknown_finder(name));
        }
        self.record(Call::Finder(name.to_string(), args.to_vec(), options.clone()));
        Ok(self.rows_for(options.limit, options.offset))
    }

    fn has_scope(&self, name: &str) -> bool {
        self.scopes.iter().any(|s| s == name)
    }

    async fn count_in_scope(&self, name: &str, options: &FindOptions) -> PaginateResult<u64> {
        self.record(Call::CountInScope(name.to_string(), options.clone()));
        Ok(self.count)
    }

    async fn count(&self, options: &FindOptions) -> PaginateResult<u64> {
        self.record(Call::Count(options.clone()));
        Ok(self.count)
    }

    async fn find_by_sql(&self, query: &SqlQuery) -> PaginateResult<Vec<u32>> {
        self.record(Call::FindBySql(query.clone()));
        Ok(self.rows_for(None, None))
    }

    async fn count_by_sql(&self, query: &SqlQuery) -> PaginateResult<u64> {
        self.record(Call::CountBySql(query.clone()));
        Ok(self.count)
    }
}

/// A topic row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Topic {
    pub id: i64,
    pub project_id: Option<i64>,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub created_at: String,
}

/// A developer row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Developer {
    pub id: i64,
    pub name: String,
    pub salary: i64,
}

/// A projection of the developers' salaries.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Salary {
    pub salary: i64,
}

/// In-memory SQLite database loaded with fixtures.
pub struct TestDb {
    pub pool: DatabasePool,
    pub now: NaiveDateTime,
}

impl TestDb {
    /// Create a fresh database with schema and fixtures.
    pub async fn new() -> Self {
        let pool = DatabasePool::connect(&DatabaseConfig::default())
            .await
            .expect("Failed to open in-memory database");
        let now = Utc::now().naive_utc();

        paginate::paginate_database::run_script(&pool, SCHEMA)
            .await
            .expect("Failed to create schema");
        paginate::paginate_database::run_script(&pool, &fixtures(now))
            .await
            .expect("Failed to load fixtures");

        Self { pool, now }
    }

    /// The topics model, with replies includable.
    pub fn topics(&self) -> SqlModel<Topic> {
        SqlModel::new(self.pool.clone(), "topics").has_many("replies", "topic_id")
    }

    /// The developers model, with project memberships includable.
    pub fn developers(&self) -> SqlModel<Developer> {
        SqlModel::new(self.pool.clone(), "developers")
            .has_many("developers_projects", "developer_id")
    }

    /// Start counting statements.
    pub fn counter(&self) -> QueryCounter<'_> {
        QueryCounter {
            pool: &self.pool,
            start: self.pool.query_count(),
        }
    }

    /// A timestamp `minutes` before the fixture load.
    pub fn minutes_ago(&self, minutes: i64) -> NaiveDateTime {
        self.now - Duration::minutes(minutes)
    }
}

/// Counts statements executed since it was created.
pub struct QueryCounter<'a> {
    pool: &'a DatabasePool,
    start: u64,
}

impl QueryCounter<'_> {
    pub fn queries(&self) -> u64 {
        self.pool.query_count() - self.start
    }
}

const SCHEMA: &str = r#"
CREATE TABLE topics (
    id INTEGER PRIMARY KEY,
    project_id INTEGER,
    title TEXT NOT NULL,
    subtitle TEXT,
    content TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT
);
CREATE TABLE replies (
    id INTEGER PRIMARY KEY,
    topic_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
);
CREATE TABLE projects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);
CREATE TABLE developers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    salary INTEGER NOT NULL
);
CREATE TABLE developers_projects (
    developer_id INTEGER NOT NULL,
    project_id INTEGER NOT NULL,
    access_level INTEGER NOT NULL DEFAULT 1
);
"#;

fn fixtures(now: NaiveDateTime) -> String {
    let ago = |d: Duration| (now - d).format(TIMESTAMP_FORMAT).to_string();

    let mut script = format!(
        "INSERT INTO topics (id, project_id, title, subtitle, content, created_at) VALUES
            (1, 1, 'Isnt futurama awesome?', 'It really is, isnt it.', 'I like futurama', '{}'),
            (2, 1, 'Harvey Birdman is the king of all men', 'yup', 'He really is', '{}'),
            (3, 1, 'Rails is nice', 'It makes me happy', 'except when I have to hack internals to fix pagination. even then really.', '{}'),
            (4, 2, 'ActiveRecord sometimes freaks me out', NULL, 'I mean, what is the deal with eager loading?', '{}');\n",
        ago(Duration::days(1)),
        ago(Duration::hours(2)),
        ago(Duration::minutes(20)),
        ago(Duration::minutes(15)),
    );

    script.push_str(&format!(
        "INSERT INTO replies (id, topic_id, content, created_at) VALUES
            (1, 1, 'Birdman is better!', '{}'),
            (2, 2, 'Nuh uh!', '{}'),
            (3, 1, 'Nice site!', '{}'),
            (4, 4, 'Eager loading is the deal', '{}'),
            (5, 4, 'Ain''t we all', '{}');\n",
        ago(Duration::hours(6)),
        ago(Duration::hours(1)),
        ago(Duration::minutes(50)),
        ago(Duration::minutes(10)),
        ago(Duration::minutes(5)),
    ));

    script.push_str(
        "INSERT INTO projects (id, name) VALUES (1, 'Active Record'), (2, 'Active Controller');\n",
    );

    script.push_str(
        "INSERT INTO developers (id, name, salary) VALUES
            (1, 'David', 80000),
            (2, 'Jamis', 150000),
            (11, 'Poor Jamis', 9000);\n",
    );
    for id in 3..=10 {
        script.push_str(&format!(
            "INSERT INTO developers (id, name, salary) VALUES ({id}, 'fixture_{id}', 100000);\n"
        ));
    }

    script.push_str(
        "INSERT INTO developers_projects (developer_id, project_id) VALUES
            (1, 1), (1, 2), (2, 1), (11, 2);\n",
    );
    script
}
