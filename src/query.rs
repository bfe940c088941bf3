use ::chrono::NaiveDateTime;
use ::uuid::Uuid;

pub static DEFAULT_DATABASE_ID: &str = "default";

/// A bind value for a raw query placeholder.
///
/// Serialized adjacently tagged, e.g. `{"type": "text", "value": "bob"}`,
/// so strings that look like timestamps or uuids keep their variant.
#[derive(Clone, Debug, Deserialize, From, IsVariant, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SqlParam {
    #[from(ignore)]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Uuid(Uuid),
    Text(String),
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for SqlParam {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// A hand-written SQL statement, its bind values and the database it targets.
///
/// `raw_sql` is wrapped as a subquery for counting and paging, so it must not
/// carry its own trailing LIMIT/OFFSET. It should carry a deterministic
/// `ORDER BY` if pages are expected to be stable across requests.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct QueryDescriptor {
    pub raw_sql: String,
    #[serde(default)]
    pub params: Vec<SqlParam>,
    #[serde(default = "default_database_id")]
    pub database_id: String,
}

fn default_database_id() -> String {
    DEFAULT_DATABASE_ID.into()
}

impl QueryDescriptor {
    pub fn new(raw_sql: impl Into<String>) -> Self {
        Self {
            raw_sql: raw_sql.into(),
            params: Vec::new(),
            database_id: default_database_id(),
        }
    }

    pub fn bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn using(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }
}
