use ::pretty_assertions::assert_eq;
use ::raw_page_util::*;
use ::std::cell::{Cell, RefCell};
use ::test_case::test_case;

/// Pretends to be a database holding rows `1..=rows`; honors the window of
/// LIMIT/OFFSET queries and records every statement it runs.
struct MockExecutor {
    vendor: &'static str,
    version: Option<ServerVersion>,
    rows: u32,
    counts: Cell<usize>,
    fetches: Cell<usize>,
    statements: RefCell<Vec<(String, Vec<SqlParam>)>>,
    fail_fetch: bool,
}

impl MockExecutor {
    fn new(rows: u32) -> Self {
        Self {
            vendor: POSTGRESQL,
            version: None,
            rows,
            counts: Cell::new(0),
            fetches: Cell::new(0),
            statements: RefCell::new(Vec::new()),
            fail_fetch: false,
        }
    }

    fn with_vendor(mut self, vendor: &'static str, version: Option<ServerVersion>) -> Self {
        self.vendor = vendor;
        self.version = version;
        self
    }

    fn last_statement(&self) -> String {
        self.statements.borrow().last().map(|(sql, _)| sql.clone()).unwrap_or_default()
    }
}

fn number_after(sql: &str, keyword: &str) -> u64 {
    let (_, rest) = sql.rsplit_once(keyword).unwrap();
    rest.split_whitespace().next().unwrap().parse().unwrap()
}

impl QueryExecutor for MockExecutor {
    type Row = u32;

    fn vendor(&self) -> &str {
        self.vendor
    }

    fn server_version(&self) -> Option<ServerVersion> {
        self.version
    }

    fn query_count(&self, sql: &str, params: &[SqlParam]) -> Result<Option<i64>> {
        self.counts.set(self.counts.get() + 1);
        self.statements.borrow_mut().push((sql.to_owned(), params.to_vec()));
        Ok(Some(i64::from(self.rows)))
    }

    fn query_rows(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<u32>> {
        self.fetches.set(self.fetches.get() + 1);
        self.statements.borrow_mut().push((sql.to_owned(), params.to_vec()));
        if self.fail_fetch {
            return Err(Error::database("relation \"books\" does not exist"));
        }
        let (limit, offset) = if sql.contains(" LIMIT ") {
            (number_after(sql, " LIMIT "), number_after(sql, " OFFSET "))
        } else {
            (number_after(sql, " FETCH NEXT "), number_after(sql, " OFFSET "))
        };
        Ok((1..=self.rows).skip(offset as usize).take(limit as usize).collect())
    }
}

static RAW: &str = "SELECT id FROM books WHERE shelf = $1 ORDER BY id";

fn query() -> QueryDescriptor {
    QueryDescriptor::new(RAW).bind(3)
}

#[test]
fn test_short_last_page() {
    let executor = MockExecutor::new(25);
    let paginator = Paginator::raw(query(), &executor, PaginatorOptions::new(10)).unwrap();

    assert_eq!(paginator.num_pages().unwrap(), 3);
    assert_eq!(paginator.page_range().unwrap().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);

    let page = paginator.page(3).unwrap();
    assert_eq!(page.items(), &[21, 22, 23, 24, 25][..]);
    assert!(executor.last_statement().ends_with("LIMIT 5 OFFSET 20"));

    assert!(matches!(paginator.page(4), Err(Error::EmptyPage { number: 4, .. })));
}

#[test]
fn test_last_page_absorbs_orphans() {
    let executor = MockExecutor::new(25);
    let paginator = Paginator::raw(query(), &executor, PaginatorOptions::new(10).orphans(5)).unwrap();

    assert_eq!(paginator.num_pages().unwrap(), 2);
    let page = paginator.page(2).unwrap();
    assert_eq!(page.items(), &(11..=25).collect::<Vec<u32>>()[..]);
    assert!(executor.last_statement().ends_with("LIMIT 15 OFFSET 10"));
    assert!(matches!(paginator.page(3), Err(Error::EmptyPage { .. })));
}

#[test]
fn test_empty_result_with_empty_first_page() {
    let executor = MockExecutor::new(0);
    let paginator = Paginator::raw(query(), &executor, PaginatorOptions::new(10)).unwrap();

    assert_eq!(paginator.count().unwrap(), 0);
    let page = paginator.page(1).unwrap();
    assert!(page.is_empty());
    assert!(!page.has_next());
    assert_eq!(executor.fetches.get(), 1);
}

#[test]
fn test_empty_result_without_empty_first_page() {
    let executor = MockExecutor::new(0);
    let options = PaginatorOptions::new(10).allow_empty_first_page(false);
    let paginator = Paginator::raw(query(), &executor, options).unwrap();

    assert_eq!(paginator.num_pages().unwrap(), 0);
    assert!(paginator.page_range().unwrap().is_empty());
    assert!(matches!(paginator.page(1), Err(Error::EmptyPage { .. })));
    assert_eq!(executor.fetches.get(), 0);
}

#[test_case(0 ; "zero")]
#[test_case(-1 ; "negative")]
fn test_below_range(number: i64) {
    let executor = MockExecutor::new(25);
    let paginator = Paginator::raw(query(), &executor, PaginatorOptions::new(10)).unwrap();
    let err = paginator.page(number).unwrap_err();
    assert!(matches!(err, Error::EmptyPage { reason: EmptyPageReason::BelowRange, .. }));
    assert!(err.is_invalid_page());
}

#[test]
fn test_non_integer_page() {
    let executor = MockExecutor::new(25);
    let paginator = Paginator::raw(query(), &executor, PaginatorOptions::new(10)).unwrap();
    assert!(matches!(
        paginator.page("abc"),
        Err(Error::PageNotAnInteger { token }) if token == "abc"
    ));
    assert_eq!(paginator.page("2").unwrap().items(), &(11..=20).collect::<Vec<u32>>()[..]);
}

#[test]
fn test_count_runs_once() {
    let executor = MockExecutor::new(25);
    let paginator = Paginator::raw(query(), &executor, PaginatorOptions::new(10)).unwrap();

    paginator.count().unwrap();
    paginator.num_pages().unwrap();
    for number in paginator.page_range().unwrap() {
        paginator.page(number).unwrap();
    }
    paginator.count().unwrap();

    assert_eq!(executor.counts.get(), 1);
    assert_eq!(executor.fetches.get(), 3);
}

#[test]
fn test_statements_wrap_raw_sql_with_params() {
    let executor = MockExecutor::new(25);
    let paginator = Paginator::raw(query(), &executor, PaginatorOptions::new(10)).unwrap();
    paginator.page(3).unwrap();

    let statements = executor.statements.borrow();
    assert_eq!(
        statements[0],
        (
            format!("SELECT COUNT(*) AS row_count FROM ({RAW}) AS sub_query_for_count"),
            vec![SqlParam::Int(3)],
        )
    );
    assert_eq!(
        statements[1],
        (
            format!("SELECT * FROM ({RAW}) AS sub_query_for_pagination LIMIT 5 OFFSET 20"),
            vec![SqlParam::Int(3)],
        )
    );
}

#[test]
fn test_unsupported_vendor() {
    let executor = MockExecutor::new(25).with_vendor("mssql", None);
    let paginator = Paginator::raw(query(), &executor, PaginatorOptions::new(10)).unwrap();
    assert!(matches!(
        paginator.page(1),
        Err(Error::UnsupportedDatabase { vendor }) if vendor == "mssql"
    ));
    assert_eq!(executor.fetches.get(), 0);
}

#[test]
fn test_oracle_version_gate() {
    let old = MockExecutor::new(25).with_vendor(ORACLE, Some(ServerVersion::new(11, 2)));
    let paginator = Paginator::raw(query(), &old, PaginatorOptions::new(10)).unwrap();
    assert!(matches!(paginator.page(3), Err(Error::UnsupportedDatabaseVersion { .. })));

    let new = MockExecutor::new(25).with_vendor(ORACLE, Some(ServerVersion::new(12, 1)));
    let paginator = Paginator::raw(query(), &new, PaginatorOptions::new(10)).unwrap();
    assert_eq!(paginator.page(2).unwrap().len(), 10);
    assert!(new.last_statement().ends_with("OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY"));
}

#[test]
fn test_custom_dialect() {
    let executor = MockExecutor::new(25).with_vendor("mssql", None);
    let dialects = DialectRegistry::default().with("mssql", LimitOffset);
    let source = RawQuerySource::with_dialects(query(), &executor, dialects);
    let paginator = Paginator::new(source, PaginatorOptions::new(10)).unwrap();
    assert_eq!(paginator.page(1).unwrap().len(), 10);
}

#[test]
fn test_database_errors_pass_through() {
    let mut executor = MockExecutor::new(25);
    executor.fail_fetch = true;
    let paginator = Paginator::raw(query(), &executor, PaginatorOptions::new(10)).unwrap();
    let err = paginator.page(1).unwrap_err();
    assert!(matches!(err, Error::Database(_)));
    assert!(!err.is_invalid_page());
    assert_eq!(executor.fetches.get(), 1);
}
