//! SQLite implementation of the disclosure store.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use opendart_core::{
    Clock, DartError, Disclosure, DisclosureStore, FinancialLine, IngestReport, MarketClass, Page,
    PagedDisclosures, Result, StatementKey,
};
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params, params_from_iter};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};

/// SQLite-backed disclosure store.
///
/// All access goes through one `Mutex`-guarded connection, which also
/// serializes writers: concurrent ingestions of the same logical key
/// resolve through the atomic upsert/ignore primitives instead of racing
/// check-then-act sequences.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

const DISCLOSURE_COLUMNS: &str = "rcept_no, corp_code, corp_name, corp_cls, report_nm, \
     rcept_dt, flr_nm, pblntf_ty, pblntf_detail_ty, rm";

impl SqliteStore {
    /// Opens (or creates) a store at the given database path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema
    /// creation fails.
    pub fn new(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| DartError::Store(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
            clock,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Creates an in-memory store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DartError::Store(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
            clock,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS companies (
                corp_code TEXT PRIMARY KEY,
                corp_name TEXT NOT NULL,
                corp_cls TEXT,
                stock_code TEXT,
                sector TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_companies_corp_name ON companies(corp_name);
            CREATE INDEX IF NOT EXISTS idx_companies_corp_cls ON companies(corp_cls);

            CREATE TABLE IF NOT EXISTS disclosures (
                rcept_no TEXT PRIMARY KEY,
                corp_code TEXT NOT NULL,
                corp_name TEXT NOT NULL,
                corp_cls TEXT,
                report_nm TEXT NOT NULL,
                rcept_dt TEXT NOT NULL,
                flr_nm TEXT NOT NULL,
                pblntf_ty TEXT,
                pblntf_detail_ty TEXT,
                rm TEXT,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_disclosures_corp_code ON disclosures(corp_code);
            CREATE INDEX IF NOT EXISTS idx_disclosures_corp_name ON disclosures(corp_name);
            CREATE INDEX IF NOT EXISTS idx_disclosures_rcept_dt ON disclosures(rcept_dt);
            CREATE INDEX IF NOT EXISTS idx_disclosures_corp_cls ON disclosures(corp_cls);

            CREATE TABLE IF NOT EXISTS financial_lines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                corp_code TEXT NOT NULL,
                bsns_year TEXT NOT NULL,
                reprt_code TEXT NOT NULL,
                sj_div TEXT,
                sj_nm TEXT,
                account_id TEXT,
                account_nm TEXT NOT NULL,
                account_detail TEXT,
                thstrm_nm TEXT,
                thstrm_amount TEXT,
                frmtrm_nm TEXT,
                frmtrm_amount TEXT,
                bfefrmtrm_nm TEXT,
                bfefrmtrm_amount TEXT,
                ord TEXT,
                currency TEXT,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_financial_lines_key
                ON financial_lines(corp_code, bsns_year, reprt_code);
            CREATE INDEX IF NOT EXISTS idx_financial_lines_account_nm
                ON financial_lines(account_nm);

            CREATE TABLE IF NOT EXISTS account_usage (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_nm TEXT NOT NULL UNIQUE,
                usage_count INTEGER NOT NULL DEFAULT 1,
                last_used TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_account_usage_count
                ON account_usage(usage_count);",
        )
        .map_err(|e| DartError::Store(e.to_string()))?;

        debug!("SQLite disclosure store schema initialized");
        Ok(())
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DartError::Store(e.to_string()))
    }

    fn now_string(&self) -> String {
        format_instant(self.clock.now())
    }

    fn row_to_disclosure(row: &Row<'_>) -> rusqlite::Result<Disclosure> {
        Ok(Disclosure {
            rcept_no: row.get(0)?,
            corp_code: row.get::<_, String>(1)?.into(),
            corp_name: row.get(2)?,
            corp_cls: row.get(3)?,
            report_nm: row.get(4)?,
            rcept_dt: row.get(5)?,
            flr_nm: row.get(6)?,
            pblntf_ty: row.get(7)?,
            pblntf_detail_ty: row.get(8)?,
            rm: row.get(9)?,
        })
    }

    /// Runs a count + page select over the disclosures table for the
    /// given WHERE clause and filter values.
    fn query_paged(&self, where_sql: &str, filters: &[String], page: Page) -> Result<PagedDisclosures> {
        let conn = self.lock_conn()?;

        let count_sql = format!("SELECT COUNT(*) FROM disclosures{where_sql}");
        let filter_values: Vec<Value> = filters.iter().map(|f| Value::from(f.clone())).collect();
        let total_count: u64 = conn
            .query_row(&count_sql, params_from_iter(filter_values.clone()), |row| {
                row.get(0)
            })
            .map_err(|e| DartError::Store(e.to_string()))?;

        let select_sql = format!(
            "SELECT {DISCLOSURE_COLUMNS} FROM disclosures{where_sql}
             ORDER BY rcept_dt DESC, rcept_no DESC
             LIMIT ? OFFSET ?"
        );
        let mut values = filter_values;
        values.push(Value::from(i64::from(page.page_count)));
        values.push(Value::from(page.offset() as i64));

        let mut stmt = conn
            .prepare(&select_sql)
            .map_err(|e| DartError::Store(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(values), Self::row_to_disclosure)
            .map_err(|e| DartError::Store(e.to_string()))?;

        let mut list = Vec::new();
        for row in rows {
            list.push(row.map_err(|e| DartError::Store(e.to_string()))?);
        }

        debug!(total_count, rows = list.len(), "Resolved disclosure page locally");
        Ok(PagedDisclosures {
            total_count,
            rows: list,
        })
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl DisclosureStore for SqliteStore {
    #[instrument(skip(self))]
    async fn search_by_name(
        &self,
        corp_name: &str,
        corp_cls: Option<MarketClass>,
        page: Page,
    ) -> Result<PagedDisclosures> {
        let mut where_sql = " WHERE corp_name LIKE ?".to_string();
        let mut filters = vec![format!("%{corp_name}%")];
        if let Some(cls) = corp_cls {
            where_sql.push_str(" AND corp_cls = ?");
            filters.push(cls.code().to_string());
        }
        self.query_paged(&where_sql, &filters, page)
    }

    #[instrument(skip(self))]
    async fn search_by_corp_code(&self, corp_code: &str, page: Page) -> Result<PagedDisclosures> {
        self.query_paged(" WHERE corp_code = ?", &[corp_code.to_string()], page)
    }

    #[instrument(skip(self))]
    async fn recent_disclosures(
        &self,
        corp_cls: Option<MarketClass>,
        page: Page,
    ) -> Result<PagedDisclosures> {
        match corp_cls {
            Some(cls) => {
                self.query_paged(" WHERE corp_cls = ?", &[cls.code().to_string()], page)
            }
            None => self.query_paged("", &[], page),
        }
    }

    #[instrument(skip(self), fields(corp_code = %key.corp_code))]
    async fn financial_lines(&self, key: &StatementKey) -> Result<Vec<FinancialLine>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT sj_div, sj_nm, account_id, account_nm, account_detail,
                        thstrm_nm, thstrm_amount, frmtrm_nm, frmtrm_amount,
                        bfefrmtrm_nm, bfefrmtrm_amount, ord, currency
                 FROM financial_lines
                 WHERE corp_code = ?1 AND bsns_year = ?2 AND reprt_code = ?3
                 ORDER BY CAST(ord AS INTEGER) ASC",
            )
            .map_err(|e| DartError::Store(e.to_string()))?;

        let rows = stmt
            .query_map(
                params![key.corp_code.as_str(), key.bsns_year, key.reprt_code],
                |row| {
                    Ok(FinancialLine {
                        sj_div: row.get(0)?,
                        sj_nm: row.get(1)?,
                        account_id: row.get(2)?,
                        account_nm: row.get(3)?,
                        account_detail: row.get(4)?,
                        thstrm_nm: row.get(5)?,
                        thstrm_amount: row.get(6)?,
                        frmtrm_nm: row.get(7)?,
                        frmtrm_amount: row.get(8)?,
                        bfefrmtrm_nm: row.get(9)?,
                        bfefrmtrm_amount: row.get(10)?,
                        ord: row.get(11)?,
                        currency: row.get(12)?,
                    })
                },
            )
            .map_err(|e| DartError::Store(e.to_string()))?;

        let mut lines = Vec::new();
        for row in rows {
            lines.push(row.map_err(|e| DartError::Store(e.to_string()))?);
        }

        debug!(rows = lines.len(), "Resolved financial lines locally");
        Ok(lines)
    }

    #[instrument(skip(self, rows), fields(batch = rows.len()))]
    async fn ingest_disclosures(&self, rows: &[Disclosure]) -> Result<IngestReport> {
        let now = self.now_string();
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| DartError::Store(e.to_string()))?;

        let mut report = IngestReport::default();
        for doc in rows {
            // Company upsert: the most recently ingested name and
            // classification always win.
            let upserted = tx.execute(
                "INSERT INTO companies (corp_code, corp_name, corp_cls, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(corp_code) DO UPDATE SET
                     corp_name = excluded.corp_name,
                     corp_cls = excluded.corp_cls,
                     updated_at = excluded.updated_at",
                params![doc.corp_code.as_str(), doc.corp_name, doc.corp_cls, now],
            );
            if let Err(e) = upserted {
                warn!(rcept_no = %doc.rcept_no, error = %e, "Skipping row, company upsert failed");
                report.failed += 1;
                continue;
            }

            // Receipt numbers are immutable: an existing row is never
            // touched, the duplicate is silently skipped.
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO disclosures
                     (rcept_no, corp_code, corp_name, corp_cls, report_nm, rcept_dt,
                      flr_nm, pblntf_ty, pblntf_detail_ty, rm, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    doc.rcept_no,
                    doc.corp_code.as_str(),
                    doc.corp_name,
                    doc.corp_cls,
                    doc.report_nm,
                    doc.rcept_dt,
                    doc.flr_nm,
                    doc.pblntf_ty,
                    doc.pblntf_detail_ty,
                    doc.rm,
                    now
                ],
            );
            match inserted {
                Ok(1) => report.inserted += 1,
                Ok(_) => report.skipped += 1,
                Err(e) => {
                    warn!(rcept_no = %doc.rcept_no, error = %e, "Disclosure insert failed");
                    report.failed += 1;
                }
            }
        }

        tx.commit().map_err(|e| DartError::Store(e.to_string()))?;
        debug!(?report, "Ingested disclosure batch");
        Ok(report)
    }

    #[instrument(skip(self, lines), fields(corp_code = %key.corp_code, count = lines.len()))]
    async fn replace_financial_lines(
        &self,
        key: &StatementKey,
        lines: &[FinancialLine],
    ) -> Result<()> {
        let now = self.now_string();
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| DartError::Store(e.to_string()))?;

        // Wholesale replace: delete and insert commit together or not at
        // all, so no reader ever sees a mixed old/new set.
        tx.execute(
            "DELETE FROM financial_lines
             WHERE corp_code = ?1 AND bsns_year = ?2 AND reprt_code = ?3",
            params![key.corp_code.as_str(), key.bsns_year, key.reprt_code],
        )
        .map_err(|e| DartError::Store(e.to_string()))?;

        for line in lines {
            tx.execute(
                "INSERT INTO financial_lines
                     (corp_code, bsns_year, reprt_code, sj_div, sj_nm, account_id,
                      account_nm, account_detail, thstrm_nm, thstrm_amount,
                      frmtrm_nm, frmtrm_amount, bfefrmtrm_nm, bfefrmtrm_amount,
                      ord, currency, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                params![
                    key.corp_code.as_str(),
                    key.bsns_year,
                    key.reprt_code,
                    line.sj_div,
                    line.sj_nm,
                    line.account_id,
                    line.account_nm,
                    line.account_detail,
                    line.thstrm_nm,
                    line.thstrm_amount,
                    line.frmtrm_nm,
                    line.frmtrm_amount,
                    line.bfefrmtrm_nm,
                    line.bfefrmtrm_amount,
                    line.ord,
                    line.currency,
                    now
                ],
            )
            .map_err(|e| DartError::Store(e.to_string()))?;
        }

        tx.commit().map_err(|e| DartError::Store(e.to_string()))?;
        debug!("Replaced financial line set");
        Ok(())
    }

    #[instrument(skip(self, names), fields(count = names.len()))]
    async fn bump_account_usage(&self, names: &[String]) -> Result<()> {
        let distinct: BTreeSet<&String> = names.iter().filter(|n| !n.is_empty()).collect();
        if distinct.is_empty() {
            return Ok(());
        }

        let now = self.now_string();
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| DartError::Store(e.to_string()))?;

        for name in distinct {
            tx.execute(
                "INSERT INTO account_usage (account_nm, usage_count, last_used, created_at)
                 VALUES (?1, 1, ?2, ?2)
                 ON CONFLICT(account_nm) DO UPDATE SET
                     usage_count = usage_count + 1,
                     last_used = excluded.last_used",
                params![name, now],
            )
            .map_err(|e| DartError::Store(e.to_string()))?;
        }

        tx.commit().map_err(|e| DartError::Store(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn popular_accounts(&self, limit: u32) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT account_nm FROM account_usage
                 ORDER BY usage_count DESC, last_used DESC
                 LIMIT ?1",
            )
            .map_err(|e| DartError::Store(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit], |row| row.get::<_, String>(0))
            .map_err(|e| DartError::Store(e.to_string()))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row.map_err(|e| DartError::Store(e.to_string()))?);
        }
        Ok(names)
    }

    #[instrument(skip(self))]
    async fn search_accounts(&self, query: &str, limit: u32) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT account_nm FROM account_usage
                 WHERE account_nm LIKE ?1
                 ORDER BY usage_count DESC
                 LIMIT ?2",
            )
            .map_err(|e| DartError::Store(e.to_string()))?;

        let rows = stmt
            .query_map(params![format!("%{query}%"), limit], |row| {
                row.get::<_, String>(0)
            })
            .map_err(|e| DartError::Store(e.to_string()))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row.map_err(|e| DartError::Store(e.to_string()))?);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use opendart_core::FixedClock;

    fn store() -> SqliteStore {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        ));
        SqliteStore::in_memory(clock).unwrap()
    }

    fn disclosure(rcept_no: &str, corp_code: &str, corp_name: &str, rcept_dt: &str) -> Disclosure {
        Disclosure {
            rcept_no: rcept_no.to_string(),
            corp_code: corp_code.into(),
            corp_name: corp_name.to_string(),
            corp_cls: Some("Y".to_string()),
            report_nm: "Annual Report".to_string(),
            rcept_dt: rcept_dt.to_string(),
            flr_nm: corp_name.to_string(),
            ..Disclosure::default()
        }
    }

    fn line(account_nm: &str, amount: &str, ord: &str) -> FinancialLine {
        FinancialLine {
            account_nm: account_nm.to_string(),
            thstrm_amount: Some(amount.to_string()),
            ord: Some(ord.to_string()),
            ..FinancialLine::default()
        }
    }

    #[tokio::test]
    async fn duplicate_receipt_number_is_stored_once() {
        let store = store();
        let doc = disclosure("20230101000123", "00126380", "Acme Electronics", "20230101");

        let first = store.ingest_disclosures(&[doc.clone()]).await.unwrap();
        assert_eq!((first.inserted, first.skipped), (1, 0));

        let second = store.ingest_disclosures(&[doc]).await.unwrap();
        assert_eq!((second.inserted, second.skipped), (0, 1));

        let found = store
            .search_by_corp_code("00126380", Page::default())
            .await
            .unwrap();
        assert_eq!(found.total_count, 1);
        assert_eq!(found.rows.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_within_one_batch_is_also_deduplicated() {
        let store = store();
        let a = disclosure("20230101000123", "00126380", "Acme Electronics", "20230101");
        let b = disclosure("20230101000123", "00126380", "Acme Electronics", "20230101");

        let report = store.ingest_disclosures(&[a, b]).await.unwrap();
        assert_eq!((report.inserted, report.skipped, report.failed), (1, 1, 0));
    }

    #[tokio::test]
    async fn company_upsert_refreshes_name() {
        let store = store();
        store
            .ingest_disclosures(&[disclosure("R1", "00126380", "Old Name", "20230101")])
            .await
            .unwrap();
        store
            .ingest_disclosures(&[disclosure("R2", "00126380", "New Name", "20230201")])
            .await
            .unwrap();

        let conn = store.conn.lock().unwrap();
        let (count, name): (i64, String) = conn
            .query_row(
                "SELECT COUNT(*), MAX(corp_name) FROM companies WHERE corp_code = '00126380'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(name, "New Name");
    }

    #[tokio::test]
    async fn name_search_matches_substring_and_filters_market() {
        let store = store();
        let mut kosdaq = disclosure("R2", "00200001", "Acme Bio", "20230301");
        kosdaq.corp_cls = Some("K".to_string());
        store
            .ingest_disclosures(&[
                disclosure("R1", "00126380", "Acme Electronics", "20230201"),
                kosdaq,
                disclosure("R3", "00300001", "Other Corp", "20230401"),
            ])
            .await
            .unwrap();

        let all = store
            .search_by_name("Acme", None, Page::default())
            .await
            .unwrap();
        assert_eq!(all.total_count, 2);
        // Receipt date descending.
        assert_eq!(all.rows[0].rcept_no, "R2");

        let kospi_only = store
            .search_by_name("Acme", Some(MarketClass::Kospi), Page::default())
            .await
            .unwrap();
        assert_eq!(kospi_only.total_count, 1);
        assert_eq!(kospi_only.rows[0].rcept_no, "R1");
    }

    #[tokio::test]
    async fn pagination_reports_totals_across_pages() {
        let store = store();
        let rows: Vec<Disclosure> = (0..25)
            .map(|i| {
                disclosure(
                    &format!("R{i:02}"),
                    "00126380",
                    "Acme Electronics",
                    &format!("202301{:02}", i + 1),
                )
            })
            .collect();
        store.ingest_disclosures(&rows).await.unwrap();

        let page2 = store
            .search_by_corp_code("00126380", Page::new(2, 10))
            .await
            .unwrap();
        assert_eq!(page2.total_count, 25);
        assert_eq!(page2.rows.len(), 10);

        let page3 = store
            .search_by_corp_code("00126380", Page::new(3, 10))
            .await
            .unwrap();
        assert_eq!(page3.rows.len(), 5);
    }

    #[tokio::test]
    async fn recent_disclosures_ignore_other_filters() {
        let store = store();
        store
            .ingest_disclosures(&[
                disclosure("R1", "00126380", "Acme Electronics", "20230101"),
                disclosure("R2", "00200001", "Beta Corp", "20230301"),
            ])
            .await
            .unwrap();

        let recent = store
            .recent_disclosures(None, Page::default())
            .await
            .unwrap();
        assert_eq!(recent.total_count, 2);
        assert_eq!(recent.rows[0].rcept_no, "R2");
    }

    #[tokio::test]
    async fn financial_replace_is_wholesale() {
        let store = store();
        let key = StatementKey::new("00126380", "2023", "11011");

        let first = vec![
            line("Assets", "100", "1"),
            line("Liabilities", "40", "2"),
            line("Equity", "60", "3"),
        ];
        store.replace_financial_lines(&key, &first).await.unwrap();
        assert_eq!(store.financial_lines(&key).await.unwrap().len(), 3);

        let second = vec![line("Revenue", "500", "1"), line("Expenses", "300", "2")];
        store.replace_financial_lines(&key, &second).await.unwrap();

        let stored = store.financial_lines(&key).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|l| l.account_nm != "Assets"));
    }

    #[tokio::test]
    async fn financial_lines_order_by_numeric_ordinal() {
        let store = store();
        let key = StatementKey::new("00126380", "2023", "11011");
        store
            .replace_financial_lines(
                &key,
                &[
                    line("Tenth", "1", "10"),
                    line("Second", "2", "2"),
                    line("Ninth", "3", "9"),
                ],
            )
            .await
            .unwrap();

        let names: Vec<String> = store
            .financial_lines(&key)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.account_nm)
            .collect();
        assert_eq!(names, vec!["Second", "Ninth", "Tenth"]);
    }

    #[tokio::test]
    async fn other_statement_keys_survive_replace() {
        let store = store();
        let key_2023 = StatementKey::new("00126380", "2023", "11011");
        let key_2022 = StatementKey::new("00126380", "2022", "11011");

        store
            .replace_financial_lines(&key_2022, &[line("Assets", "90", "1")])
            .await
            .unwrap();
        store
            .replace_financial_lines(&key_2023, &[line("Assets", "100", "1")])
            .await
            .unwrap();
        store
            .replace_financial_lines(&key_2023, &[line("Assets", "110", "1")])
            .await
            .unwrap();

        assert_eq!(store.financial_lines(&key_2022).await.unwrap().len(), 1);
        assert_eq!(store.financial_lines(&key_2023).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn account_usage_counts_and_orders() {
        let store = store();
        let names = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        store
            .bump_account_usage(&names(&["Assets", "Equity"]))
            .await
            .unwrap();
        store
            .bump_account_usage(&names(&["Assets", "Revenue"]))
            .await
            .unwrap();
        store.bump_account_usage(&names(&["Assets"])).await.unwrap();

        let popular = store.popular_accounts(10).await.unwrap();
        assert_eq!(popular.first().map(String::as_str), Some("Assets"));
        assert_eq!(popular.len(), 3);

        let matches = store.search_accounts("ev", 10).await.unwrap();
        assert_eq!(matches, vec!["Revenue".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_names_in_one_batch_count_once() {
        let store = store();
        store
            .bump_account_usage(&[
                "Assets".to_string(),
                "Assets".to_string(),
                "Assets".to_string(),
            ])
            .await
            .unwrap();

        let conn = store.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT usage_count FROM account_usage WHERE account_nm = 'Assets'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
