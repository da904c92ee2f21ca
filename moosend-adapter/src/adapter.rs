//! Tabular data-source facade
//!
//! [`MoosendAdapter`] is the piece a host holds: one instance per foreign
//! table, built by dependency injection from a validated configuration,
//! the declared column set, a transport, and a log sink. The
//! [`TableSource`] trait is the capability contract a runtime programs
//! against instead of subclassing anything.

use crate::config::MoosendConfig;
use crate::error::Result;
use crate::fetch::{HttpTransport, ReqwestTransport};
use crate::logging::{LogSink, TracingLog};
use crate::schema::{Column, Qualifier, Row};
use crate::sink::SubscriberSink;
use crate::source::{ScanIter, SubscriberSource};

/// Capability contract for a tabular data source with row-level writes.
///
/// Row identity (`rowid`) is the value of the configured primary-key
/// column, which for this adapter is the subscriber's email address.
pub trait TableSource {
    /// Full-table scan. Qualifiers are accepted but may be ignored;
    /// callers must not rely on pushdown.
    fn scan<'a>(&'a self, qualifiers: &[Qualifier]) -> Box<dyn Iterator<Item = Row> + 'a>;

    /// Insert one row. Returns the stored row as the backend reports it,
    /// or `None` when the backend rejected the write (already logged).
    fn insert(&self, new_values: &Row) -> Result<Option<Row>>;

    /// Update the row identified by `rowid`. Same return contract as
    /// [`insert`](Self::insert).
    fn update(&self, rowid: &str, new_values: &Row) -> Result<Option<Row>>;

    /// Delete the row identified by `rowid`. Backend-level rejection is
    /// logged and swallowed.
    fn delete(&self, rowid: &str) -> Result<()>;
}

/// Adapter exposing one Moosend mailing list as a table
pub struct MoosendAdapter {
    config: MoosendConfig,
    columns: Vec<Column>,
    transport: Box<dyn HttpTransport>,
    log: Box<dyn LogSink>,
}

impl std::fmt::Debug for MoosendAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoosendAdapter")
            .field("config", &self.config)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl MoosendAdapter {
    /// Build an adapter from injected collaborators, validating the
    /// configuration against the declared columns
    pub fn new(
        config: MoosendConfig,
        columns: Vec<Column>,
        transport: Box<dyn HttpTransport>,
        log: Box<dyn LogSink>,
    ) -> Result<Self> {
        config.validate(&columns)?;
        Ok(Self {
            config,
            columns,
            transport,
            log,
        })
    }

    /// Build an adapter with the production transport and tracing-backed
    /// logging
    pub fn connect(config: MoosendConfig, columns: Vec<Column>) -> Result<Self> {
        let transport = Box::new(ReqwestTransport::new()?);
        Self::new(config, columns, transport, Box::new(TracingLog))
    }

    /// The declared column set
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The adapter's configuration
    pub fn config(&self) -> &MoosendConfig {
        &self.config
    }

    /// Start a lazy full-table scan
    pub fn scan(&self, qualifiers: &[Qualifier]) -> ScanIter<'_> {
        self.source().scan(qualifiers)
    }

    /// Insert one subscriber row
    pub fn insert(&self, new_values: &Row) -> Result<Option<Row>> {
        self.sink().insert(new_values)
    }

    /// Update the subscriber whose email is `rowid`
    pub fn update(&self, rowid: &str, new_values: &Row) -> Result<Option<Row>> {
        self.sink().update(Some(rowid), new_values)
    }

    /// Remove the subscriber whose email is `rowid`
    pub fn delete(&self, rowid: &str) -> Result<()> {
        self.sink().delete(rowid)
    }

    fn source(&self) -> SubscriberSource<'_> {
        SubscriberSource::new(
            &self.config,
            &self.columns,
            self.transport.as_ref(),
            self.log.as_ref(),
        )
    }

    fn sink(&self) -> SubscriberSink<'_> {
        SubscriberSink::new(
            &self.config,
            &self.columns,
            self.transport.as_ref(),
            self.log.as_ref(),
        )
    }
}

impl TableSource for MoosendAdapter {
    fn scan<'a>(&'a self, qualifiers: &[Qualifier]) -> Box<dyn Iterator<Item = Row> + 'a> {
        Box::new(MoosendAdapter::scan(self, qualifiers))
    }

    fn insert(&self, new_values: &Row) -> Result<Option<Row>> {
        MoosendAdapter::insert(self, new_values)
    }

    fn update(&self, rowid: &str, new_values: &Row) -> Result<Option<Row>> {
        MoosendAdapter::update(self, rowid, new_values)
    }

    fn delete(&self, rowid: &str) -> Result<()> {
        MoosendAdapter::delete(self, rowid)
    }
}
