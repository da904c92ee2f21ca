//! Full-table scan over the subscriber list
//!
//! The scan is a pull-based iterator: nothing is fetched until the first
//! row is pulled, and a caller that stops pulling stops the network
//! traffic with it. Page 1 fixes the total page count; pages 2..=N are
//! fetched in order as the iterator drains each page's records.

use std::collections::VecDeque;

use crate::coerce::coerce;
use crate::config::MoosendConfig;
use crate::fetch::{HttpTransport, PageFetcher};
use crate::logging::{LogSink, Severity};
use crate::resolve::resolve;
use crate::schema::{Column, Qualifier, Row};
use crate::wire::Subscriber;

/// Produces lazy full-table scans of one list's subscribed members
pub struct SubscriberSource<'a> {
    config: &'a MoosendConfig,
    columns: &'a [Column],
    transport: &'a dyn HttpTransport,
    log: &'a dyn LogSink,
}

impl<'a> SubscriberSource<'a> {
    /// Bind a source to its configuration, declared columns, transport,
    /// and log sink
    pub fn new(
        config: &'a MoosendConfig,
        columns: &'a [Column],
        transport: &'a dyn HttpTransport,
        log: &'a dyn LogSink,
    ) -> Self {
        Self {
            config,
            columns,
            transport,
            log,
        }
    }

    /// Start a scan. Qualifiers are accepted for interface compatibility
    /// and never pushed down; every row is fetched and emitted.
    ///
    /// The returned iterator is finite, forward-only, and not
    /// restartable; a new `scan` call re-fetches page 1. A failed first
    /// fetch produces an empty sequence, with the failure already logged.
    pub fn scan(&self, qualifiers: &[Qualifier]) -> ScanIter<'a> {
        if !qualifiers.is_empty() {
            self.log.log(
                Severity::Debug,
                &format!(
                    "ignoring {} qualifier(s); filtering is the caller's responsibility",
                    qualifiers.len()
                ),
            );
        }
        ScanIter {
            fetcher: PageFetcher::new(self.config, self.transport, self.log),
            columns: self.columns,
            log: self.log,
            state: ScanState::NotStarted,
        }
    }
}

enum ScanState {
    NotStarted,
    Active {
        buffered: VecDeque<Subscriber>,
        next_page: u32,
        total_pages: u32,
    },
    Done,
}

/// Lazy row iterator produced by [`SubscriberSource::scan`]
pub struct ScanIter<'a> {
    fetcher: PageFetcher<'a>,
    columns: &'a [Column],
    log: &'a dyn LogSink,
    state: ScanState,
}

impl ScanIter<'_> {
    /// Fetch one page. Returns `None` on any failure, which ends the
    /// scan: envelope failures were already logged by the fetcher, and
    /// transport or decode failures are logged here at error severity.
    fn fetch(&self, page: u32) -> Option<(VecDeque<Subscriber>, u32)> {
        match self.fetcher.fetch_page(page) {
            Ok(Some((context, total_pages))) => Some((context.subscribers.into(), total_pages)),
            Ok(None) => None,
            Err(e) => {
                self.log.log(Severity::Error, &e.to_string());
                None
            }
        }
    }

    fn emit_row(&mut self, subscriber: &Subscriber) -> Option<Row> {
        let mut row = Row::new();
        for column in self.columns {
            let raw = resolve(&column.name, subscriber, self.log);
            match coerce(&column.name, raw, column.ty) {
                Ok(value) => {
                    row.insert(column.name.clone(), value);
                }
                Err(e) => {
                    // A bad integer cell aborts the whole scan rather
                    // than emitting a partial row.
                    self.log.log(Severity::Error, &e.to_string());
                    self.state = ScanState::Done;
                    return None;
                }
            }
        }
        Some(row)
    }
}

impl Iterator for ScanIter<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        loop {
            match std::mem::replace(&mut self.state, ScanState::Done) {
                ScanState::Done => return None,
                ScanState::NotStarted => {
                    let (buffered, total_pages) = self.fetch(1)?;
                    self.state = ScanState::Active {
                        buffered,
                        next_page: 2,
                        total_pages,
                    };
                }
                ScanState::Active {
                    mut buffered,
                    next_page,
                    total_pages,
                } => {
                    if let Some(subscriber) = buffered.pop_front() {
                        self.state = ScanState::Active {
                            buffered,
                            next_page,
                            total_pages,
                        };
                        return self.emit_row(&subscriber);
                    }
                    if next_page > total_pages {
                        return None;
                    }
                    // The total page count stays fixed from the first
                    // response; later envelopes are not re-read for it.
                    let (fetched, _) = self.fetch(next_page)?;
                    self.state = ScanState::Active {
                        buffered: fetched,
                        next_page: next_page + 1,
                        total_pages,
                    };
                }
            }
        }
    }
}
