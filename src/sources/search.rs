use std::thread;
use crate::error::{Error, Result};
use crate::executor::CommandRunner;
use crate::format::{SEARCH_VERSION_FALLBACK, nothing_found, parse_details, parse_record, search_entry};
use crate::model::{PackageDetails, PackageRecord, ResultEntry};
use crate::package_manager::PackageManager;
use crate::sources::Source;
use log::{debug, error, info, warn};

/// Remote search, each hit enriched with a per-package info lookup.
pub struct SearchSource<'a> {
    pub runner: &'a dyn CommandRunner,
    pub manager: &'a PackageManager,
    pub workers: usize,
    pub description_limit: usize,
}

impl SearchSource<'_> {
    fn details(&self, name: &str) -> PackageDetails {
        let output = self.runner.run(&self.manager.info(name));
        if output.success() && !output.stdout.is_empty() {
            parse_details(&output.stdout)
        } else {
            debug!("No details for {}: {}", name, output.diagnostic());
            PackageDetails::default()
        }
    }

    /// Runs the info lookups on a bounded set of scoped threads, keeping input order.
    fn enrich(&self, records: &[PackageRecord]) -> Vec<ResultEntry> {
        if records.is_empty() {
            return Vec::new();
        }
        let workers = self.workers.clamp(1, records.len());

        let mut rows: Vec<(usize, ResultEntry)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    scope.spawn(move || {
                        records
                            .iter()
                            .enumerate()
                            .skip(worker)
                            .step_by(workers)
                            .map(|(index, record)| {
                                let details = self.details(&record.name);
                                (index, search_entry(record, &details, self.description_limit))
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(rows) => rows,
                    Err(_) => {
                        error!("Info lookup worker panicked; its rows are dropped");
                        Vec::new()
                    }
                })
                .collect()
        });

        rows.sort_by_key(|(index, _)| *index);
        rows.into_iter().map(|(_, entry)| entry).collect()
    }
}

impl Source for SearchSource<'_> {
    fn fetch(&self, query: &str) -> Result<Vec<ResultEntry>> {
        let output = self.runner.run(&self.manager.search(query));
        if !output.success() {
            let message = output.diagnostic().to_string();
            error!("Error searching packages: {}", message);
            return Err(Error::SearchFailed(message));
        }

        let records: Vec<PackageRecord> = output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match parse_record(line, SEARCH_VERSION_FALLBACK) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Error parsing package info: {}", e);
                    None
                }
            })
            .collect();

        let entries = self.enrich(&records);
        if entries.is_empty() {
            info!("SearchSource: nothing found for '{}'", query);
            return Ok(vec![nothing_found(query)]);
        }

        info!("SearchSource: found {} entries for '{}'", entries.len(), query);
        Ok(entries)
    }
}
