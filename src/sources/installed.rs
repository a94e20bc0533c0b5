use crate::cache::InstalledCache;
use crate::error::{Error, Result};
use crate::executor::CommandRunner;
use crate::format::{INSTALLED_VERSION_FALLBACK, installed_entry, nothing_installed, parse_record};
use crate::model::ResultEntry;
use crate::package_manager::PackageManager;
use crate::sources::Source;
use log::{error, info, warn};

/// Locally installed packages, served from the cache while it is fresh.
pub struct InstalledSource<'a> {
    pub runner: &'a dyn CommandRunner,
    pub manager: &'a PackageManager,
    pub cache: &'a InstalledCache,
}

impl Source for InstalledSource<'_> {
    fn fetch(&self, _query: &str) -> Result<Vec<ResultEntry>> {
        if let Some(entries) = self.cache.read().filter(|e| !e.is_empty()) {
            return Ok(entries);
        }

        let output = self.runner.run(&self.manager.list_installed());
        if !output.success() {
            let message = output.diagnostic().to_string();
            error!("Error listing packages: {}", message);
            return Err(Error::ListFailed(message));
        }

        let entries: Vec<ResultEntry> = output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match parse_record(line, INSTALLED_VERSION_FALLBACK) {
                Ok(record) => Some(installed_entry(&record)),
                Err(e) => {
                    warn!("Error parsing package info: {}", e);
                    None
                }
            })
            .collect();

        if entries.is_empty() {
            info!("InstalledSource: no packages installed");
            return Ok(vec![nothing_installed()]);
        }

        self.cache.write(&entries);
        info!("InstalledSource: found {} entries", entries.len());
        Ok(entries)
    }
}
