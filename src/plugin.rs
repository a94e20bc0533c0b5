use std::thread;
use std::time::Duration;
use log::{debug, error, info, warn};
use crate::cache::InstalledCache;
use crate::config::{Config, SearchConfig};
use crate::error::{Error, Result};
use crate::executor::CommandRunner;
use crate::host::{Host, Request};
use crate::model::ResultEntry;
use crate::package_manager::{PackageAction, PackageManager, validate_package_name};
use crate::sources::Source;
use crate::sources::installed::InstalledSource;
use crate::sources::search::SearchSource;

pub struct Plugin<R: CommandRunner, H: Host> {
    runner: R,
    host: H,
    manager: PackageManager,
    cache: InstalledCache,
    search: SearchConfig,
    refresh_delay: Duration,
}

impl<R: CommandRunner, H: Host> Plugin<R, H> {
    pub fn new(config: &Config, runner: R, host: H) -> Self {
        Self {
            runner,
            host,
            manager: PackageManager::new(&config.general.package_manager, config.general.shell),
            cache: InstalledCache::new(config.cache_path(), config.cache_ttl()),
            search: config.search.clone(),
            refresh_delay: config.actions.refresh_delay(),
        }
    }

    #[cfg(test)]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Routes a host request. Returns the rows to print for queries and
    /// malformed requests; actions report through the host instead.
    pub fn dispatch(&mut self, request: &Request) -> Option<Vec<ResultEntry>> {
        let action = match request.method.as_str() {
            "query" => {
                let text = request.param(0).unwrap_or_default();
                return Some(self.query(&text));
            }
            "install_package" => PackageAction::Install,
            "uninstall_package" => PackageAction::Uninstall,
            "upgrade_package" => PackageAction::Upgrade,
            other => {
                warn!("Unsupported method '{}'", other);
                let e = Error::BadRequest(format!("unsupported method '{}'", other));
                return Some(vec![e.to_entry()]);
            }
        };

        match request.param(0) {
            Some(name) => {
                match action {
                    PackageAction::Install => self.install_package(&name),
                    PackageAction::Uninstall => self.uninstall_package(&name),
                    PackageAction::Upgrade => self.upgrade_package(&name),
                }
                None
            }
            None => {
                warn!("{} called without a package name", request.method);
                let e = Error::BadRequest(format!("{} needs a package name", request.method));
                Some(vec![e.to_entry()])
            }
        }
    }

    /// Empty text lists installed packages, anything else searches. Always
    /// returns at least one row.
    pub fn query(&self, text: &str) -> Vec<ResultEntry> {
        let text = text.trim();
        let result = if text.is_empty() {
            self.list_installed_packages()
        } else {
            self.search_packages(text)
        };

        match result {
            Ok(entries) => entries,
            Err(e) => {
                error!("Error in query: {}", e);
                vec![e.to_entry()]
            }
        }
    }

    pub fn list_installed_packages(&self) -> Result<Vec<ResultEntry>> {
        InstalledSource {
            runner: &self.runner,
            manager: &self.manager,
            cache: &self.cache,
        }
        .fetch("")
    }

    pub fn search_packages(&self, query: &str) -> Result<Vec<ResultEntry>> {
        SearchSource {
            runner: &self.runner,
            manager: &self.manager,
            workers: self.search.info_workers,
            description_limit: self.search.description_limit,
        }
        .fetch(query)
    }

    pub fn install_package(&mut self, name: &str) {
        self.perform(PackageAction::Install, name);
    }

    pub fn uninstall_package(&mut self, name: &str) {
        self.perform(PackageAction::Uninstall, name);
    }

    pub fn upgrade_package(&mut self, name: &str) {
        self.perform(PackageAction::Upgrade, name);
    }

    fn perform(&mut self, action: PackageAction, name: &str) {
        if let Err(e) = self.try_perform(action, name) {
            let message = format!("Error {} {}: {}", action.gerund(), name, e);
            error!("{}", message);
            self.host.show_msg(&message, "");
        }
    }

    fn try_perform(&mut self, action: PackageAction, name: &str) -> Result<()> {
        let name = validate_package_name(name)?;
        self.cache.invalidate();

        let command = self.manager.action(action, name);
        self.runner.spawn_detached(&command)?;
        info!("Started {} of {}", action.noun(), name);
        self.host.show_msg(&format!("Starting {} of {}", action.noun(), name), "");

        if action.refreshes_cache() {
            // The elevated process may still be running; this only rewarms the cache.
            thread::sleep(self.refresh_delay);
            match self.list_installed_packages() {
                Ok(entries) => debug!("Refreshed {} installed entries", entries.len()),
                Err(e) => warn!("Refresh after {} of {} failed: {}", action.noun(), name, e),
            }
        }
        Ok(())
    }
}
