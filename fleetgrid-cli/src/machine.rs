//! Machine records and their table columns.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use fleetgrid_lib::resource::Identified;
use fleetgrid_lib::search::{Attribute, FilterHandlers, PrefixedFilter, Searchable};
use fleetgrid_lib::view::Column;
use serde::Deserialize;

use crate::error::CliError;

const WORKLOAD_PREFIX: &str = "workload";

/// A machine as listed by the region API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Machine {
    pub system_id: String,
    pub hostname: String,
    #[serde(default)]
    pub domain: Option<String>,
    pub status: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub cpu_count: Option<u32>,
    /// Memory in GiB.
    #[serde(default)]
    pub memory: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form key/value annotations set by the machine's workload.
    #[serde(default)]
    pub workload_annotations: BTreeMap<String, String>,
}

impl Machine {
    pub fn fqdn(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{}.{}", self.hostname, domain),
            None => self.hostname.clone(),
        }
    }
}

impl Identified for Machine {
    type Id = String;

    fn id(&self) -> String {
        self.system_id.clone()
    }
}

impl Searchable for Machine {
    fn attribute(&self, name: &str) -> Option<Attribute> {
        if let Some(key) = name
            .strip_prefix(WORKLOAD_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
        {
            return self
                .workload_annotations
                .get(key)
                .map(|value| value.as_str().into());
        }
        match name {
            "hostname" => Some(self.hostname.as_str().into()),
            "fqdn" => Some(self.fqdn().into()),
            "domain" => self.domain.as_deref().map(Into::into),
            "id" | "system_id" => Some(self.system_id.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "owner" => self.owner.as_deref().map(Into::into),
            "pool" => self.pool.as_deref().map(Into::into),
            "zone" => self.zone.as_deref().map(Into::into),
            "cores" | "cpu" => self.cpu_count.map(Into::into),
            "ram" | "memory" => self.memory.map(Into::into),
            "tags" => Some(self.tags.clone().into()),
            _ => None,
        }
    }

    fn free_text(&self) -> Vec<String> {
        let mut text = vec![self.fqdn(), self.system_id.clone(), self.status.clone()];
        text.extend(
            [&self.owner, &self.pool, &self.zone]
                .into_iter()
                .flatten()
                .cloned(),
        );
        text.extend(self.tags.iter().cloned());
        text
    }
}

/// Reads a JSON array of machines.
pub fn load(path: &Path) -> Result<Vec<Machine>, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Machines {
        path: path.to_path_buf(),
        source,
    })
}

/// Sortable machine columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Fqdn,
    Status,
    Owner,
    Pool,
    Zone,
    Cores,
    Ram,
}

/// Column definitions, in display order.
pub fn columns() -> Vec<Column<SortKey, Machine>> {
    vec![
        Column::new("FQDN").sort_by(SortKey::Fqdn, |m: &Machine, _| Some(m.fqdn().into())),
        Column::new("STATUS").sort_by(SortKey::Status, |m: &Machine, _| Some(m.status.as_str().into())),
        Column::new("OWNER").sort_by(SortKey::Owner, |m: &Machine, _| m.owner.as_deref().map(Into::into)),
        Column::new("POOL").sort_by(SortKey::Pool, |m: &Machine, _| m.pool.as_deref().map(Into::into)),
        Column::new("ZONE").sort_by(SortKey::Zone, |m: &Machine, _| m.zone.as_deref().map(Into::into)),
        Column::new("CORES").sort_by(SortKey::Cores, |m: &Machine, _| m.cpu_count.map(Into::into)),
        Column::new("RAM").sort_by(SortKey::Ram, |m: &Machine, _| m.memory.map(Into::into)),
        Column::new("TAGS"),
    ]
}

/// Cell text for each of [`columns`], in the same order.
pub fn cells(machine: &Machine) -> Vec<String> {
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();
    vec![
        machine.fqdn(),
        machine.status.clone(),
        or_dash(machine.owner.as_deref()),
        or_dash(machine.pool.as_deref()),
        or_dash(machine.zone.as_deref()),
        machine.cpu_count.map_or_else(|| "-".to_string(), |c| c.to_string()),
        machine.memory.map_or_else(|| "-".to_string(), |m| format!("{} GiB", m)),
        machine.tags.join(", "),
    ]
}

/// Search handlers for machine lists. Workload annotations are searched as
/// `workload-<key>:<value>`.
pub fn filter_handlers() -> FilterHandlers {
    FilterHandlers::new(vec![PrefixedFilter::new("workload_annotations", WORKLOAD_PREFIX)])
}

#[cfg(test)]
mod tests {
    use fleetgrid_lib::search::SearchFilter;
    use fleetgrid_lib::view::filter_rows;

    use super::*;

    fn machines() -> Vec<Machine> {
        serde_json::from_str(
            r#"[
                {"system_id": "abc123", "hostname": "koala", "domain": "maas",
                 "status": "Deployed", "owner": "admin", "cpu_count": 8,
                 "memory": 16, "tags": ["virtual", "gpu"],
                 "workload_annotations": {"team": "storage", "env": "prod"}},
                {"system_id": "def456", "hostname": "wombat", "status": "Ready",
                 "pool": "spare", "cpu_count": 2,
                 "workload_annotations": {"team": "compute"}}
            ]"#,
        )
        .unwrap()
    }

    fn search(query: &str) -> Vec<String> {
        let machines = machines();
        let filter: SearchFilter<String> = SearchFilter::parse(&filter_handlers(), query);
        filter_rows(&machines, &filter)
            .iter()
            .map(|m| m.system_id.clone())
            .collect()
    }

    #[test]
    fn test_cells_match_columns() {
        for machine in machines() {
            assert_eq!(cells(&machine).len(), columns().len());
        }
    }

    #[test]
    fn test_fqdn() {
        let machines = machines();
        assert_eq!(machines[0].fqdn(), "koala.maas");
        assert_eq!(machines[1].fqdn(), "wombat");
    }

    #[test]
    fn test_search_machines() {
        assert_eq!(search("cores:4"), vec!["abc123"]);
        assert_eq!(search("tags:gpu"), vec!["abc123"]);
        assert_eq!(search("spare"), vec!["def456"]);
        assert_eq!(search("owner:!admin"), vec!["def456"]);
        assert_eq!(search("status:(deployed,ready)").len(), 2);
    }

    #[test]
    fn test_search_workload_annotations() {
        assert_eq!(search("workload-team:(storage)"), vec!["abc123"]);
        assert_eq!(search("workload-team:(!storage)"), vec!["def456"]);
        assert_eq!(search("workload-env:()"), vec!["abc123"]);
        assert_eq!(search("workload-team").len(), 2);
        assert!(search("workload-owner:(anyone)").is_empty());
    }

    #[test]
    fn test_toggle_workload_filter() {
        let handlers = filter_handlers();
        let filters = handlers.toggle_filter(&handlers.current_filters(""), "workload_annotations", "env", false, None);
        assert_eq!(handlers.to_search_string(&filters), "workload-env:()");

        let machines = machines();
        let filter: SearchFilter<String> = SearchFilter::new(filters);
        let matched: Vec<&str> = filter_rows(&machines, &filter)
            .iter()
            .map(|m| m.system_id.as_str())
            .collect();
        assert_eq!(matched, vec!["abc123"]);
    }
}
