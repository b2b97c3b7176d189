use crate::collector::PortCollector;
use crate::error::Result;
use crate::filter::FilterConfig;
use crate::grouping::group;
use crate::model::{DisplayRow, EnrichedSocketEntry};
use crate::rows::build_rows;

/// Filtered view of one snapshot, ready for output.
#[derive(Debug, Default)]
pub struct Listing {
    /// Unsorted display rows.
    pub rows: Vec<DisplayRow>,
    /// Sockets of every admitted process that pass the port criterion.
    pub sockets: Vec<EnrichedSocketEntry>,
}

/// Anything that can produce a fresh set of display rows.
pub trait RowSource {
    fn fetch_rows(&self) -> Result<Vec<DisplayRow>>;
}

/// Runs collect, group, filter and row building in sequence.
pub struct Inventory<'a> {
    collector: PortCollector<'a>,
    filter: &'a FilterConfig,
}

impl<'a> Inventory<'a> {
    pub fn new(collector: PortCollector<'a>, filter: &'a FilterConfig) -> Self {
        Self { collector, filter }
    }

    pub fn listing(&self) -> Result<Listing> {
        let snapshot = self.collector.collect()?;
        let mut groups = group(snapshot.ports);
        groups.retain(|g| self.filter.matches_group(g));

        let mut rows = build_rows(&groups);
        rows.retain(|r| self.filter.matches_row(r));

        let sockets = groups
            .into_iter()
            .flat_map(|g| g.sockets)
            .filter(|s| self.filter.matches_socket(s))
            .collect();
        Ok(Listing { rows, sockets })
    }

    /// Every port held by `pid`, ignoring the configured filters.
    pub fn ports_of(&self, pid: u32) -> Result<Vec<String>> {
        let snapshot = self.collector.collect()?;
        let rows = build_rows(&group(snapshot.ports));
        Ok(affected_ports(&rows, pid))
    }
}

impl RowSource for Inventory<'_> {
    fn fetch_rows(&self) -> Result<Vec<DisplayRow>> {
        self.listing().map(|l| l.rows)
    }
}

/// Union of the process ports of every row owned by `pid`, in first-seen
/// order.
pub fn affected_ports(rows: &[DisplayRow], pid: u32) -> Vec<String> {
    let mut ports: Vec<String> = Vec::new();
    for row in rows.iter().filter(|r| r.pid == pid) {
        for port in &row.process_ports {
            if !ports.contains(port) {
                ports.push(port.clone());
            }
        }
    }
    ports
}
