use std::collections::HashMap;

use crate::cache::ProcessInfoCache;
use crate::error::{Result, ScoutError};
use crate::model::{EnrichedSocketEntry, ProcessDetails, Snapshot};
use crate::parse::parse_records;
use crate::platform::{CommandRunner, PsInspector, ToolPaths};

/// Arguments selecting every TCP and UDP socket in field output.
pub const LISTING_ARGS: [&str; 5] = ["-nP", "-iTCP", "-iUDP", "-FpcLuftPnT", "-w"];

/// lsof exits with 1 when nothing matched the selection.
const NO_RESULTS_STATUS: i32 = 1;

/// Produces enriched socket snapshots from the listing utility.
pub struct PortCollector<'a> {
    runner: &'a dyn CommandRunner,
    tools: &'a ToolPaths,
    cache: &'a ProcessInfoCache,
}

impl<'a> PortCollector<'a> {
    pub fn new(runner: &'a dyn CommandRunner, tools: &'a ToolPaths, cache: &'a ProcessInfoCache) -> Self {
        Self { runner, tools, cache }
    }

    /// List all sockets and attach the owning process's details to each.
    ///
    /// Detail lookups run once per distinct PID; a PID whose lookups fail
    /// keeps its sockets with empty details.
    pub fn collect(&self) -> Result<Snapshot> {
        let stdout = self.list_sockets()?;
        let records: Vec<_> = parse_records(&stdout).collect();

        let inspector = PsInspector::new(self.runner, self.tools);
        let mut details: HashMap<u32, ProcessDetails> = HashMap::new();
        for record in &records {
            details
                .entry(record.pid)
                .or_insert_with(|| self.cache.details(&inspector, record.pid));
        }
        log::debug!(
            "collected {} sockets from {} processes ({} cached)",
            records.len(),
            details.len(),
            self.cache.len()
        );

        let ports = records
            .into_iter()
            .map(|socket| EnrichedSocketEntry {
                details: details.get(&socket.pid).cloned().unwrap_or_default(),
                socket,
            })
            .collect();
        Ok(Snapshot::new(ports))
    }

    fn list_sockets(&self) -> Result<String> {
        let lsof = self
            .tools
            .lsof
            .as_deref()
            .ok_or_else(|| ScoutError::ToolNotFound("lsof".to_string()))?;

        let out = match self.runner.run(lsof, &LISTING_ARGS) {
            Ok(out) => out,
            Err(ScoutError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScoutError::ToolNotFound("lsof".to_string()));
            }
            Err(ScoutError::Timeout { program, timeout }) => {
                return Err(ScoutError::CollectionFailed(format!(
                    "{} did not finish within {:?}",
                    program, timeout
                )));
            }
            Err(e) => return Err(ScoutError::CollectionFailed(e.to_string())),
        };

        let stderr = out.stderr.trim();
        match out.status {
            Some(0) => Ok(out.stdout),
            Some(NO_RESULTS_STATUS) if stderr.is_empty() => {
                log::debug!("lsof reported no matching sockets");
                Ok(out.stdout)
            }
            status => {
                log::warn!("lsof exited with {:?}: {}", status, stderr);
                Err(ScoutError::CollectionFailed(if stderr.is_empty() {
                    match status {
                        Some(code) => format!("lsof exited with status {}", code),
                        None => "lsof was terminated by a signal".to_string(),
                    }
                } else {
                    stderr.to_string()
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::CommandOutput;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Fake lsof/ps: the listing call returns `listing`, per-PID calls are
    /// answered from `commands` and counted.
    struct FakeHost {
        listing: Result<CommandOutput>,
        commands: HashMap<u32, &'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeHost {
        fn new(status: i32, stdout: &str, stderr: &str) -> Self {
            Self {
                listing: Ok(CommandOutput {
                    status: Some(status),
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                }),
                commands: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls_matching(&self, needle: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.contains(needle))
                .count()
        }
    }

    impl CommandRunner for FakeHost {
        fn run(&self, program: &Path, args: &[&str]) -> Result<CommandOutput> {
            let line = format!("{} {}", program.display(), args.join(" "));
            self.calls.lock().unwrap().push(line);
            if args.contains(&"-iTCP") {
                return match &self.listing {
                    Ok(out) => Ok(out.clone()),
                    Err(ScoutError::Io(e)) => Err(ScoutError::Io(std::io::Error::new(e.kind(), "fake"))),
                    Err(_) => Err(ScoutError::Parse("fake".to_string())),
                };
            }
            let pid: u32 = args[args.iter().position(|a| *a == "-p").unwrap() + 1]
                .parse()
                .unwrap();
            let stdout = match (args.last(), self.commands.get(&pid)) {
                (Some(&"command="), Some(cmd)) => cmd.to_string(),
                (Some(&"ppid="), Some(_)) => "1".to_string(),
                (Some(&"-Fn"), Some(_)) => format!("p{}\nfcwd\nn/srv/app\n", pid),
                _ => return Ok(CommandOutput { status: Some(1), ..Default::default() }),
            };
            Ok(CommandOutput { status: Some(0), stdout, stderr: String::new() })
        }
    }

    fn tools() -> ToolPaths {
        ToolPaths {
            lsof: Some(PathBuf::from("/usr/sbin/lsof")),
            ps: Some(PathBuf::from("/bin/ps")),
        }
    }

    const LISTING: &str = "p100\ncnginx\nLroot\nf6\ntIPv4\nPTCP\nn*:80\nTST=LISTEN\nf7\ntIPv4\nPTCP\nn*:443\nTST=LISTEN\np200\ncghost\nLnobody\nf3\ntIPv4\nPUDP\nn*:9999\n";

    #[test]
    fn test_collect_enriches_each_socket() {
        let mut host = FakeHost::new(0, LISTING, "");
        host.commands.insert(100, "/usr/sbin/nginx -g daemon off;");
        let tools = tools();
        let cache = ProcessInfoCache::default();
        let snapshot = PortCollector::new(&host, &tools, &cache).collect().unwrap();

        assert_eq!(snapshot.count, 3);
        let nginx = &snapshot.ports[0];
        assert_eq!(nginx.details.full_command.as_deref(), Some("/usr/sbin/nginx -g daemon off;"));
        assert_eq!(nginx.details.parent_pid, Some(1));
        assert_eq!(nginx.details.cwd.as_deref(), Some("/srv/app"));
        assert_eq!(snapshot.ports[1].details, nginx.details);

        // PID 200 vanished before inspection: still listed, details absent.
        let ghost = &snapshot.ports[2];
        assert_eq!(ghost.socket.pid, 200);
        assert_eq!(ghost.details, ProcessDetails::default());
    }

    #[test]
    fn test_each_pid_inspected_once() {
        let mut host = FakeHost::new(0, LISTING, "");
        host.commands.insert(100, "nginx");
        let tools = tools();
        let cache = ProcessInfoCache::default();
        let collector = PortCollector::new(&host, &tools, &cache);
        collector.collect().unwrap();
        collector.collect().unwrap();

        assert_eq!(host.calls_matching("-p 100 -o command="), 1);
        assert_eq!(host.calls_matching("-p 100 -o ppid="), 1);
        assert_eq!(host.calls_matching("-p 100 -d cwd"), 1);
        assert_eq!(host.calls_matching("-iTCP"), 2);
    }

    #[test]
    fn test_listing_invocation() {
        let host = FakeHost::new(0, "", "");
        let tools = tools();
        let cache = ProcessInfoCache::default();
        PortCollector::new(&host, &tools, &cache).collect().unwrap();
        assert_eq!(
            host.calls.lock().unwrap()[0],
            "/usr/sbin/lsof -nP -iTCP -iUDP -FpcLuftPnT -w"
        );
    }

    #[test]
    fn test_no_results_exit_status_is_empty_snapshot() {
        let host = FakeHost::new(1, "", "");
        let tools = tools();
        let cache = ProcessInfoCache::default();
        let snapshot = PortCollector::new(&host, &tools, &cache).collect().unwrap();
        assert_eq!(snapshot.count, 0);
        assert!(snapshot.ports.is_empty());
    }

    #[test]
    fn test_failure_carries_stderr() {
        let host = FakeHost::new(1, "", "lsof: status error on /dev: Permission denied\n");
        let tools = tools();
        let cache = ProcessInfoCache::default();
        let err = PortCollector::new(&host, &tools, &cache).collect().unwrap_err();
        match err {
            ScoutError::CollectionFailed(msg) => assert!(msg.contains("Permission denied")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_other_status_without_stderr() {
        let host = FakeHost::new(2, "", "");
        let tools = tools();
        let cache = ProcessInfoCache::default();
        let err = PortCollector::new(&host, &tools, &cache).collect().unwrap_err();
        assert!(matches!(err, ScoutError::CollectionFailed(_)));
    }

    #[test]
    fn test_missing_lsof_is_tool_not_found() {
        let host = FakeHost::new(0, LISTING, "");
        let tools = ToolPaths { lsof: None, ps: Some(PathBuf::from("/bin/ps")) };
        let cache = ProcessInfoCache::default();
        let err = PortCollector::new(&host, &tools, &cache).collect().unwrap_err();
        assert!(matches!(err, ScoutError::ToolNotFound(_)));
        assert!(host.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_vanished_lsof_binary_is_tool_not_found() {
        let mut host = FakeHost::new(0, "", "");
        host.listing = Err(ScoutError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        )));
        let tools = tools();
        let cache = ProcessInfoCache::default();
        let err = PortCollector::new(&host, &tools, &cache).collect().unwrap_err();
        assert!(matches!(err, ScoutError::ToolNotFound(_)));
    }
}
