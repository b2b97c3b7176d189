#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Field output of a small host: nginx listening on 80 and 443 with one
/// client connection, sshd on 22, a curl client, and a UDP resolver.
pub const LISTING: &str = "\
p100\ncnginx\nLroot\nf6\ntIPv4\nPTCP\nn*:80\nTST=LISTEN\n\
f7\ntIPv6\nPTCP\nn[::]:443\nTST=LISTEN\n\
f12\ntIPv4\nPTCP\nn10.0.0.5:80->10.0.0.9:41000\nTST=ESTABLISHED\n\
p200\ncsshd\nLroot\nf3\ntIPv4\nPTCP\nn*:22\nTST=LISTEN\n\
p300\nccurl\nLdev\nf5\ntIPv4\nPTCP\nn10.0.0.5:51000->93.184.216.34:443\nTST=ESTABLISHED\n\
p400\ncresolved\nLsystemd-resolve\nf13\ntIPv4\nPUDP\nn127.0.0.53:53\n";

/// Fake `lsof` and `ps` executables in a private directory.
pub struct FakeTools {
    dir: TempDir,
    pub lsof: PathBuf,
    pub ps: PathBuf,
}

impl FakeTools {
    /// `lsof` prints `listing` for the socket query and a fixed cwd for
    /// per-process queries; `ps` answers command and parent PID queries.
    pub fn with_listing(listing: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let listing_path = dir.path().join("listing.txt");
        fs::write(&listing_path, listing).unwrap();

        let lsof = write_script(
            dir.path(),
            "lsof",
            &format!(
                "case \"$*\" in\n\
                 *-iTCP*) cat '{}' ;;\n\
                 *cwd*) printf 'p%s\\nfcwd\\nn/srv/%s\\n' \"$3\" \"$3\" ;;\n\
                 esac\n",
                listing_path.display()
            ),
        );
        let ps = write_script(
            dir.path(),
            "ps",
            "case \"$4\" in\n\
             command=) echo \"/usr/bin/daemon --pid $2\" ;;\n\
             ppid=) echo '    1' ;;\n\
             esac\n",
        );
        Self { dir, lsof, ps }
    }

    /// `lsof` exits with `status` after writing `stderr`.
    pub fn failing(status: i32, stderr: &str) -> Self {
        let tools = Self::with_listing("");
        write_script(
            tools.dir.path(),
            "lsof",
            &format!("printf '%s' '{}' >&2\nexit {}\n", stderr, status),
        );
        tools
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("portscout").unwrap();
        cmd.arg("--lsof")
            .arg(&self.lsof)
            .arg("--ps")
            .arg(&self.ps)
            .env_remove("RUST_LOG")
            .env_remove("PORTSCOUT_TIMEOUT");
        cmd
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
