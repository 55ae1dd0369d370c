//! Fakes shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use diag_collector::error::{CollectorError, CollectorResult};
use diag_collector::models::ClusterNode;
use diag_collector::shell::{DiagnosticShell, ShellCommand, ShellFlavor, ShellOutput};
use diag_collector::topology::{DnsResolver, NodeLocality};
use diag_collector::transfer::{TransferInvocation, TransferOutput, TransferProvider};

/// Shell replying from a per-(node, command) table.
pub struct ScriptedShell {
    pub flavor: ShellFlavor,
    pub replies: HashMap<(String, ShellCommand), ShellOutput>,
    pub calls: RefCell<Vec<(ClusterNode, ShellCommand)>>,
}

impl ScriptedShell {
    pub fn new(flavor: ShellFlavor) -> Self {
        Self {
            flavor,
            replies: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn reply(mut self, node: &str, command: ShellCommand, output: ShellOutput) -> Self {
        self.replies.insert((node.to_string(), command), output);
        self
    }
}

impl DiagnosticShell for ScriptedShell {
    fn flavor(&self) -> ShellFlavor {
        self.flavor
    }

    fn run(&self, node: &ClusterNode, command: ShellCommand) -> CollectorResult<ShellOutput> {
        self.calls.borrow_mut().push((node.clone(), command));
        self.replies
            .get(&(node.endpoint(), command))
            .cloned()
            .ok_or_else(|| CollectorError::Collection(format!("no reply for {} {:?}", node, command)))
    }
}

/// DNS answering from a fixed table.
pub struct StaticDns(pub HashMap<String, Vec<Ipv4Addr>>);

impl StaticDns {
    pub fn new(entries: &[(&str, [u8; 4])]) -> Self {
        let mut table: HashMap<String, Vec<Ipv4Addr>> = HashMap::new();
        for (host, ip) in entries {
            table.entry(host.to_string()).or_default().push(Ipv4Addr::from(*ip));
        }
        Self(table)
    }
}

impl DnsResolver for StaticDns {
    fn lookup_ipv4(&self, hostname: &str) -> io::Result<Vec<Ipv4Addr>> {
        self.0
            .get(hostname)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such host"))
    }
}

/// Treats the listed hostnames as this machine.
pub struct LocalHosts(pub Vec<String>);

impl NodeLocality for LocalHosts {
    fn is_local(&self, hostname: &str) -> CollectorResult<bool> {
        Ok(self.0.iter().any(|h| h == hostname))
    }
}

/// Stands in for rsync: serves `user@host:path` sources from a local
/// directory per host and records every invocation.
pub struct FakeRemoteFs {
    pub hosts: HashMap<String, PathBuf>,
    pub invocations: RefCell<Vec<TransferInvocation>>,
}

impl FakeRemoteFs {
    pub fn new() -> Self {
        Self {
            hosts: HashMap::new(),
            invocations: RefCell::new(Vec::new()),
        }
    }

    pub fn host(mut self, hostname: &str, root: &Path) -> Self {
        self.hosts.insert(hostname.to_string(), root.to_path_buf());
        self
    }

    fn local_path(&self, spec: &str) -> Option<PathBuf> {
        let (user_host, path) = spec.split_once(':')?;
        let host = user_host.rsplit('@').next()?;
        let root = self.hosts.get(host)?;
        Some(root.join(path.trim_start_matches('/')))
    }

    fn copy(&self, source: &Path, dest: &Path, prefix: Option<&str>) -> io::Result<()> {
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !entry.file_type()?.is_file() {
                continue;
            }
            if prefix.map_or(true, |p| name.starts_with(p)) {
                fs::copy(entry.path(), dest.join(&name))?;
            }
        }
        Ok(())
    }
}

fn between<'a>(s: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = s.find(start)? + start.len();
    let len = s[from..].find(end)?;
    Some(&s[from..from + len])
}

impl TransferProvider for FakeRemoteFs {
    fn run(&self, invocation: &TransferInvocation) -> CollectorResult<TransferOutput> {
        self.invocations.borrow_mut().push(invocation.clone());

        let (source, dest, prefix) = match invocation {
            TransferInvocation::Direct { args, .. } => {
                (args[args.len() - 2].clone(), args[args.len() - 1].clone(), None)
            }
            TransferInvocation::Shell { script, .. } => {
                let prefix = between(script, "--include='", "*'").map(str::to_string);
                let rest = script.split("--info=progress2 ").nth(1).unwrap_or_default();
                let mut quoted = rest.split('\'').filter(|s| !s.trim().is_empty());
                let source = quoted.next().unwrap_or_default().to_string();
                let dest = quoted.next().unwrap_or_default().to_string();
                (source, dest, prefix)
            }
        };

        let Some(source_path) = self.local_path(&source) else {
            return Ok(TransferOutput {
                stderr: format!("ssh: Could not resolve hostname in {}", source).into_bytes(),
                ..Default::default()
            });
        };
        self.copy(&source_path, Path::new(&dest), prefix.as_deref())?;
        Ok(TransferOutput {
            stdout: b"sent 100 bytes  received 35 bytes".to_vec(),
            stderr: Vec::new(),
            success: true,
        })
    }
}

/// Lays out a database path under `root`: FTDC files, current and rotated
/// logs.
pub fn fake_dbpath(root: &Path) -> PathBuf {
    let dbpath = root.join("data").join("db");
    let diag = dbpath.join("diagnostic.data");
    fs::create_dir_all(&diag).unwrap();
    fs::write(diag.join("metrics.2024-03-22T08-00-00Z-00000"), b"ftdc").unwrap();
    fs::write(diag.join("metrics.interim"), b"interim").unwrap();
    fs::write(dbpath.join("mongod.log"), b"current\n").unwrap();
    fs::write(dbpath.join("mongod.log.2024-03-21T00-00-00"), b"rotated\n").unwrap();
    fs::write(dbpath.join("WiredTiger"), b"wt").unwrap();
    dbpath
}

/// Sorted entry names of a `.tar.gz` file.
pub fn archive_entries(archive: &Path) -> Vec<String> {
    let file = fs::File::open(archive).unwrap();
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut names: Vec<String> = archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
