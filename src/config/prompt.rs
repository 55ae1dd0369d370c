//! Interactive collection of connection settings.
//!
//! Prompts are written to `out` and answers read line by line from `input`,
//! so the whole exchange can be driven from a test with in-memory buffers.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::config::credentials::{
    check_input_size, generate_cluster_name, validate_seed_port, validate_uri_options,
    MongoCredentials, RemoteCredentials,
};
use crate::constants::{DEFAULT_SEED_HOST, GENERATED_CLUSTER_NAME_LEN};

/// Reads answers for the credential prompts.
pub struct Prompter<R, W> {
    input: R,
    out: W,
    /// Disable terminal echo while the password is typed
    hide_password: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, out: W, hide_password: bool) -> Self {
        Self {
            input,
            out,
            hide_password,
        }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        writeln!(self.out, "{}", question).context("Failed to write prompt")?;
        self.out.flush().ok();

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("Failed to read answer from input")?;
        check_input_size(&line)?;

        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn ask_secret(&mut self, question: &str) -> Result<String> {
        let _guard = if self.hide_password {
            EchoGuard::disable()
        } else {
            None
        };
        let answer = self.ask(question)?;
        if self.hide_password {
            writeln!(self.out).ok();
        }
        Ok(answer)
    }

    /// Ask for every database connection setting in order.
    pub fn mongo_credentials(&mut self) -> Result<MongoCredentials> {
        let mut creds = MongoCredentials::default();

        let cluster_name = self.ask("Enter Cluster Name: ")?;
        creds.cluster_name = if cluster_name.is_empty() {
            let generated = generate_cluster_name(GENERATED_CLUSTER_NAME_LEN);
            warn!("Cluster name left empty, using generated name {}", generated);
            generated
        } else {
            cluster_name
        };
        debug!("Cluster name: {}", creds.cluster_name);

        writeln!(
            self.out,
            "Only the provided seed mongod/mongos is used to discover cluster nodes"
        )
        .ok();
        let seed_host = self.ask("Enter Hostname of Seed Mongod/Mongos: ")?;
        creds.seed_host = if seed_host.trim().is_empty() {
            warn!("Seed hostname left empty, assuming {}", DEFAULT_SEED_HOST);
            DEFAULT_SEED_HOST.to_string()
        } else {
            seed_host.trim().to_string()
        };

        let seed_port = self.ask("Enter Port number of Seed Mongod/Mongos instance: ")?;
        if seed_port.trim().is_empty() {
            warn!("Seed port left empty, assuming default port");
        }
        creds.seed_port = validate_seed_port(&seed_port)?;

        let username = self.ask(
            "Enter Admin Username (minimum backup, readAnyDatabase, clusterMonitor roles; \
             leave blank for cluster without authentication): ",
        )?;
        if username.is_empty() {
            warn!("Admin username is empty, assuming cluster without authentication");
        } else {
            creds.username = Some(username);
        }

        let password =
            self.ask_secret("Enter Admin Password (leave blank for cluster without authentication): ")?;
        if !password.is_empty() {
            creds.password = Some(password);
        }

        let options = self.ask(
            "Enter MongoURI options for the seed node without replicaSet \
             (format name1=value1&name2=value2): ",
        )?;
        if !options.is_empty() {
            validate_uri_options(&options)?;
            creds.uri_options = Some(options);
        }

        Ok(creds)
    }

    /// Ask for the passwordless SSH user. Blank means every node is local.
    pub fn remote_credentials(&mut self) -> Result<Option<RemoteCredentials>> {
        let username = self.ask(
            "Enter PasswordLess ssh User for remote copy (leave blank for cluster without remote nodes): ",
        )?;
        if username.trim().is_empty() {
            warn!("Passwordless SSH username is empty, assuming all nodes are local");
            return Ok(None);
        }
        debug!("Passwordless SSH username provided: {}", username.trim());
        Ok(Some(RemoteCredentials {
            username: username.trim().to_string(),
        }))
    }
}

/// Restores terminal echo when dropped.
struct EchoGuard {
    #[cfg(unix)]
    original: libc::termios,
}

impl EchoGuard {
    #[cfg(unix)]
    fn disable() -> Option<Self> {
        // SAFETY: termios is plain old data and tcgetattr/tcsetattr only read
        // and write the struct we pass for the stdin descriptor.
        unsafe {
            if libc::isatty(libc::STDIN_FILENO) != 1 {
                return None;
            }
            let mut term: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &mut term) != 0 {
                return None;
            }
            let original = term;
            term.c_lflag &= !libc::ECHO;
            term.c_lflag |= libc::ECHONL;
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &term) != 0 {
                return None;
            }
            Some(Self { original })
        }
    }

    #[cfg(not(unix))]
    fn disable() -> Option<Self> {
        None
    }
}

#[cfg(unix)]
impl Drop for EchoGuard {
    fn drop(&mut self) {
        // SAFETY: restores the attributes captured in `disable`.
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &self.original);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(answers: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new(), false)
    }

    #[test]
    fn test_full_answers() {
        let mut p = prompter("prod\ndb1.example.net\n27018\nadmin\npw\ntls=true\n");
        let creds = p.mongo_credentials().unwrap();
        assert_eq!(creds.cluster_name, "prod");
        assert_eq!(creds.seed_host, "db1.example.net");
        assert_eq!(creds.seed_port, 27018);
        assert_eq!(creds.username.as_deref(), Some("admin"));
        assert_eq!(creds.password.as_deref(), Some("pw"));
        assert_eq!(creds.uri_options.as_deref(), Some("tls=true"));
    }

    #[test]
    fn test_blank_answers_use_defaults() {
        let mut p = prompter("\n\n\n\n\n\n");
        let creds = p.mongo_credentials().unwrap();
        assert_eq!(creds.cluster_name.len(), GENERATED_CLUSTER_NAME_LEN);
        assert_eq!(creds.seed_host, "localhost");
        assert_eq!(creds.seed_port, 27017);
        assert!(creds.username.is_none());
        assert!(creds.password.is_none());
        assert!(creds.uri_options.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut p = prompter("prod\nhost\n99999\n\n\n\n");
        assert!(p.mongo_credentials().is_err());
    }

    #[test]
    fn test_replica_set_option_is_rejected() {
        let mut p = prompter("prod\nhost\n27017\n\n\nreplicaSet=rs0\n");
        assert!(p.mongo_credentials().is_err());
    }

    #[test]
    fn test_remote_credentials() {
        let mut p = prompter("ubuntu\n");
        assert_eq!(
            p.remote_credentials().unwrap(),
            Some(RemoteCredentials {
                username: "ubuntu".to_string()
            })
        );

        let mut p = prompter("\n");
        assert_eq!(p.remote_credentials().unwrap(), None);
    }
}
