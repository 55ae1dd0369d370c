use log::debug;

use crate::constants::{PATTERN_SHELL, RSYNC_BIN};
use crate::error::CollectorResult;
use crate::transfer::copy_job::{CopyJob, CopyState};
use crate::transfer::{TransferInvocation, TransferProvider};

/// Quote `value` for a POSIX shell. Embedded single quotes become `'\''`.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Copy job restricted to files whose base name starts with `name_pattern`.
///
/// The command is handed to `bash -c` as one script. Every interpolated value
/// is single quoted, so the only wildcard rsync sees is the one in the
/// include and exclude filters.
#[derive(Debug)]
pub struct PatternCopyJob {
    job: CopyJob,
    name_pattern: String,
}

impl PatternCopyJob {
    pub fn new(job: CopyJob, name_pattern: impl Into<String>) -> Self {
        Self {
            job,
            name_pattern: name_pattern.into(),
        }
    }

    pub fn state(&self) -> CopyState {
        self.job.state()
    }

    pub fn invocation(&self) -> TransferInvocation {
        let script = format!(
            "{} -az --include={} --exclude='*' --info=progress2 {} {}",
            RSYNC_BIN,
            shell_quote(&format!("{}*", self.name_pattern)),
            shell_quote(&self.job.source().rsync_spec()),
            shell_quote(&self.job.destination().to_string_lossy()),
        );
        debug!("Pattern copy script: {}", script);
        TransferInvocation::Shell {
            shell: PATTERN_SHELL.to_string(),
            script,
        }
    }

    pub fn start(&mut self, provider: &dyn TransferProvider) -> CollectorResult<()> {
        let invocation = self.invocation();
        self.job.execute(provider, &invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::copy_job::{CopyDestination, CopySource};
    use crate::transfer::{MockTransferProvider, TransferOutput};
    use mockall::predicate::*;

    fn pattern_job(pattern: &str) -> PatternCopyJob {
        let job = CopyJob::new(
            CopySource::remote("db3", Some("ubuntu".to_string()), "/var/log/mongodb").directory_contents(),
            CopyDestination::new("/out/temp/prod/db3_27017/logs"),
        );
        PatternCopyJob::new(job, pattern)
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("plain"), "'plain'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote("a b*"), "'a b*'");
    }

    #[test]
    fn test_invocation_goes_through_shell() {
        let invocation = pattern_job("mongod.log").invocation();
        assert_eq!(invocation.program(), "bash");
        assert_eq!(
            invocation.args(),
            vec![
                "-c".to_string(),
                "rsync -az --include='mongod.log*' --exclude='*' --info=progress2 \
                 'ubuntu@db3:/var/log/mongodb/' '/out/temp/prod/db3_27017/logs'"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_pattern_is_escaped() {
        let invocation = pattern_job("we'ird; rm -rf").invocation();
        match invocation {
            TransferInvocation::Shell { script, .. } => {
                assert!(script.contains(r"--include='we'\''ird; rm -rf*'"));
            }
            other => panic!("unexpected invocation {:?}", other),
        }
    }

    #[test]
    fn test_start_runs_shell_invocation() {
        let mut job = pattern_job("mongod.log");
        let expected = job.invocation();

        let mut provider = MockTransferProvider::new();
        provider
            .expect_run()
            .with(eq(expected))
            .times(1)
            .returning(|_| {
                Ok(TransferOutput {
                    success: true,
                    ..Default::default()
                })
            });

        job.start(&provider).unwrap();
        assert_eq!(job.state(), CopyState::Completed);
    }
}
