use super::{parse_response, SolverGateway, SolverResult};
use crate::error::{SlotPlanError, SpResult};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs the planner as a child process, one invocation per request.
///
/// The default invocation is
/// `swipl -q -s <planner_file> -g "solve_scenario_json(<id>[,<budget>])."`;
/// stdout must hold exactly one response document.
#[derive(Debug, Clone)]
pub struct ProcessGateway {
    pub program: String,
    pub planner_file: PathBuf,
    pub timeout: Option<Duration>,
}

impl ProcessGateway {
    pub fn new(program: impl Into<String>, planner_file: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            planner_file: planner_file.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn goal(scenario_id: &str, budget: Option<u64>) -> String {
        match budget {
            Some(b) => format!("solve_scenario_json({},{}).", scenario_id, b),
            None => format!("solve_scenario_json({}).", scenario_id),
        }
    }

    pub fn command(&self, scenario_id: &str, budget: Option<u64>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-q")
            .arg("-s")
            .arg(&self.planner_file)
            .arg("-g")
            .arg(Self::goal(scenario_id, budget))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl SolverGateway for ProcessGateway {
    fn request_plan(&self, scenario_id: &str, budget: Option<u64>) -> SpResult<SolverResult> {
        info!(
            "Requesting plan for {} (budget={})",
            scenario_id,
            budget.map_or("default".to_string(), |b| b.to_string())
        );

        let mut child = self.command(scenario_id, budget).spawn().map_err(|e| {
            SlotPlanError::malformed(
                format!("failed to start planner '{}'", self.program),
                e.to_string(),
            )
        })?;

        let output = wait_with_timeout(&mut child, self.timeout)?;

        if !output.success {
            return Err(SlotPlanError::malformed(
                format!("planner exited with {}", output.status),
                format!("STDERR:\n{}\nSTDOUT:\n{}", output.stderr, output.stdout),
            ));
        }
        if output.stdout.trim().is_empty() {
            return Err(SlotPlanError::malformed(
                "no JSON output from planner",
                format!("STDERR:\n{}", output.stderr),
            ));
        }
        if !output.stderr.trim().is_empty() {
            debug!("planner stderr: {}", output.stderr.trim());
        }

        parse_response(&output.stdout)
    }
}

struct ChildOutput {
    success: bool,
    status: String,
    stdout: String,
    stderr: String,
}

type Drain = thread::JoinHandle<io::Result<String>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut p) = pipe {
            p.read_to_end(&mut buf)?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

// A pipe that failed mid-read yields a truncated document, which must not
// reach the parser.
fn collect(handle: Drain, stream: &str) -> SpResult<String> {
    match handle.join() {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(SlotPlanError::malformed(
            format!("failed to read planner {}", stream),
            e.to_string(),
        )),
        Err(_) => Err(SlotPlanError::malformed(
            format!("failed to read planner {}", stream),
            "reader thread panicked",
        )),
    }
}

// Pipes are drained on their own threads so a chatty planner cannot block
// on a full pipe while we poll for exit.
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> SpResult<ChildOutput> {
    let out = drain(child.stdout.take());
    let err = drain(child.stderr.take());
    let started = Instant::now();

    let status = loop {
        let polled = child.try_wait().map_err(|e| {
            let _ = child.kill();
            SlotPlanError::malformed("failed to wait for planner", e.to_string())
        })?;
        if let Some(status) = polled {
            break status;
        }
        if let Some(limit) = timeout {
            if started.elapsed() >= limit {
                warn!("Planner exceeded {:?}, killing it", limit);
                let _ = child.kill();
                let _ = child.wait();
                // Best effort: the timeout is the error being reported.
                let stdout = collect(out, "stdout").unwrap_or_default();
                let stderr = collect(err, "stderr").unwrap_or_default();
                return Err(SlotPlanError::malformed(
                    format!("planner timed out after {:?}", limit),
                    format!("STDERR:\n{}\nSTDOUT:\n{}", stderr, stdout),
                ));
            }
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(ChildOutput {
        success: status.success(),
        status: status.to_string(),
        stdout: collect(out, "stdout")?,
        stderr: collect(err, "stderr")?,
    })
}
