use anyhow::{Result, bail};
use std::{
    env, fs,
    os::unix::net::UnixStream,
    path::{Path, PathBuf},
    process::Command,
    sync::OnceLock,
    thread,
    time::{Duration, Instant},
};

const SOCKET_WAIT_TIMEOUT: Duration = Duration::from_secs(5);
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Ensure a container runtime socket is reachable for testcontainers.
///
/// An explicit `DOCKER_HOST` wins. Otherwise the Docker socket is tried first
/// and a Podman socket second; when Podman is used `DOCKER_HOST` is pointed at it.
/// The probe runs once per test binary.
///
/// # Errors
/// Returns an error if no Docker or Podman socket accepts connections.
pub fn ensure_container_runtime() -> Result<()> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();
    match INIT.get_or_init(detect_runtime) {
        Ok(()) => Ok(()),
        Err(message) => bail!("{message}"),
    }
}

fn detect_runtime() -> Result<(), String> {
    if let Ok(docker_host) = env::var("DOCKER_HOST") {
        return check_docker_host(&docker_host);
    }

    let docker_socket = Path::new(DOCKER_SOCKET);
    if wait_for_socket(docker_socket) {
        return Ok(());
    }

    if let Some(path) = podman_socket_candidates()
        .into_iter()
        .find(|path| path.exists())
    {
        if wait_for_socket(&path) {
            set_docker_host(&path);
            return Ok(());
        }
        return Err(format!(
            "Podman socket `{}` is not accepting connections. Start `podman.socket` or run `podman system service`.",
            path.display()
        ));
    }

    let mut message = "No container runtime reachable. Start Docker or `podman.socket`, or set `DOCKER_HOST`.".to_string();
    if docker_socket.exists() {
        message.push_str(&format!(
            " Docker socket `{DOCKER_SOCKET}` exists but refused connections"
        ));
        if let Some(err) = info_error("docker") {
            message.push_str(&format!(" ({err})"));
        }
        message.push('.');
    }
    Err(message)
}

/// Only unix sockets are probed; TCP hosts are passed through as-is.
fn check_docker_host(docker_host: &str) -> Result<(), String> {
    let path = docker_host.strip_prefix("unix://").unwrap_or(docker_host);
    if !path.starts_with('/') || wait_for_socket(Path::new(path)) {
        return Ok(());
    }
    Err(format!(
        "`DOCKER_HOST` points to `{docker_host}`, but the socket is not accepting connections."
    ))
}

fn podman_socket_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(runtime_dir) = env::var("XDG_RUNTIME_DIR") {
        candidates.push(PathBuf::from(runtime_dir).join("podman/podman.sock"));
    }
    if let Some(uid) = read_uid() {
        candidates.push(PathBuf::from(format!("/run/user/{uid}/podman/podman.sock")));
    }
    candidates.push(PathBuf::from("/run/podman/podman.sock"));
    candidates
}

fn wait_for_socket(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    let start = Instant::now();
    while start.elapsed() < SOCKET_WAIT_TIMEOUT {
        if UnixStream::connect(path).is_ok() {
            return true;
        }
        thread::sleep(Duration::from_millis(200));
    }
    false
}

/// Stderr of `<tool> info` when it fails, `None` when it succeeds or is not installed.
fn info_error(tool: &str) -> Option<String> {
    let output = match Command::new(tool).arg("info").output() {
        Ok(output) => output,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => return Some(err.to_string()),
    };
    if output.status.success() {
        return None;
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        Some(format!("{tool} info exited with {}", output.status))
    } else {
        Some(stderr)
    }
}

fn set_docker_host(path: &Path) {
    let docker_host = format!("unix://{}", path.display());
    // SAFETY: called once from the OnceLock initializer before any container starts.
    unsafe {
        env::set_var("DOCKER_HOST", docker_host);
    }
}

fn read_uid() -> Option<u32> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    status
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|uid| uid.parse().ok())
}
