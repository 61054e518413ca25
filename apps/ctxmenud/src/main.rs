use ctxmenud::config::HandlerConfig;
use ctxmenud::server::{handle_connection, new_sessions, AuditLogger};
use std::env;
use std::fs;
use std::io;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};

const DEFAULT_SOCKET: &str = "/tmp/ctxmenud/ctxmenud.sock";

struct Args {
    socket: PathBuf,
    session_id: Option<String>,
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    run(args)
}

fn run(args: Args) -> io::Result<()> {
    let socket_path = args.socket;
    ensure_socket_dir(&socket_path)?;
    remove_existing_socket(&socket_path)?;

    let _guard = SocketGuard::new(socket_path.clone());
    let listener = UnixListener::bind(&socket_path)?;
    log::info!("ctxmenud listening on {}", socket_path.display());

    let sessions = new_sessions();
    let audit_logger = AuditLogger::from_env();
    let config = HandlerConfig::from_env();
    log::debug!("link failure policy: {:?}", config.link_failure);

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(
                    &mut stream,
                    args.session_id.as_deref(),
                    &sessions,
                    &config,
                    audit_logger.as_ref(),
                ) {
                    log::warn!("connection error: {err}");
                }
            }
            Err(err) => log::warn!("accept error: {err}"),
        }
    }

    Ok(())
}

fn ensure_socket_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn remove_existing_socket(path: &Path) -> io::Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn parse_args() -> Result<Args, String> {
    let mut socket = env::var("CTXMENUD_SOCKET").unwrap_or_else(|_| DEFAULT_SOCKET.to_string());
    let mut session_id = env::var("CTXMENUD_SESSION_ID").ok();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--socket" => {
                socket = args
                    .next()
                    .ok_or_else(|| "missing value for --socket".to_string())?;
            }
            "--session-id" => {
                session_id = Some(
                    args.next()
                        .ok_or_else(|| "missing value for --session-id".to_string())?,
                );
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" => {
                print_version();
                std::process::exit(0);
            }
            _ => return Err(format!("unknown argument: {arg}")),
        }
    }

    Ok(Args {
        socket: PathBuf::from(socket),
        session_id,
    })
}

fn print_usage() {
    eprintln!(
        "Usage: ctxmenud [--socket <path>] [--session-id <id>]\n\nOptions:\n  --socket <path>       Unix socket path (env: CTXMENUD_SOCKET)\n  --session-id <id>     Default session for requests without one (env: CTXMENUD_SESSION_ID)\n  -h, --help            Show this help message\n  --version             Show version\n\nEnvironment:\n  CTXMENUD_LINK_FAILURE   abort (default) or skip\n  CTXMENUD_AUDIT_LOG_DIR  jsonl audit directory, or off\n  RUST_LOG                log filter (default: info)"
    );
}

fn print_version() {
    println!("ctxmenud {}", env!("CARGO_PKG_VERSION"));
}

struct SocketGuard {
    path: PathBuf,
}

impl SocketGuard {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for SocketGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
