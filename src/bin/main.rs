use looper_poll::application::config::loader::ConfigLoader;
use looper_poll::application::config::models::GlueConfig;
use looper_poll::core::sys::FileDescriptor;
use looper_poll::{init_with_config, Interest, PollBackend, PollFd, SystemPoll};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => match ConfigLoader::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing config file: {}", e);
                std::process::exit(1);
            }
        },
        None => GlueConfig::default(),
    };

    let glue = match init_with_config(&config) {
        Ok(glue) => glue,
        Err(e) => {
            eprintln!("Error initialising: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = FileDescriptor::new(libc::STDIN_FILENO);
    // epoll rejects regular files, plain poll reports them ready
    let mut backend: Box<dyn PollBackend> = if stdin.is_regular_file() {
        Box::new(SystemPoll)
    } else {
        glue.poll_backend()
    };
    let mut buf = [0u8; 4096];
    tracing::info!(main_loop = config.main_loop, "echoing stdin");

    loop {
        let mut fds = [PollFd::new(stdin.as_raw_fd(), Interest::READABLE)];
        match backend.poll(&mut fds, 5000) {
            -1 => {
                tracing::error!("poll failed");
                std::process::exit(1);
            }
            0 => tracing::debug!("idle"),
            _ => match stdin.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let text = String::from_utf8_lossy(&buf[..n]);
                    tracing::info!(target: "echo", "{}", text.trim_end());
                }
                Err(e) => {
                    tracing::error!(error = %e, "read failed");
                    std::process::exit(1);
                }
            },
        }
    }
}
