use mogimail_compose::MailConfig;
use std::env;
use std::io::{self, Write};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let path = if args.len() > 1 {
        args[1].as_str()
    } else {
        "compose.toml"
    };

    if let Err(e) = run(path) {
        eprintln!("Failed to compose message: {e}");
        std::process::exit(1);
    }
}

fn run(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut email = MailConfig::from_file(path)?.into_email()?;
    let message = email.build_mime_message()?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&message.formatted())?;
    stdout.flush()?;
    Ok(())
}
