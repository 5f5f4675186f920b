//! Basic usage example for MogiMail Compose
//!
//! This example builds a message, prints it, and shows that a builder
//! refuses to build twice.

use mogimail_compose::{Email, EmailError};
use std::time::Duration;

fn main() {
    println!("MogiMail Compose Basic Usage Example");
    println!("====================================");

    let mut email = Email::new();
    if let Err(e) = configure(&mut email) {
        eprintln!("Failed to configure email: {e}");
        return;
    }

    println!("\nBuilding message...");
    match email.build_mime_message() {
        Ok(message) => {
            println!("Message built:");
            println!("  From: {}", message.from());
            println!("  Recipients: {}", message.recipient_count());
            println!("  Raw:");
            for line in String::from_utf8_lossy(&message.formatted()).lines() {
                println!("    {line}");
            }
        }
        Err(e) => {
            eprintln!("Failed to build message: {e}");
            return;
        }
    }

    println!("\nBuilding again...");
    match email.build_mime_message() {
        Ok(_) => println!("Unexpected: second build succeeded"),
        Err(e) => println!("Rejected as expected: {e}"),
    }

    println!("\nBuilding without recipients...");
    let mut empty = Email::new();
    empty.set_host_name("smtp.example.com");
    if let Err(e) = empty.build_mime_message() {
        println!("Rejected as expected: {e}");
    }
}

fn configure(email: &mut Email) -> Result<(), EmailError> {
    email
        .set_host_name("smtp.example.com")
        .set_socket_connection_timeout(Duration::from_secs(10))
        .add_to_named("tarou@example.com", "Tarou")?
        .add_cc("hanako@example.com")?
        .add_bcc("archive@example.com")?
        .set_from("sender@example.com")?
        .set_subject("Hello from MogiMail Compose")
        .add_header("X-Mailer", "mogimail-compose")?
        .set_msg("This message was built by the basic usage example.")?;

    println!("Configured email for host: {:?}", email.host_name());
    Ok(())
}
