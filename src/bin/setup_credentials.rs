//! One-time credential setup: stores the OpenAI API key and the WordPress
//! application password in the OS credential store under the fixed
//! (service, account) pairs the pipeline reads at startup.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use autoblog::config::{KEYRING_OPENAI, KEYRING_WORDPRESS};

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading from stdin")?;
    Ok(line.trim().to_string())
}

fn store((service, account): (&str, &str), value: &str) -> Result<()> {
    keyring::Entry::new(service, account)
        .with_context(|| format!("opening keyring entry ({service}, {account})"))?
        .set_password(value)
        .with_context(|| format!("storing keyring entry ({service}, {account})"))?;
    Ok(())
}

fn main() -> Result<()> {
    println!("Setting up secure credentials for the blog pipeline");
    println!("{}", "-".repeat(50));

    let openai_key = prompt("Enter your OpenAI API key")?;
    store(KEYRING_OPENAI, &openai_key)?;

    let wp_password = prompt("Enter your WordPress application password")?;
    store(KEYRING_WORDPRESS, &wp_password)?;

    println!();
    println!("Credentials stored securely.");
    println!("Remember to set WORDPRESS_URL and WORDPRESS_USERNAME in your .env file.");
    Ok(())
}
