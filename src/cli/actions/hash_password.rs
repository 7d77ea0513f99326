use crate::auth::hash_password;
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::io::{self, BufRead};

#[derive(Debug)]
pub struct Args {
    pub password: Option<SecretString>,
}

/// Print the PHC string for a password given as argument or on stdin.
/// # Errors
/// Returns an error if no password is given or hashing fails.
pub fn execute(args: Args) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password(io::stdin().lock())?,
    };

    println!("{}", hash(&password)?);

    Ok(())
}

fn read_password(mut input: impl BufRead) -> Result<SecretString> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn hash(password: &SecretString) -> Result<String> {
    if password.expose_secret().is_empty() {
        return Err(anyhow!("password must not be empty"));
    }
    hash_password(password.expose_secret())
}
