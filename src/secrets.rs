//! Database credentials read from secret files.
//!
//! Each value lives in its own file (as written by an init container or a
//! secrets volume) and is read once at startup. Surrounding whitespace is
//! trimmed.

use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{fs, path::Path};
use url::Url;

pub struct DatabaseSecrets {
    pub host: String,
    pub name: String,
    pub username: String,
    pub password: SecretString,
}

/// Where each credential file lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretPaths {
    pub host: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

impl SecretPaths {
    /// Default layout: `<dir>/DB_HOST`, `<dir>/DB_NAME`, `<dir>/DB_USER`,
    /// `<dir>/DB_PASSWORD`.
    #[must_use]
    pub fn in_dir(dir: &str) -> Self {
        let join = |file: &str| Path::new(dir).join(file).to_string_lossy().into_owned();
        Self {
            host: join("DB_HOST"),
            name: join("DB_NAME"),
            username: join("DB_USER"),
            password: join("DB_PASSWORD"),
        }
    }
}

fn read_secret(path: &str) -> Result<String> {
    let value = fs::read_to_string(path)
        .with_context(|| format!("Failed to read secret file: {path}"))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(anyhow!("Secret file is empty: {path}"));
    }
    Ok(value.to_string())
}

impl DatabaseSecrets {
    /// Read all four credential files.
    ///
    /// # Errors
    /// Returns an error if any file is missing, unreadable or empty.
    pub fn load(paths: &SecretPaths) -> Result<Self> {
        Ok(Self {
            host: read_secret(&paths.host)?,
            name: read_secret(&paths.name)?,
            username: read_secret(&paths.username)?,
            password: SecretString::from(read_secret(&paths.password)?),
        })
    }

    /// Build a Postgres DSN. Username and password are percent-encoded.
    ///
    /// # Errors
    /// Returns an error if the host or database name do not form a valid URL.
    pub fn dsn(&self, port: u16) -> Result<SecretString> {
        let mut dsn = Url::parse(&format!("postgres://{}:{port}/{}", self.host, self.name))
            .with_context(|| format!("Invalid database host or name: {}", self.host))?;

        dsn.set_username(&self.username)
            .map_err(|()| anyhow!("Error setting username"))?;

        dsn.set_password(Some(self.password.expose_secret()))
            .map_err(|()| anyhow!("Error setting password"))?;

        Ok(SecretString::from(dsn.to_string()))
    }
}

impl std::fmt::Debug for DatabaseSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSecrets")
            .field("host", &self.host)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
