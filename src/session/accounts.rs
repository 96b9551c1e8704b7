//! Private keys and their proxies.
//!
//! Keys file: one account per line, either `private_key` or
//! `private_key:proxy`. Blank lines and `#` comments are ignored.
//!
//! Proxies file (optional): one proxy per line, assigned to keys by position.
//! An inline proxy on the key line wins. If the file is non-empty it must cover
//! every key.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while reading account inputs.
#[derive(Debug, Error)]
pub enum AccountsError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("proxies do not match private keys: {proxies} proxies for {keys} keys")]
    ProxyMismatch { keys: usize, proxies: usize },

    #[error("no private keys in {0}")]
    Empty(PathBuf),
}

/// One account to process.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountEntry {
    private_key: String,
    proxy: Option<String>,
}

impl AccountEntry {
    pub fn new(private_key: impl Into<String>, proxy: Option<String>) -> Self {
        Self {
            private_key: private_key.into(),
            proxy: proxy.map(|p| normalize_proxy(&p)),
        }
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Proxy URL, always with a scheme.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }
}

impl fmt::Debug for AccountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountEntry")
            .field("private_key", &"<redacted>")
            .field("proxy", &self.proxy)
            .finish()
    }
}

/// `host:port` → `http://host:port`; URLs with a scheme pass through.
fn normalize_proxy(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    }
}

fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Pair keys with proxies.
pub fn parse_accounts(keys: &str, proxies: &str) -> Result<Vec<AccountEntry>, AccountsError> {
    let keys: Vec<&str> = content_lines(keys).collect();
    let proxies: Vec<&str> = content_lines(proxies).collect();

    if !proxies.is_empty() && proxies.len() < keys.len() {
        return Err(AccountsError::ProxyMismatch {
            keys: keys.len(),
            proxies: proxies.len(),
        });
    }

    Ok(keys
        .iter()
        .enumerate()
        .map(|(i, line)| match line.split_once(':') {
            Some((key, inline)) if !inline.trim().is_empty() => {
                AccountEntry::new(key.trim(), Some(inline.to_string()))
            }
            _ => {
                let key = line.trim_end_matches(':');
                AccountEntry::new(key, proxies.get(i).map(|p| p.to_string()))
            }
        })
        .collect())
}

/// Read the keys file and, if present, the proxies file.
///
/// A missing keys file is an error; a missing proxies file means no proxies.
pub fn load_accounts(keys_path: &Path, proxies_path: &Path) -> Result<Vec<AccountEntry>, AccountsError> {
    let keys = fs::read_to_string(keys_path).map_err(|source| AccountsError::Io {
        path: keys_path.to_path_buf(),
        source,
    })?;

    let proxies = match fs::read_to_string(proxies_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(AccountsError::Io {
                path: proxies_path.to_path_buf(),
                source,
            })
        }
    };

    let accounts = parse_accounts(&keys, &proxies)?;
    if accounts.is_empty() {
        return Err(AccountsError::Empty(keys_path.to_path_buf()));
    }

    tracing::info!(
        accounts = accounts.len(),
        with_proxy = accounts.iter().filter(|a| a.proxy().is_some()).count(),
        "Accounts loaded"
    );
    Ok(accounts)
}
