//! Whole-file encryption of the database.
//!
//! Sealed layout: `salt[16] || nonce[24] || XChaCha20-Poly1305(data)`.
//! The key is derived from the password and the salt with Argon2id.

use crate::errors::{AppError, AppResult};
use argon2::Argon2;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use rand::rngs::OsRng;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::fs;
use std::io::Write;
use std::path::Path;
use zeroize::Zeroizing;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 24;
pub const KEY_LEN: usize = 32;
const TAG_LEN: usize = 16;

pub fn derive_key(password: &str, salt: &[u8]) -> AppResult<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key[..])
        .map_err(|e| AppError::Crypto(format!("key derivation: {e}")))?;
    Ok(key)
}

/// Encrypt `plaintext` under a fresh salt and nonce.
pub fn seal(plaintext: &[u8], password: &str) -> AppResult<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(password, &salt)?;
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key[..]));
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|e| AppError::Crypto(format!("encrypt: {e}")))?;

    let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a sealed blob. Wrong password and corrupt input both map to
/// [`AppError::WrongPassword`]; the AEAD tag cannot tell them apart.
pub fn open(blob: &[u8], password: &str) -> AppResult<Zeroizing<Vec<u8>>> {
    if blob.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
        return Err(AppError::WrongPassword);
    }

    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let key = derive_key(password, salt)?;
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key[..]));
    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| AppError::WrongPassword)
}

/// Encrypt the file at `path` in place.
pub fn encrypt_file(path: &Path, password: &str) -> AppResult<()> {
    let data = Zeroizing::new(fs::read(path)?);
    let sealed = seal(&data, password)?;
    write_atomic(path, &sealed)
}

/// Decrypt the file at `path` in place. On failure the file is untouched.
pub fn decrypt_file(path: &Path, password: &str) -> AppResult<()> {
    let blob = fs::read(path)?;
    let plain = open(&blob, password)?;
    write_atomic(path, &plain)
}

/// Heuristic: a file that SQLite cannot read is assumed to be encrypted.
/// A corrupted plaintext database is indistinguishable from an encrypted one.
pub fn is_encrypted(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    let conn = match Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
        Ok(c) => c,
        Err(_) => return true,
    };

    conn.query_row(
        "SELECT name FROM sqlite_master WHERE type='table' LIMIT 1",
        [],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .is_err()
}

/// Replace `path` with `bytes` through a sibling temporary file and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".swap-")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}
