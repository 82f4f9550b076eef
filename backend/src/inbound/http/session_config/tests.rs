//! Unit tests for session configuration.

use super::*;
use rstest::rstest;
use uuid::Uuid;

use super::fingerprint::key_fingerprint;

#[derive(Debug)]
struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("komodo-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len])?;
        Ok(Self { path })
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn options(path: &Path) -> SessionOptions<'_> {
    SessionOptions {
        key_file: path,
        allow_ephemeral: false,
        cookie_secure: true,
        same_site: "Strict",
    }
}

fn missing_path() -> PathBuf {
    std::env::temp_dir().join(format!("komodo-missing-{}", Uuid::new_v4()))
}

#[rstest]
fn release_reads_the_key_file() {
    let file = TempKeyFile::new(64).expect("key file");
    let settings = session_settings(&options(&file.path), BuildMode::Release).expect("settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(
        key_fingerprint(&settings.key),
        key_fingerprint(&Key::derive_from(&[b'k'; 64]))
    );
}

#[rstest]
fn release_rejects_short_keys() {
    let file = TempKeyFile::new(16).expect("key file");
    let err = session_settings(&options(&file.path), BuildMode::Release)
        .err()
        .expect("short key rejected");
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: 16, min_len: 64, .. }
    ));
}

#[rstest]
fn debug_accepts_short_keys() {
    let file = TempKeyFile::new(32).expect("key file");
    assert!(session_settings(&options(&file.path), BuildMode::Debug).is_ok());
}

#[rstest]
fn debug_still_rejects_keys_too_short_to_derive() {
    let file = TempKeyFile::new(8).expect("key file");
    let err = session_settings(&options(&file.path), BuildMode::Debug)
        .err()
        .expect("tiny key rejected");
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: 8, min_len: 32, .. }
    ));
}

#[rstest]
fn release_requires_a_readable_key_unless_ephemeral() {
    let path = missing_path();
    let err = session_settings(&options(&path), BuildMode::Release)
        .err()
        .expect("missing key rejected");
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));

    let ephemeral = SessionOptions {
        allow_ephemeral: true,
        ..options(&path)
    };
    assert!(session_settings(&ephemeral, BuildMode::Release).is_ok());
}

#[rstest]
fn debug_falls_back_to_a_generated_key() {
    let path = missing_path();
    assert!(session_settings(&options(&path), BuildMode::Debug).is_ok());
}

#[rstest]
#[case("lax", SameSite::Lax)]
#[case("Strict", SameSite::Strict)]
#[case("NONE", SameSite::None)]
fn same_site_names_are_case_insensitive(#[case] raw: &str, #[case] expected: SameSite) {
    let file = TempKeyFile::new(64).expect("key file");
    let opts = SessionOptions {
        same_site: raw,
        ..options(&file.path)
    };
    let settings = session_settings(&opts, BuildMode::Release).expect("settings");
    assert_eq!(settings.same_site, expected);
}

#[rstest]
fn unknown_same_site_is_rejected() {
    let file = TempKeyFile::new(64).expect("key file");
    let opts = SessionOptions {
        same_site: "sometimes",
        ..options(&file.path)
    };
    let err = session_settings(&opts, BuildMode::Debug)
        .err()
        .expect("invalid policy");
    assert!(matches!(err, SessionConfigError::InvalidSameSite { .. }));
}

#[rstest]
#[case(BuildMode::Release, false)]
#[case(BuildMode::Debug, true)]
fn same_site_none_needs_secure_cookies_in_release(
    #[case] mode: BuildMode,
    #[case] accepted: bool,
) {
    let file = TempKeyFile::new(64).expect("key file");
    let opts = SessionOptions {
        same_site: "None",
        cookie_secure: false,
        ..options(&file.path)
    };
    let result = session_settings(&opts, mode);
    assert_eq!(result.is_ok(), accepted);
    if let Err(err) = result {
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }
}
