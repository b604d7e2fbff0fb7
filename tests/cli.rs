use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("passhash"));
    for var in [
        "PASSHASH_PASSWORD",
        "PASSHASH_MEMORY",
        "PASSHASH_ITERATIONS",
        "PASSHASH_PARALLELISM",
        "PASSHASH_SALT_LEN",
        "PASSHASH_KEY_LEN",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Hashes `password` with cheap parameters and returns the encoded hash.
fn hash(password: &str) -> String {
    let out = bin()
        .env("PASSHASH_PASSWORD", password)
        .arg("hash")
        .arg("--memory")
        .arg("64")
        .arg("--iterations")
        .arg("1")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(out).unwrap().trim().to_string()
}

#[test]
fn hash_prints_encoded_hash() {
    bin()
        .env("PASSHASH_PASSWORD", "pw")
        .arg("hash")
        .arg("--memory")
        .arg("64")
        .arg("--iterations")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\$argon2id\$v=19\$m=64,t=1,p=1\$[A-Za-z0-9+/]{22}\$[A-Za-z0-9+/]{43}\n$").unwrap());
}

#[test]
fn hash_reads_parameters_from_env() {
    bin()
        .env("PASSHASH_PASSWORD", "pw")
        .env("PASSHASH_MEMORY", "128")
        .env("PASSHASH_ITERATIONS", "2")
        .env("PASSHASH_KEY_LEN", "16")
        .arg("hash")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("$argon2id$v=19$m=128,t=2,p=1$"));
}

#[test]
fn hash_with_invalid_parameters_fails() {
    bin()
        .env("PASSHASH_PASSWORD", "pw")
        .arg("hash")
        .arg("--memory")
        .arg("8")
        .arg("--parallelism")
        .arg("2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid Argon2 parameters"));
}

#[test]
fn hash_from_piped_stdin() {
    let out = bin()
        .arg("hash")
        .arg("--memory")
        .arg("64")
        .arg("--iterations")
        .arg("1")
        .write_stdin("piped-pw\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let encoded = String::from_utf8(out).unwrap();

    bin()
        .env("PASSHASH_PASSWORD", "piped-pw")
        .arg("verify")
        .arg(encoded.trim())
        .assert()
        .success();
}

#[test]
fn hash_and_verify_roundtrip() {
    let encoded = hash("correct-password");

    bin()
        .env("PASSHASH_PASSWORD", "correct-password")
        .arg("verify")
        .arg(&encoded)
        .assert()
        .success()
        .stdout(predicate::str::contains("password matches"));
}

#[test]
fn wrong_password_fails() {
    let encoded = hash("correct-password");

    bin()
        .env("PASSHASH_PASSWORD", "wrong-password")
        .arg("verify")
        .arg(&encoded)
        .assert()
        .failure()
        .stderr(predicate::str::contains("password does not match"));
}

#[test]
fn malformed_hash_is_reported_distinctly() {
    bin()
        .env("PASSHASH_PASSWORD", "pw")
        .arg("verify")
        .arg("$argon2id$v=19$m=64,t=1,p=1$c2FsdA")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in the correct format"))
        .stderr(predicate::str::contains("does not match").not());
}

#[test]
fn incompatible_version_is_reported_distinctly() {
    bin()
        .env("PASSHASH_PASSWORD", "pw")
        .arg("verify")
        .arg("$argon2id$v=99$m=65536,t=3,p=2$c2FsdA$aGFzaA")
        .assert()
        .failure()
        .stderr(predicate::str::contains("incompatible version"));
}

#[test]
fn inspect_shows_embedded_parameters() {
    let encoded = hash("pw");

    bin()
        .arg("inspect")
        .arg(&encoded)
        .assert()
        .success()
        .stdout(predicate::str::contains("memory (KiB) : 64"))
        .stdout(predicate::str::contains("iterations   : 1"))
        .stdout(predicate::str::contains("needs rehash : yes"));

    bin()
        .arg("inspect")
        .arg(&encoded)
        .arg("--memory")
        .arg("64")
        .arg("--iterations")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("needs rehash : no"));
}

#[test]
fn inspect_json_output() {
    let out = bin()
        .arg("inspect")
        .arg("--json")
        .arg("$argon2id$v=19$m=65536,t=3,p=2$c2FsdA$aGFzaA")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["algorithm"], "argon2id");
    assert_eq!(value["version"], 19);
    assert_eq!(value["params"]["mem_cost_kib"], 65536);
    assert_eq!(value["params"]["time_cost"], 3);
    assert_eq!(value["params"]["parallelism"], 2);
    assert_eq!(value["params"]["salt_len"], 4);
    assert_eq!(value["params"]["key_len"], 4);
    assert_eq!(value["needs_rehash"], true);
}

#[test]
fn inspect_rejects_garbage() {
    bin()
        .arg("inspect")
        .arg("not-a-hash")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read stored hash"));
}
